use transporter::api::{Actor, Event};
use transporter::interaction::{expand_mask, resolve_actions, GateAction, InteractionFacts};

use crate::testing::{full, TransporterTestScenario};

mod testing;

#[test]
fn test_open_switch_with_destination_changes_link() {
    let facts = InteractionFacts {
        open: true,
        open_permission: false,
        close_permission: true,
        change_link_permission: true,
        valid_destination: true,
        last_link: false,
        trigger: false,
        switch: true,
    };
    assert_eq!(facts.key(), 157);
    assert_eq!(resolve_actions(157), Some(&[GateAction::ChangeLink][..]));
}

#[test]
fn test_closed_trigger_with_permission_opens() {
    let facts = InteractionFacts {
        open_permission: true,
        trigger: true,
        ..InteractionFacts::default()
    };
    assert_eq!(resolve_actions(facts.key()), Some(&[GateAction::Open][..]));
}

#[test]
fn test_closed_trigger_and_switch_changes_link_then_opens() {
    let facts = InteractionFacts {
        open_permission: true,
        change_link_permission: true,
        trigger: true,
        switch: true,
        ..InteractionFacts::default()
    };
    assert_eq!(
        resolve_actions(facts.key()),
        Some(&[GateAction::ChangeLink, GateAction::Open][..])
    );
}

#[test]
fn test_open_trigger_on_last_link_closes_and_changes_link() {
    let facts = InteractionFacts {
        open: true,
        close_permission: true,
        change_link_permission: true,
        last_link: true,
        trigger: true,
        switch: true,
        ..InteractionFacts::default()
    };
    assert_eq!(
        resolve_actions(facts.key()),
        Some(&[GateAction::Close, GateAction::ChangeLink][..])
    );
}

#[test]
fn test_missing_permissions_are_refused() {
    let facts = InteractionFacts {
        trigger: true,
        valid_destination: true,
        ..InteractionFacts::default()
    };
    assert_eq!(resolve_actions(facts.key()), None);
    assert_eq!(resolve_actions(0), None);
}

#[test]
fn test_expand_mask() {
    assert_eq!(expand_mask("01xxxx1x").len(), 32);
    assert_eq!(expand_mask("00000000").into_iter().collect::<Vec<_>>(), vec![0]);
    assert_eq!(
        expand_mask("1x000000").into_iter().collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[test]
fn test_interact_with_trigger_toggles_gate() {
    let scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_link("A", "B");
    let trigger = scenario.layout("A").trigger.clone();
    let console = Actor::console();
    scenario
        .when(|transporter| transporter.interact(&console, &trigger))
        .then_gate_should_be_open("A")
        .then_events_should_contain(Event::message(&console, "opened gate 'A'"))
        .when(|transporter| transporter.interact(&console, &trigger))
        .then_gate_should_be_closed("A")
        .then_events_should_contain(Event::message(&console, "closed gate 'A'"));
}

#[test]
fn test_interact_selects_gate() {
    let scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_link("A", "B");
    let trigger = scenario.layout("A").trigger.clone();
    let alice = scenario.player("Alice");
    let scenario = scenario
        .when(|transporter| transporter.interact(&alice, &trigger))
        .then_events_should_contain(Event::message(&alice, "not permitted"))
        .then_gate_should_be_closed("A");
    assert_eq!(
        scenario.transporter.gates.selected("Alice"),
        Some(full("A").as_str())
    );
}

#[test]
fn test_interact_with_switch_changes_link() {
    let scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_gate("C")
        .given_link("A", "B")
        .given_link("A", "C")
        .given_permission("Alice", "trp.gate.changeLink.overworld.A");
    let switch = scenario.layout("A").switch.clone();
    let alice = scenario.player("Alice");
    scenario
        .when(|transporter| transporter.interact(&alice, &switch))
        .then_outgoing_should_be("A", Some("C"))
        .then_gate_should_be_closed("A")
        .then_screen_should_be("A", ["A", "C", "", ""]);
}

#[test]
fn test_interact_with_plain_block() {
    let scenario = TransporterTestScenario::new().given_gate("A");
    let frame = scenario.layout("A").frame.clone();
    let scenario = scenario.when(|transporter| transporter.interact(&Actor::console(), &frame));
    assert!(scenario.events.is_empty());
    assert!(scenario.error.is_none());
}
