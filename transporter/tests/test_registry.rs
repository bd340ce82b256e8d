use transporter::api::{Actor, Event};
use transporter::gating::GateError;
use transporter::indexing::Role;

use crate::testing::{block_gate, full, GateLayout, TransporterTestScenario, WORLD};

mod testing;

#[test]
fn test_added_gate_refreshes_only_dependants() {
    let mut scenario = TransporterTestScenario::new().given_gate("B");
    let mut gate = block_gate(WORLD, "A", [50, 64, 0]);
    gate.links = vec![full("C")];
    gate.outgoing = Some(full("C"));
    scenario.transporter.add_gate(gate).unwrap();
    scenario
        .layouts
        .push((full("A"), GateLayout::new(WORLD, [50, 64, 0])));

    scenario
        .then_screen_should_be("A", ["A", "", "<offline>", ""])
        .when(|transporter| transporter.add_gate(block_gate(WORLD, "C", [100, 64, 0])))
        .then_events_should_contain(Event::GateCreated { gate: full("C") })
        .then_events_should_contain(Event::DestinationChanged {
            gate: full("A"),
            outgoing: Some(full("C")),
        })
        .then_events_should_not_contain(|event| {
            matches!(event, Event::DestinationChanged { gate, .. } if gate == &full("B"))
        })
        .then_screen_should_be("A", ["A", "C", "", ""]);
}

#[test]
fn test_name_conflict() {
    TransporterTestScenario::new()
        .given_gate("A")
        .when(|transporter| transporter.add_gate(block_gate(WORLD, "A", [90, 64, 0])))
        .then_action_should_fail(|error| {
            matches!(error, GateError::NameConflict { name } if name == "overworld.A")
        });
}

#[test]
fn test_find_by_unique_prefix() {
    let scenario = TransporterTestScenario::new()
        .given_gate("Alpha")
        .given_gate("Alpine")
        .given_gate("Beta");
    let gates = &scenario.transporter.gates;
    assert_eq!(
        gates.find("overworld.B").map(|gate| gate.full_name()),
        Some(full("Beta"))
    );
    assert!(gates.find("overworld.Al").is_none());
    assert_eq!(
        gates.find_in(Some(WORLD), "alph").map(|gate| gate.full_name()),
        Some(full("Alpha"))
    );
    assert_eq!(
        gates.find_in(Some("nether"), "overworld.Alpi").map(|gate| gate.full_name()),
        Some(full("Alpine"))
    );
    assert!(gates.find_in(Some("nether"), "Beta").is_none());
}

#[test]
fn test_destroy_strips_references() {
    let mut scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_link("A", "B")
        .given_link("B", "A")
        .given_open("A");
    assert_eq!(scenario.transporter.save(true), 2);
    let portal = scenario.layout("B").portal.clone();

    let scenario = scenario
        .when(|transporter| transporter.destroy_gate(&full("B"), false))
        .then_events_should_contain(Event::LinkRemoved {
            gate: full("A"),
            target: full("B"),
        })
        .then_events_should_contain(Event::GateDestroyed { gate: full("B") })
        .then_outgoing_should_be("A", None)
        .then_incoming_should_be("A", &[])
        .then_gate_should_be_closed("A")
        .then_screen_should_be("A", ["A", "", "<none>", ""]);
    assert!(scenario.transporter.gates.get(&full("B")).is_none());
    assert!(scenario.transporter.indices.find(Role::Portal, &portal).is_none());
    let storage = scenario.transporter.storage();
    assert!(storage.fetch_one(WORLD, "B").unwrap().is_none());
    assert!(storage.fetch_one(WORLD, "A").unwrap().is_some());
}

#[test]
fn test_destroy_unbuilds_blocks() {
    let mut scenario = TransporterTestScenario::new().given_gate("A");
    let frame = scenario.layout("A").frame.clone();
    scenario.transporter.world.set_block(&frame, "STONE");
    scenario
        .when(|transporter| transporter.destroy_gate(&full("A"), true))
        .then_block_should_be(&frame, None);
}

#[test]
fn test_destroy_requires_permission() {
    let alice = Actor::player("Alice", testing::at(WORLD, 0, 64, 0));
    TransporterTestScenario::new()
        .given_gate("A")
        .when(|transporter| transporter.destroy(&alice, "A", false))
        .then_action_should_fail(|error| matches!(error, GateError::PermissionDenied { .. }))
        .given_permission("Alice", "trp.gate.destroy.overworld.A")
        .when(|transporter| transporter.destroy(&alice, "A", false))
        .then_events_should_contain(Event::GateDestroyed { gate: full("A") });
}

#[test]
fn test_remove_keeps_document() {
    let scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_link("A", "B")
        .given_open("A");
    let screen = scenario.layout("B").screen.clone();
    let scenario = scenario
        .when(|transporter| transporter.remove_gate(&full("B")))
        .then_events_should_contain(Event::GateRemoved { gate: full("B") })
        .then_events_should_contain(Event::DestinationChanged {
            gate: full("A"),
            outgoing: Some(full("B")),
        })
        .then_outgoing_should_be("A", Some("B"));
    let transporter = &scenario.transporter;
    assert!(!transporter.has_valid_destination(scenario.gate("A")));
    assert!(transporter.indices.find(Role::Screen, &screen).is_none());
    let entry = scenario.transporter.storage().fetch_one(WORLD, "B").unwrap();
    assert!(entry.is_some());
}

#[test]
fn test_remove_unknown_gate() {
    TransporterTestScenario::new()
        .when(|transporter| transporter.remove_gate("overworld.Nope"))
        .then_action_should_fail(|error| matches!(error, GateError::NotFound { .. }));
}

#[test]
fn test_rename_updates_references() {
    let mut scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .given_link("A", "B")
        .given_open("A");
    scenario.transporter.save(true);
    let screen = scenario.layout("B").screen.clone();

    let scenario = scenario
        .when(|transporter| transporter.rename_gate(&full("B"), "Bravo"))
        .then_events_should_contain(Event::GateRenamed {
            old: full("B"),
            new: full("Bravo"),
        })
        .then_events_should_contain(Event::DestinationChanged {
            gate: full("A"),
            outgoing: Some(full("Bravo")),
        })
        .then_outgoing_should_be("A", Some("Bravo"))
        .then_gate_should_be_open("A")
        .then_screen_should_be("A", ["A", "Bravo", "", ""]);
    assert_eq!(scenario.gate("A").links, vec![full("Bravo")]);
    let renamed = scenario.gate("Bravo");
    assert!(renamed.portal_open);
    assert!(renamed.incoming.contains(&full("A")));
    assert_eq!(
        scenario.transporter.indices.find(Role::Screen, &screen),
        Some("overworld.Bravo")
    );
    let storage = scenario.transporter.storage();
    assert!(storage.fetch_one(WORLD, "B").unwrap().is_none());
    assert!(storage.fetch_one(WORLD, "Bravo").unwrap().is_some());
}

#[test]
fn test_rename_validation() {
    TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B")
        .when(|transporter| transporter.rename_gate(&full("A"), "bad.name"))
        .then_action_should_fail(|error| matches!(error, GateError::InvalidName { .. }))
        .when(|transporter| transporter.rename_gate(&full("A"), "ThisNameIsTooLong"))
        .then_action_should_fail(|error| matches!(error, GateError::InvalidName { .. }))
        .when(|transporter| transporter.rename_gate(&full("A"), "B"))
        .then_action_should_fail(|error| matches!(error, GateError::NameConflict { .. }));
}
