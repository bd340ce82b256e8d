use datamap::Storage;
use serde_json::json;
use transporter::api::{Actor, Event};
use transporter::indexing::Role;

use crate::testing::{full, GateLayout, TransporterTestScenario, NETHER, WORLD};

mod testing;

fn reload(path: &std::path::Path, now: i64) -> TransporterTestScenario {
    let mut scenario = TransporterTestScenario::with_storage(Storage::open(path).unwrap());
    scenario.transporter.update(now);
    let events = scenario.transporter.load_worlds().unwrap();
    scenario.events = events;
    for (index, name) in ["A", "B", "C"].iter().enumerate() {
        scenario
            .layouts
            .push((full(name), GateLayout::new(WORLD, [index as i32 * 10, 64, 0])));
    }
    scenario
}

#[test]
fn test_gates_survive_restart() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("gates.sqlite");

    let mut scenario = TransporterTestScenario::with_storage(Storage::open(&path).unwrap())
        .given_gate("A")
        .given_gate("B")
        .given_gate("C")
        .given_link("A", "B")
        .given_link("A", "C")
        .given_option("A", "duration", "5000")
        .given_open("A");
    scenario
        .transporter
        .add_pin(&Actor::console(), Some(&full("A")), "secret")
        .unwrap();
    scenario.transporter.shutdown();
    assert!(scenario.transporter.gates.is_empty());
    drop(scenario);

    let scenario = reload(&path, 10_000)
        .then_events_should_contain(Event::GateCreated { gate: full("A") })
        .then_gate_should_be_open("A")
        .then_gate_should_be_open("B")
        .then_gate_should_be_closed("C")
        .then_outgoing_should_be("A", Some("B"))
        .then_incoming_should_be("B", &["A"])
        .then_screen_should_be("A", ["A", "B", "", ""]);
    let gate = scenario.gate("A");
    assert_eq!(gate.links, vec![full("B"), full("C")]);
    assert_eq!(gate.options.duration, 5000);
    assert_eq!(gate.portal_open_time, 10_000);
    assert!(gate.has_pin("secret"));
    assert!(!gate.dirty);
    let portal = scenario.layout("A").portal.clone();
    assert_eq!(
        scenario.transporter.indices.find(Role::Portal, &portal),
        Some("overworld.A")
    );

    scenario
        .when_time(15_000)
        .then_gate_should_be_open("A")
        .when_time(15_200)
        .then_events_should_contain(Event::GateClosed { gate: full("A") })
        .then_gate_should_be_closed("B");
}

#[test]
fn test_malformed_documents_are_skipped() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("gates.sqlite");
    {
        let storage = Storage::open(&path).unwrap();
        let gate = testing::block_gate(WORLD, "A", [0, 64, 0]);
        storage
            .save(WORLD, "A", &gate.to_document().unwrap())
            .unwrap();
        storage
            .save(WORLD, "Broken", &json!({"name": "Broken", "type": "teleporter"}))
            .unwrap();
        let gate = testing::block_gate(WORLD, "Other", [10, 64, 0]);
        storage
            .save(WORLD, "Mismatch", &gate.to_document().unwrap())
            .unwrap();
        let gate = testing::block_gate(WORLD, "Stray", [20, 64, 0]);
        storage
            .save(NETHER, "Stray", &gate.to_document().unwrap())
            .unwrap();
    }

    let scenario = reload(&path, 0);
    assert_eq!(scenario.transporter.gates.names(), vec![full("A")]);
    let worlds: Vec<String> = scenario.transporter.worlds().cloned().collect();
    assert_eq!(worlds, vec![NETHER.to_string(), WORLD.to_string()]);
}

#[test]
fn test_undecodable_document_is_skipped() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("gates.sqlite");
    {
        let storage = Storage::open(&path).unwrap();
        let gate = testing::block_gate(WORLD, "A", [0, 64, 0]);
        storage
            .save(WORLD, "A", &gate.to_document().unwrap())
            .unwrap();
        storage
            .connection()
            .execute(
                "insert into gates (world, name, document) values (?, 'Corrupt', '{not json')",
                [WORLD],
            )
            .unwrap();
    }

    let scenario = reload(&path, 0);
    assert_eq!(scenario.transporter.gates.names(), vec![full("A")]);
}

#[test]
fn test_save_writes_dirty_gates_only() {
    let mut scenario = TransporterTestScenario::new()
        .given_gate("A")
        .given_gate("B");
    assert_eq!(scenario.transporter.save(false), 2);
    assert_eq!(scenario.transporter.save(false), 0);

    let mut scenario = scenario.given_link("A", "B");
    assert_eq!(scenario.transporter.save(false), 1);
    assert_eq!(scenario.transporter.save(true), 2);

    let entry = scenario
        .transporter
        .storage()
        .fetch_one(WORLD, "A")
        .unwrap()
        .unwrap();
    assert_eq!(entry.get_string("name").unwrap(), "A");
    assert_eq!(entry.get::<Vec<String>>("links").unwrap(), vec![full("B")]);
    assert_eq!(entry.get_string("type").unwrap(), "block");
    assert_eq!(entry.get_string("designName").unwrap(), "test");
}

#[test]
fn test_removed_gate_can_be_loaded_again() {
    let mut scenario = TransporterTestScenario::new()
        .given_gate("A")
        .when(|transporter| transporter.remove_gate(&full("A")));
    assert!(scenario.transporter.gates.is_empty());

    let events = scenario.transporter.load_world(WORLD).unwrap();
    assert!(events.contains(&Event::GateCreated { gate: full("A") }));
    assert!(scenario.transporter.gates.contains(&full("A")));
}
