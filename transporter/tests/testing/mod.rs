#![allow(dead_code)]

use datamap::Storage;
use transporter::api::{Actor, Event};
use transporter::config::Config;
use transporter::gating::{
    BlockDetail, Direction, Gate, GateBlock, GateError, GateOptions, Placement, RedstoneMode,
};
use transporter::indexing::Point;
use transporter::world::{PermissionSet, SimulatedWorld};
use transporter::Transporter;

pub const WORLD: &str = "overworld";
pub const NETHER: &str = "nether";

pub fn full(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{WORLD}.{name}")
    }
}

pub fn at(world: &str, x: i32, y: i32, z: i32) -> Point {
    Point::new(world, x, y, z)
}

/// Block positions of a gate built by `block_gate` at `origin`.
pub struct GateLayout {
    pub frame: Point,
    pub portal: Point,
    pub screen: Point,
    pub trigger: Point,
    pub switch: Point,
}

impl GateLayout {
    pub fn new(world: &str, [x, y, z]: [i32; 3]) -> Self {
        Self {
            frame: at(world, x, y - 1, z),
            portal: at(world, x, y, z),
            screen: at(world, x, y + 1, z),
            trigger: at(world, x + 1, y, z),
            switch: at(world, x - 1, y, z),
        }
    }
}

fn detail(configure: impl FnOnce(&mut BlockDetail)) -> BlockDetail {
    let mut detail = BlockDetail::default();
    configure(&mut detail);
    detail
}

pub fn block_gate(world: &str, name: &str, origin: [i32; 3]) -> Gate {
    let layout = GateLayout::new(world, origin);
    let blocks = vec![
        GateBlock {
            point: layout.frame,
            detail: detail(|detail| {
                detail.build = Some("STONE".to_string());
                detail.buildable = true;
            }),
        },
        GateBlock {
            point: layout.portal,
            detail: detail(|detail| {
                detail.open = Some("WATER".to_string());
                detail.openable = true;
                detail.portal = true;
                detail.spawn = true;
                detail.insert = true;
            }),
        },
        GateBlock {
            point: layout.screen,
            detail: detail(|detail| detail.screen = true),
        },
        GateBlock {
            point: layout.trigger,
            detail: detail(|detail| {
                detail.build = Some("STONE".to_string());
                detail.buildable = true;
                detail.trigger = true;
                detail.trigger_open_mode = RedstoneMode::High;
                detail.trigger_close_mode = RedstoneMode::Low;
            }),
        },
        GateBlock {
            point: layout.switch,
            detail: detail(|detail| {
                detail.build = Some("STONE".to_string());
                detail.buildable = true;
                detail.switch = true;
                detail.switch_mode = RedstoneMode::High;
            }),
        },
    ];
    let placement = Placement::Block {
        design: "test".to_string(),
        blocks,
        saved: vec![],
    };
    Gate::new(world, name, Direction::North, placement, GateOptions::default())
}

pub struct TransporterTestScenario {
    pub transporter: Transporter,
    pub permissions: PermissionSet,
    pub layouts: Vec<(String, GateLayout)>,
    pub events: Vec<Event>,
    pub error: Option<GateError>,
}

impl TransporterTestScenario {
    pub fn new() -> Self {
        Self::with_storage(Storage::open_in_memory().unwrap())
    }

    pub fn with_storage(storage: Storage) -> Self {
        let mut transporter = Transporter::new(
            Config::default(),
            storage,
            Box::new(SimulatedWorld::default()),
            Box::new(PermissionSet::default()),
        );
        transporter.seed(7);
        Self {
            transporter,
            permissions: PermissionSet::default(),
            layouts: vec![],
            events: vec![],
            error: None,
        }
    }

    pub fn console() -> Actor {
        Actor::console()
    }

    pub fn player(&self, name: &str) -> Actor {
        let location = self
            .transporter
            .gates
            .iter()
            .next()
            .map(|gate| gate.spawn_points()[0].clone())
            .unwrap_or_else(|| at(WORLD, 0, 64, 0));
        Actor::player(name, location)
    }

    pub fn layout(&self, gate: &str) -> &GateLayout {
        let gate = full(gate);
        &self
            .layouts
            .iter()
            .find(|(name, _)| name == &gate)
            .unwrap()
            .1
    }

    pub fn gate(&self, name: &str) -> &Gate {
        self.transporter.gates.get(&full(name)).unwrap()
    }

    pub fn given_gate(self, name: &str) -> Self {
        self.given_gate_in(WORLD, name)
    }

    pub fn given_gate_in(mut self, world: &str, name: &str) -> Self {
        let origin = [self.layouts.len() as i32 * 10, 64, 0];
        let gate = block_gate(world, name, origin);
        let full_name = gate.full_name();
        self.transporter.add_gate(gate).unwrap();
        self.layouts
            .push((full_name, GateLayout::new(world, origin)));
        self
    }

    pub fn given_option(mut self, gate: &str, option: &str, value: &str) -> Self {
        self.transporter
            .set_option(&Actor::console(), Some(&full(gate)), option, value)
            .unwrap();
        self
    }

    pub fn given_duration(self, gate: &str, duration: i32) -> Self {
        self.given_option(gate, "duration", &duration.to_string())
    }

    pub fn given_link(mut self, from: &str, to: &str) -> Self {
        self.transporter
            .add_link(&Actor::console(), &full(from), &full(to), false)
            .unwrap();
        self
    }

    pub fn given_open(mut self, gate: &str) -> Self {
        self.transporter.open(&Actor::console(), &full(gate)).unwrap();
        self
    }

    pub fn given_permission(mut self, actor: &str, node: &str) -> Self {
        self.permissions.grant(actor, node);
        self.transporter.permissions = Box::new(self.permissions.clone());
        self
    }

    pub fn given_time(mut self, now: i64) -> Self {
        self.transporter.update(now);
        self
    }

    fn record(&mut self, result: Result<Vec<Event>, GateError>) {
        match result {
            Ok(events) => {
                self.events = events;
                self.error = None;
            }
            Err(error) => {
                self.events = vec![];
                self.error = Some(error);
            }
        }
    }

    pub fn when_open(mut self, gate: &str) -> Self {
        let result = self.transporter.open(&Actor::console(), &full(gate));
        self.record(result);
        self
    }

    pub fn when_close(mut self, gate: &str) -> Self {
        let result = self.transporter.close(&Actor::console(), &full(gate));
        self.record(result);
        self
    }

    pub fn when_change_link(mut self, gate: &str) -> Self {
        let result = self.transporter.change_link(&Actor::console(), &full(gate));
        self.record(result);
        self
    }

    pub fn when_link(mut self, from: &str, to: &str) -> Self {
        let result = self
            .transporter
            .add_link(&Actor::console(), &full(from), &full(to), false);
        self.record(result);
        self
    }

    pub fn when_time(mut self, now: i64) -> Self {
        self.events = self.transporter.update(now);
        self.error = None;
        self
    }

    pub fn when<F>(mut self, action: F) -> Self
    where
        F: FnOnce(&mut Transporter) -> Result<Vec<Event>, GateError>,
    {
        let result = action(&mut self.transporter);
        self.record(result);
        self
    }

    pub fn then_gate_should_be_open(self, gate: &str) -> Self {
        assert!(self.gate(gate).portal_open, "gate {gate} should be open");
        self
    }

    pub fn then_gate_should_be_closed(self, gate: &str) -> Self {
        assert!(!self.gate(gate).portal_open, "gate {gate} should be closed");
        self
    }

    pub fn then_incoming_should_be(self, gate: &str, expected: &[&str]) -> Self {
        let actual: Vec<String> = self.gate(gate).incoming.iter().cloned().collect();
        let expected: Vec<String> = expected.iter().map(|name| full(name)).collect();
        assert_eq!(actual, expected, "incoming of {gate}");
        self
    }

    pub fn then_outgoing_should_be(self, gate: &str, expected: Option<&str>) -> Self {
        assert_eq!(
            self.gate(gate).outgoing,
            expected.map(full),
            "outgoing of {gate}"
        );
        self
    }

    pub fn then_action_should_fail<F>(self, check: F) -> Self
    where
        F: FnOnce(&GateError) -> bool,
    {
        match &self.error {
            Some(error) => assert!(check(error), "unexpected error {error:?}"),
            None => panic!("action should fail, events {:?}", self.events),
        }
        self
    }

    pub fn then_events_should_contain(self, expected: Event) -> Self {
        assert!(self.error.is_none(), "action failed {:?}", self.error);
        assert!(
            self.events.contains(&expected),
            "{expected:?} not found in {:?}",
            self.events
        );
        self
    }

    pub fn then_events_should_not_contain<F>(self, predicate: F) -> Self
    where
        F: Fn(&Event) -> bool,
    {
        assert!(
            !self.events.iter().any(predicate),
            "unexpected event in {:?}",
            self.events
        );
        self
    }

    pub fn then_screen_should_be(self, gate: &str, expected: [&str; 4]) -> Self {
        let point = self.layout(gate).screen.clone();
        let actual = self.transporter.world.read_screen(&point).unwrap();
        assert_eq!(actual, expected.map(String::from).to_vec());
        self
    }

    pub fn then_block_should_be(self, point: &Point, expected: Option<&str>) -> Self {
        let actual = self.transporter.world.get_block(point);
        assert_eq!(actual.as_deref(), expected, "block at {point}");
        self
    }
}
