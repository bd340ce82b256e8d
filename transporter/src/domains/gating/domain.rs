use crate::domains::designs::DesignError;
use crate::domains::gating::{GateOptions, Placement};
use datamap::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const MAX_NAME_LENGTH: usize = 15;
pub const MAX_PIN_LENGTH: usize = 20;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Rotates a pattern offset drawn for a north facing gate.
    pub fn rotate(&self, [x, y, z]: [i32; 3]) -> [i32; 3] {
        match self {
            Direction::North => [x, y, z],
            Direction::East => [-z, y, x],
            Direction::South => [-x, y, -z],
            Direction::West => [z, y, -x],
        }
    }

    /// Yaw of an entity looking out of a gate facing this direction.
    pub fn yaw(&self) -> f32 {
        match self {
            Direction::South => 0.0,
            Direction::West => 90.0,
            Direction::North => 180.0,
            Direction::East => 270.0,
        }
    }

    pub fn parse(value: &str) -> Option<Direction> {
        match value.to_uppercase().as_str() {
            "NORTH" | "N" => Some(Direction::North),
            "EAST" | "E" => Some(Direction::East),
            "SOUTH" | "S" => Some(Direction::South),
            "WEST" | "W" => Some(Direction::West),
            _ => None,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        };
        f.write_str(name)
    }
}

pub struct Gate {
    pub name: String,
    pub world: String,
    pub direction: Direction,
    pub placement: Placement,
    pub options: GateOptions,
    /// Fully qualified names of candidate destinations, in cycling order.
    pub links: Vec<String>,
    pub outgoing: Option<String>,
    /// Fully qualified names of gates currently using this gate as destination.
    pub incoming: BTreeSet<String>,
    pub pins: BTreeSet<String>,
    pub portal_open: bool,
    pub portal_open_time: i64,
    pub dirty: bool,
}

impl Gate {
    pub fn new(
        world: impl Into<String>,
        name: impl Into<String>,
        direction: Direction,
        placement: Placement,
        options: GateOptions,
    ) -> Self {
        Self {
            name: name.into(),
            world: world.into(),
            direction,
            placement,
            options,
            links: vec![],
            outgoing: None,
            incoming: BTreeSet::new(),
            pins: BTreeSet::new(),
            portal_open: false,
            portal_open_time: 0,
            dirty: true,
        }
    }

    #[inline]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.world, self.name)
    }
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_NAME_LENGTH
        && !name.contains('.')
        && !name.contains('*')
}

pub fn is_valid_pin(pin: &str) -> bool {
    !pin.is_empty()
        && pin.chars().count() <= MAX_PIN_LENGTH
        && !pin.chars().any(char::is_whitespace)
}

/// Splits `world.gate` at the first dot.
pub fn split_full_name(full_name: &str) -> (&str, &str) {
    match full_name.split_once('.') {
        Some((world, name)) => (world, name),
        None => ("", full_name),
    }
}

/// User facing link resolution failures. The message is rendered from the
/// gate's own format options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("{0}")]
    NoLinks(String),
    #[error("{0}")]
    NoLinkSelected(String),
    #[error("{0}")]
    InvalidLink(String),
    #[error("{0}")]
    UnknownDestination(String),
    #[error("gate '{gate}' cannot accept multiple links")]
    MultipleLinksRejected { gate: String },
    #[error("gate '{gate}' already links to '{target}'")]
    AlreadyLinked { gate: String, target: String },
    #[error("gate '{gate}' does not link to '{target}'")]
    NotLinked { gate: String, target: String },
    #[error("you must be within {distance} blocks of '{gate}' to add links")]
    TooFar { gate: String, distance: i32 },
    #[error("linking to on-world gates is not permitted")]
    LinkLocalDenied,
    #[error("linking to off-world gates is not permitted")]
    LinkWorldDenied,
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("gate '{gate}' is misconfigured: {reason}")]
    Configuration { gate: String, reason: String },
    #[error("a gate with the name '{name}' already exists")]
    NameConflict { name: String },
    #[error("'{name}' is not a valid gate name")]
    InvalidName { name: String },
    #[error("unknown or ambiguous gate '{name}'")]
    NotFound { name: String },
    #[error("'{pin}' is not a valid pin")]
    InvalidPin { pin: String },
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error("permission denied: {permission}")]
    PermissionDenied { permission: String },
    #[error("option '{option}': {reason}")]
    Option { option: String, reason: String },
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GateError {
    pub fn not_found(name: &str) -> Self {
        GateError::NotFound {
            name: name.to_string(),
        }
    }
}
