use crate::domains::indexing::Point;
use serde::{Deserialize, Serialize};

pub const CONSOLE: &str = "CONSOLE";

/// Player or console issuing a command or causing a host event. Console
/// identity is never read from the wire, only `Actor::console` grants it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub location: Option<Point>,
    #[serde(skip)]
    console: bool,
}

impl Actor {
    pub fn player(name: impl Into<String>, location: Point) -> Self {
        Self {
            name: name.into(),
            location: Some(location),
            console: false,
        }
    }

    pub fn console() -> Self {
        Self {
            name: CONSOLE.to_string(),
            location: None,
            console: true,
        }
    }

    #[inline]
    pub fn is_console(&self) -> bool {
        self.console
    }

    #[inline]
    pub fn world(&self) -> Option<&str> {
        self.location.as_ref().map(|location| location.world.as_str())
    }
}

/// Notifications produced by gate operations, delivered to the host after the
/// operation completes. Gate fields are full names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    GateCreated {
        gate: String,
    },
    GateRemoved {
        gate: String,
    },
    GateDestroyed {
        gate: String,
    },
    GateRenamed {
        old: String,
        new: String,
    },
    GateOpened {
        gate: String,
    },
    GateClosed {
        gate: String,
    },
    GateAttached {
        gate: String,
        origin: String,
    },
    GateDetached {
        gate: String,
        origin: String,
    },
    LinkAdded {
        gate: String,
        target: String,
    },
    LinkRemoved {
        gate: String,
        target: String,
    },
    DestinationChanged {
        gate: String,
        outgoing: Option<String>,
    },
    BlockProtected {
        gate: String,
        point: Point,
    },
    /// The actor has to be moved to `spawn` by the teleport collaborator.
    Departed {
        actor: String,
        from: String,
        to: String,
        spawn: Point,
        yaw: f32,
        message: String,
    },
    Message {
        actor: String,
        text: String,
    },
}

impl Event {
    pub fn message(actor: &Actor, text: impl Into<String>) -> Self {
        Event::Message {
            actor: actor.name.clone(),
            text: text.into(),
        }
    }
}
