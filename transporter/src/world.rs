use crate::api::Actor;
use crate::domains::gating::GateError;
use crate::domains::indexing::Point;
use std::collections::{HashMap, HashSet};

pub const AIR: &str = "AIR";

/// Host side of the block world. Gates only describe which block should be
/// where, the host performs the change.
pub trait BlockWorld {
    fn get_block(&self, point: &Point) -> Option<String>;

    fn set_block(&mut self, point: &Point, block: &str);

    fn write_screen(&mut self, point: &Point, lines: &[String]);

    fn read_screen(&self, point: &Point) -> Option<Vec<String>>;
}

pub trait Permissions {
    fn has(&self, actor: &str, permission: &str) -> bool;
}

/// Console actors bypass every permission.
pub fn require(
    permissions: &dyn Permissions,
    actor: &Actor,
    permission: &str,
) -> Result<(), GateError> {
    if actor.is_console() || permissions.has(&actor.name, permission) {
        Ok(())
    } else {
        Err(GateError::PermissionDenied {
            permission: permission.to_string(),
        })
    }
}

pub fn has_permission(permissions: &dyn Permissions, actor: &Actor, permission: &str) -> bool {
    actor.is_console() || permissions.has(&actor.name, permission)
}

/// In memory block world, used when no host is attached.
#[derive(Default)]
pub struct SimulatedWorld {
    pub blocks: HashMap<Point, String>,
    pub screens: HashMap<Point, Vec<String>>,
}

impl BlockWorld for SimulatedWorld {
    fn get_block(&self, point: &Point) -> Option<String> {
        self.blocks.get(point).cloned()
    }

    fn set_block(&mut self, point: &Point, block: &str) {
        if block == AIR {
            self.blocks.remove(point);
        } else {
            self.blocks.insert(point.clone(), block.to_string());
        }
    }

    fn write_screen(&mut self, point: &Point, lines: &[String]) {
        self.screens.insert(point.clone(), lines.to_vec());
    }

    fn read_screen(&self, point: &Point) -> Option<Vec<String>> {
        self.screens.get(point).cloned()
    }
}

/// Granted permission nodes per actor. A node ending with `.*` grants every
/// permission below it, `*` grants everything.
#[derive(Default, Debug, Clone)]
pub struct PermissionSet {
    granted: HashMap<String, HashSet<String>>,
}

impl PermissionSet {
    pub fn grant(&mut self, actor: &str, node: &str) {
        self.granted
            .entry(actor.to_string())
            .or_default()
            .insert(node.to_string());
    }

    pub fn revoke(&mut self, actor: &str, node: &str) {
        if let Some(nodes) = self.granted.get_mut(actor) {
            nodes.remove(node);
        }
    }
}

impl Permissions for PermissionSet {
    fn has(&self, actor: &str, permission: &str) -> bool {
        let nodes = match self.granted.get(actor) {
            Some(nodes) => nodes,
            None => return false,
        };
        nodes.iter().any(|node| {
            node == "*"
                || node == permission
                || node
                    .strip_suffix(".*")
                    .map(|prefix| {
                        permission.starts_with(prefix)
                            && permission[prefix.len()..].starts_with('.')
                    })
                    .unwrap_or(false)
        })
    }
}
