use crate::domains::indexing::{GateMap, Point, Role, Volume};

/// Five independent role indices shared by all gates.
#[derive(Default, Debug)]
pub struct Indices {
    pub portals: GateMap,
    pub protections: GateMap,
    pub screens: GateMap,
    pub switches: GateMap,
    pub triggers: GateMap,
}

impl Indices {
    pub fn map(&self, role: Role) -> &GateMap {
        match role {
            Role::Portal => &self.portals,
            Role::Protection => &self.protections,
            Role::Screen => &self.screens,
            Role::Switch => &self.switches,
            Role::Trigger => &self.triggers,
        }
    }

    pub fn map_mut(&mut self, role: Role) -> &mut GateMap {
        match role {
            Role::Portal => &mut self.portals,
            Role::Protection => &mut self.protections,
            Role::Screen => &mut self.screens,
            Role::Switch => &mut self.switches,
            Role::Trigger => &mut self.triggers,
        }
    }

    #[inline]
    pub fn put(&mut self, role: Role, volume: &Volume) {
        self.map_mut(role).put(volume)
    }

    /// Rebuilds the gate's entries of one role.
    pub fn replace(&mut self, role: Role, volume: &Volume) {
        let map = self.map_mut(role);
        map.remove_gate(&volume.gate);
        map.put(volume);
    }

    #[inline]
    pub fn remove(&mut self, role: Role, gate: &str) {
        self.map_mut(role).remove_gate(gate);
    }

    pub fn remove_gate(&mut self, gate: &str) {
        for role in Role::ALL {
            self.remove(role, gate);
        }
    }

    #[inline]
    pub fn find(&self, role: Role, point: &Point) -> Option<&str> {
        self.map(role).get_gate(point)
    }

    pub fn rename_gate(&mut self, old: &str, new: &str) {
        for role in Role::ALL {
            self.map_mut(role).rename_gate(old, new);
        }
    }
}
