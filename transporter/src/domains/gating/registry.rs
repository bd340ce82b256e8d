use crate::domains::gating::{Gate, GateError};
use std::collections::{BTreeMap, HashMap};

/// Directory of registered gates keyed by full name, plus the gate each
/// actor currently has selected.
#[derive(Default)]
pub struct Gates {
    gates: BTreeMap<String, Gate>,
    selected: HashMap<String, String>,
}

impl Gates {
    #[inline]
    pub fn contains(&self, full_name: &str) -> bool {
        self.gates.contains_key(full_name)
    }

    #[inline]
    pub fn get(&self, full_name: &str) -> Option<&Gate> {
        self.gates.get(full_name)
    }

    #[inline]
    pub fn get_mut(&mut self, full_name: &str) -> Option<&mut Gate> {
        self.gates.get_mut(full_name)
    }

    pub fn gate(&self, full_name: &str) -> Result<&Gate, GateError> {
        self.gates
            .get(full_name)
            .ok_or_else(|| GateError::not_found(full_name))
    }

    pub fn gate_mut(&mut self, full_name: &str) -> Result<&mut Gate, GateError> {
        self.gates
            .get_mut(full_name)
            .ok_or_else(|| GateError::not_found(full_name))
    }

    pub(crate) fn insert(&mut self, gate: Gate) {
        self.gates.insert(gate.full_name(), gate);
    }

    pub(crate) fn take(&mut self, full_name: &str) -> Option<Gate> {
        self.gates.remove(full_name)
    }

    /// Snapshot of registered names, safe to iterate while gates change.
    pub fn names(&self) -> Vec<String> {
        self.gates.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Gate> {
        self.gates.values_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.gates.clear();
        self.selected.clear();
    }

    /// Finds a gate by exact full name or by unique case insensitive prefix.
    /// Ambiguous prefixes find nothing.
    pub fn find(&self, name: &str) -> Option<&Gate> {
        if let Some(gate) = self.gates.get(name) {
            return Some(gate);
        }
        let lower = name.to_lowercase();
        let mut matches = self
            .gates
            .iter()
            .filter(|(full_name, _)| full_name.to_lowercase().starts_with(&lower));
        match (matches.next(), matches.next()) {
            (Some((_, gate)), None) => Some(gate),
            _ => None,
        }
    }

    /// Finds a gate relative to a world when the name is not qualified.
    pub fn find_in(&self, world: Option<&str>, name: &str) -> Option<&Gate> {
        match world {
            Some(world) if !name.contains('.') => self.find(&format!("{world}.{name}")),
            _ => self.find(name),
        }
    }

    pub fn select(&mut self, actor: &str, gate: &str) {
        self.selected.insert(actor.to_string(), gate.to_string());
    }

    pub fn selected(&self, actor: &str) -> Option<&str> {
        self.selected.get(actor).map(String::as_str)
    }

    pub(crate) fn deselect_gate(&mut self, gate: &str) {
        self.selected.retain(|_, selected| selected != gate);
    }

    pub(crate) fn rename_selections(&mut self, old: &str, new: &str) {
        for selected in self.selected.values_mut() {
            if selected == old {
                *selected = new.to_string();
            }
        }
    }
}
