use crate::api::{Actor, Event};
use crate::gating::{is_valid_name, Gate, GateError};
use crate::world::require;
use crate::Transporter;
use log::{error, info, warn};

impl Transporter {
    /// Registers a gate and lets every registered gate, the new one included,
    /// react to its arrival.
    pub fn add_gate(&mut self, gate: Gate) -> Result<Vec<Event>, GateError> {
        let name = gate.full_name();
        if self.gates.contains(&name) {
            return Err(GateError::NameConflict { name });
        }
        let world = gate.world.clone();
        self.gates.insert(gate);
        let mut events = vec![];
        for other in self.gates.names() {
            self.on_gate_added(&other, &name, &mut events);
        }
        events.push(Event::GateCreated { gate: name.clone() });
        if !self.worlds.contains(&world) {
            if self.config.auto_add_worlds {
                self.add_world(&world);
            } else {
                warn!("Gate {name} was added to unknown world {world}");
            }
        }
        info!("Add gate {name}");
        Ok(events)
    }

    /// Drops a gate from the registry, keeping its blocks and document.
    pub fn remove_gate(&mut self, name: &str) -> Result<Vec<Event>, GateError> {
        if !self.gates.contains(name) {
            return Err(GateError::not_found(name));
        }
        let mut events = vec![];
        for other in self.gates.names() {
            self.on_gate_removed(&other, name, &mut events);
        }
        self.cancel_gate_countdowns(name, &mut events);
        let gate = self.gates.take(name).ok_or_else(|| GateError::not_found(name))?;
        self.gates.deselect_gate(name);
        if let Err(error) = self.save_gate(&gate) {
            error!("Unable to save gate {name}, {error}");
        }
        events.push(Event::GateRemoved {
            gate: name.to_string(),
        });
        info!("Remove gate {name}");
        Ok(events)
    }

    pub fn destroy(&mut self, actor: &Actor, gate: &str, unbuild: bool) -> Result<Vec<Event>, GateError> {
        let name = self
            .gates
            .find_in(actor.world(), gate)
            .ok_or_else(|| GateError::not_found(gate))?
            .full_name();
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.destroy.{name}"),
        )?;
        let mut events = self.destroy_gate(&name, unbuild)?;
        events.push(Event::message(actor, format!("destroyed gate '{name}'")));
        Ok(events)
    }

    /// Deletes a gate for good. Remaining gates drop every reference to it.
    pub fn destroy_gate(&mut self, name: &str, unbuild: bool) -> Result<Vec<Event>, GateError> {
        if !self.gates.contains(name) {
            return Err(GateError::not_found(name));
        }
        let mut events = vec![];
        self.close_gate(name, &mut events);
        let gate = self.gates.take(name).ok_or_else(|| GateError::not_found(name))?;
        for other in self.gates.names() {
            self.on_gate_destroyed(&other, name, &mut events);
        }
        self.gates.deselect_gate(name);
        self.indices.remove_gate(name);
        if unbuild {
            self.unbuild_blocks(&gate.placement);
        }
        if let Err(error) = self.storage.delete(&gate.world, &gate.name) {
            error!("Unable to delete gate {name}, {error}");
        }
        events.push(Event::GateDestroyed {
            gate: name.to_string(),
        });
        info!("Destroy gate {name}");
        Ok(events)
    }

    pub fn rename(&mut self, actor: &Actor, gate: &str, new_name: &str) -> Result<Vec<Event>, GateError> {
        let name = self
            .gates
            .find_in(actor.world(), gate)
            .ok_or_else(|| GateError::not_found(gate))?
            .full_name();
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.rename.{name}"),
        )?;
        self.rename_gate(&name, new_name)
    }

    pub fn rename_gate(&mut self, name: &str, new_name: &str) -> Result<Vec<Event>, GateError> {
        if !is_valid_name(new_name) {
            return Err(GateError::InvalidName {
                name: new_name.to_string(),
            });
        }
        let gate = self.gates.gate(name)?;
        let old_name = gate.name.clone();
        let new_full_name = format!("{}.{}", gate.world, new_name);
        if self.gates.contains(&new_full_name) {
            return Err(GateError::NameConflict {
                name: new_full_name,
            });
        }
        let mut gate = self.gates.take(name).ok_or_else(|| GateError::not_found(name))?;
        gate.name = new_name.to_string();
        gate.dirty = true;
        let world = gate.world.clone();
        self.gates.insert(gate);
        self.indices.rename_gate(name, &new_full_name);
        self.scheduler.rename_gate(name, &new_full_name);
        self.gates.rename_selections(name, &new_full_name);
        for countdown in self.countdowns.values_mut() {
            if countdown.gate == name {
                countdown.gate = new_full_name.clone();
            }
        }

        let mut events = vec![];
        for other in self.gates.names() {
            if other != new_full_name {
                self.on_gate_renamed(&other, name, &new_full_name, &mut events);
            }
        }
        if let Err(error) = self.storage.delete(&world, &old_name) {
            error!("Unable to delete gate {name}, {error}");
        }
        self.persist(&new_full_name);
        self.render_screens(&new_full_name);
        events.push(Event::GateRenamed {
            old: name.to_string(),
            new: new_full_name.clone(),
        });
        info!("Rename gate {name} to {new_full_name}");
        Ok(events)
    }

    fn on_gate_added(&mut self, name: &str, added: &str, events: &mut Vec<Event>) {
        if name == added {
            self.on_add(name);
            return;
        }
        let depends = self
            .gates
            .get(name)
            .map(|gate| gate.outgoing.as_deref() == Some(added))
            .unwrap_or(false);
        if depends {
            self.on_destination_changed(name, events);
        }
    }

    fn on_gate_removed(&mut self, name: &str, removed: &str, events: &mut Vec<Event>) {
        if name == removed {
            self.on_remove(name);
            return;
        }
        let depends = self
            .gates
            .get(name)
            .map(|gate| gate.outgoing.as_deref() == Some(removed))
            .unwrap_or(false);
        if depends {
            self.on_destination_changed(name, events);
        }
        self.close_if_allowed(name, events);
    }

    fn on_gate_destroyed(&mut self, name: &str, destroyed: &str, events: &mut Vec<Event>) {
        if name == destroyed {
            return;
        }
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        let mut destination_changed = false;
        if gate.has_link(destroyed) {
            gate.links.retain(|link| link != destroyed);
            gate.dirty = true;
            destination_changed = true;
            events.push(Event::LinkRemoved {
                gate: name.to_string(),
                target: destroyed.to_string(),
            });
        }
        if gate.outgoing.as_deref() == Some(destroyed) {
            gate.outgoing = None;
            gate.dirty = true;
            destination_changed = true;
        }
        if gate.incoming.remove(destroyed) {
            gate.dirty = true;
        }
        if destination_changed {
            self.on_destination_changed(name, events);
        }
        self.close_if_allowed(name, events);
    }

    fn on_gate_renamed(&mut self, name: &str, old: &str, new: &str, events: &mut Vec<Event>) {
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        for link in gate.links.iter_mut().filter(|link| link.as_str() == old) {
            *link = new.to_string();
            gate.dirty = true;
        }
        if gate.incoming.remove(old) {
            gate.incoming.insert(new.to_string());
            gate.dirty = true;
        }
        if gate.outgoing.as_deref() == Some(old) {
            gate.outgoing = Some(new.to_string());
            gate.dirty = true;
            self.on_destination_changed(name, events);
        }
    }
}
