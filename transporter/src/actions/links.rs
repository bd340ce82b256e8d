use crate::api::{Actor, Event};
use crate::gating::{GateError, LinkError};
use crate::world::require;
use crate::Transporter;
use log::info;

impl Transporter {
    /// Adds a link from `gate` to `target`, and back when `reverse` is set.
    pub fn add_link(
        &mut self,
        actor: &Actor,
        gate: &str,
        target: &str,
        reverse: bool,
    ) -> Result<Vec<Event>, GateError> {
        let from = self
            .gates
            .find_in(actor.world(), gate)
            .ok_or_else(|| GateError::not_found(gate))?;
        let name = from.full_name();
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.link.add.{name}"),
        )?;
        if !from.links.is_empty() && !from.options.multi_link {
            return Err(LinkError::MultipleLinksRejected { gate: name }.into());
        }
        let distance = from.options.link_add_distance;
        if distance > 0 {
            if let Some(location) = &actor.location {
                let near = location.world == from.world
                    && from
                        .placement
                        .points()
                        .iter()
                        .any(|point| point.distance_to(location) <= distance as f64);
                if !near {
                    return Err(LinkError::TooFar {
                        gate: name,
                        distance,
                    }
                    .into());
                }
            }
        }
        let to = self
            .gates
            .find_in(actor.world(), target)
            .ok_or_else(|| GateError::not_found(target))?;
        let target = to.full_name();
        if to.world == from.world {
            if !self.config.allow_link_local || !from.options.link_local {
                return Err(LinkError::LinkLocalDenied.into());
            }
        } else if !self.config.allow_link_world || !from.options.link_world {
            return Err(LinkError::LinkWorldDenied.into());
        }
        if from.has_link(&target) {
            return Err(LinkError::AlreadyLinked { gate: name, target }.into());
        }

        let mut events = vec![];
        self.link_gate(&name, &target, &mut events)?;
        info!("Add link from {name} to {target}");
        events.push(Event::message(
            actor,
            format!("added link from '{name}' to '{target}'"),
        ));
        if reverse {
            let back = self.add_link(actor, &target, &name, false)?;
            events.extend(back);
        }
        Ok(events)
    }

    pub fn remove_link(
        &mut self,
        actor: &Actor,
        gate: &str,
        target: &str,
    ) -> Result<Vec<Event>, GateError> {
        let from = self
            .gates
            .find_in(actor.world(), gate)
            .ok_or_else(|| GateError::not_found(gate))?;
        let name = from.full_name();
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.link.remove.{name}"),
        )?;
        let target = match self.gates.find_in(actor.world(), target) {
            Some(to) => to.full_name(),
            None if target.contains('.') => target.to_string(),
            None => format!("{}.{}", from.world, target),
        };
        let mut events = vec![];
        if !self.unlink_gate(&name, &target, &mut events)? {
            return Err(LinkError::NotLinked { gate: name, target }.into());
        }
        info!("Remove link from {name} to {target}");
        events.push(Event::message(
            actor,
            format!("removed link from '{name}' to '{target}'"),
        ));
        Ok(events)
    }

    /// Appends a link. The first link becomes the selected one.
    pub(crate) fn link_gate(
        &mut self,
        name: &str,
        target: &str,
        events: &mut Vec<Event>,
    ) -> Result<bool, GateError> {
        let gate = self.gates.gate_mut(name)?;
        if gate.has_link(target) {
            return Ok(false);
        }
        gate.links.push(target.to_string());
        if gate.links.len() == 1 {
            gate.outgoing = Some(target.to_string());
        }
        gate.dirty = true;
        events.push(Event::LinkAdded {
            gate: name.to_string(),
            target: target.to_string(),
        });
        self.on_destination_changed(name, events);
        Ok(true)
    }

    /// Removes a link. Removing the selected link leaves nothing selected.
    pub(crate) fn unlink_gate(
        &mut self,
        name: &str,
        target: &str,
        events: &mut Vec<Event>,
    ) -> Result<bool, GateError> {
        let gate = self.gates.gate_mut(name)?;
        if !gate.has_link(target) {
            return Ok(false);
        }
        gate.links.retain(|link| link != target);
        let selected = gate.outgoing.as_deref() == Some(target);
        let attached = selected && gate.portal_open;
        if selected {
            gate.outgoing = None;
        }
        gate.dirty = true;
        events.push(Event::LinkRemoved {
            gate: name.to_string(),
            target: target.to_string(),
        });
        if attached {
            self.detach_gate(target, name, events);
        }
        self.on_destination_changed(name, events);
        self.close_if_allowed(name, events);
        Ok(true)
    }
}
