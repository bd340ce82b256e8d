use crate::api::{Actor, Event};
use crate::gating::{GateError, LinkError};
use crate::world::require;
use crate::Transporter;
use log::debug;

impl Transporter {
    /// Opens a gate on behalf of an actor.
    pub fn open(&mut self, actor: &Actor, gate: &str) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, Some(gate))?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.open.{name}"),
        )?;
        let mut events = vec![];
        self.open_gate(&name, &mut events)?;
        Ok(events)
    }

    pub(crate) fn open_gate(&mut self, name: &str, events: &mut Vec<Event>) -> Result<(), GateError> {
        let now = self.now;
        let gate = self.gates.gate_mut(name)?;
        if gate.portal_open {
            return Ok(());
        }
        let selected = gate
            .outgoing
            .clone()
            .filter(|outgoing| gate.has_link(outgoing));
        let outgoing = match selected {
            Some(outgoing) => outgoing,
            None => {
                let first = gate
                    .links
                    .first()
                    .cloned()
                    .ok_or_else(|| LinkError::NoLinks(gate.options.no_links_format.clone()))?;
                gate.outgoing = Some(first.clone());
                gate.dirty = true;
                first
            }
        };
        if !self.gates.contains(&outgoing) {
            let error = self.gates.gate(name)?.unknown_destination();
            return Err(error.into());
        }
        let gate = self.gates.gate_mut(name)?;
        gate.portal_open = true;
        gate.portal_open_time = now;
        gate.dirty = true;
        debug!("Open gate {name} to {outgoing}");
        self.attach_gate(&outgoing, name, events);
        self.on_open(name);
        self.on_destination_changed(name, events);
        events.push(Event::GateOpened {
            gate: name.to_string(),
        });
        self.schedule_expiry(name);
        Ok(())
    }
}
