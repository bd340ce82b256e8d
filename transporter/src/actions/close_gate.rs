use crate::api::{Actor, Event};
use crate::gating::GateError;
use crate::world::require;
use crate::Transporter;
use log::debug;

impl Transporter {
    pub fn close(&mut self, actor: &Actor, gate: &str) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, Some(gate))?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.close.{name}"),
        )?;
        let mut events = vec![];
        self.close_gate(&name, &mut events);
        Ok(events)
    }

    /// Closes the gate and forgets everyone attached to it. Attached gates
    /// stay open, only the gate's own destination is detached.
    pub(crate) fn close_gate(&mut self, name: &str, events: &mut Vec<Event>) {
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        if !gate.portal_open {
            return;
        }
        gate.portal_open = false;
        gate.incoming.clear();
        gate.dirty = true;
        let outgoing = gate.outgoing.clone();
        debug!("Close gate {name}");
        self.cancel_gate_countdowns(name, events);
        self.on_close(name);
        self.on_destination_changed(name, events);
        events.push(Event::GateClosed {
            gate: name.to_string(),
        });
        if let Some(outgoing) = outgoing {
            if self.gates.contains(&outgoing) {
                self.detach_gate(&outgoing, name, events);
            }
        }
    }
}
