use crate::api::Event;
use crate::gating::{Gate, GateError};
use crate::timing::Task;
use crate::Transporter;
use log::debug;

/// Slack added to duration timers so they never fire before expiry.
pub const EXPIRY_SLACK: i64 = 100;

impl Transporter {
    /// Registers `origin` as using `name` as destination. The destination opens
    /// if needed and attaches to its own destination in turn. Every new origin
    /// restarts the expiry window. Recursion ends at the first gate that
    /// already knows the caller.
    pub(crate) fn attach_gate(&mut self, name: &str, origin: &str, events: &mut Vec<Event>) {
        let now = self.now;
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        if gate.incoming.contains(origin) {
            return;
        }
        gate.incoming.insert(origin.to_string());
        gate.portal_open_time = now;
        gate.dirty = true;
        events.push(Event::GateAttached {
            gate: name.to_string(),
            origin: origin.to_string(),
        });
        let opened = !gate.portal_open;
        gate.portal_open = true;
        let stale = match &gate.outgoing {
            Some(outgoing) => !gate.has_link(outgoing),
            None => true,
        };
        let mut destination_changed = false;
        if stale {
            let first = gate.links.first().cloned();
            if first != gate.outgoing {
                gate.outgoing = first;
                destination_changed = true;
            }
        }
        let outgoing = gate.outgoing.clone();
        debug!("Attach {origin} to {name}");
        if opened {
            self.on_open(name);
            events.push(Event::GateOpened {
                gate: name.to_string(),
            });
        }
        if opened || destination_changed {
            self.on_destination_changed(name, events);
        }
        if let Some(outgoing) = outgoing {
            if self.gates.contains(&outgoing) {
                self.attach_gate(&outgoing, name, events);
            }
        }
        self.schedule_expiry(name);
    }

    pub(crate) fn detach_gate(&mut self, name: &str, origin: &str, events: &mut Vec<Event>) {
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        if !gate.incoming.remove(origin) {
            return;
        }
        gate.dirty = true;
        debug!("Detach {origin} from {name}");
        events.push(Event::GateDetached {
            gate: name.to_string(),
            origin: origin.to_string(),
        });
        self.close_if_allowed(name, events);
    }

    pub(crate) fn close_if_allowed(&mut self, name: &str, events: &mut Vec<Event>) {
        if self.can_close(name) {
            self.close_gate(name, events);
        }
    }

    /// Auto close decision.
    ///
    /// A permanent gate (duration < 1) closes once it has neither a valid
    /// destination nor anyone attached. A temporary gate closes after expiry
    /// unless other gates still pass through it, except for a mutual pair
    /// whose only attachment is its own destination.
    pub fn can_close(&self, name: &str) -> bool {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return false,
        };
        let valid = self.has_valid_destination(gate);
        let duration = gate.options.duration as i64;
        if duration < 1 {
            return !valid && gate.incoming.is_empty();
        }
        let expired = self.now - gate.portal_open_time + 50 >= duration;
        if let Some(outgoing) = &gate.outgoing {
            if valid && gate.incoming.len() == 1 && gate.incoming.contains(outgoing) {
                return expired;
            }
        }
        if gate.incoming.is_empty() {
            return gate.outgoing.is_none() || expired;
        }
        false
    }

    pub fn has_valid_destination(&self, gate: &Gate) -> bool {
        self.destination(gate).is_ok()
    }

    /// Currently selected destination gate.
    pub fn destination(&self, gate: &Gate) -> Result<&Gate, GateError> {
        let outgoing = gate.selected_link()?;
        match self.gates.get(outgoing) {
            Some(destination) => Ok(destination),
            None => Err(gate.unknown_destination().into()),
        }
    }

    pub(crate) fn schedule_expiry(&mut self, name: &str) {
        let duration = match self.gates.get(name) {
            Some(gate) if gate.options.duration > 0 => gate.options.duration as i64,
            _ => return,
        };
        let due = self.now + duration + EXPIRY_SLACK;
        self.scheduler.schedule_at(
            due,
            Task::CloseIfAllowed {
                gate: name.to_string(),
            },
        );
    }
}
