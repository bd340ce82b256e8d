use crate::api::{Actor, Event};
use crate::gating::GateError;
use crate::world::require;
use crate::Transporter;
use log::debug;
use rand::seq::SliceRandom;

impl Transporter {
    /// Selects the gate's next link on behalf of an actor.
    pub fn change_link(&mut self, actor: &Actor, gate: &str) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, Some(gate))?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.changeLink.{name}"),
        )?;
        let mut events = vec![];
        self.next_link(&name, &mut events)?;
        Ok(events)
    }

    pub(crate) fn next_link(&mut self, name: &str, events: &mut Vec<Event>) -> Result<(), GateError> {
        let gate = self.gates.gate(name)?;
        if gate.links.len() == 1 && gate.outgoing.as_ref() == gate.links.first() {
            return Ok(());
        }
        let current = gate.outgoing.clone();
        if gate.portal_open {
            if let Some(current) = &current {
                if self.gates.contains(current) {
                    self.detach_gate(current, name, events);
                }
            }
        }

        let gate = self.gates.gate_mut(name)?;
        let next = match current.as_ref().filter(|current| gate.has_link(current)) {
            None => gate.links.first().cloned(),
            Some(current) if gate.options.random_next_link => {
                let mut candidates: Vec<&String> =
                    gate.links.iter().filter(|link| *link != current).collect();
                candidates.shuffle(&mut self.rng);
                candidates
                    .first()
                    .map(|link| link.to_string())
                    .or_else(|| Some(current.clone()))
            }
            Some(current) => {
                let index = gate
                    .links
                    .iter()
                    .position(|link| link == current)
                    .unwrap_or(0);
                gate.links.get((index + 1) % gate.links.len()).cloned()
            }
        };
        debug!("Gate {name} switches link from {current:?} to {next:?}");
        gate.outgoing = next.clone();
        gate.dirty = true;
        let open = gate.portal_open;
        self.on_destination_changed(name, events);

        if open {
            match next {
                Some(next) if self.gates.contains(&next) => self.attach_gate(&next, name, events),
                _ => self.close_if_allowed(name, events),
            }
        }
        Ok(())
    }
}
