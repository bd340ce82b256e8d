use crate::api::{Actor, Event};
use crate::gating::{resolve_option, GateError};
use crate::world::require;
use crate::Transporter;
use log::info;

impl Transporter {
    pub(crate) fn resolve_gate(&self, actor: &Actor, gate: Option<&str>) -> Result<String, GateError> {
        match gate {
            Some(gate) => self
                .gates
                .find_in(actor.world(), gate)
                .map(|gate| gate.full_name())
                .ok_or_else(|| GateError::not_found(gate)),
            None => self
                .gates
                .selected(&actor.name)
                .map(str::to_string)
                .ok_or_else(|| GateError::not_found("<selected>")),
        }
    }

    pub fn select(&mut self, actor: &Actor, gate: &str) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, Some(gate))?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.select.{name}"),
        )?;
        self.gates.select(&actor.name, &name);
        Ok(vec![Event::message(actor, format!("selected gate '{name}'"))])
    }

    /// Reads an option of the given gate, or of the actor's selected gate.
    pub fn get_option(
        &self,
        actor: &Actor,
        gate: Option<&str>,
        option: &str,
    ) -> Result<String, GateError> {
        let name = self.resolve_gate(actor, gate)?;
        let option = resolve_option(option)?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.option.{option}.{name}"),
        )?;
        self.gates.gate(&name)?.options.get_option(option)
    }

    pub fn set_option(
        &mut self,
        actor: &Actor,
        gate: Option<&str>,
        option: &str,
        value: &str,
    ) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, gate)?;
        let option = resolve_option(option)?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.option.{option}.{name}"),
        )?;
        let gate = self.gates.gate_mut(&name)?;
        gate.options.set_option(option, value)?;
        gate.dirty = true;
        let current = gate.options.get_option(option)?;
        info!("Set option {option} of gate {name} to {current}");

        let mut events = vec![];
        match option {
            "protect" => self.rebuild_protection(&name),
            option if option.starts_with("link") && option.ends_with("Format") => {
                self.render_screens(&name)
            }
            "duration" => self.close_if_allowed(&name, &mut events),
            _ => {}
        }
        events.push(Event::message(
            actor,
            format!("option '{option}' set to '{current}'"),
        ));
        Ok(events)
    }

    pub fn add_pin(&mut self, actor: &Actor, gate: Option<&str>, pin: &str) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, gate)?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.pin.add.{name}"),
        )?;
        let added = self.gates.gate_mut(&name)?.add_pin(pin)?;
        let text = if added {
            format!("added pin to '{name}'")
        } else {
            format!("pin is already on '{name}'")
        };
        Ok(vec![Event::message(actor, text)])
    }

    pub fn remove_pin(
        &mut self,
        actor: &Actor,
        gate: Option<&str>,
        pin: Option<&str>,
    ) -> Result<Vec<Event>, GateError> {
        let name = self.resolve_gate(actor, gate)?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.gate.pin.remove.{name}"),
        )?;
        let gate = self.gates.gate_mut(&name)?;
        let text = match pin {
            Some(pin) if gate.remove_pin(pin) => format!("removed pin from '{name}'"),
            Some(_) => format!("pin is not on '{name}'"),
            None => {
                gate.remove_all_pins();
                format!("removed all pins from '{name}'")
            }
        };
        Ok(vec![Event::message(actor, text)])
    }
}
