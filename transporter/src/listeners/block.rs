use crate::api::{Actor, Event};
use crate::gating::GateError;
use crate::indexing::{Point, Role};
use crate::world::has_permission;
use crate::Transporter;
use log::{debug, info, warn};

impl Transporter {
    /// Nothing may be placed inside an open portal.
    pub fn block_can_build(&self, point: &Point) -> bool {
        self.indices.find(Role::Portal, point).is_none()
    }

    /// Liquids never flow out of a portal.
    pub fn block_flow(&self, from: &Point) -> bool {
        self.indices.find(Role::Portal, from).is_none()
    }

    /// Returns events with `BlockProtected` when the damage has to be cancelled.
    pub fn block_damage(&mut self, point: &Point) -> Vec<Event> {
        let mut events = vec![];
        if let Some(gate) = self.indices.find(Role::Protection, point) {
            let gate = gate.to_string();
            self.protect(&gate, point, &mut events);
        }
        events
    }

    pub fn block_break(&mut self, actor: &Actor, point: &Point) -> Result<Vec<Event>, GateError> {
        let mut events = vec![];
        if let Some(gate) = self.indices.find(Role::Protection, point) {
            let gate = gate.to_string();
            self.protect(&gate, point, &mut events);
            return Ok(events);
        }
        let gate = match self.indices.find(Role::Screen, point) {
            Some(gate) => gate.to_string(),
            None => return Ok(events),
        };
        let permission = format!("trp.gate.destroy.{gate}");
        if has_permission(self.permissions.as_ref(), actor, &permission) {
            events.extend(self.destroy_gate(&gate, false)?);
            events.push(Event::message(actor, format!("destroyed gate '{gate}'")));
        } else {
            warn!("Player {} is not permitted to destroy {gate}", actor.name);
            events.push(Event::message(actor, format!("permission denied: {permission}")));
            self.protect(&gate, point, &mut events);
        }
        Ok(events)
    }

    fn protect(&mut self, gate: &str, point: &Point, events: &mut Vec<Event>) {
        debug!("Protect {point} of gate {gate}");
        self.on_protect(gate);
        events.push(Event::BlockProtected {
            gate: gate.to_string(),
            point: point.clone(),
        });
    }

    /// Redstone power changed at a block. Triggers open or close the gate,
    /// switches cycle its links.
    pub fn redstone(&mut self, point: &Point, old_power: i32, new_power: i32) -> Vec<Event> {
        let mut events = vec![];
        if let Some(name) = self.indices.find(Role::Trigger, point).map(str::to_string) {
            self.redstone_trigger(&name, point, old_power, new_power, &mut events);
        }
        if let Some(name) = self.indices.find(Role::Switch, point).map(str::to_string) {
            self.redstone_switch(&name, point, old_power, new_power, &mut events);
        }
        events
    }

    fn redstone_trigger(
        &mut self,
        name: &str,
        point: &Point,
        old_power: i32,
        new_power: i32,
        events: &mut Vec<Event>,
    ) {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return,
        };
        let detail = match gate.placement.block_at(point) {
            Some(block) => &block.detail,
            None => return,
        };
        if !gate.portal_open && self.has_valid_destination(gate) {
            if detail.trigger_open_mode.matches(old_power, new_power) {
                match self.open_gate(name, events) {
                    Ok(()) => info!("Gate {name} opened via redstone"),
                    Err(error) => warn!("Unable to open gate {name} via redstone, {error}"),
                }
            }
        } else if gate.portal_open && detail.trigger_close_mode.matches(old_power, new_power) {
            self.close_gate(name, events);
            info!("Gate {name} closed via redstone");
        }
    }

    fn redstone_switch(
        &mut self,
        name: &str,
        point: &Point,
        old_power: i32,
        new_power: i32,
        events: &mut Vec<Event>,
    ) {
        let switch = self
            .gates
            .get(name)
            .and_then(|gate| gate.placement.block_at(point))
            .map(|block| block.detail.switch_mode.matches(old_power, new_power))
            .unwrap_or(false);
        if switch {
            if let Err(error) = self.next_link(name, events) {
                warn!("Unable to change link of gate {name} via redstone, {error}");
            } else {
                info!("Gate {name} changed link via redstone");
            }
        }
    }
}
