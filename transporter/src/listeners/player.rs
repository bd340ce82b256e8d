use crate::api::{Actor, Event};
use crate::gating::GateError;
use crate::indexing::{Point, Role};
use crate::interaction::{resolve_actions, GateAction, InteractionFacts};
use crate::timing::Task;
use crate::world::{has_permission, require};
use crate::{Countdown, Transporter};
use log::{debug, info, warn};
use rand::seq::SliceRandom;

impl Transporter {
    /// Actor used a block, decides through the interaction table what
    /// happens to the gate owning it.
    pub fn interact(&mut self, actor: &Actor, point: &Point) -> Result<Vec<Event>, GateError> {
        let trigger = self.indices.find(Role::Trigger, point).map(str::to_string);
        let mut switch = self.indices.find(Role::Switch, point).map(str::to_string);
        if trigger.is_some() && switch.is_some() && trigger != switch {
            switch = None;
        }
        let name = match (&trigger, &switch) {
            (Some(name), _) | (None, Some(name)) => name.clone(),
            (None, None) => return Ok(vec![]),
        };
        self.gates.select(&actor.name, &name);

        let gate = self.gates.gate(&name)?;
        let simple_name = gate.name.clone();
        let permissions = self.permissions.as_ref();
        let has = |action: &str| {
            has_permission(permissions, actor, &format!("trp.gate.{action}.{name}"))
        };
        let facts = InteractionFacts {
            open: gate.portal_open,
            open_permission: has("open"),
            close_permission: has("close"),
            change_link_permission: has("changeLink"),
            valid_destination: self.has_valid_destination(gate),
            last_link: gate.is_last_link(),
            trigger: trigger.is_some(),
            switch: switch.is_some(),
        };
        let key = facts.key();
        let actions = resolve_actions(key);
        debug!("Gate {name} key/action is {key}/{actions:?}");
        let actions = match actions {
            Some(actions) => actions,
            None => return Ok(vec![Event::message(actor, "not permitted")]),
        };

        let mut events = vec![];
        for action in actions {
            match action {
                GateAction::Open => match self.open_gate(&name, &mut events) {
                    Ok(()) => {
                        info!("Player {} opened gate {name}", actor.name);
                        events.push(Event::message(actor, format!("opened gate '{simple_name}'")));
                    }
                    Err(error) => {
                        warn!("Player {} failed to open gate {name}, {error}", actor.name);
                        events.push(Event::message(actor, error.to_string()));
                    }
                },
                GateAction::Close => {
                    self.close_gate(&name, &mut events);
                    info!("Player {} closed gate {name}", actor.name);
                    events.push(Event::message(actor, format!("closed gate '{simple_name}'")));
                }
                GateAction::ChangeLink => {
                    if let Err(error) = self.next_link(&name, &mut events) {
                        warn!("Player {} failed to change link of {name}, {error}", actor.name);
                        events.push(Event::message(actor, error.to_string()));
                    }
                }
            }
        }
        Ok(events)
    }

    /// Actor moved to a block. Entering an open portal departs, directly or
    /// after a countdown, leaving the portal cancels the countdown.
    pub fn player_move(&mut self, actor: &Actor, to: &Point) -> Vec<Event> {
        let mut events = vec![];
        if self.positions.get(&actor.name) == Some(to) {
            return events;
        }
        self.positions.insert(actor.name.clone(), to.clone());
        let name = match self.indices.find(Role::Portal, to) {
            Some(name) => name.to_string(),
            None => {
                self.locked.remove(&actor.name);
                self.cancel_countdown(&actor.name, &mut events);
                return events;
            }
        };
        if self.locked.contains(&actor.name) || self.countdowns.contains_key(&actor.name) {
            return events;
        }
        let countdown = match self.gates.get(&name) {
            Some(gate) => gate.options.countdown,
            None => return events,
        };
        if countdown > 0 {
            self.start_countdown(actor, &name, &mut events);
            return events;
        }
        if let Err(error) = self.depart(actor, &name, &mut events) {
            warn!("Player {} failed to depart from {name}, {error}", actor.name);
            events.push(Event::message(actor, error.to_string()));
        }
        events
    }

    fn depart(&mut self, actor: &Actor, name: &str, events: &mut Vec<Event>) -> Result<(), GateError> {
        let gate = self.gates.gate(name)?;
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.use.{name}"),
        )?;
        let destination = self.destination(gate)?;
        let to = destination.full_name();
        let spawns = destination.spawn_points();
        let yaw = destination.direction.yaw();
        let context = if destination.world == gate.world {
            destination.name.clone()
        } else {
            to.clone()
        };
        let message = gate
            .options
            .teleport_format
            .replace("%toGateCtx%", &context)
            .replace("%toGate%", &destination.name)
            .replace("%toWorld%", &destination.world)
            .replace("%fromGate%", &gate.name)
            .replace("%fromWorld%", &gate.world);
        let send_next_link = gate.options.send_next_link;
        let spawn = match spawns.choose(&mut self.rng) {
            Some(spawn) => spawn.clone(),
            None => {
                return Err(GateError::Configuration {
                    gate: to,
                    reason: "no spawn blocks".to_string(),
                })
            }
        };
        info!("Player {} departs from {name} to {to}", actor.name);
        events.push(Event::Departed {
            actor: actor.name.clone(),
            from: name.to_string(),
            to,
            spawn: spawn.clone(),
            yaw,
            message,
        });
        self.locked.insert(actor.name.clone());
        self.positions.insert(actor.name.clone(), spawn);
        if send_next_link {
            self.next_link(name, events)?;
        }
        Ok(())
    }

    fn start_countdown(&mut self, actor: &Actor, name: &str, events: &mut Vec<Event>) {
        let (countdown, interval, text) = match self.gates.get(name) {
            Some(gate) => (
                gate.options.countdown as i64,
                gate.options.countdown_interval as i64,
                gate.options.countdown_format.clone(),
            ),
            None => return,
        };
        let task = self.scheduler.schedule_at(
            self.now + interval.min(countdown),
            Task::CountdownTick {
                actor: actor.name.clone(),
                gate: name.to_string(),
            },
        );
        self.countdowns.insert(
            actor.name.clone(),
            Countdown {
                actor: actor.clone(),
                gate: name.to_string(),
                task,
                end: self.now + countdown,
            },
        );
        debug!("Countdown of {} started at {name}", actor.name);
        events.push(Event::message(actor, text));
    }

    pub(crate) fn countdown_tick(&mut self, actor: &str, name: &str, events: &mut Vec<Event>) {
        let (mut starter, end) = match self.countdowns.get(actor) {
            Some(countdown) if countdown.gate == name => (countdown.actor.clone(), countdown.end),
            _ => return,
        };
        let (interval, format) = match self.gates.get(name) {
            Some(gate) => (
                gate.options.countdown_interval as i64,
                gate.options.countdown_interval_format.clone(),
            ),
            None => {
                self.countdowns.remove(actor);
                return;
            }
        };
        if !starter.is_console() {
            starter.location = self.positions.get(actor).cloned();
        }
        let actor = starter;
        let remaining = end - self.now;
        if remaining <= 0 {
            self.countdowns.remove(&actor.name);
            if let Err(error) = self.depart(&actor, name, events) {
                warn!("Player {} failed to depart from {name}, {error}", actor.name);
                events.push(Event::message(&actor, error.to_string()));
            }
            return;
        }
        let seconds = (remaining + 999) / 1000;
        events.push(Event::message(
            &actor,
            format.replace("%time%", &seconds.to_string()),
        ));
        let task = self.scheduler.schedule_at(
            self.now + interval.min(remaining),
            Task::CountdownTick {
                actor: actor.name.clone(),
                gate: name.to_string(),
            },
        );
        if let Some(countdown) = self.countdowns.get_mut(&actor.name) {
            countdown.task = task;
        }
    }

    pub(crate) fn cancel_countdown(&mut self, actor: &str, events: &mut Vec<Event>) {
        let countdown = match self.countdowns.remove(actor) {
            Some(countdown) => countdown,
            None => return,
        };
        self.scheduler.cancel(countdown.task);
        if let Some(gate) = self.gates.get(&countdown.gate) {
            events.push(Event::Message {
                actor: actor.to_string(),
                text: gate.options.countdown_cancel_format.clone(),
            });
        }
        debug!("Countdown of {actor} at {} canceled", countdown.gate);
    }

    pub(crate) fn cancel_gate_countdowns(&mut self, name: &str, events: &mut Vec<Event>) {
        let actors: Vec<String> = self
            .countdowns
            .iter()
            .filter(|(_, countdown)| countdown.gate == name)
            .map(|(actor, _)| actor.clone())
            .collect();
        for actor in actors {
            self.cancel_countdown(&actor, events);
        }
    }
}
