use crate::api::{Actor, Event};
use crate::designs::DesignError;
use crate::gating::{Direction, GateError};
use crate::indexing::{Point, Role};
use crate::world::require;
use crate::Transporter;

impl Transporter {
    /// Builds a new gate from a design with its insert block at `anchor`.
    pub fn create_gate(
        &mut self,
        actor: &Actor,
        design: &str,
        name: &str,
        anchor: &Point,
        direction: Direction,
    ) -> Result<Vec<Event>, GateError> {
        if !self.config.allow_build {
            return Err(GateError::PermissionDenied {
                permission: "allowBuild".to_string(),
            });
        }
        self.instantiate(actor, design, name, anchor, direction, true)
    }

    /// Turns an already built design into a gate when a sign is written on
    /// one of its screen positions. The sign names the gate, the next lines
    /// name a link and an optional `reverse`.
    pub fn sign_change(
        &mut self,
        actor: &Actor,
        point: &Point,
        lines: &[String],
    ) -> Result<Vec<Event>, GateError> {
        if !self.config.allow_sign_creation || self.indices.find(Role::Screen, point).is_some() {
            return Ok(vec![]);
        }
        let mut lines = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty());
        let name = match lines.next() {
            Some(name) => name.to_string(),
            None => return Ok(vec![]),
        };
        let mut parts = vec![];
        let mut reverse = false;
        for line in lines {
            if !parts.is_empty() && "reverse".starts_with(&line.to_lowercase()) {
                reverse = true;
                break;
            }
            parts.push(line);
        }
        let link = if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        };
        let matched = self.designs.values().find_map(|design| {
            design
                .match_screen(self.world.as_ref(), point)
                .map(|(anchor, direction)| (design.name.clone(), anchor, direction))
        });
        let (design, anchor, direction) = match matched {
            Some(matched) => matched,
            None => return Ok(vec![]),
        };
        let mut events = self.instantiate(actor, &design, &name, &anchor, direction, false)?;
        if let Some(link) = link {
            let gate = format!("{}.{}", anchor.world, name);
            match self.add_link(actor, &gate, &link, reverse) {
                Ok(linked) => events.extend(linked),
                Err(error) => events.push(Event::message(actor, error.to_string())),
            }
        }
        Ok(events)
    }

    fn instantiate(
        &mut self,
        actor: &Actor,
        design: &str,
        name: &str,
        anchor: &Point,
        direction: Direction,
        build: bool,
    ) -> Result<Vec<Event>, GateError> {
        require(
            self.permissions.as_ref(),
            actor,
            &format!("trp.create.{design}"),
        )?;
        let design = self
            .designs
            .get(design)
            .ok_or_else(|| DesignError::Unknown {
                name: design.to_string(),
            })?;
        let gate = design.create(&anchor.world, name, anchor, direction)?;
        let full_name = gate.full_name();
        if self.gates.contains(&full_name) {
            return Err(GateError::NameConflict { name: full_name });
        }
        if build {
            self.build_blocks(&gate.placement);
        }
        let mut events = self.add_gate(gate)?;
        self.gates.select(&actor.name, &full_name);
        self.persist(&full_name);
        events.push(Event::message(actor, format!("created gate '{name}'")));
        Ok(events)
    }
}
