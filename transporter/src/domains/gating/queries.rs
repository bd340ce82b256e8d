use crate::domains::gating::{is_valid_pin, split_full_name, Gate, GateError, LinkError};
use crate::domains::indexing::{Point, Role, Volume};

pub const SCREEN_LINES: usize = 4;

impl Gate {
    #[inline]
    pub fn has_link(&self, link: &str) -> bool {
        self.links.iter().any(|candidate| candidate == link)
    }

    pub fn is_last_link(&self) -> bool {
        match &self.outgoing {
            None => self.links.is_empty(),
            Some(outgoing) => {
                let index = self.links.iter().position(|link| link == outgoing);
                index.map(|index| index + 1 == self.links.len()).unwrap_or(false)
            }
        }
    }

    /// Selected link if it is still one of the gate's links. Whether the
    /// destination exists is decided by the registry.
    pub fn selected_link(&self) -> Result<&str, LinkError> {
        let outgoing = match &self.outgoing {
            Some(outgoing) => outgoing,
            None if self.links.is_empty() => {
                return Err(LinkError::NoLinks(self.options.no_links_format.clone()))
            }
            None => {
                return Err(LinkError::NoLinkSelected(
                    self.options.no_link_selected_format.clone(),
                ))
            }
        };
        if !self.has_link(outgoing) {
            return Err(LinkError::InvalidLink(
                self.options.invalid_link_format.clone(),
            ));
        }
        Ok(outgoing)
    }

    pub fn unknown_destination(&self) -> LinkError {
        LinkError::UnknownDestination(self.options.unknown_link_format.clone())
    }

    #[inline]
    pub fn volume(&self, role: Role) -> Volume {
        self.placement.volume(&self.full_name(), &self.world, role)
    }

    #[inline]
    pub fn spawn_points(&self) -> Vec<Point> {
        self.placement.spawn_points()
    }

    /// Lines displayed on the gate's screens for the current selection.
    pub fn screen_lines(&self, destination: Option<&Gate>) -> Vec<String> {
        let options = &self.options;
        let format = match (&self.outgoing, destination) {
            (None, _) if self.links.is_empty() => &options.link_none_format,
            (None, _) => &options.link_unselected_format,
            (Some(_), None) => &options.link_offline_format,
            (Some(_), Some(destination)) if destination.world != self.world => {
                &options.link_world_format
            }
            (Some(_), Some(_)) => &options.link_local_format,
        };
        let (to_world, to_gate) = match (destination, &self.outgoing) {
            (Some(destination), _) => (destination.world.clone(), destination.name.clone()),
            (None, Some(outgoing)) => {
                let (world, name) = split_full_name(outgoing);
                (world.to_string(), name.to_string())
            }
            (None, None) => (String::new(), String::new()),
        };
        let text = format
            .replace("%fromGate%", &self.name)
            .replace("%fromWorld%", &self.world)
            .replace("%toGate%", &to_gate)
            .replace("%toWorld%", &to_world);
        let mut lines: Vec<String> = text
            .split("\\n")
            .take(SCREEN_LINES)
            .map(str::to_string)
            .collect();
        lines.resize(SCREEN_LINES, String::new());
        lines
    }

    #[inline]
    pub fn has_pin(&self, pin: &str) -> bool {
        self.pins.contains(pin)
    }

    pub fn add_pin(&mut self, pin: &str) -> Result<bool, GateError> {
        if !is_valid_pin(pin) {
            return Err(GateError::InvalidPin {
                pin: pin.to_string(),
            });
        }
        let added = self.pins.insert(pin.to_string());
        self.dirty |= added;
        Ok(added)
    }

    pub fn remove_pin(&mut self, pin: &str) -> bool {
        let removed = self.pins.remove(pin);
        self.dirty |= removed;
        removed
    }

    pub fn remove_all_pins(&mut self) {
        if !self.pins.is_empty() {
            self.pins.clear();
            self.dirty = true;
        }
    }
}
