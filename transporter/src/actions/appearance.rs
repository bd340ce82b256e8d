use crate::api::Event;
use crate::gating::{Placement, SavedBlock};
use crate::indexing::Role;
use crate::world::AIR;
use crate::Transporter;

impl Transporter {
    /// Indexes a freshly registered gate and draws its screens.
    pub(crate) fn on_add(&mut self, name: &str) {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return,
        };
        for role in [Role::Screen, Role::Trigger, Role::Switch] {
            self.indices.replace(role, &gate.volume(role));
        }
        if gate.portal_open {
            self.indices.replace(Role::Portal, &gate.volume(Role::Portal));
        }
        if gate.options.protect {
            self.indices
                .replace(Role::Protection, &gate.volume(Role::Protection));
        }
        self.render_screens(name);
    }

    pub(crate) fn on_remove(&mut self, name: &str) {
        self.indices.remove_gate(name);
    }

    pub(crate) fn on_open(&mut self, name: &str) {
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        let restore = gate.options.restore_on_close;
        if let Placement::Block { blocks, saved, .. } = &mut gate.placement {
            saved.clear();
            for block in blocks.iter().filter(|block| block.detail.openable) {
                if restore {
                    if let Some(current) = self.world.get_block(&block.point) {
                        saved.push(SavedBlock {
                            point: block.point.clone(),
                            block: current,
                        });
                    }
                }
                if let Some(open) = &block.detail.open {
                    self.world.set_block(&block.point, open);
                }
            }
        }
        let volume = gate.volume(Role::Portal);
        self.indices.replace(Role::Portal, &volume);
    }

    pub(crate) fn on_close(&mut self, name: &str) {
        let gate = match self.gates.get_mut(name) {
            Some(gate) => gate,
            None => return,
        };
        let restore = gate.options.restore_on_close;
        if let Placement::Block { blocks, saved, .. } = &mut gate.placement {
            for block in blocks.iter().filter(|block| block.detail.openable) {
                let previous = saved
                    .iter()
                    .find(|saved| saved.point == block.point)
                    .filter(|_| restore);
                let replacement = match previous {
                    Some(previous) => previous.block.as_str(),
                    None => block.detail.build.as_deref().unwrap_or(AIR),
                };
                self.world.set_block(&block.point, replacement);
            }
            saved.clear();
        }
        self.indices.remove(Role::Portal, name);
    }

    /// Restores tampered buildable blocks of a protected gate.
    pub(crate) fn on_protect(&mut self, name: &str) {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return,
        };
        if let Placement::Block { blocks, .. } = &gate.placement {
            for block in blocks.iter().filter(|block| block.detail.buildable) {
                let kind = if gate.portal_open && block.detail.openable {
                    block.detail.open.as_deref()
                } else {
                    block.detail.build.as_deref()
                };
                if let Some(kind) = kind {
                    self.world.set_block(&block.point, kind);
                }
            }
        }
        self.render_screens(name);
    }

    pub(crate) fn rebuild_protection(&mut self, name: &str) {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return,
        };
        if gate.options.protect {
            self.indices
                .replace(Role::Protection, &gate.volume(Role::Protection));
        } else {
            self.indices.remove(Role::Protection, name);
        }
    }

    pub(crate) fn on_destination_changed(&mut self, name: &str, events: &mut Vec<Event>) {
        if let Some(gate) = self.gates.get(name) {
            events.push(Event::DestinationChanged {
                gate: name.to_string(),
                outgoing: gate.outgoing.clone(),
            });
        }
        self.render_screens(name);
    }

    pub(crate) fn render_screens(&mut self, name: &str) {
        let gate = match self.gates.get(name) {
            Some(gate) => gate,
            None => return,
        };
        let destination = gate
            .outgoing
            .as_ref()
            .and_then(|outgoing| self.gates.get(outgoing));
        let lines = gate.screen_lines(destination);
        for point in gate.volume(Role::Screen).points() {
            self.world.write_screen(&point, &lines);
        }
    }

    pub(crate) fn build_blocks(&mut self, placement: &Placement) {
        if let Placement::Block { blocks, .. } = placement {
            for block in blocks.iter().filter(|block| block.detail.buildable) {
                if let Some(build) = &block.detail.build {
                    self.world.set_block(&block.point, build);
                }
            }
        }
    }

    pub(crate) fn unbuild_blocks(&mut self, placement: &Placement) {
        if let Placement::Block { blocks, .. } = placement {
            for block in blocks.iter().filter(|block| block.detail.buildable) {
                self.world.set_block(&block.point, AIR);
            }
        }
    }
}
