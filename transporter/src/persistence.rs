use crate::api::Event;
use crate::designs::Design;
use crate::gating::{Gate, GateError};
use crate::indexing::Indices;
use crate::Transporter;
use log::{error, info, warn};
use std::fs;
use std::path::Path;

impl Transporter {
    /// Loads every gate stored for the world. Malformed or conflicting gates
    /// are skipped.
    pub fn load_world(&mut self, world: &str) -> Result<Vec<Event>, GateError> {
        self.add_world(world);
        let entries = self.storage.fetch_all(world)?;
        let mut events = vec![];
        let mut loaded = 0;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!("Skip gate, {error}");
                    continue;
                }
            };
            let gate = match Gate::from_entry(&entry) {
                Ok(gate) => gate,
                Err(error) => {
                    warn!("Skip gate {}.{}, {error}", entry.world, entry.name);
                    continue;
                }
            };
            let name = gate.full_name();
            match self.add_gate(gate) {
                Ok(added) => {
                    events.extend(added);
                    loaded += 1;
                }
                Err(error) => {
                    warn!("Skip gate {name}, {error}");
                    continue;
                }
            }
            let now = self.now;
            if let Some(gate) = self.gates.get_mut(&name) {
                gate.dirty = false;
                if gate.portal_open {
                    gate.portal_open_time = now;
                    self.schedule_expiry(&name);
                }
            }
        }
        info!("Load {loaded} gates of world {world}");
        Ok(events)
    }

    pub fn load_worlds(&mut self) -> Result<Vec<Event>, GateError> {
        let mut events = vec![];
        for world in self.storage.worlds()? {
            match self.load_world(&world) {
                Ok(loaded) => events.extend(loaded),
                Err(error) => error!("Unable to load world {world}, {error}"),
            }
        }
        Ok(events)
    }

    /// Writes dirty gates, or every gate when forced. Returns saved count.
    pub fn save(&mut self, force: bool) -> usize {
        let mut saved = 0;
        for name in self.gates.names() {
            let dirty = self.gates.get(&name).map(|gate| gate.dirty).unwrap_or(false);
            if (force || dirty) && self.persist(&name) {
                saved += 1;
            }
        }
        if saved > 0 && self.config.show_gates_saved_message {
            info!("Saved {saved} gates");
        }
        saved
    }

    pub(crate) fn save_gate(&self, gate: &Gate) -> Result<(), GateError> {
        let document = gate.to_document()?;
        self.storage.save(&gate.world, &gate.name, &document)?;
        Ok(())
    }

    /// Saves a registered gate, failures are logged and the gate stays dirty.
    pub(crate) fn persist(&mut self, name: &str) -> bool {
        let result = match self.gates.get(name) {
            Some(gate) => self.save_gate(gate),
            None => return false,
        };
        match result {
            Ok(()) => {
                if let Some(gate) = self.gates.get_mut(name) {
                    gate.dirty = false;
                }
                true
            }
            Err(error) => {
                error!("Unable to save gate {name}, {error}");
                false
            }
        }
    }

    /// Adds every `*.json` design of the directory, returns how many were added.
    pub fn load_designs<P: AsRef<Path>>(&mut self, directory: P) -> usize {
        let directory = directory.as_ref();
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(error) => {
                warn!("Unable to read designs from {directory:?}, {error}");
                return 0;
            }
        };
        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        paths.sort();
        let mut loaded = 0;
        for path in paths {
            let design = fs::read_to_string(&path)
                .map_err(|error| error.to_string())
                .and_then(|data| Design::parse(&data).map_err(|error| error.to_string()));
            match design {
                Ok(design) => {
                    self.add_design(design);
                    loaded += 1;
                }
                Err(error) => warn!("Skip design {path:?}, {error}"),
            }
        }
        info!("Load {loaded} designs from {directory:?}");
        loaded
    }

    pub fn shutdown(&mut self) {
        self.save(true);
        self.countdowns.clear();
        self.locked.clear();
        self.positions.clear();
        self.scheduler.clear();
        self.gates.clear();
        self.indices = Indices::default();
        info!("Transporter shut down");
    }
}
