use crate::api::{Actor, Event};
use crate::config::Config;
use crate::designs::Design;
use crate::gating::Gates;
use crate::indexing::{Indices, Point};
use crate::timing::{Scheduler, Task, TaskId};
use crate::world::{BlockWorld, Permissions};
use datamap::Storage;
pub use domains::*;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap, HashSet};

mod actions;
pub mod api;
pub mod config;
mod domains;
pub mod interaction;
mod listeners;
mod persistence;
pub mod world;

/// Teleport countdown of one actor standing in a portal.
pub(crate) struct Countdown {
    pub actor: Actor,
    pub gate: String,
    pub task: TaskId,
    pub end: i64,
}

/// Process wide gate context. Every gate operation runs on the thread owning
/// this value, structural changes are fully fanned out before returning.
pub struct Transporter {
    pub config: Config,
    pub gates: Gates,
    pub indices: Indices,
    pub scheduler: Scheduler,
    pub designs: HashMap<String, Design>,
    pub world: Box<dyn BlockWorld>,
    pub permissions: Box<dyn Permissions>,
    storage: Storage,
    worlds: BTreeSet<String>,
    countdowns: HashMap<String, Countdown>,
    locked: HashSet<String>,
    positions: HashMap<String, Point>,
    rng: StdRng,
    now: i64,
}

impl Transporter {
    pub fn new(
        config: Config,
        storage: Storage,
        world: Box<dyn BlockWorld>,
        permissions: Box<dyn Permissions>,
    ) -> Self {
        Self {
            config,
            gates: Gates::default(),
            indices: Indices::default(),
            scheduler: Scheduler::default(),
            designs: HashMap::new(),
            world,
            permissions,
            storage,
            worlds: BTreeSet::new(),
            countdowns: HashMap::new(),
            locked: HashSet::new(),
            positions: HashMap::new(),
            rng: StdRng::from_entropy(),
            now: 0,
        }
    }

    /// Replaces the random source, used to make link shuffling repeatable.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    #[inline]
    pub fn now(&self) -> i64 {
        self.now
    }

    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn worlds(&self) -> impl Iterator<Item = &String> {
        self.worlds.iter()
    }

    pub fn add_world(&mut self, world: &str) -> bool {
        let added = self.worlds.insert(world.to_string());
        if added {
            info!("Add world {world}");
        }
        added
    }

    pub fn add_design(&mut self, design: Design) {
        info!("Add design {}", design.name);
        self.designs.insert(design.name.clone(), design);
    }

    /// Advances the clock and runs every deferred task that became due. Each
    /// task observes the clock at its own due time.
    pub fn update(&mut self, now: i64) -> Vec<Event> {
        let target = self.now.max(now);
        let mut events = vec![];
        while let Some((id, due, task)) = self.scheduler.poll(target) {
            self.now = self.now.max(due);
            debug!("Run task {id:?} of gate {}", task.gate());
            match task {
                Task::CloseIfAllowed { gate } => self.close_if_allowed(&gate, &mut events),
                Task::CountdownTick { actor, gate } => {
                    self.countdown_tick(&actor, &gate, &mut events)
                }
            }
        }
        self.now = target;
        events
    }
}
