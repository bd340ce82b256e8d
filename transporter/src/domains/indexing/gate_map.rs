use crate::domains::indexing::{ChunkPos, Point, Volume};
use std::collections::{HashMap, HashSet};

/// Chunk partitioned lookup from block position to owning gate.
///
/// A position has at most one owner. Putting a volume overwrites any previous
/// owner of its positions, so the last writer wins.
#[derive(Default, Debug)]
pub struct GateMap {
    worlds: HashMap<String, HashMap<ChunkPos, HashMap<[i32; 3], String>>>,
    chunks: HashMap<String, HashSet<(String, ChunkPos)>>,
}

impl GateMap {
    pub fn put(&mut self, volume: &Volume) {
        let gate_chunks = self.chunks.entry(volume.gate.clone()).or_default();
        let world = self.worlds.entry(volume.world.clone()).or_default();
        for block in volume.blocks() {
            let chunk = ChunkPos::of(*block);
            world
                .entry(chunk)
                .or_default()
                .insert(*block, volume.gate.clone());
            gate_chunks.insert((volume.world.clone(), chunk));
        }
    }

    /// Removes every position still owned by the gate. Positions overwritten by
    /// another gate are left untouched.
    pub fn remove_gate(&mut self, gate: &str) -> usize {
        let chunks = match self.chunks.remove(gate) {
            Some(chunks) => chunks,
            None => return 0,
        };
        let mut removed = 0;
        for (world_name, chunk) in chunks {
            let world = match self.worlds.get_mut(&world_name) {
                Some(world) => world,
                None => continue,
            };
            if let Some(blocks) = world.get_mut(&chunk) {
                let before = blocks.len();
                blocks.retain(|_, owner| owner != gate);
                removed += before - blocks.len();
                if blocks.is_empty() {
                    world.remove(&chunk);
                }
            }
            if world.is_empty() {
                self.worlds.remove(&world_name);
            }
        }
        removed
    }

    pub fn get_gate(&self, point: &Point) -> Option<&str> {
        self.worlds
            .get(&point.world)
            .and_then(|world| world.get(&point.chunk()))
            .and_then(|blocks| blocks.get(&point.block()))
            .map(String::as_str)
    }

    pub fn rename_gate(&mut self, old: &str, new: &str) {
        let chunks = match self.chunks.remove(old) {
            Some(chunks) => chunks,
            None => return,
        };
        for (world_name, chunk) in &chunks {
            let blocks = self
                .worlds
                .get_mut(world_name)
                .and_then(|world| world.get_mut(chunk));
            if let Some(blocks) = blocks {
                for owner in blocks.values_mut() {
                    if owner == old {
                        *owner = new.to_string();
                    }
                }
            }
        }
        self.chunks.entry(new.to_string()).or_default().extend(chunks);
    }

    pub fn len(&self) -> usize {
        self.worlds
            .values()
            .flat_map(|world| world.values())
            .map(|blocks| blocks.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Human readable dump of one world, used by diagnostics.
    pub fn describe(&self, world: &str) -> Vec<String> {
        let mut lines = vec![];
        if let Some(chunks) = self.worlds.get(world) {
            for (chunk, blocks) in chunks {
                let mut owners: Vec<&str> = blocks.values().map(String::as_str).collect();
                owners.sort_unstable();
                owners.dedup();
                lines.push(format!(
                    "chunk {},{}: {} blocks of {}",
                    chunk.x,
                    chunk.z,
                    blocks.len(),
                    owners.join(", ")
                ));
            }
        }
        lines.sort();
        lines
    }
}
