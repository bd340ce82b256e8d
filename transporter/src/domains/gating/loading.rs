use crate::domains::gating::{is_valid_name, Direction, Gate, GateError, GateOptions, Placement};
use datamap::{parse_json_value, to_json_value, Entry, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Persisted form of a gate.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GateRecord {
    name: String,
    #[serde(default)]
    direction: Direction,
    #[serde(flatten)]
    options: GateOptions,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    pins: BTreeSet<String>,
    #[serde(default)]
    portal_open: bool,
    #[serde(default)]
    incoming: BTreeSet<String>,
    #[serde(default)]
    outgoing: Option<String>,
    #[serde(flatten)]
    placement: Placement,
}

impl Gate {
    pub fn to_document(&self) -> Result<Value, StorageError> {
        to_json_value(GateRecord {
            name: self.name.clone(),
            direction: self.direction,
            options: self.options.clone(),
            links: self.links.clone(),
            pins: self.pins.clone(),
            portal_open: self.portal_open,
            incoming: self.incoming.clone(),
            outgoing: self.outgoing.clone(),
            placement: self.placement.clone(),
        })
    }

    pub fn from_entry(entry: &Entry) -> Result<Gate, GateError> {
        let configuration = |reason: String| GateError::Configuration {
            gate: format!("{}.{}", entry.world, entry.name),
            reason,
        };
        let record: GateRecord =
            parse_json_value(entry.document.clone()).map_err(|error| configuration(error.to_string()))?;
        if !is_valid_name(&record.name) {
            return Err(configuration(format!("invalid name '{}'", record.name)));
        }
        if record.name != entry.name {
            return Err(configuration(format!(
                "document name '{}' does not match its key",
                record.name
            )));
        }
        if let Placement::Block { blocks, .. } = &record.placement {
            if blocks.iter().any(|block| block.point.world != entry.world) {
                return Err(configuration("block outside of gate world".to_string()));
            }
        }
        let mut options = record.options;
        options
            .normalize()
            .map_err(|error| configuration(error.to_string()))?;
        let mut gate = Gate::new(
            entry.world.clone(),
            record.name,
            record.direction,
            record.placement,
            options,
        );
        gate.links = record.links;
        gate.pins = record.pins;
        gate.portal_open = record.portal_open;
        gate.incoming = record.incoming;
        gate.outgoing = record.outgoing;
        gate.dirty = false;
        Ok(gate)
    }
}
