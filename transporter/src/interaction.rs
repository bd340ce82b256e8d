use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

/// What an interaction with a gate control block does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateAction {
    Open,
    Close,
    ChangeLink,
}

/// Bit positions of the interaction key.
pub const OPEN: u8 = 1;
pub const OPEN_PERMISSION: u8 = 1 << 1;
pub const CLOSE_PERMISSION: u8 = 1 << 2;
pub const CHANGE_LINK_PERMISSION: u8 = 1 << 3;
pub const VALID_DESTINATION: u8 = 1 << 4;
pub const LAST_LINK: u8 = 1 << 5;
pub const TRIGGER: u8 = 1 << 6;
pub const SWITCH: u8 = 1 << 7;

// Character i of a mask is bit i of the key, 'x' matches both values.
// Later masks override earlier ones.
const MASKS: [(&str, &[GateAction]); 10] = [
    // gate is closed
    ("01xxxx1x", &[GateAction::Open]),
    ("0xx1xx01", &[GateAction::ChangeLink]),
    ("00x1xxx1", &[GateAction::ChangeLink]),
    ("01x10x11", &[GateAction::ChangeLink, GateAction::Open]),
    // gate is open
    ("1x1xxx10", &[GateAction::Close]),
    ("1x10xx11", &[GateAction::Close]),
    ("1x11x111", &[GateAction::Close, GateAction::ChangeLink]),
    ("1x01xxx1", &[GateAction::ChangeLink]),
    ("1xx1xx01", &[GateAction::ChangeLink]),
    ("1xx1x011", &[GateAction::ChangeLink]),
];

lazy_static! {
    static ref ACTIONS: HashMap<u8, &'static [GateAction]> = {
        let mut actions = HashMap::new();
        for (mask, action) in MASKS {
            for key in expand_mask(mask) {
                actions.insert(key, action);
            }
        }
        actions
    };
}

/// Every key matched by a mask.
pub fn expand_mask(mask: &str) -> BTreeSet<u8> {
    let mut keys = BTreeSet::from([0u8]);
    for (bit, symbol) in mask.chars().take(8).enumerate() {
        let value = 1u8 << bit;
        keys = match symbol {
            '0' => keys,
            '1' => keys.into_iter().map(|key| key | value).collect(),
            _ => keys
                .into_iter()
                .flat_map(|key| [key, key | value])
                .collect(),
        };
    }
    keys
}

/// Actions permitted for the key, nothing when the interaction is refused.
pub fn resolve_actions(key: u8) -> Option<&'static [GateAction]> {
    ACTIONS.get(&key).copied()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFacts {
    pub open: bool,
    pub open_permission: bool,
    pub close_permission: bool,
    pub change_link_permission: bool,
    pub valid_destination: bool,
    pub last_link: bool,
    pub trigger: bool,
    pub switch: bool,
}

impl InteractionFacts {
    pub fn key(&self) -> u8 {
        let bits = [
            (self.open, OPEN),
            (self.open_permission, OPEN_PERMISSION),
            (self.close_permission, CLOSE_PERMISSION),
            (self.change_link_permission, CHANGE_LINK_PERMISSION),
            (self.valid_destination, VALID_DESTINATION),
            (self.last_link, LAST_LINK),
            (self.trigger, TRIGGER),
            (self.switch, SWITCH),
        ];
        bits.iter()
            .filter(|(fact, _)| *fact)
            .fold(0, |key, (_, bit)| key | bit)
    }
}
