use crate::domains::gating::GateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GAME_MODES: [&str; 4] = ["SURVIVAL", "CREATIVE", "ADVENTURE", "SPECTATOR"];

/// Names of every option readable and settable on a gate.
pub const OPTIONS: [&str; 47] = [
    "duration",
    "linkLocal",
    "linkWorld",
    "linkNoneFormat",
    "linkUnselectedFormat",
    "linkOfflineFormat",
    "linkLocalFormat",
    "linkWorldFormat",
    "multiLink",
    "protect",
    "requirePin",
    "requireValidPin",
    "requireLevel",
    "invalidPinDamage",
    "sendChat",
    "sendChatFilter",
    "sendChatFormatFilter",
    "sendChatDistance",
    "receiveChat",
    "receiveChatFilter",
    "receiveChatDistance",
    "requireAllowedItems",
    "receiveInventory",
    "deleteInventory",
    "receiveGameMode",
    "allowGameModes",
    "gameMode",
    "receiveXP",
    "receivePotions",
    "requireAllowedPotions",
    "receiveStats",
    "randomNextLink",
    "sendNextLink",
    "teleportFormat",
    "noLinksFormat",
    "noLinkSelectedFormat",
    "invalidLinkFormat",
    "unknownLinkFormat",
    "markerFormat",
    "hidden",
    "linkAddDistance",
    "countdown",
    "countdownInterval",
    "countdownFormat",
    "countdownIntervalFormat",
    "countdownCancelFormat",
    "restoreOnClose",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateOptions {
    /// Milliseconds a temporary gate stays open, -1 keeps it open while useful.
    pub duration: i32,
    pub link_local: bool,
    pub link_world: bool,
    pub link_none_format: String,
    pub link_unselected_format: String,
    pub link_offline_format: String,
    pub link_local_format: String,
    pub link_world_format: String,
    pub multi_link: bool,
    pub protect: bool,
    pub require_pin: bool,
    pub require_valid_pin: bool,
    pub require_level: i32,
    pub invalid_pin_damage: i32,
    pub send_chat: bool,
    pub send_chat_filter: Option<String>,
    pub send_chat_format_filter: Option<String>,
    pub send_chat_distance: i32,
    pub receive_chat: bool,
    pub receive_chat_filter: Option<String>,
    pub receive_chat_distance: i32,
    pub require_allowed_items: bool,
    pub receive_inventory: bool,
    pub delete_inventory: bool,
    pub receive_game_mode: bool,
    pub allow_game_modes: String,
    pub game_mode: Option<String>,
    #[serde(rename = "receiveXP")]
    pub receive_xp: bool,
    pub receive_potions: bool,
    pub require_allowed_potions: bool,
    pub receive_stats: bool,
    pub random_next_link: bool,
    pub send_next_link: bool,
    pub teleport_format: String,
    pub no_links_format: String,
    pub no_link_selected_format: String,
    pub invalid_link_format: String,
    pub unknown_link_format: String,
    pub marker_format: String,
    pub hidden: bool,
    pub link_add_distance: i32,
    pub countdown: i32,
    pub countdown_interval: i32,
    pub countdown_format: String,
    pub countdown_interval_format: String,
    pub countdown_cancel_format: String,
    pub restore_on_close: bool,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            duration: -1,
            link_local: true,
            link_world: true,
            link_none_format: "%fromGate%\\n\\n<none>".to_string(),
            link_unselected_format: "%fromGate%\\n\\n<unselected>".to_string(),
            link_offline_format: "%fromGate%\\n\\n<offline>".to_string(),
            link_local_format: "%fromGate%\\n%toGate%".to_string(),
            link_world_format: "%fromGate%\\n%toWorld%\\n%toGate%".to_string(),
            multi_link: true,
            protect: false,
            require_pin: false,
            require_valid_pin: true,
            require_level: 0,
            invalid_pin_damage: 0,
            send_chat: false,
            send_chat_filter: None,
            send_chat_format_filter: None,
            send_chat_distance: 1000,
            receive_chat: false,
            receive_chat_filter: None,
            receive_chat_distance: 1000,
            require_allowed_items: true,
            receive_inventory: true,
            delete_inventory: false,
            receive_game_mode: false,
            allow_game_modes: "*".to_string(),
            game_mode: None,
            receive_xp: false,
            receive_potions: false,
            require_allowed_potions: true,
            receive_stats: true,
            random_next_link: false,
            send_next_link: false,
            teleport_format: "%GOLD%teleported to '%toGateCtx%'".to_string(),
            no_links_format: "this gate has no links".to_string(),
            no_link_selected_format: "no link is selected".to_string(),
            invalid_link_format: "invalid link selected".to_string(),
            unknown_link_format: "unknown or offline destination gate".to_string(),
            marker_format: "%name%".to_string(),
            hidden: false,
            link_add_distance: -1,
            countdown: -1,
            countdown_interval: 1000,
            countdown_format: "%RED%Teleport countdown started...".to_string(),
            countdown_interval_format: "%RED%Teleport in %time% seconds...".to_string(),
            countdown_cancel_format: "%RED%Teleport canceled".to_string(),
            restore_on_close: false,
        }
    }
}

/// Resolves an option by exact name or unique case insensitive prefix.
pub fn resolve_option(name: &str) -> Result<&'static str, GateError> {
    let lower = name.to_lowercase();
    if let Some(option) = OPTIONS.iter().find(|option| option.to_lowercase() == lower) {
        return Ok(option);
    }
    let matches: Vec<&'static str> = OPTIONS
        .iter()
        .filter(|option| option.to_lowercase().starts_with(&lower))
        .copied()
        .collect();
    match matches.as_slice() {
        [option] => Ok(option),
        [] => Err(option_error(name, "unknown option")),
        _ => Err(option_error(name, "ambiguous option")),
    }
}

fn option_error(option: &str, reason: impl Into<String>) -> GateError {
    GateError::Option {
        option: option.to_string(),
        reason: reason.into(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl GateOptions {
    fn to_document(&self, option: &str) -> Result<Value, GateError> {
        serde_json::to_value(self).map_err(|error| option_error(option, error.to_string()))
    }

    pub fn get_option(&self, option: &str) -> Result<String, GateError> {
        let document = self.to_document(option)?;
        let value = match document.get(option) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Null) => String::new(),
            Some(value) => value.to_string(),
            None => return Err(option_error(option, "unknown option")),
        };
        Ok(value)
    }

    /// Sets an option from its textual form.
    ///
    /// For text options `*` restores the default and `-` clears the value.
    /// The options are left untouched when the value is rejected.
    pub fn set_option(&mut self, option: &str, value: &str) -> Result<(), GateError> {
        let mut document = self.to_document(option)?;
        let defaults = GateOptions::default().to_document(option)?;
        let current = document
            .get(option)
            .cloned()
            .ok_or_else(|| option_error(option, "unknown option"))?;
        let default = defaults.get(option).cloned().unwrap_or(Value::Null);
        let value = match current {
            Value::Bool(_) => match parse_bool(value) {
                Some(value) => Value::Bool(value),
                None => return Err(option_error(option, format!("'{value}' is not a boolean"))),
            },
            Value::Number(_) => match value.trim().parse::<i32>() {
                Ok(value) => Value::from(value),
                Err(_) => return Err(option_error(option, format!("'{value}' is not a number"))),
            },
            _ if default.is_null() => match value {
                "" | "-" | "*" => Value::Null,
                value => Value::String(value.to_string()),
            },
            _ => match value {
                "*" => default,
                "-" => Value::String(String::new()),
                value => Value::String(value.to_string()),
            },
        };
        if let Some(document) = document.as_object_mut() {
            document.insert(option.to_string(), value);
        }
        let mut options: GateOptions = serde_json::from_value(document)
            .map_err(|error| option_error(option, error.to_string()))?;
        options.normalize()?;
        *self = options;
        Ok(())
    }

    pub fn normalize(&mut self) -> Result<(), GateError> {
        if self.duration <= 0 {
            self.duration = -1;
        }
        if self.link_add_distance <= 0 {
            self.link_add_distance = -1;
        }
        if self.countdown_interval < 1 {
            self.countdown_interval = 1;
        }
        if self.invalid_pin_damage < 0 {
            return Err(option_error(
                "invalidPinDamage",
                "invalidPinDamage must be at least 0",
            ));
        }
        self.allow_game_modes = normalize_game_modes(&self.allow_game_modes)?;
        if let Some(mode) = &self.game_mode {
            let mode = mode.to_uppercase();
            if !GAME_MODES.contains(&mode.as_str()) {
                return Err(option_error("gameMode", format!("unknown game mode '{mode}'")));
            }
            self.game_mode = Some(mode);
        }
        Ok(())
    }
}

fn normalize_game_modes(value: &str) -> Result<String, GateError> {
    let mut modes = vec![];
    for part in value.split(',').map(str::trim) {
        if part == "*" || part.is_empty() {
            return Ok("*".to_string());
        }
        let mode = part.to_uppercase();
        if !GAME_MODES.contains(&mode.as_str()) {
            return Err(option_error(
                "allowGameModes",
                format!("unknown game mode '{part}'"),
            ));
        }
        modes.push(mode);
    }
    Ok(modes.join(","))
}
