use std::fs;
use std::path::Path;

use log::{error, info};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_debug")]
    pub debug: bool,

    #[serde(default = "default_allow_build")]
    pub allow_build: bool,

    #[serde(default = "default_allow_link_local")]
    pub allow_link_local: bool,

    #[serde(default = "default_allow_link_world")]
    pub allow_link_world: bool,

    #[serde(default = "default_allow_sign_creation")]
    pub allow_sign_creation: bool,

    #[serde(default = "default_auto_add_worlds")]
    pub auto_add_worlds: bool,

    #[serde(default = "default_show_gates_saved_message")]
    pub show_gates_saved_message: bool,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_designs")]
    pub designs: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: default_debug(),
            allow_build: default_allow_build(),
            allow_link_local: default_allow_link_local(),
            allow_link_world: default_allow_link_world(),
            allow_sign_creation: default_allow_sign_creation(),
            auto_add_worlds: default_auto_add_worlds(),
            show_gates_saved_message: default_show_gates_saved_message(),
            database: default_database(),
            designs: default_designs(),
        }
    }
}

pub const CONFIG_PATH: &'static str = "./transporter.json";

impl Config {
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(config) => {
                    info!("Uses {path:?}");
                    config
                }
                Err(error) => {
                    error!("Unable to parse config file, {error:?}");
                    Config::default()
                }
            },
            _ => {
                info!("Uses default config, {path:?} not found");
                Config::default()
            }
        }
    }
}

fn default_debug() -> bool {
    false
}

fn default_allow_build() -> bool {
    true
}

fn default_allow_link_local() -> bool {
    true
}

fn default_allow_link_world() -> bool {
    true
}

fn default_allow_sign_creation() -> bool {
    true
}

fn default_auto_add_worlds() -> bool {
    true
}

fn default_show_gates_saved_message() -> bool {
    true
}

fn default_database() -> String {
    String::from("./gates.sqlite")
}

fn default_designs() -> String {
    String::from("./designs")
}
