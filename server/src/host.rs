use log::info;
use serde::Deserialize;
use transporter::api::{Actor, Event};
use transporter::gating::{resolve_option, Direction, GateError};
use transporter::indexing::Point;
use transporter::world::PermissionSet;
use transporter::Transporter;

/// Something that happened on the game host, as delivered to the gate thread.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    LoadWorld {
        world: String,
    },
    SetBlock {
        point: Point,
        block: String,
    },
    Grant {
        actor: String,
        permission: String,
    },
    Revoke {
        actor: String,
        permission: String,
    },
    Interact {
        actor: Actor,
        point: Point,
    },
    Move {
        actor: Actor,
        point: Point,
    },
    BlockDamage {
        point: Point,
    },
    BlockBreak {
        actor: Actor,
        point: Point,
    },
    Redstone {
        point: Point,
        old: i32,
        new: i32,
    },
    SignChange {
        actor: Actor,
        point: Point,
        lines: Vec<String>,
    },
    Command {
        actor: Actor,
        command: Command,
    },
    ConsoleCommand {
        command: Command,
    },
    Save,
}

impl HostEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::LoadWorld { .. } => "load_world",
            HostEvent::SetBlock { .. } => "set_block",
            HostEvent::Grant { .. } => "grant",
            HostEvent::Revoke { .. } => "revoke",
            HostEvent::Interact { .. } => "interact",
            HostEvent::Move { .. } => "move",
            HostEvent::BlockDamage { .. } => "block_damage",
            HostEvent::BlockBreak { .. } => "block_break",
            HostEvent::Redstone { .. } => "redstone",
            HostEvent::SignChange { .. } => "sign_change",
            HostEvent::Command { .. } => "command",
            HostEvent::ConsoleCommand { .. } => "console_command",
            HostEvent::Save => "save",
        }
    }
}

/// Gate commands typed by players or the console.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Command {
    Create {
        design: String,
        gate: String,
        anchor: Point,
        #[serde(default)]
        direction: Direction,
    },
    Open {
        gate: String,
    },
    Close {
        gate: String,
    },
    ChangeLink {
        gate: String,
    },
    AddLink {
        gate: String,
        target: String,
        #[serde(default)]
        reverse: bool,
    },
    RemoveLink {
        gate: String,
        target: String,
    },
    Destroy {
        gate: String,
        #[serde(default)]
        unbuild: bool,
    },
    Rename {
        gate: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
    Select {
        gate: String,
    },
    GetOption {
        gate: Option<String>,
        option: String,
    },
    SetOption {
        gate: Option<String>,
        option: String,
        value: String,
    },
    AddPin {
        gate: Option<String>,
        pin: String,
    },
    RemovePin {
        gate: Option<String>,
        pin: Option<String>,
    },
}

/// Gate context together with the host state it is fed from.
pub struct Host {
    pub transporter: Transporter,
    permissions: PermissionSet,
}

impl Host {
    pub fn new(transporter: Transporter) -> Self {
        Self {
            transporter,
            permissions: PermissionSet::default(),
        }
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Result<Vec<Event>, GateError> {
        let transporter = &mut self.transporter;
        match event {
            HostEvent::LoadWorld { world } => transporter.load_world(&world),
            HostEvent::SetBlock { point, block } => {
                transporter.world.set_block(&point, &block);
                Ok(vec![])
            }
            HostEvent::Grant { actor, permission } => {
                info!("Grant {permission} to {actor}");
                self.permissions.grant(&actor, &permission);
                transporter.permissions = Box::new(self.permissions.clone());
                Ok(vec![])
            }
            HostEvent::Revoke { actor, permission } => {
                info!("Revoke {permission} from {actor}");
                self.permissions.revoke(&actor, &permission);
                transporter.permissions = Box::new(self.permissions.clone());
                Ok(vec![])
            }
            HostEvent::Interact { actor, point } => transporter.interact(&actor, &point),
            HostEvent::Move { actor, point } => Ok(transporter.player_move(&actor, &point)),
            HostEvent::BlockDamage { point } => Ok(transporter.block_damage(&point)),
            HostEvent::BlockBreak { actor, point } => transporter.block_break(&actor, &point),
            HostEvent::Redstone { point, old, new } => Ok(transporter.redstone(&point, old, new)),
            HostEvent::SignChange {
                actor,
                point,
                lines,
            } => transporter.sign_change(&actor, &point, &lines),
            HostEvent::Command { actor, command } => execute(transporter, &actor, command),
            HostEvent::ConsoleCommand { command } => {
                execute(transporter, &Actor::console(), command)
            }
            HostEvent::Save => {
                let saved = transporter.save(false);
                Ok(vec![Event::message(
                    &Actor::console(),
                    format!("saved {saved} gates"),
                )])
            }
        }
    }
}

fn execute(
    transporter: &mut Transporter,
    actor: &Actor,
    command: Command,
) -> Result<Vec<Event>, GateError> {
    match command {
        Command::Create {
            design,
            gate,
            anchor,
            direction,
        } => transporter.create_gate(actor, &design, &gate, &anchor, direction),
        Command::Open { gate } => transporter.open(actor, &gate),
        Command::Close { gate } => transporter.close(actor, &gate),
        Command::ChangeLink { gate } => transporter.change_link(actor, &gate),
        Command::AddLink {
            gate,
            target,
            reverse,
        } => transporter.add_link(actor, &gate, &target, reverse),
        Command::RemoveLink { gate, target } => transporter.remove_link(actor, &gate, &target),
        Command::Destroy { gate, unbuild } => transporter.destroy(actor, &gate, unbuild),
        Command::Rename { gate, new_name } => transporter.rename(actor, &gate, &new_name),
        Command::Select { gate } => transporter.select(actor, &gate),
        Command::GetOption { gate, option } => {
            let option = resolve_option(&option)?;
            let value = transporter.get_option(actor, gate.as_deref(), option)?;
            Ok(vec![Event::message(actor, format!("{option}={value}"))])
        }
        Command::SetOption {
            gate,
            option,
            value,
        } => transporter.set_option(actor, gate.as_deref(), &option, &value),
        Command::AddPin { gate, pin } => transporter.add_pin(actor, gate.as_deref(), &pin),
        Command::RemovePin { gate, pin } => {
            transporter.remove_pin(actor, gate.as_deref(), pin.as_deref())
        }
    }
}
