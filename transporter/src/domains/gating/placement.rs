use crate::domains::indexing::{Point, Role, Volume};
use serde::{Deserialize, Serialize};

/// Edge of a redstone power change a trigger or switch reacts to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RedstoneMode {
    #[default]
    High,
    Low,
    None,
}

impl RedstoneMode {
    pub fn matches(&self, old_power: i32, new_power: i32) -> bool {
        match self {
            RedstoneMode::High => old_power == 0 && new_power > 0,
            RedstoneMode::Low => old_power > 0 && new_power == 0,
            RedstoneMode::None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockDetail {
    pub build: Option<String>,
    pub open: Option<String>,
    pub buildable: bool,
    pub openable: bool,
    pub portal: bool,
    pub screen: bool,
    pub trigger: bool,
    pub switch: bool,
    pub spawn: bool,
    pub insert: bool,
    pub trigger_open_mode: RedstoneMode,
    pub trigger_close_mode: RedstoneMode,
    pub switch_mode: RedstoneMode,
}

impl Default for BlockDetail {
    fn default() -> Self {
        Self {
            build: None,
            open: None,
            buildable: false,
            openable: false,
            portal: false,
            screen: false,
            trigger: false,
            switch: false,
            spawn: false,
            insert: false,
            trigger_open_mode: RedstoneMode::High,
            trigger_close_mode: RedstoneMode::Low,
            switch_mode: RedstoneMode::High,
        }
    }
}

impl BlockDetail {
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Portal => self.portal,
            Role::Protection => self.buildable,
            Role::Screen => self.screen,
            Role::Switch => self.switch,
            Role::Trigger => self.trigger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateBlock {
    pub point: Point,
    pub detail: BlockDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBlock {
    pub point: Point,
    pub block: String,
}

/// Physical form of a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Placement {
    /// Built from a design pattern.
    Block {
        #[serde(rename = "designName")]
        design: String,
        blocks: Vec<GateBlock>,
        #[serde(default)]
        saved: Vec<SavedBlock>,
    },
    /// Cuboid whose every position is portal and spawn while open.
    Area { p1: Point, p2: Point },
}

impl Placement {
    pub fn volume(&self, gate: &str, world: &str, role: Role) -> Volume {
        let mut volume = Volume::new(gate, world);
        match self {
            Placement::Block { blocks, .. } => {
                for block in blocks.iter().filter(|block| block.detail.has_role(role)) {
                    volume.add_point(&block.point);
                }
            }
            Placement::Area { .. } if role == Role::Portal => {
                for point in self.area_points() {
                    volume.add_point(&point);
                }
            }
            Placement::Area { .. } => {}
        }
        volume
    }

    pub fn spawn_points(&self) -> Vec<Point> {
        match self {
            Placement::Block { blocks, .. } => blocks
                .iter()
                .filter(|block| block.detail.spawn)
                .map(|block| block.point.clone())
                .collect(),
            Placement::Area { .. } => self.area_points(),
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match self {
            Placement::Block { blocks, .. } => blocks.iter().map(|block| block.point.clone()).collect(),
            Placement::Area { p1, p2 } => vec![p1.clone(), p2.clone()],
        }
    }

    pub fn block_at(&self, point: &Point) -> Option<&GateBlock> {
        match self {
            Placement::Block { blocks, .. } => blocks.iter().find(|block| &block.point == point),
            Placement::Area { .. } => None,
        }
    }

    fn area_points(&self) -> Vec<Point> {
        let (p1, p2) = match self {
            Placement::Area { p1, p2 } => (p1, p2),
            Placement::Block { .. } => return vec![],
        };
        let mut points = vec![];
        for x in p1.x.min(p2.x)..=p1.x.max(p2.x) {
            for y in p1.y.min(p2.y)..=p1.y.max(p2.y) {
                for z in p1.z.min(p2.z)..=p1.z.max(p2.z) {
                    points.push(Point::new(p1.world.clone(), x, y, z));
                }
            }
        }
        points
    }
}
