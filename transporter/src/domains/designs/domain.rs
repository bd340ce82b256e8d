use crate::domains::gating::{
    is_valid_name, BlockDetail, Direction, Gate, GateBlock, GateError, GateOptions, Placement,
};
use crate::domains::indexing::Point;
use crate::world::BlockWorld;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("malformed design: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown design '{name}'")]
    Unknown { name: String },
    #[error("'{name}' is not a valid design name")]
    InvalidName { name: String },
    #[error("design '{design}' has no blocks")]
    NoBlocks { design: String },
    #[error("design '{design}' must have exactly one insert block, found {count}")]
    InsertCount { design: String, count: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DesignBlock {
    pub offset: [i32; 3],
    #[serde(flatten)]
    pub detail: BlockDetail,
}

/// Block pattern new gates are built from. Offsets are drawn for a north
/// facing gate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub name: String,
    #[serde(default = "default_duration")]
    pub duration: i32,
    #[serde(default)]
    pub protect: bool,
    #[serde(default)]
    pub restore_on_close: bool,
    #[serde(default)]
    pub no_links_format: Option<String>,
    #[serde(default)]
    pub no_link_selected_format: Option<String>,
    #[serde(default)]
    pub invalid_link_format: Option<String>,
    #[serde(default)]
    pub unknown_link_format: Option<String>,
    pub blocks: Vec<DesignBlock>,
}

fn default_duration() -> i32 {
    -1
}

impl Design {
    pub fn parse(data: &str) -> Result<Design, DesignError> {
        let design: Design = serde_json::from_str(data)?;
        design.validate()?;
        Ok(design)
    }

    pub fn validate(&self) -> Result<(), DesignError> {
        if !is_valid_name(&self.name) {
            return Err(DesignError::InvalidName {
                name: self.name.clone(),
            });
        }
        if self.blocks.is_empty() {
            return Err(DesignError::NoBlocks {
                design: self.name.clone(),
            });
        }
        let count = self.blocks.iter().filter(|block| block.detail.insert).count();
        if count != 1 {
            return Err(DesignError::InsertCount {
                design: self.name.clone(),
                count,
            });
        }
        Ok(())
    }

    fn insert_offset(&self) -> [i32; 3] {
        self.blocks
            .iter()
            .find(|block| block.detail.insert)
            .map(|block| block.offset)
            .unwrap_or([0, 0, 0])
    }

    /// Positions of every design block for a gate inserted at `anchor`.
    pub fn layout(&self, anchor: &Point, direction: Direction) -> Vec<GateBlock> {
        let [ix, iy, iz] = self.insert_offset();
        self.blocks
            .iter()
            .map(|block| {
                let [x, y, z] = block.offset;
                let offset = direction.rotate([x - ix, y - iy, z - iz]);
                GateBlock {
                    point: anchor.offset(offset),
                    detail: block.detail.clone(),
                }
            })
            .collect()
    }

    /// Finds where the design would have to be inserted for `point` to be one
    /// of its screens, judged by the blocks present in the world.
    pub fn match_screen(&self, world: &dyn BlockWorld, point: &Point) -> Option<(Point, Direction)> {
        let [ix, iy, iz] = self.insert_offset();
        for direction in Direction::ALL {
            for screen in self.blocks.iter().filter(|block| block.detail.screen) {
                let [x, y, z] = screen.offset;
                let [dx, dy, dz] = direction.rotate([x - ix, y - iy, z - iz]);
                let anchor = point.offset([-dx, -dy, -dz]);
                let matches = self
                    .layout(&anchor, direction)
                    .iter()
                    .filter(|block| block.detail.buildable && !block.detail.screen)
                    .all(|block| match &block.detail.build {
                        Some(kind) => world.get_block(&block.point).as_deref() == Some(kind.as_str()),
                        None => true,
                    });
                if matches {
                    return Some((anchor, direction));
                }
            }
        }
        None
    }

    pub fn options(&self) -> Result<GateOptions, GateError> {
        let mut options = GateOptions {
            duration: self.duration,
            protect: self.protect,
            restore_on_close: self.restore_on_close,
            ..GateOptions::default()
        };
        let formats = [
            (&mut options.no_links_format, &self.no_links_format),
            (&mut options.no_link_selected_format, &self.no_link_selected_format),
            (&mut options.invalid_link_format, &self.invalid_link_format),
            (&mut options.unknown_link_format, &self.unknown_link_format),
        ];
        for (option, format) in formats {
            if let Some(format) = format {
                *option = format.clone();
            }
        }
        options.normalize()?;
        Ok(options)
    }

    /// New closed gate laid out from this design. Nothing is built yet.
    pub fn create(
        &self,
        world: &str,
        name: &str,
        anchor: &Point,
        direction: Direction,
    ) -> Result<Gate, GateError> {
        if !is_valid_name(name) {
            return Err(GateError::InvalidName {
                name: name.to_string(),
            });
        }
        let anchor = Point::new(world, anchor.x, anchor.y, anchor.z);
        let placement = Placement::Block {
            design: self.name.clone(),
            blocks: self.layout(&anchor, direction),
            saved: vec![],
        };
        let gate = Gate::new(world, name, direction, placement, self.options()?);
        Ok(gate)
    }
}
