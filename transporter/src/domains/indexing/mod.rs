pub use domain::*;
pub use gate_map::*;
pub use indices::*;

mod domain;
mod gate_map;
mod indices;
