pub use domain::*;
pub use options::*;
pub use placement::*;
pub use registry::*;

mod domain;
mod loading;
mod options;
mod placement;
mod queries;
mod registry;
