pub use json::*;
pub use storage::*;

mod json;
mod storage;
