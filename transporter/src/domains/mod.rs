pub mod designs;
pub mod gating;
pub mod indexing;
pub mod timing;
