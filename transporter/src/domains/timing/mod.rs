pub use domain::*;

mod domain;
