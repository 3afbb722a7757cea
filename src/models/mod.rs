//! Teletype API model types.

mod attributes;
mod operator;
mod project;

pub use attributes::ModelAttributes;
pub use operator::*;
pub use project::*;
