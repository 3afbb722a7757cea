//! Trait definitions shared by Teletype models.

mod model;

pub use model::ApiModel;
