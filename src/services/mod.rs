//! Service factory and endpoint services.

mod factory;
mod project;

pub(crate) use factory::FactoryRef;
pub use factory::TeletypeServices;
pub use project::ProjectService;
