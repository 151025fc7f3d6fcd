pub mod bootstrap;
pub mod errors;
pub mod routes;
pub mod startup;
pub mod state;

pub use bootstrap::launch;
pub use startup::{run, ServiceKind};
