pub mod admin;
pub mod admin_error;
pub mod admin_state;
pub mod bootstrap;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;


pub use admin_error::{AdminError, Result as AdminResult};
pub use admin_state::AdminState;
pub use bootstrap::Relay;
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::{build_admin_router, build_client_router};
