pub mod errors;
pub mod extract;
pub mod headers;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;

pub use startup::Server;
pub use state::AppState;
