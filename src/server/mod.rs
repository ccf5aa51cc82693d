//! HTTP server: handler state, routing and the fluent builder

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::{build_router, route_names, route_table};
pub use state::AppState;
