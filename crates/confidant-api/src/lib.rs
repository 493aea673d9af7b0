pub mod app;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use state::AppState;
