//! HTTP API for the quiz frontend.

pub mod server;
pub mod types;

pub use server::{AppState, build_router, start_server};
