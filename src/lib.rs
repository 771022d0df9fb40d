//! Fun Fortune: a personality quiz API.
//!
//! Serves a fixed question catalog and turns a user's answers into a
//! fortune-style personality profile, generated by Gemini when a key is
//! configured and picked from a small fallback table otherwise.

pub mod app;
pub mod config;
pub mod error;
pub mod llm;
pub mod quiz;
pub mod util;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
