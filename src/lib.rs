//! vutil - Vuetify utility-class extraction engine
//!
//! Discovers vuetify installations across workspace roots, mines the
//! generated stylesheet for utility-class records, and serves them from a
//! durable, content-validated cache.

pub mod artifact;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod locate;
pub mod notify;
pub mod orchestration;
pub mod record;
pub mod watch;

pub use error::{VutilError, VutilResult};
