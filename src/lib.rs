pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpSurface;
pub use config::MapConfig;
pub use core::controller::MapController;
pub use utils::error::{MapError, Result};
