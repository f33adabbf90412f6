pub mod map_config;

pub use map_config::MapConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "uhi-explorer")]
#[command(about = "Urban heat island choropleth explorer")]
pub struct CliConfig {
    /// Map configuration file (TOML); defaults apply when absent.
    #[arg(long, default_value = "config/london.toml")]
    pub config: String,

    /// Viewer bridge endpoint the engine drives.
    #[arg(long, default_value = "http://127.0.0.1:8899")]
    pub bridge_url: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
