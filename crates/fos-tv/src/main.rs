//! fOS-TV: Single-Site Video Shell
//!
//! Main entry point. Initializes the global allocator, sets up logging,
//! and opens the player window on the system WebView.

mod app;
mod menu;
mod overlay;
mod page;
mod toolbar;
mod window;

use anyhow::Result;
use fos_shell::ShellConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    info!("fOS-TV starting...");
    info!("Using mimalloc allocator");

    app::run(ShellConfig::default())
}
