//! Configuration
//!
//! CLI arguments and environment variable handling using clap.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// arc-assess - guided self-assessment backend
#[derive(Parser, Debug, Clone)]
#[command(name = "arc-assess")]
#[command(about = "Assessment wizard backend with PDF report orchestration")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "arc-assess.db")]
    pub database_path: PathBuf,

    /// Base URL of the PDF renderer service
    #[arg(long, env = "RENDERER_URL", default_value = "http://127.0.0.1:8001")]
    pub renderer_url: String,

    /// Start the renderer process if nothing answers the health check
    #[arg(long, env = "RENDERER_AUTOSTART", default_value = "true")]
    pub renderer_autostart: bool,

    /// Program used to start the renderer
    #[arg(long, env = "RENDERER_PROGRAM", default_value = "python3")]
    pub renderer_program: String,

    /// Arguments for the renderer program, space-separated
    #[arg(
        long,
        env = "RENDERER_ARGS",
        default_value = "-m uvicorn pdf_service.main:app --host 127.0.0.1 --port 8001"
    )]
    pub renderer_args: String,

    /// Health check timeout in milliseconds
    #[arg(long, env = "HEALTH_TIMEOUT_MS", default_value = "4000")]
    pub health_timeout_ms: u64,

    /// Render call timeout in milliseconds
    #[arg(long, env = "RENDER_TIMEOUT_MS", default_value = "30000")]
    pub render_timeout_ms: u64,

    /// How long to wait for a spawned renderer to become healthy, in milliseconds
    #[arg(long, env = "RENDERER_STARTUP_TIMEOUT_MS", default_value = "15000")]
    pub renderer_startup_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn renderer_startup_timeout(&self) -> Duration {
        Duration::from_millis(self.renderer_startup_timeout_ms)
    }

    pub fn renderer_arg_list(&self) -> Vec<String> {
        self.renderer_args
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
