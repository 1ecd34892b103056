//! arc-assess: guided self-assessment backend
//!
//! Persists wizard answers, derives progress, and orchestrates the external
//! PDF renderer. The renderer is started in the background at boot when
//! nothing answers its health check.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use arc_assess::config::Args;
use arc_assess::db::AssessmentDb;
use arc_assess::renderer::{
    CommandLauncher, RendererClient, RendererSupervisor, SupervisorConfig,
};
use arc_assess::routes::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("arc_assess={}", args.log_level).parse()?),
        )
        .init();

    info!("Starting arc-assess");
    info!("Database: {}", args.database_path.display());
    info!("Renderer URL: {}", args.renderer_url);

    let db = Arc::new(AssessmentDb::open(&args.database_path)?);

    let renderer = RendererClient::new(
        args.renderer_url.clone(),
        args.health_timeout(),
        args.render_timeout(),
    );

    let supervisor = Arc::new(RendererSupervisor::new(
        Arc::new(renderer.clone()),
        Arc::new(CommandLauncher {
            program: args.renderer_program.clone(),
            args: args.renderer_arg_list(),
        }),
        SupervisorConfig {
            startup_timeout: args.renderer_startup_timeout(),
            poll_interval: std::time::Duration::from_millis(800),
        },
    ));

    // Renderer startup must not block request serving
    if args.renderer_autostart {
        let supervisor = supervisor.clone();
        tokio::spawn(async move {
            let state = supervisor.ensure_running().await;
            info!(?state, "Renderer startup finished");
        });
    } else {
        info!("Renderer autostart disabled");
    }

    let state = AppState {
        db,
        renderer,
        supervisor: supervisor.clone(),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Listening on http://{}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            supervisor.shutdown().await;
        })
        .await?;

    Ok(())
}
