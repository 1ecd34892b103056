//! Renderer process supervision
//!
//! Starts at most one renderer child per server instance, polls its health
//! to readiness on a bounded deadline, and tracks an observable lifecycle
//! state. The health probe and the process launcher are both injected so
//! tests can drive the state machine deterministically.
//!
//! Shutdown sends a terminate request and does not wait for the child to
//! exit.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::client::{HealthStatus, RendererClient};

/// Observable lifecycle state of the supervised renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SupervisorState {
    NotStarted,
    Starting,
    Ready,
    TimedOut,
    Failed(String),
}

/// Health probing seam; the production impl is [`RendererClient`].
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> HealthStatus;
}

#[async_trait]
impl HealthProbe for RendererClient {
    async fn check(&self) -> HealthStatus {
        self.health().await
    }
}

/// Process spawning seam.
pub trait RendererLauncher: Send + Sync {
    fn launch(&self) -> std::io::Result<Child>;
}

/// Launches the configured renderer command with piped output.
pub struct CommandLauncher {
    pub program: String,
    pub args: Vec<String>,
}

impl RendererLauncher for CommandLauncher {
    fn launch(&self) -> std::io::Result<Child> {
        info!(program = %self.program, "Starting renderer process");
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// How long to wait for the child to become healthy
    pub startup_timeout: Duration,
    /// Interval between startup health polls
    pub poll_interval: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            startup_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(800),
        }
    }
}

/// State shared with the background exit watcher.
struct Shared {
    state: RwLock<SupervisorState>,
    child: Mutex<Option<Child>>,
}

/// Supervises the external renderer process.
pub struct RendererSupervisor {
    probe: Arc<dyn HealthProbe>,
    launcher: Arc<dyn RendererLauncher>,
    config: SupervisorConfig,
    shared: Arc<Shared>,
}

impl RendererSupervisor {
    pub fn new(
        probe: Arc<dyn HealthProbe>,
        launcher: Arc<dyn RendererLauncher>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            probe,
            launcher,
            config,
            shared: Arc::new(Shared {
                state: RwLock::new(SupervisorState::NotStarted),
                child: Mutex::new(None),
            }),
        }
    }

    pub async fn state(&self) -> SupervisorState {
        self.shared.state.read().await.clone()
    }

    async fn set_state(&self, state: SupervisorState) {
        *self.shared.state.write().await = state;
    }

    /// Make sure a renderer is reachable, spawning one if necessary.
    ///
    /// If something already answers the health check (external deployment,
    /// previous child), no process is spawned. Otherwise the configured
    /// command is launched and polled until ready or until the startup
    /// deadline passes. Returns the resulting state.
    pub async fn ensure_running(&self) -> SupervisorState {
        // A live child from a previous call means nothing to do
        {
            let mut child = self.shared.child.lock().await;
            if let Some(proc) = child.as_mut() {
                match proc.try_wait() {
                    Ok(None) => return self.state().await,
                    Ok(Some(status)) => {
                        warn!(%status, "Renderer process had exited");
                        *child = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "Renderer process state unknown, dropping handle");
                        *child = None;
                    }
                }
            }
        }

        // Already served externally (Docker, separate deploy)?
        if self.probe.check().await == HealthStatus::Ok {
            info!("Renderer already reachable, not spawning");
            self.set_state(SupervisorState::Ready).await;
            return SupervisorState::Ready;
        }

        self.set_state(SupervisorState::Starting).await;

        match self.launcher.launch() {
            Ok(mut proc) => {
                forward_output(&mut proc);
                *self.shared.child.lock().await = Some(proc);
                spawn_exit_watcher(Arc::clone(&self.shared));
            }
            Err(e) => {
                let reason = format!("spawn failed: {}", e);
                error!(error = %e, "Failed to start renderer process");
                self.set_state(SupervisorState::Failed(reason.clone())).await;
                return SupervisorState::Failed(reason);
            }
        }

        let deadline = Instant::now() + self.config.startup_timeout;
        while Instant::now() < deadline {
            tokio::time::sleep(self.config.poll_interval).await;
            if self.probe.check().await == HealthStatus::Ok {
                info!("Renderer ready");
                self.set_state(SupervisorState::Ready).await;
                return SupervisorState::Ready;
            }
        }

        warn!(
            timeout_secs = self.config.startup_timeout.as_secs(),
            "Renderer did not become healthy before the startup deadline"
        );
        self.set_state(SupervisorState::TimedOut).await;
        SupervisorState::TimedOut
    }

    /// Best-effort terminate request to the child; not awaited.
    pub async fn shutdown(&self) {
        let mut child = self.shared.child.lock().await;
        if let Some(proc) = child.as_mut() {
            info!("Stopping renderer process");
            if let Err(e) = proc.start_kill() {
                warn!(error = %e, "Failed to signal renderer process");
            }
        }
    }
}

/// Watch for the child exiting on its own and reset the running flag.
fn spawn_exit_watcher(shared: Arc<Shared>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut child = shared.child.lock().await;
            match child.as_mut() {
                None => break,
                Some(proc) => match proc.try_wait() {
                    Ok(Some(status)) => {
                        warn!(%status, "Renderer process exited");
                        *child = None;
                        *shared.state.write().await = SupervisorState::NotStarted;
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = %e, "Renderer exit watch failed");
                        break;
                    }
                },
            }
        }
    });
}

/// Pipe child stdout/stderr lines into the log.
fn forward_output(proc: &mut Child) {
    if let Some(stdout) = proc.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(target: "renderer", "{}", line);
            }
        });
    }
    if let Some(stderr) = proc.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(target: "renderer", "{}", line);
            }
        });
    }
}
