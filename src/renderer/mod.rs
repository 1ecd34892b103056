//! External PDF renderer orchestration
//!
//! The renderer is an opaque HTTP service with `/render` and `/health`
//! endpoints. This module owns the two halves of talking to it:
//!
//! - `client` - health classification and render calls with typed failures
//! - `supervisor` - at-most-one child process per server instance, started
//!   on demand, health-polled to readiness, terminated best-effort on
//!   shutdown

pub mod client;
pub mod supervisor;

pub use client::{HealthStatus, RenderError, RendererClient};
pub use supervisor::{
    CommandLauncher, HealthProbe, RendererLauncher, RendererSupervisor, SupervisorConfig,
    SupervisorState,
};
