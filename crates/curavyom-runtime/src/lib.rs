//! # curavyom-runtime
//!
//! Async query routing for CuraVyom.
//!
//! This crate wires the deterministic pieces of `curavyom-core` into a
//! running orchestrator:
//! - Topic handlers, one per intent label, behind [`TopicHandler`]
//! - Concurrent specialist fan-out with per-specialist timeouts
//! - Research data behind [`ResearchProvider`], selected by config
//! - Post-response risk and fact-check annotation
//! - An append-only conversation log
//!
//! ## Example
//!
//! ```rust,no_run
//! use curavyom_runtime::{Orchestrator, RuntimeConfig};
//!
//! # async fn run() -> Result<(), curavyom_runtime::RuntimeError> {
//! let orchestrator = Orchestrator::builder()
//!     .config(RuntimeConfig::from_env()?)
//!     .build()?;
//!
//! let envelope = orchestrator.process("Compare Metformin and Rapamycin").await;
//! println!("{}", envelope.text);
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod annotations;
pub mod config;
pub mod handlers;
pub mod history;
pub mod orchestrator;
pub mod providers;
pub mod reasoning;
pub mod registry;
pub mod report;
pub mod retrieval;

pub use agents::{AgentError, Specialist, SpecialistKind, SpecialistReport};
pub use annotations::{AnnotationManager, EnvelopeAnnotator, FactCheckAnnotator, RiskAnnotator};
pub use config::{ConfigError, RuntimeConfig, CONFIG_ENV_VAR};
pub use handlers::{Fragment, HandlerError, TopicHandler};
pub use history::{ConversationLog, LogEntry, Role};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, Stage};
pub use providers::{ProviderError, ProviderRegistry, ResearchProvider, SimulatedProvider};
pub use registry::SpecialistRegistry;
pub use report::{RenderError, ReportData, ReportRenderer, SimulatedReportRenderer};
pub use retrieval::{Document, DocumentRetriever, InMemoryRetriever};

use thiserror::Error;

use curavyom_core::IntentLabel;

/// Errors raised while assembling an orchestrator.
///
/// Once built, the orchestrator never fails a query; failures are reported
/// inside the envelope.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No handler registered for intent {0}")]
    MissingHandler(IntentLabel),
}
