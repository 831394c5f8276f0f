pub mod artifacts;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod gate;
pub mod ingest;
pub mod invoker;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod sanitize;
pub mod secrets;
pub mod transport;

pub use artifacts::{DraftContent, IdeationResult, ThreadIdea, TrendInsights};
pub use broadcast::{StageProgressBroadcaster, StageProgressEvent, StageStatus};
pub use config::{load_config, load_config_from_env, Config};
pub use error::{ConfigError, IngestError, Result, ThreadcraftError};
pub use ingest::{Ingestor, SourceMaterial, SourceOrigin};
pub use invoker::{InvokeError, StageInvoker};
pub use parser::ParseError;
pub use pipeline::{AdvanceOutcome, Orchestrator, PipelineError, PipelineState, Stage};
pub use secrets::{resolve_token, resolve_token_optional, SecretError};
pub use transport::{Endpoint, HttpTransport, ScriptedTransport, Transport, TransportResponse};
