use thiserror::Error;

use crate::error::IngestError;
use crate::invoker::InvokeError;
use crate::parser::ParseError;
use crate::transport::Endpoint;

use super::stage::Stage;

const RESEARCH_FAILURE_MESSAGE: &str = "Error finding trends on X";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Call from {stage} stage failed ({}): {source}", .source.cause())]
    Invoke {
        stage: Stage,
        #[source]
        source: InvokeError,
    },

    #[error("Could not parse {stage} stage result: {source}")]
    Parse {
        stage: Stage,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("A stage transition is already in progress")]
    Busy,

    #[error("Operation requires the {expected} stage (current: {actual})")]
    WrongStage { expected: Stage, actual: Stage },

    #[error("'{0}' is not one of the generated thread ideas")]
    UnknownThread(String),

    #[error("Select at least one area to improve")]
    NoImprovementSelected,
}

impl PipelineError {
    /// The single notification shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Invoke { source, .. } if source.endpoint() == Some(Endpoint::Research) => {
                RESEARCH_FAILURE_MESSAGE.to_string()
            }
            PipelineError::Invoke { stage, .. } | PipelineError::Parse { stage, .. } => {
                stage.failure_message().to_string()
            }
            other => other.to_string(),
        }
    }
}
