use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::artifacts::{DraftContent, IdeationResult, TrendInsights};
use crate::config::schema::Config;
use crate::error::ThreadcraftError;
use crate::gate;
use crate::ingest::{Ingestor, SourceMaterial};
use crate::invoker::{InvokeError, SlotValues, StageInvoker};
use crate::parser;
use crate::transport::{Endpoint, HttpTransport, Transport};

use super::error::PipelineError;
use super::feedback::{ContentQuality, FeedbackForm, Improvement, ToneAccuracy};
use super::progress::{NoopProgress, ProgressEvent, ProgressReporter};
use super::review::FinalArtifact;
use super::stage::{Stage, REGENERATE_MESSAGE, RESEARCH_PHASE_MESSAGE};
use super::state::{Artifacts, LoadingFlag, PipelineState};

pub const APPROVED_MESSAGE: &str = "Content has been approved!";
pub const REJECTED_MESSAGE: &str = "Changes have been rejected!";

/// Result of a call to [`Orchestrator::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved forward; carries the new stage.
    Advanced(Stage),
    /// The current stage's gate is closed. Nothing happened.
    Blocked,
    /// A transition is already running. Nothing happened.
    Busy,
    /// Remote work failed; the pipeline is back at the first stage.
    RolledBack { notification: String },
    /// Already at the last stage.
    Terminal,
}

/// What a successful stage produced, committed to the artifacts in one step.
enum StageOutput {
    Researched {
        analysis: Value,
        research: TrendInsights,
    },
    Ideated(IdeationResult),
    Drafted(DraftContent),
    Finalized(FinalArtifact),
}

/// Drives the five-stage workflow over a single [`PipelineState`].
pub struct Orchestrator<T: Transport> {
    session_id: String,
    invoker: StageInvoker<T>,
    ingestor: Ingestor,
    progress: Arc<dyn ProgressReporter>,
    state: PipelineState,
    last_notification: Option<String>,
}

impl Orchestrator<HttpTransport> {
    /// Production constructor: HTTP transport built from `config`.
    pub fn from_config(config: &Config) -> Result<Self, ThreadcraftError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            invoker: StageInvoker::new(transport, &config.slots),
            ingestor: Ingestor::new(config.ingest.max_file_bytes),
            progress: Arc::new(NoopProgress),
            state: PipelineState::default(),
            last_notification: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the default ingestor, e.g. with a different size ceiling.
    pub fn with_ingestor(mut self, ingestor: Ingestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    // -- accessors --

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// A handle that observes the busy flag from another task.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.state.loading.clone()
    }

    pub fn progress_message(&self) -> Option<&str> {
        self.state.progress_message()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn artifacts(&self) -> &Artifacts {
        self.state.artifacts()
    }

    pub fn source(&self) -> Option<&SourceMaterial> {
        self.artifacts().source.as_ref()
    }

    pub fn analysis(&self) -> Option<&Value> {
        self.artifacts().analysis.as_ref()
    }

    pub fn research(&self) -> Option<&TrendInsights> {
        self.artifacts().research.as_ref()
    }

    pub fn ideation(&self) -> Option<&IdeationResult> {
        self.artifacts().ideation.as_ref()
    }

    pub fn selected_thread(&self) -> Option<&str> {
        self.artifacts().selected_thread.as_deref()
    }

    /// The current draft, or the placeholder draft before one exists.
    pub fn draft(&self) -> DraftContent {
        self.artifacts().draft.clone().unwrap_or_default()
    }

    pub fn feedback(&self) -> &FeedbackForm {
        &self.artifacts().feedback
    }

    pub fn final_artifact(&self) -> Option<&FinalArtifact> {
        self.artifacts().final_artifact.as_ref()
    }

    /// The most recent user-facing failure notification.
    pub fn last_notification(&self) -> Option<&str> {
        self.last_notification.as_deref()
    }

    pub fn can_advance(&self) -> bool {
        !self.is_loading() && gate::can_advance(self.current_stage(), self.artifacts())
    }

    pub fn can_regenerate(&self) -> bool {
        !self.is_loading() && gate::can_regenerate(self.current_stage(), self.artifacts())
    }

    // -- navigation --

    /// Runs the current stage's remote work and moves forward.
    ///
    /// Any failure (transport, empty result, unparseable result) produces one
    /// notification and resets the pipeline to [`Stage::Ingest`]. The loading
    /// flag is cleared on every exit path.
    pub async fn advance(&mut self) -> AdvanceOutcome {
        let stage = self.current_stage();
        if stage.is_terminal() {
            return AdvanceOutcome::Terminal;
        }
        if self.is_loading() {
            return AdvanceOutcome::Busy;
        }
        if !gate::can_advance(stage, self.artifacts()) {
            debug!(stage = %stage, "Gate closed, not advancing");
            return AdvanceOutcome::Blocked;
        }
        let Some(_loading) = self.state.loading.acquire() else {
            return AdvanceOutcome::Busy;
        };

        let span = info_span!("advance", session = %self.session_id, stage = %stage);
        async {
            self.set_progress(stage, stage.progress_message());

            let outcome = match self.run_stage(stage).await {
                Ok(output) => {
                    self.commit(output);
                    let next = stage.next().unwrap_or(stage);
                    self.state.stage = next;
                    info!("Advanced to {}", next);
                    self.progress.report(ProgressEvent::Advanced {
                        from: stage,
                        to: next,
                    });
                    AdvanceOutcome::Advanced(next)
                }
                Err(e) => self.roll_back(stage, e),
            };

            self.state.progress_message = None;
            outcome
        }
        .instrument(span)
        .await
    }

    /// Steps back one stage, keeping every artifact. `None` when already at
    /// the first stage or while a transition is running.
    pub fn retreat(&mut self) -> Option<Stage> {
        if self.is_loading() {
            return None;
        }
        let prev = self.current_stage().prev()?;
        debug!("Retreating to {}", prev);
        self.state.stage = prev;
        Some(prev)
    }

    // -- Ingest stage --

    /// Uses typed text as the source. Blank text clears the source.
    pub fn set_authored_text(&mut self, text: &str) -> Result<(), PipelineError> {
        self.ensure_idle_at(Stage::Ingest)?;
        self.state.artifacts.source = if text.trim().is_empty() {
            None
        } else {
            Some(self.ingestor.ingest_text(text)?)
        };
        Ok(())
    }

    /// Uses an uploaded document as the source. On failure the source is cleared.
    pub fn ingest_document(
        &mut self,
        file_name: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<&SourceMaterial, PipelineError> {
        self.ensure_idle_at(Stage::Ingest)?;
        let result = self.ingestor.ingest_bytes(file_name, bytes, content_type);
        self.replace_source(result)
    }

    pub fn ingest_document_path(&mut self, path: &Path) -> Result<&SourceMaterial, PipelineError> {
        self.ensure_idle_at(Stage::Ingest)?;
        let result = self.ingestor.ingest_path(path);
        self.replace_source(result)
    }

    pub fn clear_source(&mut self) -> Result<(), PipelineError> {
        self.ensure_idle_at(Stage::Ingest)?;
        self.state.artifacts.source = None;
        Ok(())
    }

    // -- Ideate stage --

    /// Selects one of the generated ideas by title, replacing any earlier choice.
    pub fn select_thread(&mut self, title: &str) -> Result<(), PipelineError> {
        self.ensure_idle_at(Stage::Ideate)?;
        let known = self
            .ideation()
            .is_some_and(|ideation| ideation.contains_title(title));
        if !known {
            return Err(PipelineError::UnknownThread(title.to_string()));
        }
        self.state.artifacts.selected_thread = Some(title.to_string());
        Ok(())
    }

    // -- Draft stage --

    pub fn toggle_improvement(&mut self, improvement: Improvement) -> bool {
        self.state.artifacts.feedback.toggle(improvement)
    }

    pub fn set_tone(&mut self, tone: Option<ToneAccuracy>) {
        self.state.artifacts.feedback.set_tone(tone);
    }

    pub fn set_quality(&mut self, quality: Option<ContentQuality>) {
        self.state.artifacts.feedback.set_quality(quality);
    }

    pub fn set_comments(&mut self, comments: &str) {
        self.state.artifacts.feedback.set_comments(comments);
    }

    /// Regenerates the draft from the feedback form, staying at [`Stage::Draft`].
    ///
    /// Requires at least one improvement flag; otherwise nothing is sent. A
    /// failed call is reported but leaves the stage and the draft untouched.
    /// The form is reset once the call settles.
    pub async fn submit_feedback(&mut self) -> Result<(), PipelineError> {
        self.ensure_idle_at(Stage::Draft)?;
        let record = self
            .feedback()
            .to_record()
            .ok_or(PipelineError::NoImprovementSelected)?;
        let Some(_loading) = self.state.loading.acquire() else {
            return Err(PipelineError::Busy);
        };

        let span = info_span!("regenerate", session = %self.session_id);
        async {
            self.set_progress(Stage::Draft, REGENERATE_MESSAGE);

            let draft = self.draft();
            let values = SlotValues {
                draft: Some(&draft),
                feedback: Some(&record),
                ..Default::default()
            };
            let result = match self.invoker.edit(&values).await {
                Ok(text) => parser::parse_draft(&text).map_err(|source| PipelineError::Parse {
                    stage: Stage::Draft,
                    source,
                }),
                Err(source) => Err(PipelineError::Invoke {
                    stage: Stage::Draft,
                    source,
                }),
            };

            self.state.artifacts.feedback.reset();
            self.state.progress_message = None;

            match result {
                Ok(draft) => {
                    info!("Draft regenerated");
                    self.state.artifacts.draft = Some(draft);
                    self.progress.report(ProgressEvent::Regenerated);
                    Ok(())
                }
                Err(e) => {
                    self.notify(Stage::Draft, &e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    // -- Review stage --

    pub fn edit_final(&mut self, text: &str) -> Result<(), PipelineError> {
        self.final_mut()?.edit(text);
        Ok(())
    }

    /// Snapshots the edited text. `Ok(false)` when there was nothing to approve.
    pub fn approve_final(&mut self) -> Result<bool, PipelineError> {
        let approved = self.final_mut()?.approve();
        if approved {
            self.notice(APPROVED_MESSAGE);
        }
        Ok(approved)
    }

    /// Discards edits. `Ok(false)` when there was nothing to discard.
    pub fn reject_final(&mut self) -> Result<bool, PipelineError> {
        let rejected = self.final_mut()?.reject();
        if rejected {
            self.notice(REJECTED_MESSAGE);
        }
        Ok(rejected)
    }

    // -- internals --

    async fn run_stage(&mut self, stage: Stage) -> Result<StageOutput, PipelineError> {
        let invoke_err = |source: InvokeError| PipelineError::Invoke { stage, source };
        let parse_err = |source| PipelineError::Parse { stage, source };
        let missing = |endpoint, input| {
            invoke_err(InvokeError::MissingInput { endpoint, input })
        };

        match stage {
            Stage::Ingest => {
                let source = self
                    .source()
                    .map(|s| s.content.clone())
                    .ok_or_else(|| missing(Endpoint::Analyze, "source material"))?;

                let raw = self.invoker.analyze(&source).await.map_err(invoke_err)?;
                let analysis = parser::parse_fenced_json(&raw).map_err(parse_err)?;

                self.set_progress(stage, RESEARCH_PHASE_MESSAGE);
                let raw = self.invoker.research(&analysis).await.map_err(invoke_err)?;
                let research = parser::parse_trend_insights(&raw);

                Ok(StageOutput::Researched { analysis, research })
            }
            Stage::Research => {
                let artifacts = self.state.artifacts();
                let values = SlotValues {
                    analysis: artifacts.analysis.as_ref(),
                    trend_line: artifacts.research.as_ref().map(|r| r.raw_trend_line.as_str()),
                    ..Default::default()
                };
                let raw = self.invoker.ideation(&values).await.map_err(invoke_err)?;
                let ideation = parser::parse_ideation(&raw).map_err(parse_err)?;
                Ok(StageOutput::Ideated(ideation))
            }
            Stage::Ideate => {
                let artifacts = self.state.artifacts();
                let values = SlotValues {
                    analysis: artifacts.analysis.as_ref(),
                    selected_thread: artifacts.selected_thread.as_deref(),
                    ..Default::default()
                };
                let raw = self.invoker.generate(&values).await.map_err(invoke_err)?;
                let draft = parser::parse_draft(&raw).map_err(parse_err)?;
                Ok(StageOutput::Drafted(draft))
            }
            Stage::Draft => {
                let draft = self.draft();
                let merged = draft.merged();
                // Returning with an unchanged draft keeps edits and approval.
                let kept = self
                    .final_artifact()
                    .filter(|existing| existing.original() == merged)
                    .cloned();
                Ok(StageOutput::Finalized(
                    kept.unwrap_or_else(|| FinalArtifact::from_draft(&draft)),
                ))
            }
            Stage::Review => Err(PipelineError::WrongStage {
                expected: Stage::Draft,
                actual: Stage::Review,
            }),
        }
    }

    fn commit(&mut self, output: StageOutput) {
        let artifacts = &mut self.state.artifacts;
        match output {
            StageOutput::Researched { analysis, research } => {
                artifacts.analysis = Some(analysis);
                artifacts.research = Some(research);
            }
            StageOutput::Ideated(ideation) => {
                artifacts.ideation = Some(ideation);
                artifacts.selected_thread = None;
            }
            StageOutput::Drafted(draft) => {
                artifacts.draft = Some(draft);
                artifacts.feedback.reset();
            }
            StageOutput::Finalized(final_artifact) => {
                artifacts.final_artifact = Some(final_artifact);
            }
        }
    }

    fn roll_back(&mut self, stage: Stage, error: PipelineError) -> AdvanceOutcome {
        self.notify(stage, &error);
        self.state.stage = Stage::Ingest;
        AdvanceOutcome::RolledBack {
            notification: error.user_message(),
        }
    }

    fn notify(&mut self, stage: Stage, error: &PipelineError) {
        let notification = error.user_message();
        warn!(stage = %stage, "{}", error);
        self.progress.report(ProgressEvent::Failed {
            stage,
            notification: notification.clone(),
        });
        self.last_notification = Some(notification);
    }

    fn notice(&self, message: &str) {
        info!("{}", message);
        self.progress.report(ProgressEvent::Notice {
            stage: self.current_stage(),
            message: message.to_string(),
        });
    }

    fn set_progress(&mut self, stage: Stage, message: &str) {
        self.state.progress_message = Some(message.to_string());
        self.progress.report(ProgressEvent::Started {
            stage,
            message: message.to_string(),
        });
    }

    fn ensure_idle_at(&self, expected: Stage) -> Result<(), PipelineError> {
        if self.is_loading() {
            return Err(PipelineError::Busy);
        }
        let actual = self.current_stage();
        if actual != expected {
            return Err(PipelineError::WrongStage { expected, actual });
        }
        Ok(())
    }

    fn final_mut(&mut self) -> Result<&mut FinalArtifact, PipelineError> {
        self.ensure_idle_at(Stage::Review)?;
        let actual = self.current_stage();
        self.state
            .artifacts
            .final_artifact
            .as_mut()
            .ok_or(PipelineError::WrongStage {
                expected: Stage::Review,
                actual,
            })
    }

    fn replace_source(
        &mut self,
        result: Result<SourceMaterial, crate::error::IngestError>,
    ) -> Result<&SourceMaterial, PipelineError> {
        match result {
            Ok(material) => {
                info!(
                    file = %material.file_name,
                    pages = material.page_count,
                    "Source ingested"
                );
                Ok(&*self.state.artifacts.source.insert(material))
            }
            Err(e) => {
                warn!("Ingestion failed: {}", e);
                self.state.artifacts.source = None;
                Err(e.into())
            }
        }
    }
}
