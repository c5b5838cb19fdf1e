//! Analyze-then-generate orchestration.
//!
//! A run walks `Idle -> Analyzing -> Generating(1..=4) -> DisplayingResults`
//! and always ends back in `Idle`, passing through `Error` when it aborts.
//! Requests are issued one at a time. A failed generation attempt is recorded
//! in the attempt log and skipped; the run only fails when every attempt did.

pub mod prompts;
pub mod render;

use crate::{
    credentials::Credential,
    error::{Result, VariationError},
    gemini::{ImageAnalyzer, ImageGenerator},
    logger,
    models::{
        AttemptOutcome, AttemptRecord, PipelineStage, ProgressUpdate, RenderDescription,
        UploadedImage, VariationOptions, VariationResult, VARIATION_COUNT,
    },
};

pub use prompts::{analysis_prompt, variation_prompts};
pub use render::{describe_results, save_results};

const ANALYZING_PERCENT: u8 = 20;
const GENERATING_PERCENT: u8 = 30;
const FIRST_ATTEMPT_PERCENT: u8 = 40;
const ATTEMPT_STEP_PERCENT: u8 = 12;
const GENERATED_PERCENT: u8 = 88;

/// Receives progress as the run advances.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Writes progress to the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, update: &ProgressUpdate) {
        log::info!("[{:>3}%] {}", update.percent, update.status);
    }
}

/// Everything a run needs from the user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub credential: Option<Credential>,
    pub image: Option<UploadedImage>,
    pub options: VariationOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_image(mut self, image: UploadedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_options(mut self, options: VariationOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the current image with a new selection.
    pub fn select_image(&mut self, image: UploadedImage) {
        self.image = Some(image);
    }

    pub fn is_ready(&self) -> bool {
        self.ready_parts().is_some()
    }

    fn ready_parts(&self) -> Option<(&Credential, &UploadedImage)> {
        let credential = self.credential.as_ref().filter(|c| !c.is_empty())?;
        let image = self.image.as_ref().filter(|i| !i.is_empty())?;
        Some((credential, image))
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub analysis: String,
    pub results: Vec<VariationResult>,
    pub attempts: Vec<AttemptRecord>,
    pub render: RenderDescription,
}

impl PipelineOutput {
    pub fn failed_attempts(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.attempts.iter().filter(|a| !a.succeeded())
    }
}

pub struct VariationPipeline<A, G> {
    analyzer: A,
    generator: G,
    state: PipelineStage,
}

impl<A, G> VariationPipeline<A, G>
where
    A: ImageAnalyzer,
    G: ImageGenerator,
{
    pub fn new(analyzer: A, generator: G) -> Self {
        Self {
            analyzer,
            generator,
            state: PipelineStage::Idle,
        }
    }

    pub fn state(&self) -> PipelineStage {
        self.state
    }

    pub async fn run(
        &mut self,
        session: &Session,
        progress: &dyn ProgressSink,
    ) -> Result<PipelineOutput> {
        let outcome = self.execute(session, progress).await;

        if let Err(e) = &outcome {
            self.transition(PipelineStage::Error);
            log::error!("Variation run aborted: {}", e);
        }
        self.transition(PipelineStage::Idle);
        outcome
    }

    async fn execute(
        &mut self,
        session: &Session,
        progress: &dyn ProgressSink,
    ) -> Result<PipelineOutput> {
        let (credential, image) = session.ready_parts().ok_or_else(|| {
            VariationError::ConfigError("missing credential or image".into())
        })?;
        let options = session.options;
        let _timer = logger::timer("variation run");

        self.transition(PipelineStage::Analyzing);
        progress.report(&ProgressUpdate::new(
            PipelineStage::Analyzing,
            ANALYZING_PERCENT,
            "Analyzing image...",
        ));
        let analysis = self
            .analyzer
            .analyze(credential, &analysis_prompt(options), image)
            .await?;
        log::debug!("Analysis: {}", analysis);

        progress.report(&ProgressUpdate::new(
            PipelineStage::Generating(1),
            GENERATING_PERCENT,
            "Generating variations...",
        ));
        let (results, attempts) = self
            .generate_all(credential, &analysis, options, progress)
            .await;

        progress.report(&ProgressUpdate::new(
            PipelineStage::Generating(VARIATION_COUNT),
            GENERATED_PERCENT,
            format!("Generated {} of {} variations", results.len(), VARIATION_COUNT),
        ));

        if results.is_empty() {
            return Err(VariationError::GenerationError(
                "no variations were generated".into(),
            ));
        }
        if results.len() < VARIATION_COUNT {
            log::warn!(
                "Only {} of {} variations were generated",
                results.len(),
                VARIATION_COUNT
            );
        }

        self.transition(PipelineStage::DisplayingResults);
        let render = describe_results(&results);
        progress.report(&ProgressUpdate::new(
            PipelineStage::DisplayingResults,
            100,
            "Complete!",
        ));

        Ok(PipelineOutput {
            analysis,
            results,
            attempts,
            render,
        })
    }

    async fn generate_all(
        &mut self,
        credential: &Credential,
        analysis: &str,
        options: VariationOptions,
        progress: &dyn ProgressSink,
    ) -> (Vec<VariationResult>, Vec<AttemptRecord>) {
        let mut results = Vec::with_capacity(VARIATION_COUNT);
        let mut attempts = Vec::with_capacity(VARIATION_COUNT);

        for (i, prompt) in variation_prompts(analysis, options).into_iter().enumerate() {
            let index = i + 1;
            self.transition(PipelineStage::Generating(index));
            progress.report(&ProgressUpdate::new(
                PipelineStage::Generating(index),
                FIRST_ATTEMPT_PERCENT + ATTEMPT_STEP_PERCENT * i as u8,
                format!("Generating variation {}/{}...", index, VARIATION_COUNT),
            ));

            let outcome = match self.generator.generate(credential, &prompt).await {
                Ok(image) => {
                    results.push(VariationResult {
                        image,
                        prompt: prompt.clone(),
                    });
                    AttemptOutcome::Succeeded
                }
                Err(e) => {
                    log::warn!("Variation {} failed: {}", index, e);
                    AttemptOutcome::Failed(e.message())
                }
            };
            attempts.push(AttemptRecord {
                index,
                prompt,
                outcome,
            });
        }

        (results, attempts)
    }

    fn transition(&mut self, next: PipelineStage) {
        log::debug!("Pipeline {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
