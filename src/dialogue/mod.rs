//! Producing the Sagredo / Salviati / Simplicio dialogue for a news item.
//!
//! # Submodules
//!
//! - [`prompt`]: builds the instruction sent to the model
//! - [`repair`]: validates and repairs the model output
//! - [`fallback`]: the fixed dialogue used when generation is not possible
//!
//! [`DialogueProducer::produce`] never fails. A missing generator, a
//! generator error and unusable output all end in the same fallback text.

pub mod fallback;
pub mod prompt;
pub mod repair;

use crate::api::DialogueGenerator;
use crate::config::GenerationParams;
use crate::models::{DialogueResult, FallbackReason, NewsItem};
use crate::utils::truncate_for_log;
use fallback::fallback_dialogue;
use prompt::build_prompt;
use repair::{Validated, validate};
use tracing::{error, info, instrument, warn};

/// Asks a generator for a dialogue and guarantees a well-formed result.
#[derive(Debug)]
pub struct DialogueProducer<G> {
    generator: Option<G>,
    params: GenerationParams,
}

impl<G: DialogueGenerator> DialogueProducer<G> {
    /// `generator` is `None` when no backend could be set up.
    pub fn new(generator: Option<G>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    /// Generate, validate and, when needed, replace the dialogue for `news`.
    #[instrument(level = "info", skip_all, fields(title = %news.title()))]
    pub async fn produce(&self, news: &NewsItem) -> DialogueResult {
        let Some(generator) = &self.generator else {
            warn!("No dialogue generator available");
            return self.fallback(news, FallbackReason::GeneratorUnavailable);
        };

        let prompt = build_prompt(news);
        info!(prompt_bytes = prompt.len(), "Generating dialogue");

        let raw = match generator.generate(&prompt, &self.params).await {
            Ok(raw) => self.params.cut_at_stop(&raw).to_string(),
            Err(e) => {
                error!(error = %e, "Dialogue generation failed");
                return self.fallback(news, FallbackReason::GenerationFailed);
            }
        };

        match validate(&raw) {
            Validated::Dialogue(html) => {
                info!(bytes = html.len(), "Dialogue generated");
                DialogueResult::generated(html)
            }
            Validated::NeedsFallback => {
                warn!(
                    response_preview = %truncate_for_log(&raw, 300),
                    "Model output has too few recognizable turns"
                );
                self.fallback(news, FallbackReason::MalformedOutput)
            }
        }
    }

    /// The fixed dialogue for `news`, tagged with `reason`.
    pub fn fallback(&self, news: &NewsItem, reason: FallbackReason) -> DialogueResult {
        info!(%reason, "Using fallback dialogue");
        DialogueResult::fallback(fallback_dialogue(news), reason)
    }
}
