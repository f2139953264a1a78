//! Dialogue generation backends.
//!
//! The model itself lives outside this program. This module only sends it a
//! prompt and returns the completion text:
//!
//! - [`DialogueGenerator`]: core trait defining async generation
//! - [`AjGenerator`]: OpenAI-compatible chat API through `awful_aj`
//! - [`LlamaGenerator`]: a local llama.cpp server's `/completion` endpoint
//! - [`Backend`]: the generator picked on the command line
//!
//! There is no retry logic: a failed call is reported to the caller, which
//! substitutes the fallback dialogue.

use crate::cli::{BackendKind, Cli};
use crate::config::{END_OF_TURN, GenerationParams};
use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Trait for async dialogue generation.
///
/// Implementors send a prompt to a language model and return its raw
/// completion. Output validation happens in the caller.
pub trait DialogueGenerator {
    /// Generate a completion for `prompt`.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The full instruction text
    /// * `params` - Sampling knobs; backends forward what their API supports
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, Box<dyn Error>>;
}

/// Generator backed by `awful_aj::api::ask`.
///
/// Endpoint, model and sampling settings come from the awful_aj
/// `config.yaml`; the chat template supplies the system prompt.
///
/// `ask` takes no per-call sampling options, so the [`GenerationParams`]
/// passed to [`DialogueGenerator::generate`] are not forwarded:
/// `max_new_tokens`, `temperature` and `top_p` must be set in `config.yaml`.
/// Stop markers still apply, because
/// [`DialogueProducer::produce`](crate::dialogue::DialogueProducer::produce)
/// cuts every completion at the first one.
#[derive(Debug)]
pub struct AjGenerator {
    /// LLM configuration (API keys, endpoints, model settings).
    pub config: AwfulJadeConfig,
    /// Chat template defining the conversation structure.
    pub template: ChatTemplate,
}

impl AjGenerator {
    /// Load the awful_aj configuration and chat template.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Path to `config.yaml`; defaults to the awful_aj config dir
    /// * `template_name` - Name of the chat template to load
    #[instrument(level = "info")]
    pub async fn load(
        config_path: Option<&str>,
        template_name: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let conf_file = match config_path {
            Some(path) => PathBuf::from(path),
            None => config_dir()?.join("config.yaml"),
        };
        if !conf_file.is_file() {
            return Err(format!("awful_aj config not found at {}", conf_file.display()).into());
        }
        let path = conf_file.to_str().ok_or("Not a valid config filename")?;
        let config = config::load_config(path)?;
        info!(config_path = path, "Loaded configuration");

        let template = template::load_template(template_name).await?;
        info!(template = template_name, "Loaded template");

        Ok(Self { config, template })
    }
}

impl DialogueGenerator for AjGenerator {
    #[instrument(level = "info", skip_all)]
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(&self.config, prompt.to_string(), &self.template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(text) => {
                info!(elapsed_ms = dt.as_millis() as u128, bytes = text.len(), "API call succeeded");
                Ok(text)
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed");
                Err(e)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: String,
    n_predict: usize,
    temperature: f32,
    top_p: f32,
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Wrap an instruction in Gemma chat turn markers.
pub fn gemma_turn(prompt: &str) -> String {
    format!("<start_of_turn>user\n{prompt}\n{END_OF_TURN}\n<start_of_turn>model\n")
}

/// Generator backed by a llama.cpp server running a local GGUF model.
#[derive(Debug, Clone)]
pub struct LlamaGenerator {
    client: Client,
    base_url: String,
}

impl LlamaGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn completion_url(&self) -> String {
        format!("{}/completion", self.base_url.trim_end_matches('/'))
    }
}

impl DialogueGenerator for LlamaGenerator {
    #[instrument(level = "info", skip_all, fields(base_url = %self.base_url))]
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, Box<dyn Error>> {
        let request = CompletionRequest {
            prompt: gemma_turn(prompt),
            n_predict: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stop: &params.stop,
        };
        let body = serde_json::to_string(&request)?;

        let t0 = Instant::now();
        let resp = self
            .client
            .post(self.completion_url())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(%status, "llama.cpp server returned an error");
            return Err(format!("llama.cpp server error {status}: {text}").into());
        }

        let completion: CompletionResponse = serde_json::from_str(&text)?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u128,
            bytes = completion.content.len(),
            "Completion received"
        );
        Ok(completion.content)
    }
}

/// The generator selected at startup.
#[derive(Debug)]
pub enum Backend {
    Aj(AjGenerator),
    Llama(LlamaGenerator),
}

impl DialogueGenerator for Backend {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, Box<dyn Error>> {
        match self {
            Backend::Aj(generator) => generator.generate(prompt, params).await,
            Backend::Llama(generator) => generator.generate(prompt, params).await,
        }
    }
}

/// Set up the backend named on the command line.
///
/// Returns `None` when generation is disabled or the backend cannot be
/// loaded; the caller then uses the fallback dialogue.
#[instrument(level = "info", skip_all, fields(backend = ?args.backend))]
pub async fn load_backend(args: &Cli) -> Option<Backend> {
    match args.backend {
        BackendKind::None => {
            info!("Dialogue generation disabled");
            None
        }
        BackendKind::Llama => {
            debug!(llama_url = %args.llama_url, "Using llama.cpp server");
            Some(Backend::Llama(LlamaGenerator::new(args.llama_url.clone())))
        }
        BackendKind::Aj => match AjGenerator::load(args.config.as_deref(), &args.template).await {
            Ok(generator) => Some(Backend::Aj(generator)),
            Err(e) => {
                warn!(error = %e, "Could not load awful_aj config or template; generator unavailable");
                None
            }
        },
    }
}
