//! Generation parameters handed to the dialogue generator.
//!
//! Defaults match what the dialogue prompt was tuned for. A YAML file passed
//! with `--generation-config` overrides any subset of them:
//!
//! ```yaml
//! max_new_tokens: 768
//! temperature: 0.6
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Marker that ends a Gemma model turn.
pub const END_OF_TURN: &str = "<end_of_turn>";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_new_tokens: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Generation stops at the first of these markers.
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
            stop: vec![END_OF_TURN.to_string()],
        }
    }
}

impl GenerationParams {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(path).await?;
        let params = Self::from_yaml_str(&yaml)?;
        info!(?params, "Loaded generation parameters");
        Ok(params)
    }

    /// Parameters for a run: the YAML file at `path` when given and readable,
    /// the defaults otherwise.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a generation-parameters YAML file
    ///
    /// # Returns
    ///
    /// The loaded parameters, or [`GenerationParams::default`] with a warning
    /// when the file is missing or malformed.
    pub async fn load_or_default(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path).await {
            Ok(params) => params,
            Err(e) => {
                warn!(path, error = %e, "Could not load generation parameters; using defaults");
                Self::default()
            }
        }
    }

    /// Cut `text` at the first stop marker, if any.
    pub fn cut_at_stop<'a>(&self, text: &'a str) -> &'a str {
        self.stop
            .iter()
            .filter(|marker| !marker.is_empty())
            .filter_map(|marker| text.find(marker.as_str()))
            .min()
            .map_or(text, |idx| &text[..idx])
    }
}
