//! Run configuration.
//!
//! [`RunConfig`] is what the driver consumes. The binary fills it from
//! command-line flags and environment variables; tests build it directly.

use std::path::PathBuf;
use std::time::Duration;

use hoil_bridge::{default_cache_path, ChatTranslator, HttpTranslator, Translator};

/// Default model for the chat translator.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default translation request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Wire protocol of the translation service.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TranslatorKind {
    /// `{statements, functions}` in, `{results}` out.
    #[default]
    Http,
    /// OpenAI-compatible chat completions.
    Chat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub kind: TranslatorKind,
    /// Service endpoint. Without one, no translator is used.
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            kind: TranslatorKind::default(),
            url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TranslatorConfig {
    /// The configured translator, or `None` when no endpoint is set.
    pub fn build(&self) -> Option<Box<dyn Translator>> {
        let url = self.url.as_deref()?;
        let translator: Box<dyn Translator> = match self.kind {
            TranslatorKind::Http => {
                Box::new(HttpTranslator::new(url, self.timeout).with_api_key(self.api_key.clone()))
            }
            TranslatorKind::Chat => Box::new(
                ChatTranslator::new(url, self.model.clone(), self.timeout)
                    .with_api_key(self.api_key.clone()),
            ),
        };
        Some(translator)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Snippet cache file; `None` keeps the cache in memory for this run.
    pub cache_path: Option<PathBuf>,
    pub translator: TranslatorConfig,
    /// Seed the simulated arm with the demo scene.
    pub demo_scene: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            cache_path: Some(default_cache_path()),
            translator: TranslatorConfig::default(),
            demo_scene: true,
        }
    }
}

#[cfg(test)]
mod tests;
