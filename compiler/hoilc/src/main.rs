//! `hoil` command line.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hoilc::config::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use hoilc::{init_tracing, run_file, RunConfig, TranslatorConfig, TranslatorKind};

#[derive(Parser)]
#[command(name = "hoil", version, about = "Run a HOIL bytecode program", long_about = None)]
struct Cli {
    /// Bytecode file to run
    file: PathBuf,

    /// Snippet cache file [default: $XDG_CACHE_HOME/hoil/instructions.json]
    #[arg(long, value_name = "PATH", conflicts_with = "no_cache")]
    cache: Option<PathBuf>,

    /// Keep translated snippets for this run only
    #[arg(long)]
    no_cache: bool,

    /// Translation service protocol
    #[arg(long, value_enum, default_value_t = TranslatorKind::Http)]
    translator: TranslatorKind,

    /// Translation service endpoint
    #[arg(long, value_name = "URL", env = "HOIL_TRANSLATOR_URL")]
    translator_url: Option<String>,

    /// Bearer token for the translation service
    #[arg(long, env = "HOIL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name for the chat protocol
    #[arg(long, env = "HOIL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Translation request timeout
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Start the simulated arm with no scene objects
    #[arg(long)]
    empty_scene: bool,

    /// Print spans as an indented tree
    #[arg(long)]
    log_tree: bool,
}

impl Cli {
    fn config(&self) -> RunConfig {
        let defaults = RunConfig::default();
        let cache_path = if self.no_cache {
            None
        } else {
            self.cache.clone().or(defaults.cache_path)
        };
        RunConfig {
            cache_path,
            translator: TranslatorConfig {
                kind: self.translator,
                url: self.translator_url.clone(),
                api_key: self.api_key.clone(),
                model: self.model.clone(),
                timeout: Duration::from_secs(self.timeout),
            },
            demo_scene: !self.empty_scene,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_tree);

    match run_file(&cli.file, &cli.config()) {
        Ok(report) => {
            tracing::debug!(?report, "program finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
