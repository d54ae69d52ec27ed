//! Run configuration for nino
//!
//! Merges command-line flags, positional words, the prompt file and
//! environment defaults into one read-only [`Config`].
//!
//! Precedence: explicit flag > positional words / prompt file > environment
//! variable > built-in default.

use crate::cli::args::Args;
use crate::errors::{NinoError, Result};
use crate::streaming::client::{DEFAULT_GENERATE_URL, DEFAULT_MODEL};
use crate::types::{RequestPayload, JSON_FORMAT};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_MODEL: &str = "NINO_MODEL";
pub const ENV_URL: &str = "NINO_URL";
pub const ENV_KEEP_ALIVE: &str = "NINO_KEEP_ALIVE";
pub const ENV_SYSTEM_PROMPT: &str = "NINO_SYSTEM_PROMPT";

/// Resolved configuration for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: String,
    pub prompt: String,
    pub url: String,
    pub output: Option<PathBuf>,
    pub stream: bool,
    pub silent: bool,
    pub format: Option<String>,
    pub images: Vec<PathBuf>,
    pub keep_alive: Option<String>,
    pub system: Option<String>,
    pub show_loading: bool,
    pub use_context: bool,
    pub verbose: bool,
}

impl Config {
    /// Resolve against the process environment
    pub fn from_args(args: Args) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve using `env` to look up environment variables
    ///
    /// Fails before anything touches the network when the combination of
    /// flags cannot work.
    pub fn resolve<F>(args: Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.is_empty());

        if args.silent && args.output.is_none() {
            return Err(NinoError::Config(
                "the --silent flag requires the --output flag to be specified".to_string(),
            ));
        }

        let format = args.format.filter(|f| !f.is_empty());
        if let Some(format) = &format {
            if format != JSON_FORMAT {
                return Err(NinoError::Config(format!(
                    "invalid format '{}': the only accepted value is '{}'",
                    format, JSON_FORMAT
                )));
            }
        }

        if let Some(output) = &args.output {
            validate_output_path(output)?;
        }

        let prompt = resolve_prompt(args.prompt, args.prompt_file.as_deref(), &args.words)?;

        Ok(Self {
            model: args
                .model
                .filter(|m| !m.is_empty())
                .or_else(|| env(ENV_MODEL))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            prompt,
            url: args
                .url
                .filter(|u| !u.is_empty())
                .or_else(|| env(ENV_URL))
                .unwrap_or_else(|| DEFAULT_GENERATE_URL.to_string()),
            output: args.output,
            stream: !args.no_stream,
            silent: args.silent,
            format,
            images: args.images,
            keep_alive: env(ENV_KEEP_ALIVE),
            system: env(ENV_SYSTEM_PROMPT),
            show_loading: !args.no_loading && !args.silent,
            use_context: !args.no_context,
            verbose: args.verbose,
        })
    }

    /// Build the request body from this configuration
    pub fn request_payload(&self, images: Vec<String>, context: Option<Vec<i64>>) -> RequestPayload {
        RequestPayload {
            model: self.model.clone(),
            prompt: self.prompt.clone(),
            system: self.system.clone(),
            images,
            format: self.format.clone(),
            stream: self.stream,
            keep_alive: self.keep_alive.clone(),
            context,
        }
    }
}

fn resolve_prompt(flag: Option<String>, file: Option<&Path>, words: &[String]) -> Result<String> {
    if let Some(prompt) = flag.filter(|p| !p.is_empty()) {
        return Ok(prompt);
    }

    if let Some(path) = file {
        return fs::read_to_string(path).map_err(|e| {
            NinoError::Config(format!(
                "error reading prompt file '{}': {}",
                path.display(),
                e
            ))
        });
    }

    if words.is_empty() {
        return Err(NinoError::Config(
            "no prompt provided: use --prompt, --prompt-file or pass the prompt as arguments"
                .to_string(),
        ));
    }

    Ok(words.join(" "))
}

fn validate_output_path(output: &Path) -> Result<()> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(NinoError::Config(
            format!("directory '{}' does not exist", dir.display()),
        )),
        _ => Ok(()),
    }
}
