//! Command-line argument parsing for nino
//!
//! clap-based CLI. Multi-letter short flags (`-pf`, `-nl`, `-ns`, `-nc`) and
//! single-dash long flags (`-model`, `-prompt-file`, ...) are still accepted:
//! [`normalize_args`] rewrites them to `--long` form before clap sees argv.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// nino - stream answers from a local Ollama model into your terminal
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "nino")]
#[command(version)]
#[command(about = "Stream completions from a local Ollama server straight into your terminal", long_about = None)]
pub struct Args {
    /// Model to use [env: NINO_MODEL] [default: llama3.2]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Prompt to send
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Read the prompt from a file (short form: -pf)
    #[arg(long = "prompt-file", value_name = "FILE")]
    pub prompt_file: Option<PathBuf>,

    /// Generate endpoint URL [env: NINO_URL] [default: http://localhost:11434/api/generate]
    #[arg(short, long)]
    pub url: Option<String>,

    /// Also write the answer to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable the loading animation (short form: -nl)
    #[arg(long = "no-loading")]
    pub no_loading: bool,

    /// Ask for a single response object instead of a stream (short form: -ns)
    #[arg(long = "no-stream")]
    pub no_stream: bool,

    /// Neither load nor save conversation context (short form: -nc)
    #[arg(long = "no-context")]
    pub no_context: bool,

    /// No console output; requires --output
    #[arg(short, long)]
    pub silent: bool,

    /// Response format; only "json" is accepted
    #[arg(short, long)]
    pub format: Option<String>,

    /// Attach an image (repeatable)
    #[arg(short = 'i', long = "image", value_name = "FILE")]
    pub images: Vec<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Prompt words, used when neither --prompt nor --prompt-file is given
    #[arg(value_name = "PROMPT")]
    pub words: Vec<String>,
}

/// Multi-letter short flags and the long flag each one stands for
const LEGACY_SHORT_FLAGS: &[(&str, &str)] = &[
    ("pf", "prompt-file"),
    ("nl", "no-loading"),
    ("ns", "no-stream"),
    ("nc", "no-context"),
];

/// Long flags that may also be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "model",
    "prompt",
    "prompt-file",
    "url",
    "output",
    "no-loading",
    "no-stream",
    "no-context",
    "silent",
    "format",
    "image",
    "verbose",
    "help",
    "version",
];

/// Long flags followed by a value
const VALUE_FLAGS: &[&str] = &["model", "prompt", "prompt-file", "url", "output", "format", "image"];

/// Short flags followed by a value
const VALUE_SHORTS: &[char] = &['m', 'p', 'u', 'o', 'f', 'i'];

/// Short flags that stand alone
const SWITCH_SHORTS: &[char] = &['s', 'v', 'h', 'V'];

impl Args {
    /// Parse the process arguments
    pub fn parse_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Parse an explicit argv (first item is the program name)
    pub fn try_parse_normalized<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(argv))
    }
}

/// Rewrite legacy single-dash flags into `--long` form
///
/// Flags end at the first prompt word: a `--` is inserted before it so
/// everything after it reaches the prompt verbatim, even text that looks like
/// a flag. Tokens after a bare `--` and tokens that are not valid UTF-8 pass
/// through untouched, as do ordinary single-letter flags.
pub fn normalize_args<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = argv.into_iter().map(Into::<OsString>::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expect_value = false;

    while let Some(arg) = args.next() {
        if expect_value {
            expect_value = false;
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            normalized.push(arg);
            normalized.extend(args.by_ref());
            break;
        }
        if !text.starts_with('-') || text == "-" {
            normalized.push(OsString::from("--"));
            normalized.push(arg);
            normalized.extend(args.by_ref());
            break;
        }

        let flag = rewrite_flag(text).unwrap_or_else(|| text.to_string());
        expect_value = takes_value(&flag);
        normalized.push(OsString::from(flag));
    }

    normalized
}

/// Whether `flag` consumes the next argument as its value
fn takes_value(flag: &str) -> bool {
    if let Some(long) = flag.strip_prefix("--") {
        return !long.contains('=') && VALUE_FLAGS.contains(&long);
    }

    // In a cluster like `-sm`, only a trailing value flag takes the next argument
    let shorts = flag.strip_prefix('-').unwrap_or(flag);
    match shorts.char_indices().find(|(_, c)| !SWITCH_SHORTS.contains(c)) {
        Some((i, c)) => VALUE_SHORTS.contains(&c) && i + c.len_utf8() == shorts.len(),
        None => false,
    }
}

fn rewrite_flag(arg: &str) -> Option<String> {
    let body = arg.strip_prefix('-')?;
    if body.starts_with('-') || body.chars().count() < 2 {
        return None;
    }

    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    let long = LEGACY_SHORT_FLAGS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, long)| *long)
        .or_else(|| LONG_FLAGS.iter().copied().find(|long| *long == name))?;

    Some(match value {
        Some(value) => format!("--{}={}", long, value),
        None => format!("--{}", long),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_normalized(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_long_flags() {
        let args = parse(&[
            "nino", "--model", "mistral", "--prompt", "hi", "--url", "http://x/api/generate",
            "--output", "out.md", "--silent", "--format", "json",
        ]);
        assert_eq!(args.model.as_deref(), Some("mistral"));
        assert_eq!(args.prompt.as_deref(), Some("hi"));
        assert_eq!(args.url.as_deref(), Some("http://x/api/generate"));
        assert_eq!(args.output, Some(PathBuf::from("out.md")));
        assert!(args.silent);
        assert_eq!(args.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["nino", "-m", "phi3", "-p", "hey", "-o", "a.txt", "-s", "-f", "json", "-v"]);
        assert_eq!(args.model.as_deref(), Some("phi3"));
        assert_eq!(args.prompt.as_deref(), Some("hey"));
        assert_eq!(args.output, Some(PathBuf::from("a.txt")));
        assert!(args.silent);
        assert!(args.verbose);
    }

    #[test]
    fn test_legacy_multi_letter_flags() {
        let args = parse(&["nino", "-pf", "prompt.txt", "-nl", "-ns", "-nc"]);
        assert_eq!(args.prompt_file, Some(PathBuf::from("prompt.txt")));
        assert!(args.no_loading);
        assert!(args.no_stream);
        assert!(args.no_context);
    }

    #[test]
    fn test_single_dash_long_flags() {
        let args = parse(&["nino", "-model=llava", "-prompt", "describe", "-image", "cat.png"]);
        assert_eq!(args.model.as_deref(), Some("llava"));
        assert_eq!(args.prompt.as_deref(), Some("describe"));
        assert_eq!(args.images, vec![PathBuf::from("cat.png")]);
    }

    #[test]
    fn test_repeatable_images() {
        let args = parse(&["nino", "-i", "a.png", "--image", "b.png", "-p", "compare"]);
        assert_eq!(args.images, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
    }

    #[test]
    fn test_positional_words() {
        let args = parse(&["nino", "-m", "llama3.2", "why", "is", "the", "sky", "blue"]);
        assert_eq!(args.words, vec!["why", "is", "the", "sky", "blue"]);
        assert!(args.prompt.is_none());
    }

    #[test]
    fn test_passthrough_after_double_dash() {
        let argv = normalize_args(["nino", "--", "-nl", "-model"]);
        assert_eq!(argv, vec!["nino", "--", "-nl", "-model"]);

        let args = parse(&["nino", "--", "-nl"]);
        assert_eq!(args.words, vec!["-nl"]);
        assert!(!args.no_loading);
    }

    #[test]
    fn test_unknown_single_dash_tokens_untouched() {
        let argv = normalize_args(["nino", "-mphi3", "-x", "plain"]);
        assert_eq!(argv, vec!["nino", "-mphi3", "-x", "--", "plain"]);
    }

    #[test]
    fn test_flags_end_at_first_prompt_word() {
        let args = parse(&["nino", "what", "does", "-nc", "mean"]);
        assert_eq!(args.words, vec!["what", "does", "-nc", "mean"]);
        assert!(!args.no_context);

        let args = parse(&["nino", "-m", "llava", "-nl", "hello", "-s", "--verbose"]);
        assert_eq!(args.model.as_deref(), Some("llava"));
        assert!(args.no_loading);
        assert_eq!(args.words, vec!["hello", "-s", "--verbose"]);
        assert!(!args.silent);
        assert!(!args.verbose);
    }

    #[test]
    fn test_flag_values_are_not_prompt_words() {
        let argv = normalize_args(["nino", "-pf", "q.txt", "-sm", "phi3", "-model=llava", "go"]);
        assert_eq!(
            argv,
            vec!["nino", "--prompt-file", "q.txt", "-sm", "phi3", "--model=llava", "--", "go"]
        );

        let args = parse(&["nino", "-o", "-", "-p", "hi"]);
        assert_eq!(args.output, Some(PathBuf::from("-")));
        assert!(args.words.is_empty());
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Args::try_parse_normalized(["nino", "--temperature", "0.2"]).is_err());
    }
}
