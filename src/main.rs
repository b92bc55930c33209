//! Entry point for the cadence CLI.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load reader configuration from `conf/config.toml`.
//! - Process the given text file (or the built-in sample) into a document.
//! - Print the chapter map and a pacing preview, or dump JSON for a UI.

use anyhow::{anyhow, Context, Result};
use cadence::config::load_config;
use cadence::loader::load_plain_text;
use cadence::pacing::UniformJitter;
use cadence::pipeline::process_text;
use cadence::sample::SAMPLE_TEXT;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

struct CliArgs {
    input: Option<PathBuf>,
    json: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());

    let text = match &args.input {
        Some(path) => load_plain_text(path)?,
        None => {
            info!("No input file given; using the built-in sample text");
            SAMPLE_TEXT.to_string()
        }
    };

    info!(
        wpm = config.wpm,
        chunk_size = config.chunk_size,
        context_mode = config.context_mode,
        "Processing document"
    );
    let document = process_text(&text, &[]);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&document)
                .context("Failed to serialize the processed document")?
        );
        return Ok(());
    }

    println!(
        "{} tokens in {} paragraphs",
        document.tokens.len(),
        document.paragraph_starts.len()
    );

    if document.chapters.is_empty() {
        println!("no chapter headings detected");
    } else {
        println!("\nchapters:");
        for chapter in &document.chapters {
            let indent = "  ".repeat(usize::from(chapter.level));
            println!(
                "  {indent}{title}  (word {index})",
                title = chapter.title,
                index = chapter.word_index
            );
        }
    }

    let preview = config.preview_words.min(document.tokens.len());
    if preview > 0 {
        let options = config.pace_options();
        let mut jitter = UniformJitter::new();
        println!("\npacing preview at {} wpm:", config.wpm);
        for index in 0..preview {
            let delay = document.delay_at(index, config.wpm, &options, &mut jitter);
            println!("  {:>7.1} ms  {}", delay, document.tokens[index]);
        }
    }

    Ok(())
}

fn parse_args() -> Result<CliArgs> {
    let mut input = None;
    let mut json = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Usage: cadence [--json] [path-to-text-file]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => {
                return Err(anyhow!("Unknown flag: {flag}"));
            }
            path => {
                if input.replace(PathBuf::from(path)).is_some() {
                    return Err(anyhow!("Expected at most one input file"));
                }
            }
        }
    }

    if let Some(path) = &input {
        if !path.exists() {
            return Err(anyhow!("File not found: {}", path.display()));
        }
    }

    Ok(CliArgs { input, json })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter_layer))
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
