//! Quill command-line interface.
//!
//! Three subcommands wrap the pipeline: `generate` writes a new document on
//! a topic, `transform` rewrites an existing text in the user's style, and
//! `add` imports a plain-text document into the example corpus.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill_documents::{DocumentStore, parse_document};
use quill_retrieval::{PromptOptions, RetrievalConfig, SamplingParams, StyleEngine};

#[derive(Parser)]
#[command(name = "quill", about = "Generate documents in your own writing style")]
struct Cli {
    /// Base directory for the corpus and embedding cache.
    /// Defaults to the platform data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new document on a topic.
    Generate {
        /// Topic of the document to generate.
        topic: String,

        /// Type of document (practice, report, essay, ...).
        #[arg(long)]
        doc_type: Option<String>,

        /// File with additional free-text context for retrieval.
        #[arg(long, conflicts_with = "context_text")]
        context: Option<PathBuf>,

        /// Additional free-text context given inline.
        #[arg(long)]
        context_text: Option<String>,

        /// File with a custom prompt replacing the default instruction.
        #[arg(long, conflicts_with = "prompt_text")]
        prompt: Option<PathBuf>,

        /// Custom prompt given inline.
        #[arg(long)]
        prompt_text: Option<String>,

        /// Generation endpoint override.
        #[arg(long)]
        endpoint: Option<String>,

        /// Sampling temperature (0.0-1.0).
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,

        /// Maximum output length (up to 32768).
        #[arg(long, default_value_t = 32768)]
        max_tokens: u32,

        /// Nucleus sampling threshold (0.0-1.0).
        #[arg(long, default_value_t = 1.0)]
        top_p: f32,

        /// Frequency penalty (-2.0 to 2.0).
        #[arg(long, default_value_t = 0.0)]
        frequency_penalty: f32,

        /// Presence penalty (-2.0 to 2.0).
        #[arg(long, default_value_t = 0.0)]
        presence_penalty: f32,

        /// Parse the generated document and save it into the corpus.
        #[arg(long)]
        save: bool,
    },

    /// Rewrite a text file in the user's style.
    Transform {
        /// File with the text to transform.
        file: PathBuf,

        /// File with additional free-text context for retrieval.
        #[arg(long, conflicts_with = "context_text")]
        context: Option<PathBuf>,

        /// Additional free-text context given inline.
        #[arg(long)]
        context_text: Option<String>,

        /// Generation endpoint override.
        #[arg(long)]
        endpoint: Option<String>,

        /// Sampling temperature (0.0-1.0).
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,

        /// Maximum output length (up to 32768).
        #[arg(long, default_value_t = 32768)]
        max_tokens: u32,
    },

    /// Add an example document from a plain-text file.
    Add {
        /// Plain-text file with the document to import.
        file: PathBuf,

        /// Custom file name for the stored JSON (without extension).
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing document with the same name.
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = base_config(cli.data_dir.as_deref());

    match cli.command {
        Command::Generate {
            topic,
            doc_type,
            context,
            context_text,
            prompt,
            prompt_text,
            endpoint,
            temperature,
            max_tokens,
            top_p,
            frequency_penalty,
            presence_penalty,
            save,
        } => {
            let extra_context = optional_text(context_text, context.as_deref()).await?;
            let custom_instruction = optional_text(prompt_text, prompt.as_deref()).await?;

            let options = PromptOptions {
                document_type: doc_type.clone(),
                extra_context,
                custom_instruction,
            };
            let params = SamplingParams {
                temperature,
                max_output_tokens: max_tokens,
                top_p,
                frequency_penalty,
                presence_penalty,
            };

            let mut engine = engine_with_token(config, endpoint).await?;
            println!("Generating document about: {topic}");
            let generated = engine.generate(&topic, &options, params).await?;

            println!("\n=============== GENERATED DOCUMENT ===============\n");
            println!("{generated}");
            println!("\n==================================================\n");

            if save {
                let mut document = parse_document(&generated)?;
                if document.title.is_empty() {
                    document.title = topic.clone();
                }
                if document.doc_type.is_empty() {
                    if let Some(doc_type) = doc_type {
                        document.doc_type = doc_type;
                    }
                }
                let path = engine.store().save(&document, None).await?;
                println!("Document saved to: {}", path.display());
            }
        }

        Command::Transform {
            file,
            context,
            context_text,
            endpoint,
            temperature,
            max_tokens,
        } => {
            let original = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            if original.trim().is_empty() {
                bail!("{} is empty", file.display());
            }

            let options = PromptOptions {
                extra_context: optional_text(context_text, context.as_deref()).await?,
                ..Default::default()
            };
            let params = SamplingParams {
                temperature,
                max_output_tokens: max_tokens,
                ..Default::default()
            };

            let mut engine = engine_with_token(config, endpoint).await?;
            println!("Transforming text from: {}", file.display());
            let transformed = engine.transform(&original, &options, params).await?;

            println!("\n=============== TRANSFORMED TEXT =================\n");
            println!("{transformed}");
            println!("\n==================================================\n");
        }

        Command::Add {
            file,
            name,
            overwrite,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            if content.trim().is_empty() {
                bail!("{} is empty", file.display());
            }

            let document = parse_document(&content)?;
            if document.title.is_empty() {
                eprintln!("warning: no title found in {}", file.display());
            }

            let store = DocumentStore::new(&config.documents_dir).await?;
            let file_name = name.map(|n| format!("{n}.json"));

            if let Some(ref file_name) = file_name {
                if store.path_of(file_name).exists() && !overwrite {
                    bail!("{file_name} already exists; pass --overwrite to replace it");
                }
            }

            let path = store.save(&document, file_name.as_deref()).await?;
            println!("Document saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Base pipeline configuration, honoring `--data-dir`.
fn base_config(data_dir: Option<&std::path::Path>) -> RetrievalConfig {
    match data_dir {
        Some(dir) => RetrievalConfig::new(dir),
        None => RetrievalConfig::default(),
    }
}

/// Build an engine with the generation token taken from the environment.
async fn engine_with_token(
    mut config: RetrievalConfig,
    endpoint: Option<String>,
) -> Result<StyleEngine> {
    let token = std::env::var("GITHUB_TOKEN")
        .context("the GITHUB_TOKEN environment variable is not set")?;
    config.generation.token = Some(token);
    config.generation.endpoint = endpoint;

    Ok(StyleEngine::new(config).await?)
}

/// Resolve an optional inline text / file-path pair into text.
async fn optional_text(
    inline: Option<String>,
    file: Option<&std::path::Path>,
) -> Result<Option<String>> {
    if inline.is_some() {
        return Ok(inline);
    }
    match file {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}
