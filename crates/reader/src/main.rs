mod config;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use extract::{ChapterInput, OllamaClient, ReadChapterAgent};
use std::path::PathBuf;
use store::{ChapterReader, InMemoryResponseStore};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LoggingConfig};

/// Read a chapter and print its summary and extracted entities as JSON.
#[derive(Parser)]
#[command(name = "read_chapter", version)]
struct Cli {
    /// Chapter file (.txt or .md)
    chapter: PathBuf,

    /// Chapter title; defaults to the file name
    #[arg(long)]
    title: Option<String>,

    /// File holding a summary of the story so far
    #[arg(long)]
    story_so_far: Option<PathBuf>,

    /// File holding context from the previous chapter(s)
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Parse this reply instead of calling the model
    #[arg(long)]
    mock_response: Option<PathBuf>,

    /// Print the prompt and exit
    #[arg(long)]
    print_prompt: bool,

    /// Print the stored payload instead of the parsed response
    #[arg(long)]
    payload: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let content = input::read_chapter_file(&cli.chapter).await?;
    let title = cli
        .title
        .clone()
        .unwrap_or_else(|| input::default_title(&cli.chapter));

    let mut chapter = ChapterInput::new(title, content);
    if let Some(story_so_far) = input::read_optional(cli.story_so_far.as_deref()).await? {
        chapter = chapter.with_story_so_far(story_so_far);
    }
    if let Some(previous) = input::read_optional(cli.previous.as_deref()).await? {
        chapter = chapter.with_previous_context(previous);
    }

    let agent = ReadChapterAgent::new(OllamaClient::new(config.llm.clone()));

    if cli.print_prompt {
        println!("{}", agent.prompt(&chapter));
        return Ok(());
    }

    tracing::info!(
        title = %chapter.title,
        model = %config.llm.model,
        estimated_tokens = agent.estimate_prompt_tokens(&chapter),
        "Reading chapter"
    );

    let mut reader = ChapterReader::new(agent, InMemoryResponseStore::new());
    let stored = match input::read_optional(cli.mock_response.as_deref()).await? {
        Some(reply) => reader.read_canned(&reply, &chapter).await?,
        None => reader.read(&chapter).await?,
    };

    if cli.payload {
        let payload = reader
            .store()
            .get(&stored.id)
            .context(format!("Payload {} missing from store", stored.id))?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&stored.response)?);
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
