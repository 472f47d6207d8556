//! mnemopack is a CLI tool that loads the text behind a URL into a second
//! brain and lets users talk to it.
//!
//! The tool has four commands:
//! 1. `extract` - Prints the text extracted from a web page, Google Doc or YouTube video
//! 2. `chat` - Talks to a second brain loaded from URLs, answered by an LLM model
//! 3. `talk` - Talks to a pack stored in the MnemoPack service
//! 4. `pack` - Creates, loads, updates and deletes packs

use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use llm::builder::{LLMBackend, LLMBuilder};
use log::{LevelFilter, info};
use tokio::io::BufReader;
use url::Url;

use mnemopack::{
    DataUnitType, Extractor, LocalChain, PackClient, Session,
    constants::{
        ACCESS_KEY_ENV_NAME, DEFAULT_MAX_CHARS, DEFAULT_PACK_API_URL, DEFAULT_TALK_API_URL,
        MODEL_API_KEY_ENV_NAME,
    },
    pack::DataUnit,
    repl::{self, ChatShell, describe_load},
};

/// A CLI tool to talk to a second brain built from web pages, Google Docs and YouTube videos
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from a URL and print it
    Extract {
        /// The URL of a web page, Google Docs document or YouTube video
        url: String,
        /// Maximum number of characters to accept
        #[arg(long, short, default_value_t = DEFAULT_MAX_CHARS)]
        max_chars: usize,
    },
    /// Talk to a second brain loaded from a URL, answered by an LLM model
    Chat {
        /// URL of the LLM model to use, e.g. openai://gpt-3.5-turbo
        model: String,
        /// URL to load before the chat starts (use /load <url> in the chat otherwise)
        #[arg(long, short)]
        url: Option<String>,
        /// Maximum number of characters a second brain may hold
        #[arg(long, short, default_value_t = DEFAULT_MAX_CHARS)]
        max_chars: usize,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
    },
    /// Talk to a pack stored in the MnemoPack service
    Talk {
        /// The pack ID
        pack_id: String,
        /// Base URL of the pack talk service
        #[arg(long, default_value = DEFAULT_TALK_API_URL)]
        talk_url: String,
    },
    /// Manage packs stored in the MnemoPack service
    Pack {
        /// Base URL of the pack API
        #[arg(long, default_value = DEFAULT_PACK_API_URL, global = true)]
        api_url: String,
        #[command(subcommand)]
        command: PackCommand,
    },
}

#[derive(Subcommand)]
enum PackCommand {
    /// Load a pack and print it as JSON
    Get {
        /// The pack ID
        pack_id: String,
    },
    /// Create a pack, or update it when an ID is given
    Save {
        /// Pack data: a URL for public_url packs, the text itself for text packs
        data: String,
        /// ID of the pack to update
        #[arg(long)]
        id: Option<String>,
        /// Pack type: "public_url" (default) or "text"
        #[arg(long = "type", short = 't', default_value = "public_url")]
        kind: DataUnitType,
        /// Access key of the pack (defaults to MNEMOPACK_ACCESS_KEY)
        #[arg(long, short)]
        access_key: Option<String>,
    },
    /// Delete a pack
    Delete {
        /// The pack ID
        pack_id: String,
        /// Access key of the pack (defaults to MNEMOPACK_ACCESS_KEY)
        #[arg(long, short)]
        access_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Extract { url, max_chars } => handle_extract_command(&url, max_chars).await,
        Command::Chat {
            model,
            url,
            max_chars,
            prompt_file,
        } => handle_chat_command(model, url, max_chars, prompt_file).await,
        Command::Talk { pack_id, talk_url } => handle_talk_command(&pack_id, &talk_url).await,
        Command::Pack { api_url, command } => handle_pack_command(&api_url, command).await,
    }
}

async fn handle_extract_command(url: &str, max_chars: usize) -> Result<()> {
    let extractor = Extractor::new()?;
    let text = extractor
        .extract(url, max_chars)
        .await
        .with_context(|| format!("Unable to extract text from {url}"))?;

    println!("{text}");
    Ok(())
}

async fn handle_chat_command(
    model: String,
    url: Option<String>,
    max_chars: usize,
    prompt_file: Option<String>,
) -> Result<()> {
    let model = build_model(&model)?
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))?;

    let prompt_template = match prompt_file {
        Some(file) => {
            let content =
                fs::read_to_string(&file).context(format!("Failed to read prompt file: {file}"))?;
            Some(content)
        }
        None => None,
    };

    let extractor = Extractor::new()?;
    let chain = LocalChain {
        model: model.as_ref(),
        prompt_template: prompt_template.as_deref(),
    };

    let mut session = Session::new(max_chars);
    if let Some(url) = url {
        println!("{}", describe_load(&session.load(&extractor, &url).await));
    }

    println!("Talk to the second brain. Commands: /load <url>, /clear, /quit");
    let shell = ChatShell {
        extractor: Some(&extractor),
        backend: &chain,
    };
    repl::run(
        &mut session,
        &shell,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
    )
    .await
}

async fn handle_talk_command(pack_id: &str, talk_url: &str) -> Result<()> {
    if pack_id.trim().is_empty() {
        bail!("Please specify the pack ID");
    }

    let client = PackClient::new()?.with_talk_url(talk_url);
    let mut session = Session::new(DEFAULT_MAX_CHARS);
    session.attach_pack(pack_id);

    println!("Talk to MnemoPack {pack_id}. Commands: /clear, /quit");
    let shell = ChatShell {
        extractor: None,
        backend: &client,
    };
    repl::run(
        &mut session,
        &shell,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
    )
    .await
}

async fn handle_pack_command(api_url: &str, command: PackCommand) -> Result<()> {
    let client = PackClient::new()?.with_api_url(api_url);

    match command {
        PackCommand::Get { pack_id } => match client.get_pack(&pack_id).await? {
            Some(pack) => println!("{}", serde_json::to_string_pretty(&pack)?),
            None => bail!("Failed to load pack {pack_id}"),
        },
        PackCommand::Save {
            data,
            id,
            kind,
            access_key,
        } => {
            let access_key = access_key.or_else(|| std::env::var(ACCESS_KEY_ENV_NAME).ok());
            let credentials = client
                .save_pack(id.as_deref(), access_key.as_deref(), DataUnit { kind, data })
                .await?;
            println!("{}", serde_json::to_string_pretty(&credentials)?);
        }
        PackCommand::Delete {
            pack_id,
            access_key,
        } => {
            let access_key = access_key
                .or_else(|| std::env::var(ACCESS_KEY_ENV_NAME).ok())
                .context("Access key is required to delete a pack")?;
            if !client.delete_pack(&pack_id, &access_key).await? {
                bail!("Failed to delete pack {pack_id}");
            }
            println!("Deleted pack {pack_id}");
        }
    }

    Ok(())
}

fn build_model(model: &str) -> Result<LLMBuilder> {
    let model_url = Url::parse(model).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;
    let llm_builder = LLMBuilder::new()
        .backend(
            LLMBackend::from_str(model_url.scheme())
                .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
        )
        .model(
            [
                model_url
                    .host_str()
                    .context("Specify model name as host URL.")?,
                model_url.username(),
            ]
            .iter()
            .filter(|x| !x.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(":"),
        )
        .temperature(0.3);

    Ok(match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => {
            info!("API key is provided via {MODEL_API_KEY_ENV_NAME}");
            llm_builder.api_key(model_key)
        }
        Err(err) => {
            info!("{err} while providing api key");
            llm_builder
        }
    })
}
