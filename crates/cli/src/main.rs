use clap::{Parser, Subcommand};
use lib::assist::{self, StdoutSink};
use lib::llm::OpenAiClient;
use lib::prompt::PromptKind;
use lib::source::{ConversationSource, FileSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deskmate")]
#[command(about = "Deskmate CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: DESKMATE_CONFIG_PATH or ~/.deskmate/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Normalize a ticket conversation and print the messages and comments as JSON.
    Normalize {
        /// Conversation JSON (`{"ticket.conversation": [...]}` or a bare array); `-` for stdin.
        #[arg(long, short, value_name = "PATH")]
        input: PathBuf,
    },

    /// Print the transcript that would be sent to the model.
    Transcript {
        /// Conversation JSON; `-` for stdin.
        #[arg(long, short, value_name = "PATH")]
        input: PathBuf,
    },

    /// Print the chat-completion request body for a prompt kind without sending it.
    Prompt {
        /// escalation, summarize, or handoff
        #[arg(long, short)]
        kind: String,

        /// Conversation JSON; `-` for stdin.
        #[arg(long, short, value_name = "PATH")]
        input: PathBuf,

        /// Config file path (default: DESKMATE_CONFIG_PATH or ~/.deskmate/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Send the prompt to the chat-completion endpoint and print the editor-ready reply.
    Generate {
        /// escalation, summarize, or handoff
        #[arg(long, short)]
        kind: String,

        /// Conversation JSON; `-` for stdin.
        #[arg(long, short, value_name = "PATH")]
        input: PathBuf,

        /// Config file path (default: DESKMATE_CONFIG_PATH or ~/.deskmate/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Run the HTTP gateway for a helpdesk sidebar app.
    Gateway {
        /// Config file path (default: DESKMATE_CONFIG_PATH or ~/.deskmate/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from config or 15152)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("deskmate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Init { config }) => run_init(config),
        Some(Commands::Normalize { input }) => run_normalize(input).await,
        Some(Commands::Transcript { input }) => run_transcript(input).await,
        Some(Commands::Prompt {
            kind,
            input,
            config,
        }) => run_prompt(&kind, input, config).await,
        Some(Commands::Generate {
            kind,
            input,
            config,
        }) => run_generate(&kind, input, config).await,
        Some(Commands::Gateway { config, port }) => run_gateway(config, port).await,
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn fetch(input: PathBuf) -> anyhow::Result<Vec<lib::conversation::RawMessageEvent>> {
    Ok(FileSource::new(input).fetch().await?)
}

async fn run_normalize(input: PathBuf) -> anyhow::Result<()> {
    let normalized = lib::conversation::normalize(fetch(input).await?);
    println!("{}", serde_json::to_string_pretty(&normalized)?);
    Ok(())
}

async fn run_transcript(input: PathBuf) -> anyhow::Result<()> {
    let normalized = lib::conversation::normalize(fetch(input).await?);
    print!(
        "{}",
        lib::transcript::format_transcript(&normalized.messages)
    );
    Ok(())
}

async fn run_prompt(
    kind: &str,
    input: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let kind: PromptKind = kind.parse()?;
    let (config, _) = lib::config::load_config(config_path)?;
    let model = lib::config::resolve_model(&config);
    let prepared = assist::prepare(kind, fetch(input).await?, model.as_deref());
    println!("{}", serde_json::to_string_pretty(&prepared.request)?);
    Ok(())
}

async fn run_generate(
    kind: &str,
    input: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let kind: PromptKind = kind.parse()?;
    let (config, _) = lib::config::load_config(config_path)?;
    let client = OpenAiClient::new(
        lib::config::resolve_api_key(&config),
        lib::config::resolve_base_url(&config),
    )?;
    let model = lib::config::resolve_model(&config);
    let source = FileSource::new(input);
    assist::generate_and_insert(kind, &source, &client, model.as_deref(), &StdoutSink).await?;
    Ok(())
}

async fn run_gateway(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, _) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    lib::gateway::run_gateway(config).await
}
