// Command-line front end for the Ontario tenancy law assistant
use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use tokio::io::BufReader;

use tenancy_assistant::{
    create_chat_model, read_contract, read_contract_from, ChatSession, LawText, LegalAssistant,
    Provider, Settings,
};

#[derive(Parser)]
#[command(
    name = "tenancy-assistant",
    version,
    about = "Ask about Ontario tenancy law and check rental contracts for compliance"
)]
struct Cli {
    /// Configuration file (defaults to ./tenancy-assistant.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// LLM provider: openai, groq, anthropic or gemini
    #[arg(long, global = true)]
    provider: Option<Provider>,

    /// Model name for the selected provider
    #[arg(long, global = true)]
    model: Option<String>,

    /// Replace the bundled law digest with this file
    #[arg(long, global = true)]
    law_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive chat; /clear resets history, /exit quits
    Chat,
    /// Analyze a rental contract (plain text) for compliance
    Analyze {
        /// Contract file (.txt or .md); reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = load_settings(&cli)?;
    let assistant = build_assistant(&settings)?;

    match cli.command {
        Command::Ask { question } => {
            let question = question.join(" ");
            let answer = assistant.get_response(&question, "").await?;
            println!("{}", answer);
        }
        Command::Chat => run_chat(&assistant).await?,
        Command::Analyze { file, output } => {
            let contract_text = match file {
                Some(path) => read_contract(&path)?,
                None => read_contract_from(std::io::stdin().lock())?,
            };
            let report = assistant.analyze_contract(&contract_text).await?;
            println!("{}", report);

            if let Some(path) = output {
                tokio::fs::write(&path, &report)
                    .await
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!("Report saved to {}", path.display());
            }
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Error> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(provider) = cli.provider {
        settings.provider = provider;
    }
    if let Some(model) = &cli.model {
        settings.providers.get_mut(settings.provider).model = Some(model.clone());
    }
    if let Some(path) = &cli.law_file {
        settings.law_text_path = Some(path.clone());
    }
    Ok(settings)
}

fn build_assistant(settings: &Settings) -> Result<LegalAssistant, Error> {
    let model = create_chat_model(settings.provider, settings)?;
    let law_text = match &settings.law_text_path {
        Some(path) => LawText::from_file(path)?,
        None => LawText::builtin(),
    };
    Ok(LegalAssistant::new(model, law_text))
}

async fn run_chat(assistant: &LegalAssistant) -> Result<(), Error> {
    let model = assistant.model();
    println!(
        "Ontario Tenancy Law Assistant ({} / {})",
        model.provider(),
        model.model_name()
    );
    println!(
        "Ask about Ontario tenancy law. Type /clear to reset the conversation, /exit to quit."
    );
    println!("This tool provides information, not legal advice.\n");

    let input = BufReader::new(tokio::io::stdin());
    ChatSession::new()
        .run(assistant, input, std::io::stdout())
        .await
}
