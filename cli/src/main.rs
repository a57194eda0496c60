use clap::{Parser, Subcommand};

mod commands;
mod util;

use breathwork_core::pattern::{BoxPattern, PatternVariant, ThreePhasePattern, TwoPhasePattern};
use commands::pattern::PatternKind;

#[derive(Parser)]
#[command(name = "breathwork", version, about = "Breathwork CLI: breathing-pattern configuration and technique recommendations")]
struct Cli {
    /// API base URL
    #[arg(long, env = "BREATHWORK_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health and which recommendation path is active
    Health,
    /// Active configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Pattern variants
    Pattern {
        #[command(subcommand)]
        command: PatternCommands,
    },
    /// List the emotion to technique catalog
    Catalog {
        /// Only the entry for this label (e.g. "Sleepy / Drowsy")
        #[arg(long)]
        emotion: Option<String>,
    },
    /// Companion chat; each --message is one user turn
    Chat {
        #[arg(long = "message", required = true)]
        messages: Vec<String>,
        /// Model override for the remote provider
        #[arg(long)]
        model: Option<String>,
    },
    /// Recommend a technique for a conversation; each --line is one user line
    Chatbot {
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the active configuration snapshot
    Get,
    /// Apply a combined update (all or nothing)
    Set {
        #[arg(long)]
        box_scale: Option<f64>,
        /// Fixed cycle length; clears the active pattern variant
        #[arg(long)]
        cycle_seconds: Option<f64>,
    },
}

#[derive(Subcommand)]
enum PatternCommands {
    /// Show a variant slot
    Get {
        #[arg(value_enum)]
        kind: PatternKind,
    },
    /// Activate a four-phase box pattern
    Box {
        #[arg(long)]
        inhale: f64,
        #[arg(long, default_value_t = 4.0)]
        hold1: f64,
        #[arg(long)]
        exhale: f64,
        #[arg(long, default_value_t = 4.0)]
        hold2: f64,
    },
    /// Activate an inhale-hold-exhale pattern
    Three {
        #[arg(long)]
        inhale: f64,
        #[arg(long, default_value_t = 4.0)]
        hold: f64,
        #[arg(long)]
        exhale: f64,
    },
    /// Activate an inhale-exhale pattern
    Two {
        #[arg(long)]
        inhale: f64,
        #[arg(long)]
        exhale: f64,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let api_url = cli.api_url.as_str();

    let code = match cli.command {
        Commands::Health => commands::health::run(api_url).await,
        Commands::Config { command } => match command {
            ConfigCommands::Get => commands::config::get(api_url).await,
            ConfigCommands::Set {
                box_scale,
                cycle_seconds,
            } => commands::config::set(api_url, box_scale, cycle_seconds).await,
        },
        Commands::Pattern { command } => match command {
            PatternCommands::Get { kind } => commands::pattern::get(api_url, kind).await,
            PatternCommands::Box {
                inhale,
                hold1,
                exhale,
                hold2,
            } => {
                let variant = BoxPattern::new(inhale, hold1, exhale, hold2).map(PatternVariant::from);
                commands::pattern::set(api_url, variant).await
            }
            PatternCommands::Three {
                inhale,
                hold,
                exhale,
            } => {
                let variant = ThreePhasePattern::new(inhale, hold, exhale).map(PatternVariant::from);
                commands::pattern::set(api_url, variant).await
            }
            PatternCommands::Two { inhale, exhale } => {
                let variant = TwoPhasePattern::new(inhale, exhale).map(PatternVariant::from);
                commands::pattern::set(api_url, variant).await
            }
        },
        Commands::Catalog { emotion } => commands::catalog::run(api_url, emotion.as_deref()).await,
        Commands::Chat { messages, model } => commands::chat::chat(api_url, messages, model).await,
        Commands::Chatbot { lines } => commands::chat::chatbot(api_url, lines).await,
    };

    std::process::exit(code);
}
