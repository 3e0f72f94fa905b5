use clap::{CommandFactory, Parser, Subcommand};
use mullvad_helper::config;
use mullvad_helper::prompt::{FixedAnswer, Prompter, StdinPrompter};
use mullvad_helper::app::run_cli;
use mullvad_helper::{Command, Config};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mullvad-helper")]
#[command(about = "Privacy-first wrapper around the Mullvad VPN CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer yes to every prompt
    #[arg(long, global = true, conflicts_with = "no")]
    yes: bool,

    /// Answer no to every prompt
    #[arg(long, global = true)]
    no: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show VPN status and whether traffic goes through Mullvad
    Status,
    /// Connect, then verify the tunnel
    Connect,
    /// Disconnect and show status
    Disconnect,
    /// Set relay location, e.g. `set-location us sea`
    SetLocation {
        /// Country code
        country: String,
        /// Optional city code
        city: Option<String>,
    },
    /// List the preset EU countries
    EuList,
    /// Connect to an EU country (random if omitted)
    EuConnect {
        /// Country code from `eu-list`
        country: Option<String>,
    },
    /// Write a default config file
    Init,
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        Some(match self {
            Commands::Status => Command::Status,
            Commands::Connect => Command::Connect,
            Commands::Disconnect => Command::Disconnect,
            Commands::SetLocation { country, city } => Command::SetLocation { country, city },
            Commands::EuList => Command::EuList,
            Commands::EuConnect { country } => Command::EuConnect { country },
            Commands::Init => return None,
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean on stdout
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            fail(e);
        }
        println!();
        return;
    };

    let dir = config::config_dir().unwrap_or_else(|e| fail(e));

    let Some(command) = command.into_command() else {
        info!("Generating default config...");
        match config::write_default(&dir) {
            Ok(path) => println!("Created default config: {}", path.display()),
            Err(e) => fail(e),
        }
        return;
    };

    let config = Config::resolve(&dir).unwrap_or_else(|e| fail(e));

    let prompter: Box<dyn Prompter> = if cli.yes {
        Box::new(FixedAnswer(true))
    } else if cli.no {
        Box::new(FixedAnswer(false))
    } else {
        Box::new(StdinPrompter::new())
    };

    if let Err(e) = run_cli(&config, &dir, prompter.as_ref(), command).await {
        fail(e);
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    error!("{}", e);
    std::process::exit(1);
}
