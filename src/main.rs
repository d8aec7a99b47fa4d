use appstrap::runner::RunnerError;
use appstrap::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;

#[derive(Parser)]
#[command(name = "appstrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clone, install, build, and launch an app template", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the app template (skipping finished steps) and launch it
    Start {
        /// Port to serve on (default 2002, configurable)
        port: Option<u16>,
    },

    /// Show which provisioning steps have completed
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {}", e).red());

        // A failed launch exits with the application's own code; anything
        // else (a failed provisioning step) exits 1.
        let code = e
            .downcast_ref::<RunnerError>()
            .and_then(RunnerError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Start { port } => {
            appstrap::cli::start::run(port).await?;
        }

        Commands::Status { json } => {
            appstrap::cli::status::run(json)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "appstrap", &mut io::stdout());
        }
    }

    Ok(())
}
