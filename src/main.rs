use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tasktrack::commands::check;
use tasktrack::config::{DEFAULT_DATA_FILE, ServerConfig};
use tasktrack::error::Result;
use tasktrack::output::{self, Format};
use tasktrack::server;
use tasktrack::store::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "tasktrack",
    version,
    about = "Task tracker HTTP API backed by a JSON document"
)]
struct Cli {
    /// Output format for reports and errors
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the task API
    Serve(ServerConfig),
    /// Inspect the task document and report whether it is usable
    Check {
        /// Path of the JSON task document
        #[arg(long, env = "TASKS_FILE", default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Returns the process exit code.
fn run(command: Commands, format: Format) -> Result<i32> {
    match command {
        Commands::Serve(config) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(config))?;
            Ok(0)
        }
        Commands::Check { data_file } => {
            let report = check::run(&JsonFileStore::new(data_file))?;
            output::print_check(&report, format)?;
            Ok(if report.is_healthy() { 0 } else { 1 })
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli.command, cli.format) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match cli.format {
                Format::Json => {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "error": e.code(),
                            "message": e.to_string()
                        })
                    );
                }
                Format::Pretty => eprintln!("error: {e}"),
            }
            std::process::exit(1);
        }
    }
}
