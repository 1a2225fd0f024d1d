use clap::{Args, Parser, Subcommand};
use pedot_dash::{download_dataset, Dataset, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pedot-dash")]
#[command(author, version, about = "Interactive dashboard for the PEDOT:PSS high-throughput experiment")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML config file (host, port, data_path, open_browser)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the dashboard web UI (default)
    Serve(ServeArgs),

    /// Write the downloadable CSV to a file without starting the server
    Export {
        /// Experiment CSV to load
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Where to write the CSV
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Experiment CSV to load
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Don't open the dashboard in a browser
    #[arg(long)]
    no_open: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match cli.config {
        Some(ref path) => match ServerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => ServerConfig::default(),
    };

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            if let Some(data) = args.data {
                config.data_path = data;
            }
            if let Some(host) = args.host {
                config.host = host;
            }
            if let Some(port) = args.port {
                config.port = port;
            }
            if args.no_open {
                config.open_browser = false;
            }

            // No data, no page
            let dataset = load_or_exit(&config.data_path);
            if let Err(e) = pedot_dash::serve::start(&config, Arc::new(dataset)) {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }

        Command::Export { data, output } => {
            let dataset = load_or_exit(data.as_ref().unwrap_or(&config.data_path));
            let payload = match download_dataset(&dataset, 1) {
                Ok(Some(payload)) => payload,
                Ok(None) => return,
                Err(e) => {
                    eprintln!("Failed to serialize dataset: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = std::fs::write(&output, payload.content) {
                eprintln!("Failed to write {}: {}", output.display(), e);
                std::process::exit(1);
            }
            eprintln!("\x1b[32mSaved {} rows to {}\x1b[0m", dataset.len(), output.display());
        }
    }
}

fn load_or_exit(path: &Path) -> Dataset {
    match Dataset::from_path(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Failed to load dataset: {}", e);
            std::process::exit(1);
        }
    }
}
