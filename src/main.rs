use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "leadgate")]
#[command(about = "Submission-defense gateway for the author site lead forms")]
struct Cli {
    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    #[command(name = "start")]
    Start,
    /// Validate environment configuration and print the result
    #[command(name = "check-env")]
    CheckEnv,
}

fn init_logging(json: bool, log_level: &str) {
    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("leadgate=info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = leadgate::env::get_config();
            init_logging(cli.json_logs, &config.log_level);
            leadgate::server::start_server(config).await;
        }
        Commands::CheckEnv => {
            let result = leadgate::env::validate_environment();
            let failed = result.is_err();
            leadgate::env::print_validation_results(&result);
            if failed {
                std::process::exit(1);
            }
        }
    }
}
