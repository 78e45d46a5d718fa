use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{commands, Cli, Commands};

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "ragbench=debug" } else { "ragbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Rank {
            query,
            corpus,
            limit,
            json,
        } => commands::run_rank(&query, &corpus, limit, json),
        Commands::Compare {
            query,
            keywords,
            backends,
            json,
        } => commands::run_compare(&query, &keywords, &backends, json).await,
        Commands::Evaluate {
            backends,
            queries,
            output,
            wait,
        } => commands::run_evaluate(&backends, queries.as_deref(), output, wait).await,
        Commands::Wait { backends, attempts } => commands::run_wait(&backends, attempts).await,
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
