use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use pressdigest::pipeline::RunOutcome;
use pressdigest::web::{AppState, WebServer};
use pressdigest::{
    start_scheduler, Config, CredentialStore, DigestPipeline, DigestScheduler, DoorayClient,
    TaskStore,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, env = "PRESSDIGEST_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current digest without publishing it.
    Preview,
    /// Run stored tasks once.
    Run {
        /// Run only this task.
        #[arg(long)]
        task: Option<String>,
    },
    /// Publish every stored task daily at the configured time.
    Schedule,
    /// Serve the admin API alongside the daily scheduler.
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = pressdigest::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        pressdigest::logging::init_console_only(&config.logging.level);
    }

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: Config) -> pressdigest::Result<ExitCode> {
    config.validate()?;

    let credentials = Arc::new(CredentialStore::load_or_empty(&config.secrets.path)?);
    let pipeline = Arc::new(DigestPipeline::from_config(&config, credentials)?);
    let store = TaskStore::new(&config.tasks.dir);

    match command {
        Command::Preview => {
            let outcome = pipeline.run(pipeline.now(), None).await;
            Ok(report(&outcome))
        }
        Command::Run { task: Some(name) } => {
            let task = store.load(&name)?;
            let outcome = pipeline.run(pipeline.now(), Some(&task)).await;
            Ok(report(&outcome))
        }
        Command::Run { task: None } => {
            let scheduler = DigestScheduler::new(pipeline.clone(), store, config.schedule.at()?);
            let cycle = scheduler.run_cycle(pipeline.now()).await;
            for run in &cycle.runs {
                println!("[{}] {}", run.task, status_line(&run.outcome));
            }
            if cycle.collected > 0 && cycle.succeeded() == cycle.runs.len() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Schedule => {
            let scheduler = DigestScheduler::new(pipeline, store, config.schedule.at()?);
            scheduler.run().await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve => {
            let scheduler =
                DigestScheduler::new(pipeline.clone(), store.clone(), config.schedule.at()?);
            let _scheduler = start_scheduler(scheduler);

            let dooray = DoorayClient::new(&config.dooray)?;
            let state = Arc::new(AppState::new(pipeline, store, dooray));
            let server = WebServer::new(&config.web, state)?;
            info!("Admin API configured on {}", server.addr());
            server.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print an outcome and map it to an exit code.
fn report(outcome: &RunOutcome) -> ExitCode {
    if outcome.success {
        println!("{}", outcome.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", outcome.message);
        ExitCode::FAILURE
    }
}

fn status_line(outcome: &RunOutcome) -> String {
    if outcome.success {
        format!("ok: {}", outcome.message.lines().next().unwrap_or_default())
    } else {
        format!("failed: {}", outcome.message)
    }
}
