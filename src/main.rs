use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use taskr::cli::{Args, ConfigDiscovery, ExecutionMode, TaskrConfig};
use taskr::list::{ListOptions, Lister};
use taskr::taskfile::{self, Taskfile};
use taskr::{TimestampOracle, env};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so listings on stdout stay machine-readable
    let default_filter = if args.verbose { "taskr=debug" } else { "taskr=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    debug!("Parsed arguments: {:?}", args);

    let config = ConfigDiscovery::discover_config(args.config.as_deref())?;

    match args.mode(&config) {
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
        ExecutionMode::ListNames { all } => {
            let taskfile = load_taskfile(&args)?;
            let lister = Lister::new(&taskfile).with_sorter(args.sorter(&config));
            let mut stdout = io::stdout().lock();
            lister.list_task_names(all, &mut stdout)?;
            Ok(())
        }
        ExecutionMode::List(options) => run_list_mode(&args, &config, &options).await,
    }
}

fn load_taskfile(args: &Args) -> Result<Taskfile> {
    let path = match &args.taskfile {
        Some(path) => path.clone(),
        None => {
            let current_dir = std::env::current_dir().context("failed to read current directory")?;
            taskfile::discover(&current_dir)?
        }
    };
    Ok(Taskfile::load(path)?)
}

async fn run_list_mode(args: &Args, config: &TaskrConfig, options: &ListOptions) -> Result<()> {
    let taskfile = load_taskfile(args)?;
    let oracle = TimestampOracle::new(taskfile.dir());
    let temp_dir: PathBuf = config
        .temp_dir
        .clone()
        .unwrap_or_else(|| env::fingerprint_dir_path(taskfile.dir()));

    let lister = Lister::new(&taskfile)
        .with_oracle(&oracle)
        .with_sorter(args.sorter(config))
        .with_default_group(config.default_group.as_str())
        .with_temp_dir(temp_dir)
        .with_dry(args.dry);

    let mut stdout = io::stdout();
    let outcome = lister.list_tasks(options, &mut stdout).await?;
    stdout.flush()?;

    info!("Listing finished: {:?}", outcome);
    Ok(())
}
