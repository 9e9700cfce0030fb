use std::process;

use clap::Parser;
use log::{error, info};

use pixelnotes::{App, Cli, Config, FileStore, NotesController, Result, StoreAdapter};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref());
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let store = FileStore::open(&config.data_dir)?;
    let adapter = StoreAdapter::new(store)
        .with_keys(config.storage_keys())
        .with_seed(config.seed_on_first_run)
        .with_default_view_mode(config.default_view_mode);

    let mut app = App::new(NotesController::load(adapter), cli.verbose);
    app.run(cli.command)
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    info!("Application shutting down");
}
