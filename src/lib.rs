pub mod cli;
pub mod config;
pub mod data;
pub mod describe;
pub mod detector;
pub mod error;
pub mod field;
pub mod fields;
pub mod io_utils;
pub mod schema;
pub mod scorer;
pub mod table;
pub mod types;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::DetectorConfig,
    data::{Cell, Value},
    detector::Detector,
    error::{CellError, Error},
    field::{Field, FieldType},
    schema::Schema,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("table_detector", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Describe(args) => describe::execute(&args),
        Commands::Fields(args) => fields::execute(&args),
    }
}
