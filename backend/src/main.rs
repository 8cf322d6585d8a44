//! `mivo` entry-point: runs one session-core command against local storage.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use mivo_auth::inbound::cli::{self, Cli};
use mivo_auth::settings::AuthSettings;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Cli::parse();
    let settings = AuthSettings::load_from_iter([OsString::from("mivo")])
        .map_err(|error| eyre!("load MIVO settings: {error}"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async {
        let mut stdout = io::stdout().lock();
        cli::run(args, &settings, &mut stdout).await
    })
}
