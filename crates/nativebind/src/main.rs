// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use colored::Colorize;
use log::{debug, LevelFilter};
use nativebind::{BuildOptions, Builder};
use simplelog::{Config, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Generates native glue for classes described by descriptor files and builds it into shared libraries",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// TOML file with build options; command line values are layered on top
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// Log debug output, including every option and tool invocation
    #[clap(long, short = 'v')]
    pub verbose: bool,

    #[clap(flatten)]
    pub build_options: BuildOptions,
}

async fn run(args: Args) -> anyhow::Result<()> {
    let options = match &args.config {
        Some(path) => BuildOptions::from_toml_file(path)?.overlay(args.build_options),
        None => args.build_options,
    };
    Builder::new(options).execute().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed);

    debug!("nativebind CLI version: {}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(_) => (),
        Err(err) => {
            let err = format!("{:?}", err);
            println!("{}", err.bold().red());
            std::process::exit(1);
        }
    }
}
