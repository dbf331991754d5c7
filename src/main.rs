#![warn(unused_extern_crates)]

mod cmd;
mod commands;
mod config;
mod credential_providers;
mod presign;
mod token;
mod types;

use clap::Parser;
use cmd::Cli;
use config::TokenConfig;
use credential_providers::sdk::SdkCredentialProvider;
use log::LevelFilter;
use std::process::ExitCode;

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let config = TokenConfig::from(cli);

    match commands::eks::exec_eks(SdkCredentialProvider, &config, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
