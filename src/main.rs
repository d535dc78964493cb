use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};

use crate::cli::{Cli, Commands};
use crate::config::models::Settings;
use crate::keepalive::SudoKeepalive;
use crate::registrar::{RegisterOptions, Registrar};
use crate::spooler::client::CupsSpooler;

mod cli;
mod config;
mod keepalive;
mod registrar;
mod spooler;

fn main() -> ExitCode {
    colog::init();

    let cli = Cli::parse();
    let settings = match crate::config::loading::load_config(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Could not load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = init_sentry(&settings);

    let options = RegisterOptions {
        username: cli.username.clone(),
        prompt_now: cli.prompt_now,
    };

    match cli.command.unwrap_or_default() {
        Commands::Install => install(&settings, &options),
        Commands::Uninstall => uninstall(&settings),
        Commands::Plan => plan(&settings, &options),
    }
}

fn install(settings: &Settings, options: &RegisterOptions) -> ExitCode {
    let spooler = match CupsSpooler::locate() {
        Ok(spooler) => spooler,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _keepalive = settings.cups.sudo_keepalive.map(SudoKeepalive::start);

    let started = Instant::now();
    info!(
        "Registering {} printer(s), run started at {}",
        settings.printers.len(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let registrar = Registrar::new(&spooler, &settings.cups);
    let mut failures = 0usize;
    for spec in &settings.printers {
        match registrar.register(spec, options) {
            Ok(report) => info!(
                "Registered `{}` ({} optional settings applied, {} skipped)",
                report.queue, report.applied_options, report.skipped_options
            ),
            Err(e) => {
                error!("{e}");
                failures += 1;
            }
        }
    }

    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    info!(
        "Done in {} ({} registered, {} failed)",
        humantime::format_duration(elapsed),
        settings.printers.len() - failures,
        failures
    );

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn uninstall(settings: &Settings) -> ExitCode {
    let spooler = match CupsSpooler::locate() {
        Ok(spooler) => spooler,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let registrar = Registrar::new(&spooler, &settings.cups);
    for spec in &settings.printers {
        registrar.unregister(spec);
    }
    ExitCode::SUCCESS
}

fn plan(settings: &Settings, options: &RegisterOptions) -> ExitCode {
    match registrar::plan::render_plan(settings, options) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Could not render install plan: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref().filter(|dsn| !dsn.is_empty())?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
