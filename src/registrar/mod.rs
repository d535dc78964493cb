use log::{debug, info, warn};
use snafu::{whatever, ResultExt, Snafu};
use url::Url;

use crate::config::models::{AuthMode, Cups, PrinterSpec};
use crate::spooler::models::QueueDefinition;
use crate::spooler::{Spooler, SpoolerError};

pub mod driver;
pub mod plan;

/// Capability keys tried on every queue. Key names vary per vendor and model,
/// so these are set blind and "not supported by this driver" is treated as a
/// normal outcome rather than queried up front.
const CAPABILITY_OPTIONS: &[(&str, &str)] = &[
    ("Duplexer", "True"),
    ("OptionDuplexer", "True"),
    ("HPOption_Duplexer", "True"),
    ("Finisher", "Stapler"),
    ("StapleLocation", "SinglePortrait"),
];

/// Job template defaults forced on every queue: single-sided unless a job
/// explicitly asks for duplex.
const DEFAULT_OPTIONS: &[(&str, &str)] = &[("sides", "one-sided"), ("Duplex", "None")];

/// Per-run knobs coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    pub username: Option<String>,
    pub prompt_now: bool,
}

/// Outcome of one registration. A queue with skipped optional settings is
/// still a successfully registered queue.
#[derive(Debug)]
pub struct RegisterReport {
    pub queue: String,
    pub applied_options: usize,
    pub skipped_options: usize,
}

pub struct Registrar<'a, S: Spooler> {
    spooler: &'a S,
    settings: &'a Cups,
}

impl<'a, S: Spooler> Registrar<'a, S> {
    pub fn new(spooler: &'a S, settings: &'a Cups) -> Self {
        Registrar { spooler, settings }
    }

    /// Ensures the queue for `spec` exists and matches the configuration.
    ///
    /// The queue is removed and recreated rather than mutated in place, so a
    /// second run converges to the same state as the first. Only queue
    /// creation is fatal; every other step is logged and skipped on failure.
    pub fn register(
        &self,
        spec: &PrinterSpec,
        options: &RegisterOptions,
    ) -> Result<RegisterReport, RegisterError> {
        let queue = build_queue(spec, self.settings, options)?;
        info!(
            "Registering `{}` -> {} (driver: {})",
            queue.name, queue.device_uri, queue.driver
        );

        best_effort("remove stale queue", &queue.name, self.spooler.remove_queue(&queue.name));

        self.spooler
            .create_queue(&queue)
            .context(QueueCreateSnafu { queue: queue.name.clone() })?;

        best_effort("accept jobs", &queue.name, self.spooler.accept_jobs(&queue.name));
        best_effort("enable queue", &queue.name, self.spooler.enable_queue(&queue.name));

        let mut applied = 0usize;
        let mut skipped = 0usize;
        for (key, value) in DEFAULT_OPTIONS {
            tally(
                &mut applied,
                &mut skipped,
                &queue.name,
                key,
                self.spooler.set_default_option(&queue.name, key, value),
            );
        }
        for (key, value) in CAPABILITY_OPTIONS {
            tally(
                &mut applied,
                &mut skipped,
                &queue.name,
                key,
                self.spooler.set_option(&queue.name, key, value),
            );
        }
        for raw in &spec.options {
            let (key, value) = split_option(raw);
            tally(
                &mut applied,
                &mut skipped,
                &queue.name,
                key,
                self.spooler.set_option(&queue.name, key, value),
            );
        }

        if options.prompt_now || spec.auth == AuthMode::PromptNow {
            best_effort(
                "submit credential probe",
                &queue.name,
                self.spooler.submit_probe_job(&queue.name),
            );
        }

        Ok(RegisterReport {
            queue: queue.name,
            applied_options: applied,
            skipped_options: skipped,
        })
    }

    /// Removes the queue for `spec`. Never fatal: the queue may simply not
    /// exist any more.
    pub fn unregister(&self, spec: &PrinterSpec) {
        let name = spec.queue_name();
        match self.spooler.remove_queue(&name) {
            Ok(()) => info!("Removed queue `{name}`"),
            Err(e) => warn!("Could not remove queue `{name}`: {e}"),
        }
    }
}

/// Resolves a printer spec into the queue the spooler should end up with.
pub fn build_queue(
    spec: &PrinterSpec,
    settings: &Cups,
    options: &RegisterOptions,
) -> Result<QueueDefinition, RegisterError> {
    Ok(QueueDefinition {
        name: spec.queue_name(),
        device_uri: build_device_uri(&settings.server, &spec.share, options.username.as_deref())?,
        driver: driver::resolve_driver(&spec.drivers, &settings.generic_driver),
        description: spec.description.clone(),
        location: spec.location.clone(),
        // Both auth modes cache SMB credentials via the spooler; PromptNow
        // only changes when the dialog appears.
        auth_info: "username,password".to_string(),
    })
}

/// Builds `smb://[user@]server/share`. CUPS dereferences the URI itself; this
/// tool never speaks SMB.
pub fn build_device_uri(
    server: &str,
    share: &str,
    username: Option<&str>,
) -> Result<String, RegisterError> {
    let mut url = Url::parse(&format!("smb://{server}/"))
        .with_whatever_context(|_| format!("Invalid SMB server name `{server}`"))?;
    if let Some(username) = username {
        if !username.is_empty() && url.set_username(username).is_err() {
            whatever!("Could not embed username `{username}` in the device URI for `{server}`");
        }
    }
    let url = url
        .join(share)
        .with_whatever_context(|_| format!("Invalid share name `{share}`"))?;
    Ok(url.to_string())
}

fn best_effort(what: &str, queue: &str, result: Result<(), SpoolerError>) {
    if let Err(e) = result {
        debug!("Skipping `{what}` for `{queue}`: {e}");
    }
}

fn tally(
    applied: &mut usize,
    skipped: &mut usize,
    queue: &str,
    key: &str,
    result: Result<(), SpoolerError>,
) {
    match result {
        Ok(()) => *applied += 1,
        Err(e) => {
            debug!("Option `{key}` not applied on `{queue}`: {e}");
            *skipped += 1;
        }
    }
}

/// `"Finisher=Stapler"` -> `("Finisher", "Stapler")`. A bare key is treated
/// as a boolean PPD option.
fn split_option(raw: &str) -> (&str, &str) {
    raw.split_once('=').unwrap_or((raw, "True"))
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum RegisterError {
    #[snafu(display("could not create queue `{queue}`: {source}"))]
    QueueCreate { queue: String, source: SpoolerError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
