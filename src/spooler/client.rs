use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use log::debug;
use snafu::ResultExt;

use super::models::{QueueDefinition, ResolvedDriver};
use super::{CommandFailedSnafu, SpawnSnafu, Spooler, SpoolerError, ToolMissingSnafu};

const LPADMIN: &str = "lpadmin";
const LPOPTIONS: &str = "lpoptions";
const CUPSACCEPT: &str = "cupsaccept";
const CUPSENABLE: &str = "cupsenable";
const LP: &str = "lp";
const CANCEL: &str = "cancel";

const ADMIN_TOOLS: [&str; 6] = [LPADMIN, LPOPTIONS, CUPSACCEPT, CUPSENABLE, LP, CANCEL];

/// Spooler implementation backed by the CUPS command line admin tools.
pub struct CupsSpooler;

impl CupsSpooler {
    /// Verifies every admin tool is on PATH before anything is mutated.
    pub fn locate() -> Result<Self, SpoolerError> {
        for tool in ADMIN_TOOLS {
            find_on_path(tool)?;
        }
        Ok(CupsSpooler)
    }
}

impl Spooler for CupsSpooler {
    fn remove_queue(&self, name: &str) -> Result<(), SpoolerError> {
        run(LPADMIN, &["-x", name])
    }

    fn create_queue(&self, queue: &QueueDefinition) -> Result<(), SpoolerError> {
        let auth = format!("auth-info-required={}", queue.auth_info);
        // -E after -p enables the queue and makes it accept jobs.
        let mut args: Vec<&str> = vec![
            "-p", queue.name.as_str(),
            "-E",
            "-v", queue.device_uri.as_str(),
            "-D", queue.description.as_str(),
            "-L", queue.location.as_str(),
            "-o", auth.as_str(),
        ];
        let ppd_path;
        match &queue.driver {
            ResolvedDriver::Ppd(path) => {
                ppd_path = path.display().to_string();
                args.push("-P");
                args.push(ppd_path.as_str());
            }
            ResolvedDriver::Model(model) => {
                args.push("-m");
                args.push(model.as_str());
            }
        }
        run(LPADMIN, &args)
    }

    fn accept_jobs(&self, name: &str) -> Result<(), SpoolerError> {
        run(CUPSACCEPT, &[name])
    }

    fn enable_queue(&self, name: &str) -> Result<(), SpoolerError> {
        run(CUPSENABLE, &[name])
    }

    fn set_option(&self, name: &str, key: &str, value: &str) -> Result<(), SpoolerError> {
        let option = format!("{key}={value}");
        run(LPADMIN, &["-p", name, "-o", &option])
    }

    fn set_default_option(&self, name: &str, key: &str, value: &str) -> Result<(), SpoolerError> {
        let option = format!("{key}={value}");
        run(LPOPTIONS, &["-p", name, "-o", &option])
    }

    fn submit_probe_job(&self, name: &str) -> Result<(), SpoolerError> {
        // A held, nearly empty job is enough to make CUPS open the credential
        // dialog; nothing ever reaches the printer. The queue was created
        // moments ago, so cancelling everything on it only removes the probe.
        let mut child = Command::new(LP)
            .args(["-d", name, "-t", "credential probe", "-o", "job-hold-until=indefinite", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context(SpawnSnafu { tool: LP })?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(b"\n").context(SpawnSnafu { tool: LP })?;
        }
        let output = child.wait_with_output().context(SpawnSnafu { tool: LP })?;
        check_status(LP, &output.stderr, output.status)?;

        run(CANCEL, &["-a", name])
    }
}

fn find_on_path(tool: &'static str) -> Result<(), SpoolerError> {
    let path = env::var_os("PATH").unwrap_or_default();
    let found = env::split_paths(&path).any(|dir| dir.join(tool).is_file());
    if found {
        Ok(())
    } else {
        ToolMissingSnafu { tool }.fail()
    }
}

fn run(tool: &'static str, args: &[&str]) -> Result<(), SpoolerError> {
    debug!("Running: {} {}", tool, args.join(" "));
    let output = Command::new(tool)
        .args(args)
        .output()
        .context(SpawnSnafu { tool })?;
    check_status(tool, &output.stderr, output.status)
}

fn check_status(
    tool: &'static str,
    stderr: &[u8],
    status: std::process::ExitStatus,
) -> Result<(), SpoolerError> {
    if status.success() {
        return Ok(());
    }
    CommandFailedSnafu {
        tool,
        code: status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    }
    .fail()
}
