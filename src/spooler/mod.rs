use snafu::Snafu;

use self::models::QueueDefinition;

pub mod client;
pub mod models;

/// Admin surface of the local print spooler.
///
/// The real implementation shells out to the CUPS admin tools; tests use an
/// in-memory fake to observe the exact call sequence. The spooler's own queue
/// database is the only state there is, so every operation is a plain
/// fire-and-forget mutation.
pub trait Spooler {
    fn remove_queue(&self, name: &str) -> Result<(), SpoolerError>;
    fn create_queue(&self, queue: &QueueDefinition) -> Result<(), SpoolerError>;
    fn accept_jobs(&self, name: &str) -> Result<(), SpoolerError>;
    fn enable_queue(&self, name: &str) -> Result<(), SpoolerError>;
    /// Persistent driver/PPD option (`lpadmin -p name -o key=value`).
    fn set_option(&self, name: &str, key: &str, value: &str) -> Result<(), SpoolerError>;
    /// Job template default for the queue (`lpoptions -p name -o key=value`).
    fn set_default_option(&self, name: &str, key: &str, value: &str) -> Result<(), SpoolerError>;
    /// Submits and cancels a tiny held job so the spooler asks for SMB
    /// credentials right away instead of on the first real job.
    fn submit_probe_job(&self, name: &str) -> Result<(), SpoolerError>;
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum SpoolerError {
    /// Fatal for the whole run: nothing can be installed without the tool.
    #[snafu(display("required admin tool `{tool}` was not found on PATH"))]
    ToolMissing { tool: &'static str },

    #[snafu(display("`{tool}` exited with status {code}: {stderr}"))]
    CommandFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },

    #[snafu(display("could not run `{tool}`: {source}"))]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },
}
