use std::fmt;
use std::path::PathBuf;

/// Fully resolved description of a CUPS queue, ready to be created.
#[derive(Debug, Clone)]
pub struct QueueDefinition {
    pub name: String,
    /// `smb://[user@]server/share`, handed to the spooler verbatim.
    pub device_uri: String,
    pub driver: ResolvedDriver,
    pub description: String,
    pub location: String,
    /// Value for the `auth-info-required` queue attribute.
    pub auth_info: String,
}

/// Driver chosen for a queue: a vendor PPD found on disk, or a model
/// identifier CUPS resolves itself (the generic fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDriver {
    Ppd(PathBuf),
    Model(String),
}

impl fmt::Display for ResolvedDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedDriver::Ppd(path) => write!(f, "{}", path.display()),
            ResolvedDriver::Model(model) => write!(f, "{}", model),
        }
    }
}
