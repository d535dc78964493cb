use std::{path::PathBuf, time::Duration};

use convert_case::{Case, Casing};
use serde_derive::Deserialize;

use crate::registrar::driver::GENERIC_FALLBACK_DRIVER;

// When changing anything here, make sure to add
// #[serde(alias = "ihavenounderscores")]
// where needed, so it can be read from the ENV vars.

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cups: Cups,
    #[serde(default)]
    pub printers: Vec<PrinterSpec>,
    #[serde(alias = "sentrydsn")]
    pub sentry_dsn: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Cups {
    /// SMB print server every share lives on.
    #[serde(default = "default_server")]
    pub server: String,
    /// Model identifier used when no PPD candidate exists on disk.
    #[serde(alias = "genericdriver", default = "default_generic_driver")]
    pub generic_driver: String,
    /// Refresh interval for the advisory sudo keepalive thread, e.g. "50s".
    /// Off when unset.
    #[serde(alias = "sudokeepalive", default, with = "humantime_serde")]
    pub sudo_keepalive: Option<Duration>,
}

impl Default for Cups {
    fn default() -> Self {
        Cups {
            server: default_server(),
            generic_driver: default_generic_driver(),
            sudo_keepalive: None,
        }
    }
}

fn default_server() -> String {
    "localhost".to_string()
}

fn default_generic_driver() -> String {
    GENERIC_FALLBACK_DRIVER.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrinterSpec {
    /// Queue identifier; derived from the description when omitted.
    pub name: Option<String>,
    pub share: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Vendor PPD candidates, best first.
    #[serde(default)]
    pub drivers: Vec<PathBuf>,
    #[serde(default)]
    pub auth: AuthMode,
    /// Extra `Key=Value` driver options, applied best effort after the fixed
    /// capability set. Kept as raw strings: PPD keys are case sensitive and
    /// the config layer lowercases map keys.
    #[serde(default)]
    pub options: Vec<String>,
}

impl PrinterSpec {
    /// Queue identifier as CUPS will know it. CUPS forbids spaces, `/` and
    /// `#` in queue names.
    pub fn queue_name(&self) -> String {
        let base = match &self.name {
            Some(name) => name.clone(),
            None => self.description.to_case(Case::Snake),
        };
        base.chars()
            .map(|c| if matches!(c, ' ' | '/' | '#') { '_' } else { c })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// CUPS asks for SMB credentials when the first job arrives.
    #[default]
    PromptOnFirstUse,
    /// A probe job is submitted right after registration to trigger the
    /// credential prompt immediately.
    PromptNow,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn spec(name: Option<&str>, description: &str) -> PrinterSpec {
        PrinterSpec {
            name: name.map(str::to_string),
            share: "SHARE".to_string(),
            description: description.to_string(),
            location: String::new(),
            drivers: Vec::new(),
            auth: AuthMode::default(),
            options: Vec::new(),
        }
    }

    #[test]
    fn queue_name_is_derived_from_description() {
        assert_eq!(spec(None, "Accounting Copier").queue_name(), "accounting_copier");
    }

    #[test]
    fn explicit_queue_name_wins_but_is_sanitized() {
        assert_eq!(spec(Some("Floor B/Copier #3"), "ignored").queue_name(), "Floor_B_Copier__3");
    }
}
