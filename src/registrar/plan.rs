use chrono::Local;
use serde::Serialize;
use snafu::ResultExt;

use crate::config::models::Settings;

use super::{
    build_queue, split_option, RegisterError, RegisterOptions, CAPABILITY_OPTIONS, DEFAULT_OPTIONS,
};

// //////////////////// //
// Install plan (JSON)  //
// //////////////////// //

#[derive(Debug, Serialize)]
pub struct InstallPlan {
    pub generated_at: String,
    pub generic_driver: String,
    pub queues: Vec<PlannedQueue>,
}

#[derive(Debug, Serialize)]
pub struct PlannedQueue {
    pub name: String,
    pub device_uri: String,
    pub driver: String,
    pub description: String,
    pub location: String,
    pub auth_info: String,
    pub default_options: Vec<PlannedOption>,
    pub capability_options: Vec<PlannedOption>,
}

#[derive(Debug, Serialize)]
pub struct PlannedOption {
    pub key: String,
    pub value: String,
}

impl PlannedOption {
    fn new(key: &str, value: &str) -> Self {
        PlannedOption {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Renders what an install run would do, as pretty-printed JSON. Drivers are
/// resolved against the local filesystem exactly as `install` would resolve
/// them; the spooler is never touched.
pub fn render_plan(settings: &Settings, options: &RegisterOptions) -> Result<String, RegisterError> {
    let mut queues = Vec::new();
    for spec in &settings.printers {
        let queue = build_queue(spec, &settings.cups, options)?;

        let capability_options = CAPABILITY_OPTIONS
            .iter()
            .map(|(key, value)| PlannedOption::new(key, value))
            .chain(spec.options.iter().map(|raw| {
                let (key, value) = split_option(raw);
                PlannedOption::new(key, value)
            }))
            .collect();

        queues.push(PlannedQueue {
            name: queue.name,
            device_uri: queue.device_uri,
            driver: queue.driver.to_string(),
            description: queue.description,
            location: queue.location,
            auth_info: queue.auth_info,
            default_options: DEFAULT_OPTIONS
                .iter()
                .map(|(key, value)| PlannedOption::new(key, value))
                .collect(),
            capability_options,
        });
    }

    let plan = InstallPlan {
        generated_at: Local::now().to_rfc3339(),
        generic_driver: settings.cups.generic_driver.clone(),
        queues,
    };
    serde_json::to_string_pretty(&plan).whatever_context("Could not serialize install plan")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::config::models::{AuthMode, Cups, PrinterSpec, Settings};
    use crate::registrar::driver::GENERIC_FALLBACK_DRIVER;

    use super::*;

    fn settings() -> Settings {
        Settings {
            cups: Cups {
                server: "printsrv".to_string(),
                ..Cups::default()
            },
            printers: vec![PrinterSpec {
                name: None,
                share: "LOBBY_MFP".to_string(),
                description: "Lobby Printer".to_string(),
                location: "Lobby".to_string(),
                drivers: vec!["/nope/vendor.ppd".into()],
                auth: AuthMode::PromptOnFirstUse,
                options: vec!["PageSize=A4".to_string()],
            }],
            sentry_dsn: None,
        }
    }

    #[test]
    fn plan_resolves_queues_without_a_spooler() {
        let rendered = render_plan(&settings(), &RegisterOptions::default()).unwrap();
        let plan: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let queue = &plan["queues"][0];
        assert_eq!(queue["name"], "lobby_printer");
        assert_eq!(queue["device_uri"], "smb://printsrv/LOBBY_MFP");
        assert_eq!(queue["driver"], GENERIC_FALLBACK_DRIVER);
        assert_eq!(queue["default_options"][0]["key"], "sides");
        assert_eq!(queue["default_options"][0]["value"], "one-sided");
    }

    #[test]
    fn plan_honours_the_username_override() {
        let options = RegisterOptions {
            username: Some("svc-print".to_string()),
            prompt_now: false,
        };
        let rendered = render_plan(&settings(), &options).unwrap();
        let plan: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(plan["queues"][0]["device_uri"], "smb://svc-print@printsrv/LOBBY_MFP");
    }
}
