//! Command line configuration
//!
//! Every flag has a default and can also be set through a `PIAB_*`
//! environment variable.

use crate::controller::{reload_url, GenerateTarget};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "piab", author, version, about, long_about = None)]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "PIAB_BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PIAB_BIND_PORT", default_value_t = 12345)]
    pub bind_port: u16,

    /// MongoDB server
    #[arg(long, env = "PIAB_MONGO_SERVER", default_value = "mongo")]
    pub mongo_server: String,

    /// MongoDB port
    #[arg(long, env = "PIAB_MONGO_PORT", default_value_t = 27017)]
    pub mongo_port: u16,

    /// MongoDB database holding the alerts and receivers collections
    #[arg(long, env = "PIAB_MONGO_DATABASE", default_value = "piab")]
    pub mongo_database: String,

    /// Prometheus server (reloaded after receivers are generated)
    #[arg(long, env = "PIAB_PROMETHEUS_SERVER", default_value = "prometheus")]
    pub prometheus_server: String,

    /// Prometheus port
    #[arg(long, env = "PIAB_PROMETHEUS_PORT", default_value_t = 9090)]
    pub prometheus_port: u16,

    /// Alertmanager server (reloaded after alerts are generated)
    #[arg(long, env = "PIAB_ALERTMANAGER_SERVER", default_value = "alertmanager")]
    pub alertmanager_server: String,

    /// Alertmanager port
    #[arg(long, env = "PIAB_ALERTMANAGER_PORT", default_value_t = 9093)]
    pub alertmanager_port: u16,

    /// Template for the Prometheus rules file
    #[arg(
        long,
        env = "PIAB_RULES_TEMPLATE",
        default_value = "templates/prometheus.rules.tmpl"
    )]
    pub rules_template: PathBuf,

    /// Where the rendered Prometheus rules file is written
    #[arg(
        long,
        env = "PIAB_RULES_OUTPUT",
        default_value = "/opt/config/prometheus.rules"
    )]
    pub rules_output: PathBuf,

    /// Template for the Alertmanager configuration
    #[arg(
        long,
        env = "PIAB_ALERTMANAGER_TEMPLATE",
        default_value = "templates/alertmanager.yml.tmpl"
    )]
    pub alertmanager_template: PathBuf,

    /// Where the rendered Alertmanager configuration is written
    #[arg(
        long,
        env = "PIAB_ALERTMANAGER_OUTPUT",
        default_value = "/opt/config/alertmanager.yml"
    )]
    pub alertmanager_output: PathBuf,

    /// Timeout in seconds for each downstream reload call
    #[arg(long, env = "PIAB_RELOAD_TIMEOUT_SECS", default_value_t = 30)]
    pub reload_timeout_secs: u64,
}

impl Args {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    pub fn mongo_uri(&self) -> String {
        format!("mongodb://{}:{}", self.mongo_server, self.mongo_port)
    }

    pub fn reload_timeout(&self) -> Duration {
        Duration::from_secs(self.reload_timeout_secs)
    }

    /// Alerts render the Prometheus rules but reload Alertmanager
    pub fn alert_target(&self) -> GenerateTarget {
        GenerateTarget {
            template: self.rules_template.clone(),
            output: self.rules_output.clone(),
            reload_url: reload_url(&self.alertmanager_server, self.alertmanager_port),
        }
    }

    /// Receivers render the Alertmanager config but reload Prometheus
    pub fn receiver_target(&self) -> GenerateTarget {
        GenerateTarget {
            template: self.alertmanager_template.clone(),
            output: self.alertmanager_output.clone(),
            reload_url: reload_url(&self.prometheus_server, self.prometheus_port),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[path = "config_test.rs"]
mod tests;
