// Command-line surface and the per-run session configuration.
//
// Flags are optional: anything not given on the command line is prompted
// for by `ui::collect_session`. The resulting `SessionConfig` is passed
// explicitly to the client and the submitters.

use clap::{Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Provision Cisco ISE guest users from a CSV file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,

    /// ISE host including scheme, e.g. https://ise.example.com
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// ERS API username
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// ERS API password; prompted with masked input when absent
    #[arg(long, global = true, env = "ISE_API_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// CSV file with one guest user per row
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Sponsor portal ID the guests are created under
    #[arg(long, global = true)]
    pub portal_id: Option<String>,

    /// Skip TLS certificate verification (self-signed ISE certificates)
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds; the HTTP client default applies when unset
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the generated payload(s) instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create all guests with one XML bulk request
    Bulk,
    /// Create guests one at a time with JSON requests
    Single,
}

/// Connection parameters for one run. Never persisted.
#[derive(Clone, Default)]
pub struct SessionConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub csv_path: PathBuf,
    pub portal_id: String,
    /// Certificate verification is on unless this is set.
    pub insecure: bool,
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    /// Join an ERS resource path onto the configured host.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("csv_path", &self.csv_path)
            .field("portal_id", &self.portal_id)
            .field("insecure", &self.insecure)
            .field("timeout", &self.timeout)
            .finish()
    }
}
