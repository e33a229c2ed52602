use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::cli::{Cli, OrcidId};

/// The researcher whose works end up on the site.
pub const ORCID_ID: &str = "0000-0003-2271-6803";
/// Where the site expects the prebuilt list.
pub const OUT_JSON: &str = "assets/publications.json";
pub const API_BASE: &str = "https://pub.orcid.org/v3.0/";
/// Pause between detail requests, to be polite to the public API.
pub const DELAY_MS: u64 = 50;
pub const TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("orcid-pubs/", env!("CARGO_PKG_VERSION"));

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub subject: OrcidId,
    pub output: PathBuf,
    pub api_base: Url,
    pub delay: Duration,
    pub timeout: Duration,
    pub quiet: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            subject: cli.orcid,
            output: cli.output,
            api_base: cli.api_base,
            delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout),
            quiet: cli.quiet,
        }
    }
}
