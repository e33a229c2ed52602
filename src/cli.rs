use std::{fmt, path::PathBuf, str::FromStr};

use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::config;

/// Build a static publications JSON from ORCID, so the site never has to call the registry itself.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// ORCID iD of the researcher, bare or as an orcid.org URL
    #[arg(long, value_name = "ID", default_value = config::ORCID_ID)]
    pub orcid: OrcidId,

    /// Where to write the JSON artifact
    #[arg(short, long, value_name = "PATH", default_value = config::OUT_JSON)]
    pub output: PathBuf,

    /// Base URL of the ORCID public API
    #[arg(long, value_name = "URL", default_value = config::API_BASE)]
    pub api_base: Url,

    /// Pause between per-work requests, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = config::DELAY_MS)]
    pub delay_ms: u64,

    /// Request timeout, in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = config::TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Don't print progress or the summary line on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// A syntactically valid ORCID iD, e.g. `0000-0002-1825-0097`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrcidId(String);

impl OrcidId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrcidId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut id = s.trim();

        if let Some(rest) = id
            .strip_prefix("orcid:")
            .or_else(|| id.strip_prefix("ORCID:"))
        {
            id = rest.trim_start();
        }

        if let Some(rest) = id
            .strip_prefix("https://orcid.org/")
            .or_else(|| id.strip_prefix("http://orcid.org/"))
            .or_else(|| id.strip_prefix("https://sandbox.orcid.org/"))
        {
            id = rest.trim_end_matches('/');
        }

        static ORCID_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{4})-([0-9]{4})-([0-9]{3}[0-9X])$").unwrap());

        let caps = ORCID_RE
            .captures(id)
            .ok_or_else(|| format!("not an ORCID iD: {s}"))?;

        let digits: String = (1..=4).map(|i| &caps[i]).collect();
        let (base, check) = digits.split_at(15);
        if checksum(base) != check.chars().next().unwrap_or_default() {
            return Err(format!("ORCID iD has a bad check digit: {s}"));
        }

        Ok(OrcidId(id.to_string()))
    }
}

/// ISO 7064 MOD 11-2 check character over the first 15 digits.
fn checksum(base: &str) -> char {
    let total = base
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| (acc + d) * 2);
    match (12 - total % 11) % 11 {
        10 => 'X',
        r => char::from_digit(r, 10).unwrap_or('0'),
    }
}
