use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::gate::DEFAULT_RESUME_OBJECT;

pub const ARG_PROJECT_URL: &str = "project-url";
pub const ARG_ANON_KEY: &str = "anon-key";
pub const ARG_BUCKET: &str = "bucket";
pub const ARG_RESUME_OBJECT: &str = "resume-object";
pub const ARG_LINK_TTL: &str = "link-ttl-seconds";
pub const ARG_REQUEST_TIMEOUT: &str = "request-timeout-seconds";
pub const ARG_RELAY_URL: &str = "relay-url";
pub const ARG_PAGE: &str = "page";
pub const ARG_OPEN_WITH: &str = "open-with";

#[derive(Clone)]
pub struct Options {
    pub project_url: Url,
    pub anon_key: SecretString,
    pub bucket: String,
    pub resume_object: String,
    pub link_ttl_seconds: u64,
    pub request_timeout: Duration,
    pub relay_url: Option<Url>,
    pub page: String,
    pub open_with: Option<String>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("project_url", &self.project_url.as_str())
            .field("anon_key", &"***")
            .field("bucket", &self.bucket)
            .field("resume_object", &self.resume_object)
            .field("link_ttl_seconds", &self.link_ttl_seconds)
            .field("request_timeout", &self.request_timeout)
            .field("relay_url", &self.relay_url.as_ref().map(Url::as_str))
            .field("page", &self.page)
            .field("open_with", &self.open_with)
            .finish()
    }
}

impl Options {
    /// Parse resume gate arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or URLs are invalid.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        let project_url = Url::parse(&read_required(ARG_PROJECT_URL)?)
            .map_err(|e| anyhow::anyhow!("invalid --{ARG_PROJECT_URL}: {e}"))?;

        let relay_url = matches
            .get_one::<String>(ARG_RELAY_URL)
            .filter(|v| !v.trim().is_empty())
            .map(|v| Url::parse(v))
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid --{ARG_RELAY_URL}: {e}"))?;

        Ok(Self {
            project_url,
            anon_key: SecretString::from(read_required(ARG_ANON_KEY)?),
            bucket: read_required(ARG_BUCKET)?,
            resume_object: read_required(ARG_RESUME_OBJECT)?,
            link_ttl_seconds: matches.get_one::<u64>(ARG_LINK_TTL).copied().unwrap_or(60),
            request_timeout: Duration::from_secs(
                matches
                    .get_one::<u64>(ARG_REQUEST_TIMEOUT)
                    .copied()
                    .unwrap_or(10),
            ),
            relay_url,
            page: matches
                .get_one::<String>(ARG_PAGE)
                .cloned()
                .unwrap_or_default(),
            open_with: matches.get_one::<String>(ARG_OPEN_WITH).cloned(),
        })
    }
}

#[must_use]
pub fn command() -> Command {
    Command::new("resume")
        .about("Request the resume: email a one-time code, verify it, open a signed link")
        .arg(
            Arg::new(ARG_PROJECT_URL)
                .long(ARG_PROJECT_URL)
                .help("Hosted auth/storage project URL, example: https://<project>.supabase.co")
                .env("FOLIO_PROJECT_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ANON_KEY)
                .long(ARG_ANON_KEY)
                .help("Public (anon) client key for the project")
                .env("FOLIO_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_BUCKET)
                .long(ARG_BUCKET)
                .help("Storage bucket holding the resume")
                .env("FOLIO_BUCKET")
                .default_value("resumes"),
        )
        .arg(
            Arg::new(ARG_RESUME_OBJECT)
                .long(ARG_RESUME_OBJECT)
                .help("Object path of the resume inside the bucket")
                .env("FOLIO_RESUME_OBJECT")
                .default_value(DEFAULT_RESUME_OBJECT),
        )
        .arg(
            Arg::new(ARG_LINK_TTL)
                .long(ARG_LINK_TTL)
                .help("Signed link lifetime in seconds")
                .env("FOLIO_LINK_TTL_SECONDS")
                .default_value("60")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT)
                .long(ARG_REQUEST_TIMEOUT)
                .help("Timeout for each provider call in seconds")
                .env("FOLIO_REQUEST_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_RELAY_URL)
                .long(ARG_RELAY_URL)
                .help("Form-relay endpoint notified after each resume view (optional)")
                .env("FOLIO_RELAY_URL"),
        )
        .arg(
            Arg::new(ARG_PAGE)
                .long(ARG_PAGE)
                .help("Page URL reported with resume views")
                .env("FOLIO_PAGE")
                .default_value("https://jonathanpham.dev/"),
        )
        .arg(
            Arg::new(ARG_OPEN_WITH)
                .long(ARG_OPEN_WITH)
                .help("Program used to open the link, example: xdg-open (default: print it)")
                .env("FOLIO_OPEN_WITH"),
        )
}
