//! Maps validated CLI matches to an action plus the shared globals.

use crate::cli::{
    actions::{resume, Action},
    commands::{self, ARG_STATE_FILE, ARG_STORIES_URL, ARG_WATCH},
    globals::GlobalArgs,
};
use crate::shell::playground::PlaygroundRequest;
use anyhow::{anyhow, Context, Result};
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = matches
        .get_one::<String>(ARG_STATE_FILE)
        .map_or_else(GlobalArgs::default, GlobalArgs::new);

    let action = match matches.subcommand() {
        Some(("resume", sub)) => {
            let opts = commands::resume::Options::parse(sub)?;
            Action::Resume(resume::Args {
                project_url: opts.project_url,
                anon_key: opts.anon_key,
                bucket: opts.bucket,
                resume_object: opts.resume_object,
                link_ttl_seconds: opts.link_ttl_seconds,
                request_timeout: opts.request_timeout,
                relay_url: opts.relay_url,
                page: opts.page,
                open_with: opts.open_with,
            })
        }
        Some(("stories", sub)) => {
            let raw = sub
                .get_one::<String>(ARG_STORIES_URL)
                .context("missing required argument: --stories-url")?;
            let url = Url::parse(raw).context("invalid FOLIO_STORIES_URL")?;
            Action::Stories { url }
        }
        Some(("chat", _)) => Action::Chat,
        Some(("playground", sub)) => {
            let prompt = sub
                .get_one::<String>("prompt")
                .context("missing required argument: --prompt")?;
            let mut request = PlaygroundRequest::new(prompt.clone());
            if let Some(system) = sub.get_one::<String>("system") {
                request.system.clone_from(system);
            }
            if let Some(model) = sub.get_one::<String>("model") {
                request.model.clone_from(model);
            }
            if let Some(temperature) = sub.get_one::<f32>("temperature") {
                request.temperature = *temperature;
            }
            Action::Playground(request)
        }
        Some(("status", sub)) => Action::Status {
            watch: sub.get_flag(ARG_WATCH),
        },
        Some((name, _)) => return Err(anyhow!("unknown subcommand: {name}")),
        None => return Err(anyhow!("a subcommand is required")),
    };

    Ok((action, globals))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::{path::PathBuf, time::Duration};

    fn dispatch(args: &[&str]) -> Result<(Action, GlobalArgs)> {
        let matches = commands::new().try_get_matches_from(args)?;
        handler(&matches)
    }

    #[test]
    fn resume_action_from_env() {
        temp_env::with_vars(
            [
                ("FOLIO_PROJECT_URL", Some("https://abc.supabase.co")),
                ("FOLIO_ANON_KEY", Some("public-key")),
                ("FOLIO_RELAY_URL", Some("https://formspree.io/f/xyz")),
                ("FOLIO_REQUEST_TIMEOUT_SECONDS", Some("3")),
                ("FOLIO_STATE_FILE", None::<&str>),
            ],
            || {
                let (action, globals) = dispatch(&["folio", "resume"]).unwrap();
                assert_eq!(globals.state_file, PathBuf::from(".folio-state.json"));
                let Action::Resume(args) = action else {
                    panic!("expected resume action");
                };
                assert_eq!(args.project_url.as_str(), "https://abc.supabase.co/");
                assert_eq!(args.anon_key.expose_secret(), "public-key");
                assert_eq!(args.bucket, "resumes");
                assert_eq!(args.link_ttl_seconds, 60);
                assert_eq!(args.request_timeout, Duration::from_secs(3));
                assert_eq!(
                    args.relay_url.map(String::from),
                    Some("https://formspree.io/f/xyz".to_string())
                );
            },
        );
    }

    #[test]
    fn invalid_project_url() {
        temp_env::with_vars(
            [
                ("FOLIO_PROJECT_URL", Some("not a url")),
                ("FOLIO_ANON_KEY", Some("public-key")),
            ],
            || {
                let err = dispatch(&["folio", "resume"]).err().unwrap();
                assert!(err.to_string().contains("--project-url"));
            },
        );
    }

    #[test]
    fn playground_request() {
        let (action, _) = dispatch(&[
            "folio",
            "playground",
            "--prompt",
            "hello",
            "--model",
            "tiny",
        ])
        .unwrap();
        let Action::Playground(request) = action else {
            panic!("expected playground action");
        };
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.model, "tiny");
    }

    #[test]
    fn state_file_is_global() {
        temp_env::with_vars([("FOLIO_STATE_FILE", None::<&str>)], || {
            let (action, globals) =
                dispatch(&["folio", "status", "--state-file", "/tmp/folio.json"]).unwrap();
            assert!(matches!(action, Action::Status { watch: false }));
            assert_eq!(globals.state_file, PathBuf::from("/tmp/folio.json"));
        });
    }

    #[test]
    fn status_watch_flag() {
        let (action, _) = dispatch(&["folio", "status", "--watch"]).unwrap();
        assert!(matches!(action, Action::Status { watch: true }));
    }

    #[test]
    fn stories_default_url() {
        temp_env::with_vars([("FOLIO_STORIES_URL", None::<&str>)], || {
            let (action, _) = dispatch(&["folio", "stories"]).unwrap();
            let Action::Stories { url } = action else {
                panic!("expected stories action");
            };
            assert_eq!(url.host_str(), Some("hn.algolia.com"));
        });
    }
}
