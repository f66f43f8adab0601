pub mod logging;
pub mod resume;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

use crate::{cli::globals::DEFAULT_STATE_FILE, feed::DEFAULT_STORIES_URL, shell::playground};

pub const ARG_STATE_FILE: &str = "state-file";
pub const ARG_STORIES_URL: &str = "stories-url";
pub const ARG_WATCH: &str = "watch";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("folio")
        .about("Portfolio companion: gated resume, stories, chat")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_STATE_FILE)
                .long(ARG_STATE_FILE)
                .help("File holding client-local counters")
                .env("FOLIO_STATE_FILE")
                .default_value(DEFAULT_STATE_FILE)
                .global(true),
        )
        .subcommand(resume::command())
        .subcommand(
            Command::new("stories").about("Show the latest stories").arg(
                Arg::new(ARG_STORIES_URL)
                    .long(ARG_STORIES_URL)
                    .help("Search API URL returning story hits")
                    .env("FOLIO_STORIES_URL")
                    .default_value(DEFAULT_STORIES_URL),
            ),
        )
        .subcommand(Command::new("chat").about("Talk to the scripted assistant"))
        .subcommand(
            Command::new("playground")
                .about("Stream a templated AI playground response")
                .arg(
                    Arg::new("prompt")
                        .long("prompt")
                        .help("Prompt text")
                        .required(true),
                )
                .arg(
                    Arg::new("system")
                        .long("system")
                        .help("System instructions")
                        .default_value(playground::DEFAULT_SYSTEM),
                )
                .arg(
                    Arg::new("model")
                        .long("model")
                        .help("Model label shown in the output")
                        .default_value(playground::DEFAULT_MODEL),
                )
                .arg(
                    Arg::new("temperature")
                        .long("temperature")
                        .help("Sampling temperature, 0.0 to 2.0")
                        .default_value("0.7")
                        .value_parser(clap::value_parser!(f32)),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Record a visit and show theme and counters")
                .arg(
                    Arg::new(ARG_WATCH)
                        .long(ARG_WATCH)
                        .help("Keep running and print the theme pill whenever it changes")
                        .action(ArgAction::SetTrue),
                ),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume::{ARG_ANON_KEY, ARG_LINK_TTL, ARG_PROJECT_URL, ARG_RESUME_OBJECT};

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "folio");
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_resume_args() {
        let matches = new().get_matches_from(vec![
            "folio",
            "resume",
            "--project-url",
            "https://abc.supabase.co",
            "--anon-key",
            "public-key",
            "--link-ttl-seconds",
            "120",
        ]);

        let (name, sub) = matches.subcommand().unwrap_or(("", &matches));
        assert_eq!(name, "resume");
        assert_eq!(
            sub.get_one::<String>(ARG_PROJECT_URL).cloned(),
            Some("https://abc.supabase.co".to_string())
        );
        assert_eq!(
            sub.get_one::<String>(ARG_ANON_KEY).cloned(),
            Some("public-key".to_string())
        );
        assert_eq!(sub.get_one::<u64>(ARG_LINK_TTL).copied(), Some(120));
        assert_eq!(
            sub.get_one::<String>(ARG_RESUME_OBJECT).cloned(),
            Some("Resume-JonathanPham.pdf".to_string())
        );
    }

    #[test]
    fn test_resume_requires_project() {
        temp_env::with_vars(
            [
                ("FOLIO_PROJECT_URL", None::<&str>),
                ("FOLIO_ANON_KEY", Some("public-key")),
            ],
            || {
                let result = new().try_get_matches_from(vec!["folio", "resume"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("FOLIO_PROJECT_URL", Some("https://abc.supabase.co")),
                ("FOLIO_ANON_KEY", Some("public-key")),
                ("FOLIO_STATE_FILE", Some("/tmp/folio.json")),
                ("FOLIO_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["folio", "resume"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_STATE_FILE).cloned(),
                    Some("/tmp/folio.json".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("FOLIO_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["folio", "status"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for count in 0..4usize {
            temp_env::with_vars([("FOLIO_LOG_LEVEL", None::<&str>)], || {
                let mut args = vec!["folio".to_string(), "status".to_string()];
                if count > 0 {
                    args.push(format!("-{}", "v".repeat(count)));
                }
                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(count).ok()
                );
            });
        }
    }

    #[test]
    fn test_playground_temperature() {
        let matches = new().get_matches_from(vec![
            "folio",
            "playground",
            "--prompt",
            "hello",
            "--temperature",
            "1.25",
        ]);
        let sub = matches.subcommand_matches("playground");
        assert_eq!(
            sub.and_then(|m| m.get_one::<f32>("temperature").copied()),
            Some(1.25)
        );
    }
}
