//! Command-line arguments.
//!
//! Commands are flags (`--upload a.png b.png`) rather than subcommands. When
//! several are given, the first of help, version, server, login, temporary
//! upload and upload wins. Anything clap cannot parse falls back to help.
//!
//! Values after `--login`, `-u` and `-t` are taken as given, even when they
//! start with `-`, so flags placed after them are read as values.

use crate::upload::UploadKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "tobsmg")]
#[command(before_help = concat!(
    "Tobsmg CLI (v",
    env!("CARGO_PKG_VERSION"),
    ") - upload images to Tobsmg server"
))]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Display this help message
    #[arg(short, long)]
    pub help: bool,

    /// Print the version
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Check the set remote server url, or configure it when one is given
    #[arg(long, value_name = "SERVER_URL", num_args = 0..=1)]
    pub server: Option<Option<String>>,

    /// Authenticate user and get auth token from server
    #[arg(
        long,
        visible_alias = "auth",
        value_names = ["EMAIL", "PASSWORD"],
        num_args = 0..=2,
        allow_hyphen_values = true
    )]
    pub login: Option<Vec<String>>,

    /// Upload files to the server. E.g. -u ./path/to/img1 ../path/to/img2 ...
    #[arg(short, long, value_name = "PATH", num_args = 0.., allow_hyphen_values = true)]
    pub upload: Option<Vec<PathBuf>>,

    /// Temporarily upload files to the server (kept for 30 minutes)
    #[arg(short, long, value_name = "PATH", num_args = 0.., allow_hyphen_values = true)]
    pub temp_upload: Option<Vec<PathBuf>>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// The single thing an invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Version,
    ShowServer,
    SetServer(String),
    Login {
        email: Option<String>,
        password: Option<String>,
    },
    Upload {
        kind: UploadKind,
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    pub fn action(&self) -> Action {
        if self.help {
            return Action::Help;
        }
        if self.version {
            return Action::Version;
        }
        if let Some(server) = &self.server {
            return match server.as_deref() {
                Some(url) if !url.is_empty() => Action::SetServer(url.to_string()),
                _ => Action::ShowServer,
            };
        }
        if let Some(creds) = &self.login {
            let mut creds = creds.iter().filter(|c| !c.is_empty()).cloned();
            return Action::Login {
                email: creds.next(),
                password: creds.next(),
            };
        }
        if let Some(paths) = &self.temp_upload {
            return Action::Upload {
                kind: UploadKind::Temporary,
                paths: paths.clone(),
            };
        }
        if let Some(paths) = &self.upload {
            return Action::Upload {
                kind: UploadKind::Permanent,
                paths: paths.clone(),
            };
        }
        Action::Help
    }
}

/// Parse `args`, returning an empty [`Cli`] (which selects help) when they
/// do not parse.
pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "unrecognized arguments, showing help");
        Cli::default()
    })
}

/// Usage text, including the version banner.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> Action {
        let mut argv = vec!["tobsmg"];
        argv.extend_from_slice(args);
        parse_from(argv).action()
    }

    #[test]
    fn no_arguments_is_help() {
        assert_eq!(action(&[]), Action::Help);
    }

    #[test]
    fn unknown_flag_is_help() {
        assert_eq!(action(&["--frobnicate"]), Action::Help);
        assert_eq!(action(&["stray"]), Action::Help);
    }

    #[test]
    fn help_aliases() {
        assert_eq!(action(&["-h"]), Action::Help);
        assert_eq!(action(&["--help"]), Action::Help);
    }

    #[test]
    fn server_without_value_shows() {
        assert_eq!(action(&["--server"]), Action::ShowServer);
    }

    #[test]
    fn server_with_value_sets() {
        assert_eq!(
            action(&["--server", "https://img.example.com"]),
            Action::SetServer("https://img.example.com".into())
        );
    }

    #[test]
    fn login_and_auth_alias_take_two_values() {
        let expected = Action::Login {
            email: Some("me@example.com".into()),
            password: Some("pw".into()),
        };
        assert_eq!(action(&["--login", "me@example.com", "pw"]), expected);
        assert_eq!(action(&["--auth", "me@example.com", "pw"]), expected);
    }

    #[test]
    fn login_with_missing_password() {
        assert_eq!(
            action(&["--login", "me@example.com"]),
            Action::Login {
                email: Some("me@example.com".into()),
                password: None,
            }
        );
    }

    #[test]
    fn upload_short_and_long_forms() {
        let expected = Action::Upload {
            kind: UploadKind::Permanent,
            paths: vec![PathBuf::from("a.png"), PathBuf::from("../b.jpg")],
        };
        assert_eq!(action(&["-u", "a.png", "../b.jpg"]), expected);
        assert_eq!(action(&["--upload", "a.png", "../b.jpg"]), expected);
    }

    #[test]
    fn temp_upload_short_and_long_forms() {
        let expected = Action::Upload {
            kind: UploadKind::Temporary,
            paths: vec![PathBuf::from("a.png")],
        };
        assert_eq!(action(&["-t", "a.png"]), expected);
        assert_eq!(action(&["--temp-upload", "a.png"]), expected);
    }

    #[test]
    fn help_wins_over_other_commands() {
        assert_eq!(action(&["-h", "-u", "a.png"]), Action::Help);
    }

    #[test]
    fn login_password_may_start_with_hyphen() {
        assert_eq!(
            action(&["--login", "me@example.com", "-secret1"]),
            Action::Login {
                email: Some("me@example.com".into()),
                password: Some("-secret1".into()),
            }
        );
    }

    #[test]
    fn upload_paths_may_start_with_hyphen() {
        assert_eq!(
            action(&["-u", "-draft.png", "b.png"]),
            Action::Upload {
                kind: UploadKind::Permanent,
                paths: vec![PathBuf::from("-draft.png"), PathBuf::from("b.png")],
            }
        );
        assert_eq!(
            action(&["--temp-upload", "-draft.png"]),
            Action::Upload {
                kind: UploadKind::Temporary,
                paths: vec![PathBuf::from("-draft.png")],
            }
        );
    }

    #[test]
    fn usage_lists_commands_and_banner() {
        let text = usage();
        assert!(text.contains("Tobsmg CLI (v"));
        for flag in ["--login", "--server", "--upload", "--temp-upload", "--help"] {
            assert!(text.contains(flag), "usage is missing {flag}");
        }
    }
}
