// Persisted settings: the server URL and the auth token, kept together in a
// small `KEY="value"` file. Environment variables override what is on disk.

use crate::error::{Result, TobsmgError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SERVER_URL_KEY: &str = "TOBSMG_SERVER_URL";
pub const TOKEN_KEY: &str = "TOBSMG_TOKEN";
pub const MODE_KEY: &str = "TOBSMG_ENV";

/// Server used in development mode when nothing else is configured.
pub const DEV_SERVER_URL: &str = "http://localhost:4000";

/// Selects where settings live and which server is assumed by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Production,
    Development,
}

impl Mode {
    /// Mode named by `TOBSMG_ENV` in `env`. Unset, empty or unrecognised
    /// values select production.
    pub fn from_env(env: &HashMap<String, String>) -> Mode {
        let Some(value) = env.get(MODE_KEY) else {
            return Mode::Production;
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Mode::Development,
            "" | "prod" | "production" => Mode::Production,
            other => {
                tracing::warn!(value = %other, "unrecognized {MODE_KEY}, using production");
                Mode::Production
            }
        }
    }
}

/// The two persisted fields. Either may be empty, but both are always
/// written together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub token: String,
}

impl Settings {
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Settings {
            server_url: server_url.into(),
            token: token.into(),
        }
    }

    /// Parse file content. Unknown keys, comments and blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                SERVER_URL_KEY => settings.server_url = unquote(value.trim()).to_string(),
                TOKEN_KEY => settings.token = unquote(value.trim()).to_string(),
                _ => {}
            }
        }
        settings
    }

    pub fn render(&self) -> String {
        format!(
            "{SERVER_URL_KEY}=\"{}\"\n{TOKEN_KEY}=\"{}\"",
            self.server_url, self.token
        )
    }

    pub fn has_server_url(&self) -> bool {
        !self.server_url.is_empty()
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// File-backed settings store. No locking: one user, one invocation at a time.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    default_server_url: Option<String>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore {
            path: path.into(),
            default_server_url: None,
        }
    }

    /// Production keeps settings under the home directory; development keeps
    /// them in `.env` next to where the tool is run and talks to a local server.
    pub fn for_mode(mode: Mode, cwd: &Path) -> Self {
        match mode {
            Mode::Production => {
                let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
                ConfigStore::new(home.join(".local").join(".tobsmg-env"))
            }
            Mode::Development => {
                ConfigStore::new(cwd.join(".env")).with_default_server_url(DEV_SERVER_URL)
            }
        }
    }

    pub fn with_default_server_url(mut self, url: impl Into<String>) -> Self {
        self.default_server_url = Some(url.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. For each field a non-empty entry in `env` wins, then the
    /// file, then the mode default. A missing file is not an error.
    pub fn read(&self, env: &HashMap<String, String>) -> Result<Settings> {
        let from_file = match fs::read_to_string(&self.path) {
            Ok(content) => Settings::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };

        let lookup = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

        let mut server_url = lookup(SERVER_URL_KEY).unwrap_or(from_file.server_url);
        if server_url.is_empty() {
            if let Some(default) = &self.default_server_url {
                server_url = default.clone();
            }
        }
        let token = lookup(TOKEN_KEY).unwrap_or(from_file.token);

        tracing::debug!(path = %self.path.display(), "loaded settings");
        Ok(Settings { server_url, token })
    }

    /// Replace the file with both fields. The content goes to a sibling file
    /// first and is renamed into place.
    pub fn write(&self, settings: &Settings) -> Result<()> {
        let wrap = |source: std::io::Error| TobsmgError::ConfigWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, settings.render()).map_err(wrap)?;
        fs::rename(&staging, &self.path).map_err(wrap)?;

        tracing::debug!(path = %self.path.display(), "wrote settings");
        Ok(())
    }
}
