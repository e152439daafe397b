//! Command dispatch.
//!
//! [`Context`] gathers everything an invocation needs (settings, where they
//! live, the working directory) and [`Dispatcher`] runs exactly one
//! [`Action`] against it. Failures are reported through the terminal; none
//! of them turn into a failing exit status.

use crate::api::{ApiClient, LoginRequest};
use crate::cli::{usage, Action};
use crate::config::{ConfigStore, Settings};
use crate::error::{Result, TobsmgError};
use crate::ui::Terminal;
use crate::upload::{FileOutcome, UploadKind, Uploader};
use std::path::PathBuf;

/// Per-invocation state.
#[derive(Debug, Clone)]
pub struct Context {
    pub store: ConfigStore,
    pub settings: Settings,
    pub cwd: PathBuf,
}

impl Context {
    pub fn new(store: ConfigStore, settings: Settings, cwd: PathBuf) -> Self {
        Context {
            store,
            settings,
            cwd,
        }
    }
}

pub struct Dispatcher {
    ctx: Context,
}

impl Dispatcher {
    pub fn new(ctx: Context) -> Self {
        Dispatcher { ctx }
    }

    /// Run `action`, printing whatever goes wrong.
    pub fn run(&self, action: Action, term: &mut Terminal<'_>) {
        tracing::debug!(?action, "dispatching");
        let result = match action {
            Action::Help => {
                term.info(usage());
                Ok(())
            }
            Action::Version => {
                term.info(format!("tobsmg {}", env!("CARGO_PKG_VERSION")));
                Ok(())
            }
            Action::ShowServer => {
                self.show_server(term);
                Ok(())
            }
            Action::SetServer(url) => {
                self.set_server(url, term);
                Ok(())
            }
            Action::Login { email, password } => self.login(email, password, term),
            Action::Upload { kind, paths } => self.upload(kind, &paths, term),
        };
        if let Err(e) = result {
            term.error(e);
        }
    }

    fn show_server(&self, term: &mut Terminal<'_>) {
        if self.ctx.settings.has_server_url() {
            term.info(format!("Server url is set to: {}", self.ctx.settings.server_url));
        } else {
            term.info("Server url is not set. Set it with `tobsmg --server <server-url>`");
        }
    }

    fn set_server(&self, url: String, term: &mut Terminal<'_>) {
        let updated = Settings::new(url, self.ctx.settings.token.clone());
        match self.ctx.store.write(&updated) {
            Ok(()) => term.info("Set server url for tobsmg"),
            Err(e) => {
                tracing::error!(error = %e, "could not persist server url");
                term.error("Failed to write server url");
            }
        }
    }

    fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
        term: &mut Terminal<'_>,
    ) -> Result<()> {
        let settings = &self.ctx.settings;
        if !settings.has_server_url() {
            return Err(TobsmgError::MissingServerUrl);
        }
        let (Some(email), Some(password)) = (email, password) else {
            return Err(TobsmgError::MissingCredentials);
        };

        let api = ApiClient::new(&settings.server_url)?;
        let spinner = term.spinner("Logging in...");
        let token = api.login(&LoginRequest { email, password });
        spinner.finish_and_clear();

        // The server's reason is logged, not shown.
        let token = token.map_err(|e| {
            tracing::debug!(error = %e, "login rejected");
            TobsmgError::AuthenticationFailed
        })?;

        term.info(format!(
            "Writing user token to: {}",
            self.ctx.store.path().display()
        ));
        let updated = Settings::new(settings.server_url.clone(), token);
        if let Err(e) = self.ctx.store.write(&updated) {
            tracing::error!(error = %e, "could not persist token");
            term.error("Failed to write token");
        }
        Ok(())
    }

    fn upload(&self, kind: UploadKind, paths: &[PathBuf], term: &mut Terminal<'_>) -> Result<()> {
        let settings = &self.ctx.settings;
        if !settings.has_server_url() {
            return Err(TobsmgError::MissingServerUrl);
        }
        if !settings.has_token() {
            return Err(TobsmgError::MissingToken);
        }
        if paths.is_empty() {
            term.error("No image paths given. E.g. tobsmg -u ./path/to/img1 ../path/to/img2");
            return Ok(());
        }

        let mut api = ApiClient::new(&settings.server_url)?;
        api.set_token(&settings.token);
        let uploader = Uploader::new(&api, &self.ctx.cwd, kind);

        let spinner = term.spinner("Uploading...");
        let outcomes = uploader.upload_all(paths, &mut |path| {
            spinner.set_message(format!("Uploading image at: {}", path.display()));
        });
        spinner.finish_and_clear();

        render_outcomes(&outcomes, term);
        Ok(())
    }
}

/// Print one line per file, in input order.
pub fn render_outcomes(outcomes: &[FileOutcome], term: &mut Terminal<'_>) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(link) => term.info(link),
            Err(e @ (TobsmgError::FileUnreadable { .. } | TobsmgError::NotAnImage { .. })) => {
                term.error(e)
            }
            Err(e) => term.error(format!(
                "Failed to upload image {}: {e}",
                outcome.path.display()
            )),
        }
    }
}
