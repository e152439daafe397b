// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, load settings, dispatch one action.
// - Always exits successfully; problems are printed, not returned.

use std::collections::HashMap;
use std::path::PathBuf;

use tobsmg::commands::{Context, Dispatcher};
use tobsmg::config::{ConfigStore, Mode, Settings};
use tobsmg::ui::Terminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `--debug` forces debug output, otherwise `RUST_LOG` decides, otherwise
/// only warnings and errors are logged.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tobsmg=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tobsmg=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = tobsmg::cli::parse_from(std::env::args_os());
    init_tracing(cli.debug);

    // Without a working directory, relative paths still resolve against
    // whatever the OS considers current.
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not determine working directory");
        PathBuf::from(".")
    });
    let env: HashMap<String, String> = std::env::vars().collect();
    let mode = Mode::from_env(&env);
    tracing::debug!(?mode, "tobsmg starting");

    let store = ConfigStore::for_mode(mode, &cwd);
    let settings = store.read(&env).unwrap_or_else(|e| {
        tracing::warn!(path = %store.path().display(), error = %e, "could not read settings");
        Settings::default()
    });

    let mut term = Terminal::stdio();
    Dispatcher::new(Context::new(store, settings, cwd)).run(cli.action(), &mut term);
}
