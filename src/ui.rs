// UI layer: where user-facing lines go. Results are written to `out`,
// problems to `err`, and a spinner from `indicatif` is shown on stderr
// while a request is in flight if stderr is a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::{IsTerminal, Write};
use std::time::Duration;

pub struct Terminal<'a> {
    out: Box<dyn Write + 'a>,
    err: Box<dyn Write + 'a>,
    progress: bool,
}

impl Terminal<'static> {
    /// Terminal bound to the process's stdout and stderr.
    pub fn stdio() -> Self {
        Terminal {
            out: Box::new(std::io::stdout()),
            err: Box::new(std::io::stderr()),
            progress: std::io::stderr().is_terminal(),
        }
    }
}

impl<'a> Terminal<'a> {
    /// Terminal writing into arbitrary sinks, with spinners disabled.
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Terminal {
            out: Box::new(out),
            err: Box::new(err),
            progress: false,
        }
    }

    pub fn info(&mut self, msg: impl Display) {
        // A closed pipe is not worth failing the command over.
        let _ = writeln!(self.out, "{msg}");
    }

    pub fn error(&mut self, msg: impl Display) {
        let _ = writeln!(self.err, "{msg}");
    }

    /// Start a spinner with `msg`. Call `finish_and_clear` on the result once
    /// the work is done; when progress is disabled the bar is hidden.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_and_error_go_to_separate_sinks() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut term = Terminal::new(&mut out, &mut err);
            term.info("hello");
            term.error("oops");
            term.spinner("working").finish_and_clear();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
        assert_eq!(String::from_utf8(err).unwrap(), "oops\n");
    }
}
