// UI layer: environment prompt, logging setup and plain-text progress
// output. Kept separate from the batch logic so the driver can run
// headless in tests with a hidden progress bar.

use crate::batch::BatchSummary;
use crate::config::Environment;
use crate::manifest::ManifestRow;
use anyhow::Result;
use crossterm::style::{Color, Stylize};
use dialoguer::Input;
use env_logger::{Env, Target};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

/// Invalid answers tolerated before the environment prompt gives up.
pub const MAX_ENV_ATTEMPTS: usize = 3;

/// Ask the operator which environment to target. Uses an interactive
/// prompt on a terminal; otherwise reads one answer per line from stdin.
pub fn prompt_environment() -> Result<Environment> {
    println!("Select target environment:");
    println!("  1) staging");
    println!("  2) production");

    let stdin = io::stdin();
    if stdin.is_terminal() {
        select_environment_with(
            || {
                let choice: String = Input::new()
                    .with_prompt("Environment")
                    .allow_empty(true)
                    .interact_text()?;
                Ok(choice)
            },
            MAX_ENV_ATTEMPTS,
        )
    } else {
        select_environment_from(stdin.lock(), MAX_ENV_ATTEMPTS)
    }
}

/// Read answers line by line from `reader`. Running out of input before
/// a valid answer is an error.
pub fn select_environment_from<R: BufRead>(mut reader: R, max_attempts: usize) -> Result<Environment> {
    select_environment_with(
        || {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                anyhow::bail!("No environment choice on stdin");
            }
            Ok(line)
        },
        max_attempts,
    )
}

/// Read choices from `read_choice` until one is valid, failing after
/// `max_attempts` invalid answers.
pub fn select_environment_with<F>(mut read_choice: F, max_attempts: usize) -> Result<Environment>
where
    F: FnMut() -> Result<String>,
{
    for attempt in 1..=max_attempts {
        let choice = read_choice()?;
        if let Some(env) = Environment::parse_choice(&choice) {
            return Ok(env);
        }
        println!(
            "Invalid choice {:?}: enter 1 for staging or 2 for production ({} left)",
            choice.trim(),
            max_attempts - attempt
        );
    }
    anyhow::bail!("No valid environment selected after {} attempts", max_attempts)
}

/// Spinner shown while rows are processed. It does not tick until
/// `start_spinner` is called, so it stays out of the way of the prompt.
pub fn row_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner
}

pub fn start_spinner(progress: &ProgressBar) {
    progress.enable_steady_tick(Duration::from_millis(120));
}

/// Writer that clears the spinner while a log line is written.
pub struct ProgressWriter<W> {
    progress: ProgressBar,
    inner: W,
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(progress: ProgressBar, inner: W) -> Self {
        ProgressWriter { progress, inner }
    }
}

impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.progress.suspend(|| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Install env_logger (default filter `info`, `RUST_LOG` overrides),
/// writing through the spinner so log lines and redraws don't mix.
pub fn init_logging(progress: &ProgressBar) {
    let writer = ProgressWriter::new(progress.clone(), io::stderr());
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(writer)))
        .init();
}

/// Echo a row before it is processed. The token is not printed.
pub fn report_row(progress: &ProgressBar, index: usize, row: &ManifestRow) {
    progress.set_message(format!("Row {}: listing {}", index, row.listing_id));
    progress.suspend(|| {
        println!(
            "{} {} {} {}",
            row.user_id, row.property_id, row.listing_id, row.listing_state
        )
    });
}

/// Print the status line of a non-success response.
pub fn report_status(progress: &ProgressBar, status: StatusCode) {
    let line = paint(format!("status: {}", status), Color::Red, io::stdout().is_terminal());
    progress.suspend(|| println!("{}", line));
}

/// Print a row-scoped failure on stderr.
pub fn report_error(progress: &ProgressBar, context: &str, err: &(dyn std::error::Error + 'static)) {
    let line = paint(
        format!("error: {}: {}", context, error_message(err)),
        Color::Red,
        io::stderr().is_terminal(),
    );
    progress.suspend(|| eprintln!("{}", line));
}

/// The error and its immediate cause. Deeper causes are left out: the
/// HTTP and I/O errors used as sources already print their own chain.
pub fn error_message(err: &(dyn std::error::Error + 'static)) -> String {
    match err.source() {
        Some(cause) => format!("{}: {}", err, cause),
        None => err.to_string(),
    }
}

pub fn print_summary(summary: &BatchSummary) {
    let line = format!(
        "{} rows attempted: {} accepted, {} rejected, {} failed",
        summary.attempted, summary.succeeded, summary.rejected, summary.failed
    );
    let color = if summary.all_succeeded() {
        Color::Green
    } else {
        Color::Yellow
    };
    println!("{}", paint(line, color, io::stdout().is_terminal()));
}

/// Color `line` only when it goes to a terminal.
fn paint(line: String, color: Color, terminal: bool) -> String {
    if terminal {
        line.with(color).to_string()
    } else {
        line
    }
}
