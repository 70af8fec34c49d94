//! pdfstitch - Select, preview, reorder and merge PDF files.
//!
//! The command-line front end: files come from arguments, commands from
//! `--exec` or an interactive session, and the merged document is written
//! to `--output`.

mod cli;

use clap::Parser;
use std::io::Write;
use std::path::Path;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfstitch::command::HELP_TEXT;
use pdfstitch::config::{Config, OverwriteMode};
use pdfstitch::controller::{Controller, Outcome};
use pdfstitch::error::StitchError;
use pdfstitch::io::read_input_list;
use pdfstitch::merge::LopdfBackend;
use pdfstitch::output::{OutputFormatter, display_list, display_merge_summary};
use pdfstitch::render::{PreviewRenderer, system_previewer};

type StdinLines = Lines<BufReader<Stdin>>;

/// The controller the front end drives.
type App = Controller<OutputFormatter, LopdfBackend, Box<dyn PreviewRenderer>>;

/// How `run` ended unsuccessfully.
#[derive(Debug)]
enum Exit {
    /// Already shown to the user through a notification.
    Reported(StitchError),
    /// Still needs to be printed.
    Failed(StitchError),
}

impl From<StitchError> for Exit {
    fn from(err: StitchError) -> Self {
        Self::Failed(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Run the application and handle errors
    match run(cli).await {
        Ok(()) => {}
        Err(Exit::Reported(err)) => process::exit(err.exit_code()),
        Err(Exit::Failed(err)) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Install the log subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), Exit> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfstitch::NAME, pdfstitch::VERSION));
    }

    // Collect inputs, including those from the input list
    let mut inputs = config.inputs.clone();
    if let Some(list) = &config.input_list {
        inputs.extend(read_input_list(list).await?);
    }

    let mut controller =
        Controller::from_config(&config, formatter.clone()).with_previewer(system_previewer());
    if !inputs.is_empty() {
        controller.add(&inputs).await.map_err(Exit::Reported)?;
    }

    let mut merged = false;
    for line in &config.exec {
        let outcome = controller.execute_line(line).await.map_err(Exit::Reported)?;
        merged |= matches!(outcome, Outcome::Merged(_) | Outcome::ConfirmOverwrite(_));
        let flow = handle_outcome(&mut controller, &formatter, outcome, &mut stdin, false).await?;
        if flow == Flow::Quit {
            return Ok(());
        }
    }

    if config.interactive {
        return interactive(&mut controller, &formatter, &mut stdin).await;
    }

    if config.wants_listing() {
        show_listing(&controller, &formatter, &config).await?;
        return Ok(());
    }

    if !merged {
        let outcome = controller
            .merge(None, config.overwrite_mode)
            .await
            .map_err(Exit::Reported)?;
        handle_outcome(&mut controller, &formatter, outcome, &mut stdin, false).await?;
    }

    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
async fn interactive(
    controller: &mut App,
    formatter: &OutputFormatter,
    stdin: &mut StdinLines,
) -> Result<(), Exit> {
    formatter.info("Type 'help' for a list of commands.");

    loop {
        if formatter.should_print() {
            print!("pdfstitch> ");
            std::io::stdout().flush().ok();
        }

        let Some(line) = stdin.next_line().await.map_err(StitchError::from)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = match controller.execute_line(line).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_recoverable() => continue,
            Err(err) => return Err(Exit::Reported(err)),
        };

        if handle_outcome(controller, formatter, outcome, stdin, true).await? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

/// Act on what a command asked the front end to do.
async fn handle_outcome(
    controller: &mut App,
    formatter: &OutputFormatter,
    outcome: Outcome,
    stdin: &mut StdinLines,
    interactive: bool,
) -> Result<Flow, Exit> {
    match outcome {
        Outcome::Done => {}
        Outcome::Listed(view) => display_list(formatter, &view),
        Outcome::Help => formatter.plain(HELP_TEXT),
        Outcome::Merged(report) => display_merge_summary(formatter, &report),
        Outcome::ConfirmOverwrite(path) => {
            if !confirm_overwrite(formatter, &path, stdin).await? {
                if interactive {
                    formatter.info("Merge cancelled");
                    return Ok(Flow::Continue);
                }
                return Err(StitchError::Cancelled.into());
            }

            let merged = controller.merge(Some(path), OverwriteMode::Force).await;
            match merged {
                Ok(Outcome::Merged(report)) => display_merge_summary(formatter, &report),
                Ok(_) => {}
                Err(err) if interactive && err.is_recoverable() => {}
                Err(err) => return Err(Exit::Reported(err)),
            }
        }
        Outcome::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Ask whether `path` may be overwritten.
///
/// In quiet mode there is nobody to ask, so the answer is an error.
async fn confirm_overwrite(
    formatter: &OutputFormatter,
    path: &Path,
    stdin: &mut StdinLines,
) -> Result<bool, Exit> {
    if formatter.is_quiet() {
        return Err(StitchError::output_exists(path.to_path_buf()).into());
    }

    formatter.warning(&format!("Output file already exists: {}", path.display()));
    print!("Overwrite? [y/N]: ");
    std::io::stdout().flush().ok();

    let response = stdin
        .next_line()
        .await
        .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))?
        .unwrap_or_default();

    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Print and/or write the list as requested by `--list`, `--json`, `--html`.
async fn show_listing(
    controller: &App,
    formatter: &OutputFormatter,
    config: &Config,
) -> Result<(), Exit> {
    let view = controller.list().await;

    if config.list {
        display_list(formatter, &view);
    }

    if config.json {
        let json = view
            .to_json()
            .map_err(|err| StitchError::other(format!("Failed to encode list: {err}")))?;
        println!("{json}");
    }

    if let Some(path) = &config.html {
        write_html(path, &view.to_html()).await?;
        formatter.success(&format!("List written to {}", path.display()));
    }

    Ok(())
}

async fn write_html(path: &Path, html: &str) -> Result<(), StitchError> {
    tokio::fs::write(path, html)
        .await
        .map_err(|source| StitchError::FailedToWrite {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_html() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.html");

        write_html(&path, "<ul></ul>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<ul></ul>");
    }

    #[tokio::test]
    async fn test_write_html_into_missing_directory() {
        let err = write_html(Path::new("/nonexistent/dir/list.html"), "")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_exit_from_error_is_unreported() {
        let exit: Exit = StitchError::Cancelled.into();
        assert!(matches!(exit, Exit::Failed(StitchError::Cancelled)));
    }
}
