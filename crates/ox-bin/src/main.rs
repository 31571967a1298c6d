//! oxcmd entrypoint.
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use core_actions::{ProcessWorkdir, RunOutcome, Session};
use core_config::{Config, DataPaths, load_layers};
use core_events::{EventQueue, InputFlags};
use core_input::{spawn_input_pump, spawn_interrupt_forwarder};
use core_terminal::{CrosstermDriver, TerminalDriver};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Once;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod shell;

use shell::ShellRunner;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxcmd", version, about = "Interactive command shell front-end")]
struct Args {
    /// Run command, then exit
    #[arg(
        short = 'c',
        value_name = "COMMAND",
        num_args = 1..,
        allow_hyphen_values = true,
        conflicts_with = "keep"
    )]
    command: Option<Vec<String>>,
    /// Run command, then continue to the prompt
    #[arg(short = 'k', value_name = "COMMAND", num_args = 1.., allow_hyphen_values = true)]
    keep: Option<Vec<String>>,
    /// Show title in window caption
    #[arg(short = 't', value_name = "TITLE")]
    title: Option<String>,
    /// Load an additional configuration file on top of the main one
    #[arg(short = 'i', value_name = "FILE")]
    init: Vec<PathBuf>,
    /// Quiet (suppress messages)
    #[arg(short = 'q')]
    quiet: bool,
    /// Configuration file (overrides discovery of `oxcmd.toml`).
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    fn title_prefix(&self) -> String {
        self.title
            .as_ref()
            .map(|t| format!("{t} - "))
            .unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let paths = DataPaths::discover();
    if let Err(e) = paths.ensure() {
        eprintln!("oxcmd: {e:#}");
    }
    let _log_guard = configure_logging(&paths);
    install_panic_hook();
    info!(target: "runtime", version = env!("CARGO_PKG_VERSION"), "startup");

    let mut config = match load_layers(args.config.clone(), &args.init) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("oxcmd: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    config.file.behavior.quiet |= args.quiet;

    match run(args, config, paths.clone()).await {
        Ok(()) => {
            info!(target: "runtime", "shutdown");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(target: "runtime", error = %e, "fatal");
            let _ = tokio::task::spawn_blocking(move || report_crash(&paths, &e)).await;
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(paths: &DataPaths) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(paths.root(), paths.log_file_name());
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Start the input tasks and run the line editor on a blocking thread.
async fn run(args: Args, config: Config, paths: DataPaths) -> Result<()> {
    let queue = EventQueue::new();
    let injector = queue.injector();
    let flags = InputFlags::new();
    // Queries the cursor position, so it must happen before the pump reads stdin.
    let driver = CrosstermDriver::new(queue, flags.clone())?;
    let (pump, shutdown) = spawn_input_pump(injector.clone(), flags.clone());
    let forwarder = spawn_interrupt_forwarder(injector, flags);

    let outcome = tokio::task::spawn_blocking(move || interactive(driver, args, config, paths)).await;

    shutdown.signal();
    forwarder.abort();
    if tokio::time::timeout(Duration::from_millis(200), pump)
        .await
        .is_err()
    {
        warn!(target: "runtime", "input_pump_timeout");
    }
    match outcome {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(anyhow!("line editor panicked: {e}")),
        Err(e) => Err(anyhow::Error::new(e).context("line editor task failed")),
    }
}

fn interactive(
    mut driver: CrosstermDriver,
    args: Args,
    config: Config,
    paths: DataPaths,
) -> Result<()> {
    driver.enter()?;
    let workdir = ProcessWorkdir::new().context("reading the working directory")?;
    let mut session = Session::new(&config.file, paths, Box::new(workdir))
        .with_title_prefix(args.title_prefix());
    let mut runner = ShellRunner::from_env();
    let quiet = session.quiet();

    for warning in session.warnings() {
        driver.write_str(&format!("{warning}\n"))?;
    }

    if let Some(command) = args.command {
        session.execute(&mut driver, &mut runner, &command.join(" "))?;
        return finish(&mut driver);
    }
    if !quiet {
        driver.write_str(&format!(
            "\nWelcome to oxcmd {}!\n",
            env!("CARGO_PKG_VERSION")
        ))?;
    }
    if let Some(command) = args.keep
        && session.execute(&mut driver, &mut runner, &command.join(" "))? == RunOutcome::Exit
    {
        return finish(&mut driver);
    }
    session.run(&mut driver, &mut runner)?;
    finish(&mut driver)
}

fn finish(driver: &mut CrosstermDriver) -> Result<()> {
    driver.write_str("\n")?;
    driver.flush()?;
    driver.leave()
}

/// Write the error to a timestamped file in the data dir and wait for a key.
fn report_crash(paths: &DataPaths, error: &anyhow::Error) {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let report = paths.crash_report(&stamp);
    let body = format!("oxcmd {}\n\n{error:?}\n", env!("CARGO_PKG_VERSION"));
    let written = fs::write(&report, body);

    eprintln!("\n");
    eprintln!("************************************");
    eprintln!("oxcmd has encountered a fatal error!");
    eprintln!();
    match written {
        Ok(()) => eprintln!("Crash report written to:\n  {}", report.display()),
        Err(e) => eprintln!("Could not write a crash report ({e}):\n{error:?}"),
    }
    eprintln!();
    eprintln!("Press any key to exit... ");
    eprintln!("************************************");
    wait_for_key();
}

fn wait_for_key() {
    use crossterm::event::{Event, KeyEventKind, read};
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
    if enable_raw_mode().is_err() {
        return;
    }
    loop {
        match read() {
            Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    let _ = disable_raw_mode();
}
