use clap::Args;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use nu_ansi_term::Style;
use tracing::{debug, warn};

use crate::cli_util::{paint, print_error, stderr_color, stdout_color};
use crate::config::Settings;
use crate::engine::{Engine, Execution, StepControl};
use crate::theme::catppuccin::Mocha as P;
use crate::{BfiError, Program, Tape};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Path to the Brainfuck source file
    #[arg(value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print a step-by-step table of operations instead of the program output
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Wall-clock timeout in milliseconds, 0 for none (fallback BFI_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BFI_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Start an interactive session that keeps the tape between lines
    #[arg(long = "repl", conflicts_with_all = ["file", "debug"])]
    pub repl: bool,

    /// With --repl: read plain lines from stdin, no line editor
    #[arg(long = "bare", requires = "repl", conflicts_with = "editor")]
    pub bare: bool,

    /// With --repl: force the line editor (errors if stdin is not a TTY)
    #[arg(long = "editor", requires = "repl", conflicts_with = "bare")]
    pub editor: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    let RunArgs {
        file,
        debug,
        timeout_ms,
        max_steps,
        help,
        ..
    } = args;

    let Some(path) = file.filter(|_| !help) else {
        print_usage(program);
        return 0;
    };

    let mut settings = Settings::load();
    settings.apply_flags(max_steps, timeout_ms);
    debug!(?settings, path = %path.display(), "resolved settings");
    let color = stderr_color(settings.color);

    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(source) => {
            let err = BfiError::Io { path, source };
            print_error(program, "", &err, color);
            return 1;
        }
    };

    let code = Program::load(&source);
    let code_str = code.to_string();

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!("failed to set ctrl+c handler: {e}");
    }

    match execute_with_limits(code, Tape::new(), &settings, cancel, debug) {
        Ok(execution) => {
            if !debug {
                println!("{}", execution.output);
            }
            let finished = format!("Finished execution in {}ms", execution.elapsed.as_millis());
            println!("{}", paint(Style::new().fg(P::GREEN), &finished, stdout_color(settings.color)));
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            print_error(program, &code_str, &err, color);
            1
        }
    }
}

/// Run `code` from `tape` on a worker thread so a wall-clock timeout can
/// abandon it. On timeout `cancel` is set, which stops the worker at its next
/// step. With `debug` the step table goes straight to stdout.
pub fn execute_with_limits(
    code: Program,
    tape: Tape,
    settings: &Settings,
    cancel: Arc<AtomicBool>,
    debug: bool,
) -> Result<Execution, BfiError> {
    let (tx, rx) = mpsc::channel::<Result<Execution, BfiError>>();
    let ctrl = StepControl::new(settings.max_steps, cancel.clone());
    thread::spawn(move || {
        let engine = Engine::with_tape(&code, tape);
        let res = if debug {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            engine.run_debug(Some(&ctrl), &mut out)
        } else {
            engine.run_with_control(&ctrl)
        };
        let _ = tx.send(res);
    });

    match settings.timeout_ms {
        Some(ms) => match rx.recv_timeout(Duration::from_millis(ms)) {
            Ok(res) => res,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                cancel.store(true, Ordering::Relaxed);
                Err(BfiError::TimedOut { ms })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(BfiError::WorkerExited),
        },
        None => rx.recv().unwrap_or(Err(BfiError::WorkerExited)),
    }
}

pub fn print_usage(program: &str) {
    println!(
        r#"Please specify a path

Usage:
  {0} [OPTIONS] <PATH>
  {0} --repl [--bare|--editor] [OPTIONS]

Options:
  --debug,  -d       Print a step-by-step table of operations instead of the output
  --timeout <MS>     Abort after MS milliseconds of wall-clock time (0: no timeout)
  --max-steps <N>    Abort after N executed instructions
  --repl             Run lines interactively on a tape that persists between lines
  --bare             With --repl: plain line reading, no editor
  --editor           With --repl: force the line editor (stdin must be a TTY)
  --help,   -h       Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Input (`,`) is accepted but does nothing.
- The tape has 65535 cells; the pointer and the 8-bit cells both wrap around.
- Limits fall back to BFI_TIMEOUT_MS / BFI_MAX_STEPS, then to [limits] in bfi.toml
  under the XDG config directory.
- REPL meta commands: :q/:exit quit, :r/:reset clear the tape, :?/:help help.
  BFI_REPL_MODE=bare|editor picks the mode when no flag is given.
"#,
        program
    );
    let _ = io::stdout().flush();
}
