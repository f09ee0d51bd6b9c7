use std::env;
use std::io::{self, IsTerminal, Write};

use tracing::debug;

use crate::commands::run::RunArgs;
use crate::config::Settings;
use crate::repl::{bare_loop, editor_loop, select_mode, ModeFlagOverride, ReplMode, Session, ENV_REPL_MODE};

// Entry point for `--repl` from main.rs
pub fn run(program: &str, args: RunArgs) -> i32 {
    let flag = if args.bare {
        ModeFlagOverride::Bare
    } else if args.editor {
        ModeFlagOverride::Editor
    } else {
        ModeFlagOverride::None
    };

    // Determine mode: flags -> env -> auto-detect via is_terminal()
    let env_mode = env::var(ENV_REPL_MODE).ok();
    let mode = match select_mode(flag, env_mode.as_deref(), io::stdin().is_terminal()) {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let mut settings = Settings::load();
    settings.apply_flags(args.max_steps, args.timeout_ms);
    debug!(?settings, ?mode, "starting repl");

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let mut session = Session::new(program, settings);
    let result = match mode {
        ReplMode::Editor => {
            // Banners only if stderr is a TTY
            if io::stderr().is_terminal() {
                eprintln!("Brainfuck REPL: the tape is kept between lines.");
                eprintln!("Type :help for commands, Ctrl+D or :q to leave.");
                let _ = io::stderr().flush();
            }
            editor_loop(&mut session)
        }
        ReplMode::Bare => {
            let stdout = io::stdout();
            bare_loop(&mut session, io::stdin().lock(), &mut stdout.lock())
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{program}: REPL error: {e}");
            let _ = io::stderr().flush();
            1
        }
    }
}
