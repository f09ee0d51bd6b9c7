//! Interactive sessions.
//!
//! A [`Session`] keeps one [`Tape`] alive across lines: every submitted line
//! is loaded as its own program and runs from wherever the previous line left
//! the pointer and cells. After each run the cells around the pointer are
//! rendered with a caret under the current cell.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use nu_ansi_term::Style;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Highlighter, Reedline, Signal, StyledText};
use tracing::debug;

use crate::cli_util::{paint, print_error, stderr_color, stdout_color};
use crate::commands::run::execute_with_limits;
use crate::config::Settings;
use crate::program::Program;
use crate::tape::{TAPE_LEN, Tape};
use crate::theme::catppuccin::Mocha as P;

/// Cells shown in the tape view after each line.
pub const WINDOW_CELLS: usize = 10;

const CELL_WIDTH: usize = 6;

pub const ENV_REPL_MODE: &str = "BFI_REPL_MODE";

/// What the caller should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Quit,
}

pub struct Session {
    tape: Tape,
    settings: Settings,
    program: String,
    err_color: bool,
    out_color: bool,
}

impl Session {
    /// A session on a zeroed tape. `program` prefixes diagnostics.
    pub fn new(program: &str, settings: Settings) -> Self {
        Self {
            tape: Tape::new(),
            err_color: stderr_color(settings.color),
            out_color: stdout_color(settings.color),
            settings,
            program: program.to_string(),
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Handle one line of input: a meta command or a Brainfuck fragment.
    ///
    /// Program output and the tape view go to `out`; diagnostics and help go
    /// to stderr. A fragment that fails leaves the tape as it was before the
    /// line.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<LineOutcome> {
        match line.trim() {
            "" => return Ok(LineOutcome::Continue),
            ":q" | ":exit" => return Ok(LineOutcome::Quit),
            ":?" | ":help" => {
                print_help();
                return Ok(LineOutcome::Continue);
            }
            ":r" | ":reset" => {
                self.tape = Tape::new();
                write!(out, "{}", render_tape(&self.tape, self.out_color))?;
                out.flush()?;
                return Ok(LineOutcome::Continue);
            }
            _ => {}
        }

        let code = Program::load(line);
        let code_str = code.to_string();
        // Each line gets its own flag; Ctrl+C ends the whole session instead.
        let cancel = Arc::new(AtomicBool::new(false));
        match execute_with_limits(code, self.tape.clone(), &self.settings, cancel, false) {
            Ok(execution) => {
                debug!(pointer = execution.tape.pointer(), "line finished");
                self.tape = execution.tape;
                writeln!(out, "{}", execution.output)?;
                write!(out, "{}", render_tape(&self.tape, self.out_color))?;
            }
            Err(err) => print_error(&self.program, &code_str, &err, self.err_color),
        }
        out.flush()?;
        Ok(LineOutcome::Continue)
    }
}

/// First cell of the view: the pointer sits in the middle where possible and
/// the view never runs past the end of the tape.
pub fn window_start(pointer: usize) -> usize {
    pointer.saturating_sub(WINDOW_CELLS / 2).min(TAPE_LEN - WINDOW_CELLS)
}

/// Indices, values and a caret under the pointer, one row each.
pub fn render_tape(tape: &Tape, color: bool) -> String {
    let start = window_start(tape.pointer());
    let cells = tape.window(start, WINDOW_CELLS);

    let indices: String = (start..start + cells.len()).map(|i| format!("{i:>CELL_WIDTH$}")).collect();
    let values: String = cells.iter().map(|v| format!("{v:>CELL_WIDTH$}")).collect();
    let caret = format!("{}^", " ".repeat((tape.pointer() - start) * CELL_WIDTH + CELL_WIDTH - 1));

    format!(
        "{}\n{}\n{}\n",
        paint(Style::new().fg(P::SURFACE2), &indices, color),
        values,
        paint(Style::new().fg(P::PEACH).bold(), &caret, color),
    )
}

fn print_help() {
    eprintln!(
        r#"Each line runs as a program on the same tape.
  :q, :exit     quit
  :r, :reset    clear the tape and move the pointer to cell 0
  :?, :help     show this help"#
    );
    let _ = io::stderr().flush();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

/// Pick the mode: flags, then `BFI_REPL_MODE`, then the line editor when stdin
/// is a terminal.
pub fn select_mode(
    flag: ModeFlagOverride,
    env_value: Option<&str>,
    stdin_is_tty: bool,
) -> Result<ReplMode, String> {
    let requested = match flag {
        ModeFlagOverride::Bare => Some(ReplMode::Bare),
        ModeFlagOverride::Editor => Some(ReplMode::Editor),
        ModeFlagOverride::None => match env_value.map(|v| v.trim().to_ascii_lowercase()) {
            None => None,
            Some(v) if v == "bare" => Some(ReplMode::Bare),
            Some(v) if v == "editor" => Some(ReplMode::Editor),
            Some(_) => {
                return Err(format!(
                    "invalid {ENV_REPL_MODE} value: {}, must be 'bare' or 'editor'",
                    env_value.unwrap_or_default()
                ));
            }
        },
    };

    match requested {
        Some(ReplMode::Editor) if !stdin_is_tty => {
            Err("cannot start editor: stdin is not a TTY (use --bare)".to_string())
        }
        Some(mode) => Ok(mode),
        None if stdin_is_tty => Ok(ReplMode::Editor),
        None => Ok(ReplMode::Bare),
    }
}

/// Feed `input` to the session line by line until EOF or a quit command.
pub fn bare_loop<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> io::Result<()> {
    for line in input.lines() {
        if session.handle_line(&line?, out)? == LineOutcome::Quit {
            break;
        }
    }
    out.flush()
}

/// Read lines through the line editor until Ctrl+D, Ctrl+C or a quit command.
pub fn editor_loop(session: &mut Session) -> io::Result<()> {
    let history = FileBackedHistory::new(1_000).map_err(|e| io::Error::other(e.to_string()))?;
    let mut editor = Reedline::create()
        .with_highlighter(Box::new(BrainfuckHighlighter::new_catppuccin_mocha()))
        .with_history(Box::new(history));
    let prompt = DefaultPrompt::new(DefaultPromptSegment::Basic("bf".to_string()), DefaultPromptSegment::Empty);

    let stdout = io::stdout();
    write!(stdout.lock(), "{}", render_tape(session.tape(), session.out_color))?;

    loop {
        match editor.read_line(&prompt)? {
            Signal::Success(line) => {
                if session.handle_line(&line, &mut stdout.lock())? == LineOutcome::Quit {
                    return Ok(());
                }
            }
            Signal::CtrlC | Signal::CtrlD => {
                println!();
                return io::stdout().flush();
            }
        }
    }
}

struct BrainfuckHighlighter {
    movement_right: Style,
    movement_left: Style,
    increment: Style,
    decrement: Style,
    output: Style,
    input: Style,
    bracket: Style,
    other: Style,
}

impl BrainfuckHighlighter {
    // > <   => SKY/TEAL (movement)
    // + -   => GREEN/RED (data modification)
    // . ,   => YELLOW/PEACH (I/O)
    // [ ]   => MAUVE (flow control)
    fn new_catppuccin_mocha() -> Self {
        Self {
            movement_right: Style::new().fg(P::SKY).bold(),
            movement_left: Style::new().fg(P::TEAL).bold(),
            increment: Style::new().fg(P::GREEN).bold(),
            decrement: Style::new().fg(P::RED).bold(),
            output: Style::new().fg(P::YELLOW).bold(),
            input: Style::new().fg(P::PEACH).bold(),
            bracket: Style::new().fg(P::MAUVE).bold(),
            other: Style::new().fg(P::SURFACE2),
        }
    }

    fn style_for(&self, ch: char) -> Style {
        match ch {
            '>' => self.movement_right,
            '<' => self.movement_left,
            '+' => self.increment,
            '-' => self.decrement,
            '.' => self.output,
            ',' => self.input,
            '[' | ']' => self.bracket,
            _ => self.other,
        }
    }
}

impl Highlighter for BrainfuckHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out = StyledText::new();
        let mut run: Option<(Style, String)> = None;

        for ch in line.chars() {
            let style = self.style_for(ch);
            match run.as_mut() {
                Some((s, text)) if *s == style => text.push(ch),
                _ => {
                    if let Some(done) = run.take() {
                        out.push(done);
                    }
                    run = Some((style, ch.to_string()));
                }
            }
        }
        if let Some(done) = run {
            out.push(done);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorMode;
    use std::io::Cursor;

    fn session() -> Session {
        let settings = Settings { color: ColorMode::Never, ..Settings::default() };
        Session::new("bfi", settings)
    }

    fn feed(session: &mut Session, line: &str) -> (LineOutcome, String) {
        let mut out = Vec::new();
        let outcome = session.handle_line(line, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn tape_persists_between_lines() {
        let mut s = session();
        feed(&mut s, "+++>+");
        let (_, out) = feed(&mut s, "<.");
        assert!(out.starts_with("\u{3}\n"));
        assert_eq!(s.tape().pointer(), 0);
        assert_eq!(s.tape().window(0, 2), &[3, 1]);
    }

    #[test]
    fn failed_line_leaves_tape_untouched() {
        let mut s = session();
        feed(&mut s, "++>");
        let (outcome, out) = feed(&mut s, "+++]");
        assert_eq!(outcome, LineOutcome::Continue);
        assert!(out.is_empty());
        assert_eq!(s.tape().pointer(), 1);
        assert_eq!(s.tape().window(0, 2), &[2, 0]);
    }

    #[test]
    fn meta_commands() {
        let mut s = session();
        feed(&mut s, "+++>>");
        let (outcome, out) = feed(&mut s, ":reset");
        assert_eq!(outcome, LineOutcome::Continue);
        assert_eq!(s.tape().pointer(), 0);
        assert!(s.tape().window(0, WINDOW_CELLS).iter().all(|&c| c == 0));
        assert!(out.ends_with("     ^\n"));

        assert_eq!(feed(&mut s, ":q").0, LineOutcome::Quit);
        assert_eq!(feed(&mut s, "  :exit ").0, LineOutcome::Quit);
        assert_eq!(feed(&mut s, "").0, LineOutcome::Continue);
    }

    #[test]
    fn render_puts_caret_under_pointer() {
        let mut tape = Tape::new();
        for _ in 0..7 {
            tape.move_right();
        }
        tape.increment();
        let text = render_tape(&tape, false);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "     2     3     4     5     6     7     8     9    10    11");
        assert_eq!(rows[1], "     0     0     0     0     0     1     0     0     0     0");
        assert_eq!(rows[2].len(), 5 * CELL_WIDTH + CELL_WIDTH);
        assert!(rows[2].ends_with('^'));
    }

    #[test]
    fn window_stays_on_the_tape() {
        assert_eq!(window_start(0), 0);
        assert_eq!(window_start(4), 0);
        assert_eq!(window_start(100), 95);
        assert_eq!(window_start(TAPE_LEN - 1), TAPE_LEN - WINDOW_CELLS);

        let mut tape = Tape::new();
        tape.move_left();
        let text = render_tape(&tape, false);
        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[0].ends_with(&format!("{}", TAPE_LEN - 1)));
        assert_eq!(rows[2].len(), WINDOW_CELLS * CELL_WIDTH);
    }

    #[test]
    fn mode_selection_order() {
        use ModeFlagOverride as F;

        assert_eq!(select_mode(F::Bare, Some("editor"), true), Ok(ReplMode::Bare));
        assert_eq!(select_mode(F::None, Some("bare"), true), Ok(ReplMode::Bare));
        assert_eq!(select_mode(F::None, None, true), Ok(ReplMode::Editor));
        assert_eq!(select_mode(F::None, None, false), Ok(ReplMode::Bare));
        assert!(select_mode(F::Editor, None, false).is_err());
        assert!(select_mode(F::None, Some("tui"), true).unwrap_err().contains("tui"));
    }

    #[test]
    fn bare_loop_stops_at_quit() {
        let mut s = session();
        let mut out = Vec::new();
        bare_loop(&mut s, Cursor::new("++\n:q\n+++\n"), &mut out).unwrap();
        assert_eq!(s.tape().window(0, 1), &[2]);
    }

    #[test]
    fn highlighter_groups_runs_of_one_style() {
        let styled = BrainfuckHighlighter::new_catppuccin_mocha().highlight("++>x", 0);
        let texts: Vec<&str> = styled.buffer.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["++", ">", "x"]);
    }
}
