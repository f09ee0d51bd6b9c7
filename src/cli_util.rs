use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;

use crate::BfiError;
use crate::config::ColorMode;
use crate::theme::catppuccin::Mocha as P;

/// Whether a stream should be styled under `mode`; `Auto` follows the
/// stream's terminal status.
pub fn color_for(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal,
    }
}

pub fn stderr_color(mode: ColorMode) -> bool {
    color_for(mode, io::stderr().is_terminal())
}

pub fn stdout_color(mode: ColorMode) -> bool {
    color_for(mode, io::stdout().is_terminal())
}

/// Pretty-print a [`BfiError`] to stderr, with caret positioning for errors
/// tied to an instruction. `code` is the filtered program text, so instruction
/// indices line up with characters.
pub fn print_error(program: &str, code: &str, err: &BfiError, color: bool) {
    eprint!("{}", render_error(program, code, err, color));
    let _ = io::stderr().flush();
}

pub fn render_error(program: &str, code: &str, err: &BfiError, color: bool) -> String {
    match err {
        BfiError::MalformedProgram { ip, kind } => {
            let msg = format!("{program}: Parse error: unmatched bracket {kind}");
            render_with_context(&msg, code, *ip, color)
        }
        other => {
            let msg = format!("{program}: {other}");
            format!("{}\n", paint(Style::new().fg(P::RED).bold(), &msg, color))
        }
    }
}

/// A concise error line with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn render_with_context(prefix: &str, code: &str, pos: usize, color: bool) -> String {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    let slice = &code[start_byte..end_byte];

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));

    let headline = format!("{prefix} at instruction {pos}");
    format!(
        "{}\n  {}\n  {}\n",
        paint(Style::new().fg(P::RED).bold(), &headline, color),
        paint(Style::new().fg(P::SURFACE2), slice, color),
        paint(Style::new().fg(P::PEACH).bold(), &underline, color),
    )
}

pub fn paint(style: Style, text: &str, color: bool) -> String {
    if color {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
