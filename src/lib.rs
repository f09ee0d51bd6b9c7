//! A small Brainfuck interpreter.
//!
//! Programs run on a circular tape of 65,535 eight-bit cells with a single
//! data pointer.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0.
//! - The data pointer wraps: moving left from cell 0 lands on the last cell
//!   and moving right from the last cell lands on cell 0.
//! - Cells wrap modulo 256 on `+` and `-`.
//! - Output `.` appends the current cell as a character (code point 0..=255)
//!   to an output string returned at the end of the run.
//! - Input `,` is accepted and does nothing.
//! - Any character outside of `><+-.,[]` is ignored.
//! - Nested loops `[]` are supported; unmatched brackets are reported as
//!   [`BfiError::MalformedProgram`].
//! - [`repl::Session`] runs line after line on one persistent tape.
//!
//! Quick start:
//!
//! ```
//! use bfi::{Engine, Program};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let program = Program::load(code);
//! let output = Engine::new(&program).run().expect("program should run");
//! assert_eq!(output, "Hello World!\n");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod program;
pub mod repl;
pub mod tape;
pub mod theme;

pub use engine::{Engine, Execution, StepControl};
pub use error::{BfiError, BracketKind};
pub use program::{Instruction, Program};
pub use tape::{CELL_MODULUS, TAPE_LEN, Tape};
