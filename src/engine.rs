//! The fetch-execute loop.
//!
//! An [`Engine`] owns one [`Tape`] and one output buffer and runs a borrowed
//! [`Program`] until the instruction pointer walks off the end. Loop jumps are
//! resolved lazily by scanning for the structurally matching bracket.
//!
//! ```
//! use bfi::{Engine, Program};
//!
//! let program = Program::load("++++++++[>++++++++<-]>+.");
//! let output = Engine::new(&program).run().expect("balanced program");
//! assert_eq!(output, "A");
//! ```

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{BfiError, BracketKind};
use crate::program::{Instruction, Program};
use crate::tape::Tape;

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Default)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct Execution {
    pub output: String,
    pub elapsed: Duration,
    pub tape: Tape,
}

/// A single run of one program.
///
/// The run methods consume the engine, so every run starts from the tape it
/// was built with: zeroed for [`Engine::new`], or a caller-supplied tape for
/// [`Engine::with_tape`].
pub struct Engine<'p> {
    program: &'p Program,
    tape: Tape,
    output: String,
}

impl<'p> Engine<'p> {
    /// Create an engine with a zeroed tape and empty output.
    pub fn new(program: &'p Program) -> Self {
        Self::with_tape(program, Tape::new())
    }

    /// Create an engine that continues from an existing tape and pointer.
    pub fn with_tape(program: &'p Program, tape: Tape) -> Self {
        Self {
            program,
            tape,
            output: String::new(),
        }
    }

    /// Execute the program until completion and return everything it printed.
    ///
    /// On error any output accumulated so far is dropped.
    pub fn run(mut self) -> Result<String, BfiError> {
        self.execute(None, None)?;
        Ok(self.output)
    }

    /// Execute with cooperative cancellation and an optional step limit.
    pub fn run_with_control(mut self, control: &StepControl) -> Result<Execution, BfiError> {
        let start = Instant::now();
        self.execute(Some(control), None)?;
        Ok(self.finish(start))
    }

    /// Run the program while writing a step-by-step table of operations to
    /// `trace`. The tape advances exactly as in a normal run; `.` is logged in
    /// the table as well as collected into the returned output.
    pub fn run_debug<W: Write>(
        mut self,
        control: Option<&StepControl>,
        trace: &mut W,
    ) -> Result<Execution, BfiError> {
        let start = Instant::now();
        self.execute(control, Some(trace as &mut dyn Write))?;
        Ok(self.finish(start))
    }

    fn finish(self, start: Instant) -> Execution {
        Execution {
            output: self.output,
            elapsed: start.elapsed(),
            tape: self.tape,
        }
    }

    fn execute(
        &mut self,
        control: Option<&StepControl>,
        mut table: Option<&mut dyn Write>,
    ) -> Result<(), BfiError> {
        self.program.validate()?;

        let len = self.program.len();
        debug!(instructions = len, "starting execution");

        if let Some(out) = table.as_mut() {
            writeln!(out, "STEP | IP  | PTR | CELL | INSTR | ACTION").map_err(BfiError::Trace)?;
            writeln!(
                out,
                "-----+-----+-----+------+-------+------------------------------------------------"
            )
            .map_err(BfiError::Trace)?;
        }

        let mut pc = 0;
        let mut step: usize = 0;

        while pc < len {
            if let Some(ctrl) = control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    debug!(step, "execution cancelled");
                    return Err(BfiError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if step >= max {
                        debug!(limit = max, "step limit exceeded");
                        return Err(BfiError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let instr = self.program[pc];
            let (ptr_before, cell_before) = (self.tape.pointer(), self.tape.current());
            let ip_before = pc;
            let mut action: Option<String> = table.as_ref().map(|_| String::new());

            match instr {
                Instruction::MoveRight => {
                    self.tape.move_right();
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.tape.pointer()); }
                }
                Instruction::MoveLeft => {
                    self.tape.move_left();
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.tape.pointer()); }
                }
                Instruction::Increment => {
                    self.tape.increment();
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", ptr_before, cell_before, self.tape.current()); }
                }
                Instruction::Decrement => {
                    self.tape.decrement();
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", ptr_before, cell_before, self.tape.current()); }
                }
                Instruction::Output => {
                    let ch = char::from(self.tape.current());
                    self.output.push(ch);
                    if let Some(a) = action.as_mut() { *a = format!("Output byte {} ({:?})", cell_before, ch); }
                }
                Instruction::Input => {
                    if let Some(a) = action.as_mut() { *a = "Input ignored".to_string(); }
                }
                Instruction::JumpIfZero => {
                    if self.tape.current() == 0 {
                        let target = match_forward(self.program, pc)?;
                        trace!(from = pc, to = target, "jump forward");
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump forward to matching ']' at IP {}", target); }
                        pc = target;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Instruction::JumpIfNonZero => {
                    if self.tape.current() != 0 {
                        let target = match_backward(self.program, pc)?;
                        trace!(from = pc, to = target, "jump back");
                        if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to matching '[' at IP {}", target); }
                        pc = target;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
            }

            if let Some(out) = table.as_mut() {
                writeln!(
                    out,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    step,
                    ip_before,
                    ptr_before,
                    cell_before,
                    instr,
                    action.unwrap_or_default()
                )
                .map_err(BfiError::Trace)?;
            }

            step += 1;
            pc += 1;
        }

        debug!(steps = step, output_len = self.output.len(), "execution finished");
        Ok(())
    }
}

/// Find the `]` matching the `[` at `open`.
///
/// Nested `[` raise the depth, `]` lower it; the first `]` seen at depth zero
/// is the match. Running off the end means the `[` is unmatched.
pub fn match_forward(program: &Program, open: usize) -> Result<usize, BfiError> {
    let mut depth: usize = 0;
    let mut ip = open + 1;
    while let Some(instr) = program.get(ip) {
        match instr {
            Instruction::JumpIfZero => depth += 1,
            Instruction::JumpIfNonZero if depth == 0 => return Ok(ip),
            Instruction::JumpIfNonZero => depth -= 1,
            _ => {}
        }
        ip += 1;
    }
    Err(BfiError::MalformedProgram { ip: open, kind: BracketKind::Open })
}

/// Find the `[` matching the `]` at `close`, scanning towards the start.
pub fn match_backward(program: &Program, close: usize) -> Result<usize, BfiError> {
    let mut depth: usize = 0;
    let mut ip = close;
    while ip > 0 {
        ip -= 1;
        match program[ip] {
            Instruction::JumpIfNonZero => depth += 1,
            Instruction::JumpIfZero if depth == 0 => return Ok(ip),
            Instruction::JumpIfZero => depth -= 1,
            _ => {}
        }
    }
    Err(BfiError::MalformedProgram { ip: close, kind: BracketKind::Close })
}
