//! Program loading.
//!
//! Source text is reduced to the eight Brainfuck instruction symbols
//! `><+-.,[]`; everything else (whitespace, comments, newlines) is dropped
//! silently. Past this boundary code only deals with [`Instruction`] values.

use std::convert::Infallible;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::{BfiError, BracketKind};

/// A single Brainfuck instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `>`
    MoveRight,
    /// `<`
    MoveLeft,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`, executed as a no-op.
    Input,
    /// `[`
    JumpIfZero,
    /// `]`
    JumpIfNonZero,
}

impl Instruction {
    /// Map a source character to its instruction, or `None` for anything else.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '>' => Instruction::MoveRight,
            '<' => Instruction::MoveLeft,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::JumpIfZero,
            ']' => Instruction::JumpIfNonZero,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::JumpIfZero => '[',
            Instruction::JumpIfNonZero => ']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An immutable, filtered instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Build a program from raw source text, keeping only instruction symbols
    /// in their original order.
    pub fn load(source: &str) -> Self {
        Self {
            instructions: source.chars().filter_map(Instruction::from_char).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<Instruction> {
        self.instructions.get(ip).copied()
    }

    /// Check that every `[` has a matching `]` and vice versa.
    ///
    /// Reports the first stray `]`, or failing that the innermost `[` left open.
    pub fn validate(&self) -> Result<(), BfiError> {
        let mut open: Vec<usize> = Vec::new();
        for (ip, instr) in self.instructions.iter().enumerate() {
            match instr {
                Instruction::JumpIfZero => open.push(ip),
                Instruction::JumpIfNonZero => {
                    if open.pop().is_none() {
                        return Err(BfiError::MalformedProgram { ip, kind: BracketKind::Close });
                    }
                }
                _ => {}
            }
        }

        match open.last().copied() {
            Some(ip) => Err(BfiError::MalformedProgram { ip, kind: BracketKind::Open }),
            None => Ok(()),
        }
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, ip: usize) -> &Instruction {
        &self.instructions[ip]
    }
}

impl FromStr for Program {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Program::load(s))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instr in &self.instructions {
            write!(f, "{instr}")?;
        }
        Ok(())
    }
}
