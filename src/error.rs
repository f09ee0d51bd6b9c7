use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading or interpreting a program.
#[derive(Debug, thiserror::Error)]
pub enum BfiError {
    /// A loop bracket has no structural counterpart.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    MalformedProgram { ip: usize, kind: BracketKind },

    /// The program source could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the `--debug` step table failed.
    #[error("failed to write debug trace: {0}")]
    Trace(#[source] std::io::Error),

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation.
    #[error("Execution aborted: cancelled")]
    Canceled,

    /// The run outlived its wall-clock budget and was abandoned.
    #[error("Execution aborted: wall-clock timeout exceeded ({ms} ms)")]
    TimedOut { ms: u64 },

    /// The interpreter thread went away without reporting a result.
    #[error("interpreter thread exited unexpectedly")]
    WorkerExited,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_program_message_names_bracket_and_position() {
        let err = BfiError::MalformedProgram { ip: 7, kind: BracketKind::Close };
        assert_eq!(err.to_string(), "Unmatched bracket ']' at instruction 7");
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;

        let err = BfiError::Io {
            path: PathBuf::from("missing.bf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert!(err.to_string().contains("missing.bf"));
        assert!(err.source().is_some());
    }

    #[test]
    fn timeout_message_names_budget() {
        let err = BfiError::TimedOut { ms: 250 };
        assert_eq!(err.to_string(), "Execution aborted: wall-clock timeout exceeded (250 ms)");
    }
}
