use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),

    #[error("Command is too long.")]
    TooLong,

    #[error("Too many arguments: at most {limit} per command.")]
    TooManyArgs { limit: usize },

    #[error("{0}: argument contains a NUL byte.")]
    NulByte(String),

    #[error("{0}: missing operand")]
    MissingOperand(&'static str),

    #[error("{builtin} usage: {builtin} [job_id]")]
    JobUsage { builtin: &'static str },

    #[error("{builtin} {id}: no such job.")]
    NoSuchJob { builtin: &'static str, id: u32 },

    #[error("{builtin}: no such job.")]
    NoCurrentJob { builtin: &'static str },

    #[error("cd: {path}: {source}")]
    ChangeDir { path: String, source: io::Error },

    #[error("execute pipe failed: {0}")]
    Pipe(io::Error),

    #[error("fork failed: {0}")]
    Fork(io::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
