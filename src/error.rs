use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot compress empty input")]
    EmptyInput,

    #[error("code for byte {byte:#04x} is {len} bits long, header allows at most 255")]
    CodeTooLong { byte: u8, len: usize },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    #[error("byte {0:#04x} has no code in the table")]
    UnmappedByte(u8),

    #[error("{}: expected a .{extension} file", path.display())]
    BadExtension { path: PathBuf, extension: String },
}

impl HuffError {
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        HuffError::MalformedHeader(msg.to_string())
    }

    pub fn corrupt<T: fmt::Display>(msg: T) -> Self {
        HuffError::CorruptStream(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;
