//! Definition of errors.

use std::error::Error;
use std::fmt;

/// A specialized Result type for Morceus.
pub type Result<T, E = MorceusError> = std::result::Result<T, E>;

/// The error type for Morceus.
#[derive(Debug)]
pub enum MorceusError {
    /// The error variant for [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`DecodeError`](bincode::error::DecodeError).
    BincodeDecode(bincode::error::DecodeError),

    /// The error variant for [`EncodeError`](bincode::error::EncodeError).
    BincodeEncode(bincode::error::EncodeError),

    /// The error variant for [`std::io::Error`].
    StdIo(std::io::Error),
}

impl MorceusError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<A, S>(arg: A, msg: S) -> Self
    where
        A: Into<String>,
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg: arg.into(),
            msg: msg.into(),
        })
    }
}

impl fmt::Display for MorceusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::BincodeDecode(e) => e.fmt(f),
            Self::BincodeEncode(e) => e.fmt(f),
            Self::StdIo(e) => e.fmt(f),
        }
    }
}

impl Error for MorceusError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a template, stem, or index source is malformed.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the source (usually a file, optionally with a line number).
    pub(crate) arg: String,

    /// Error message.
    pub(crate) msg: String,
}

impl InvalidFormatError {
    /// Gets the message of the error.
    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

impl From<bincode::error::DecodeError> for MorceusError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::BincodeDecode(error)
    }
}

impl From<bincode::error::EncodeError> for MorceusError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::BincodeEncode(error)
    }
}

impl From<std::io::Error> for MorceusError {
    fn from(error: std::io::Error) -> Self {
        Self::StdIo(error)
    }
}
