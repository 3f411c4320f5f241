
//! Error type definitions.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::convert::TryFrom;
pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;


/// A result that may contain a dds error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains a dds error.
pub type UnitResult = Result<()>;


/// An error that may happen while writing a dds file.
/// Distinguishes between three types of errors:
/// unsupported features, invalid data, and file system errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {

    /// The requested image or encoding is not supported by
    /// this specific encoder, even though it may be valid.
    /// Array textures and the BC5, BC6H and BC7 block formats are reported this way.
    #[error("not supported: {0}")]
    NotSupported(Cow<'static, str>),

    /// The image description or the pixel data are contradicting or insufficient.
    #[error("invalid: {0}")]
    Invalid(Cow<'static, str>),

    /// The underlying byte stream could not be written or seeked successfully,
    /// probably due to file system related errors.
    #[error("{0}")]
    Io(IoError),
}


impl Error {

    /// Create an error of the variant `Invalid`.
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Invalid(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub(crate) fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }
}

/// Enable using the `?` operator on `std::io::Result`.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            Error::invalid("reference to missing bytes")
        }
        else {
            Error::Io(error)
        }
    }
}


/// Return error on invalid range.
#[inline]
pub(crate) fn usize_to_u32(value: usize, error_message: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::invalid(error_message))
}

/// Return error on invalid range.
#[inline]
pub(crate) fn u64_to_usize(value: u64, error_message: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::invalid(error_message))
}
