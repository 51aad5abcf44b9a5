use std::borrow::Cow;
use std::{error, fmt, io, string};

use crate::Fourcc;

/// Type alias for the result of tag operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kinds of errors that may occur while performing metadata operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// An atom could not be found. Contains the atom's identifier.
    AtomNotFound(Fourcc),
    /// A descriptor could not be found. Contains the descriptor's tag.
    DescriptorNotFound(u8),
    /// No filetype (`ftyp`) atom, which indicates an MPEG-4 file, could be found.
    NoFtyp,
    /// The content of an atom doesn't match its header.
    Parsing,
    /// The metadata (`meta`) handler is of an unsupported type. Contains the handler type.
    UnsupportedMetaHandler(Fourcc),
    /// A track referenced by a chapter reference (`chap`) atom could not be found. Contains the
    /// referenced track id.
    TrackNotFound(u32),
    /// Either the version byte of an atom or a descriptor is unknown. Contains the unknown version.
    UnknownVersion(u8),
    /// A recomputed size or offset exceeds the width of the field it is stored in. Contains the
    /// name of the field.
    Overflow(&'static str),
    /// An invalid utf-8 string was found. Contains the invalid data.
    Utf8StringDecoding(string::FromUtf8Error),
    /// An IO error has occurred.
    Io(io::Error),
}

impl ErrorKind {
    /// Malformed input that a read degrades on instead of aborting.
    pub(crate) fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::AtomNotFound(_)
                | Self::DescriptorNotFound(_)
                | Self::Parsing
                | Self::TrackNotFound(_)
                | Self::UnknownVersion(_)
                | Self::Utf8StringDecoding(_)
        )
    }
}

/// Any error that may occur while performing metadata operations.
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// A human readable string describing the error.
    pub description: Cow<'static, str>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Error {
        Error { kind, description: description.into() }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind {
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        let description = format!("IO error: {err}");
        Error::new(ErrorKind::Io(err), description)
    }
}

impl From<string::FromUtf8Error> for Error {
    fn from(err: string::FromUtf8Error) -> Error {
        Error::new(ErrorKind::Utf8StringDecoding(err), "Data is not valid utf-8.")
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}:\n{:?}", self.description, self.kind)
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{:?}", self.kind)
        } else {
            write!(f, "{}:\n{:?}", self.description, self.kind)
        }
    }
}
