use std::fmt;

/// The format of an image, determined by the starting bytes of its data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImgFmt {
    /// A jpeg image in a JFIF wrapper.
    Jpeg,
    /// A png image.
    Png,
    /// A windows bitmap image.
    Bmp,
    /// A gif image.
    Gif,
    /// An image of unrecognized format.
    Unknown,
}

impl fmt::Display for ImgFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Bmp => write!(f, "bmp"),
            Self::Gif => write!(f, "gif"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl ImgFmt {
    /// Sniffs the image format from the header bytes of the data.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Self::Png
        } else if data.starts_with(b"BM") {
            Self::Bmp
        } else if data.starts_with(b"GIF8") {
            Self::Gif
        } else {
            Self::Unknown
        }
    }
}

/// An image of a known format.
#[derive(Clone, PartialEq, Eq)]
pub struct Img<T> {
    /// The image format.
    pub fmt: ImgFmt,
    /// The image data.
    pub data: T,
}

/// An owned image.
pub type ImgBuf = Img<Vec<u8>>;
/// A borrowed image.
pub type ImgRef<'a> = Img<&'a [u8]>;

impl<T> Img<T> {
    /// Creates a new image with the format and data.
    pub const fn new(fmt: ImgFmt, data: T) -> Self {
        Self { fmt, data }
    }

    /// Creates a new jpeg image.
    pub const fn jpeg(data: T) -> Self {
        Self::new(ImgFmt::Jpeg, data)
    }

    /// Creates a new png image.
    pub const fn png(data: T) -> Self {
        Self::new(ImgFmt::Png, data)
    }

    /// Creates a new bmp image.
    pub const fn bmp(data: T) -> Self {
        Self::new(ImgFmt::Bmp, data)
    }

    /// Creates a new gif image.
    pub const fn gif(data: T) -> Self {
        Self::new(ImgFmt::Gif, data)
    }
}

impl<T: AsRef<[u8]>> Img<T> {
    /// Creates a new image, sniffing the format from the data's header bytes.
    pub fn sniffed(data: T) -> Self {
        let fmt = ImgFmt::sniff(data.as_ref());
        Self { fmt, data }
    }
}

impl<T: fmt::Debug> fmt::Debug for Img<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Img::{:?}", self.fmt)
    }
}
