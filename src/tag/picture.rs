use crate::{Data, Img, ImgFmt, ImgRef};

/// The normalized type of an embedded picture. MPEG-4 artwork carries no type information, so
/// pictures always read as [`PicType::Generic`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PicType {
    /// A picture without a dedicated type.
    Generic,
    /// The front cover of the release.
    FrontCover,
    /// The back cover of the release.
    BackCover,
    /// A file icon.
    Icon,
    /// A page of the leaflet.
    Leaflet,
    /// A picture of the media carrier.
    Media,
    /// A picture type this container can't represent.
    Unsupported,
}

/// An embedded picture of an audio file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Picture {
    /// The image format, sniffed from the header bytes when the container doesn't declare it.
    pub fmt: ImgFmt,
    /// The normalized picture type.
    pub pic_type: PicType,
    /// The raw image data.
    pub data: Vec<u8>,
    /// Whether the picture is marked for deletion. Marked pictures are kept in the tag so that
    /// edits compose, and are dropped when the tag is written.
    pub remove: bool,
}

impl Picture {
    /// Creates a new generic picture with the image data.
    pub fn new(img: Img<impl Into<Vec<u8>>>) -> Self {
        Self { fmt: img.fmt, pic_type: PicType::Generic, data: img.data.into(), remove: false }
    }

    /// Returns the image data as an image.
    pub fn img(&self) -> ImgRef<'_> {
        Img::new(self.fmt, &self.data)
    }

    /// Returns a hash over the image bytes, used to detect whether the same picture slot holds
    /// new bytes.
    pub fn content_hash(&self) -> u64 {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for b in self.data.iter() {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash
    }

    pub(crate) fn from_data(data: Data) -> Option<Self> {
        let img = data.take_image()?;
        Some(Self::new(img))
    }

    pub(crate) fn to_data(&self) -> Data {
        Data::from(Img::new(self.fmt, self.data.clone()))
    }
}
