use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::sync::RwLock;

use crate::{Img, ImgBuf, ImgFmt, ImgRef};

use super::*;

// [Table 3-5 Well-known data types](https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/Metadata/Metadata.html#//apple_ref/doc/uid/TP40000939-CH1-SW34) codes
/// Reserved for use where no type needs to be indicated.
const RESERVED: u32 = 0;
/// UTF-8 without any count or NULL terminator.
const UTF8: u32 = 1;
/// UTF-16 also known as UTF-16BE.
const UTF16: u32 = 2;
/// GIF image data.
const GIF: u32 = 12;
/// JPEG in a JFIF wrapper.
const JPEG: u32 = 13;
/// PNG in a PNG wrapper.
const PNG: u32 = 14;
/// A big-endian signed integer in 1,2,3 or 4 bytes.
const BE_SIGNED: u32 = 21;
/// Windows bitmap format graphics.
const BMP: u32 = 27;

lazy_static! {
    /// Data class codes observed for custom identifiers, remembered so that replacement values
    /// are written with the same class.
    static ref CLASS_REGISTRY: RwLock<HashMap<DataIdent, u32>> = RwLock::new(HashMap::new());
}

/// Remembers the class code an identifier was read with.
fn remember_class(ident: &DataIdent, class: u32) {
    if let Ok(mut registry) = CLASS_REGISTRY.write() {
        registry.entry(ident.clone()).or_insert(class);
    }
}

/// Returns the class code an identifier was previously read with.
fn remembered_class(ident: &DataIdent) -> Option<u32> {
    CLASS_REGISTRY.read().ok()?.get(ident).copied()
}

/// An enum that holds different types of data defined by
/// [Table 3-5 Well-known data types](https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/Metadata/Metadata.html#//apple_ref/doc/uid/TP40000939-CH1-SW34).
#[derive(Clone, Eq, PartialEq)]
pub enum Data {
    /// A value containing reserved type data inside a `Vec<u8>`.
    Reserved(Vec<u8>),
    /// A value containing a `String` decoded from, or to be encoded to utf-8.
    Utf8(String),
    /// A value containing a `String` decoded from, or to be encoded to utf-16.
    Utf16(String),
    /// A value containing gif byte data inside a `Vec<u8>`.
    Gif(Vec<u8>),
    /// A value containing jpeg byte data inside a `Vec<u8>`.
    Jpeg(Vec<u8>),
    /// A value containing png byte data inside a `Vec<u8>`.
    Png(Vec<u8>),
    /// A value containing big endian signed integer inside a `Vec<u8>`.
    BeSigned(Vec<u8>),
    /// A value containing bmp byte data inside a `Vec<u8>`.
    Bmp(Vec<u8>),
    /// A value containing an unknown data type code and data.
    Unknown {
        /// The data type code.
        code: u32,
        /// The data.
        data: Vec<u8>,
    },
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved(d) => write!(f, "Data::Reserved({d:?})"),
            Self::Utf8(d) => write!(f, "Data::Utf8({d:?})"),
            Self::Utf16(d) => write!(f, "Data::Utf16({d:?})"),
            Self::Gif(_) => write!(f, "Data::Gif"),
            Self::Jpeg(_) => write!(f, "Data::Jpeg"),
            Self::Png(_) => write!(f, "Data::Png"),
            Self::BeSigned(d) => write!(f, "Data::BeSigned({d:?})"),
            Self::Bmp(_) => write!(f, "Data::Bmp"),
            Self::Unknown { code, data } => {
                f.debug_struct("Data::Unknown").field("code", code).field("data", data).finish()
            }
        }
    }
}

impl<T: Into<Vec<u8>>> From<Img<T>> for Data {
    fn from(image: Img<T>) -> Self {
        match image.fmt {
            ImgFmt::Jpeg => Self::Jpeg(image.data.into()),
            ImgFmt::Png => Self::Png(image.data.into()),
            ImgFmt::Bmp => Self::Bmp(image.data.into()),
            ImgFmt::Gif => Self::Gif(image.data.into()),
            ImgFmt::Unknown => Self::Reserved(image.data.into()),
        }
    }
}

impl Data {
    /// Parses a data atom's content. The class byte determines how the value is decoded,
    /// `ident` disambiguates the reserved class.
    pub fn parse(
        reader: &mut (impl Read + Seek),
        ident: &DataIdent,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, flags) = parse_full_head(reader)?;
        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Error reading data atom (data)",
            ));
        }
        let [b2, b1, b0] = flags;
        let class = u32::from_be_bytes([0, b2, b1, b0]);

        // 4 byte locale indicator
        reader.skip(4)?;

        if size.content_len() < 8 {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                "Data atom (data) is smaller than its type header",
            ));
        }
        let data_len = size.content_len() - 8;

        let data = match class {
            RESERVED if ident == &DataIdent::Fourcc(ARTWORK) => {
                // image data without a class, the format is sniffed from the header bytes
                let data = reader.read_u8_vec(data_len)?;
                match ImgFmt::sniff(&data) {
                    ImgFmt::Jpeg => Data::Jpeg(data),
                    ImgFmt::Png => Data::Png(data),
                    ImgFmt::Bmp => Data::Bmp(data),
                    ImgFmt::Gif => Data::Gif(data),
                    ImgFmt::Unknown => Data::Reserved(data),
                }
            }
            RESERVED => Data::Reserved(reader.read_u8_vec(data_len)?),
            UTF8 => Data::Utf8(reader.read_utf8(data_len)?),
            UTF16 => Data::Utf16(reader.read_utf16(data_len)?),
            GIF => Data::Gif(reader.read_u8_vec(data_len)?),
            JPEG => Data::Jpeg(reader.read_u8_vec(data_len)?),
            PNG => Data::Png(reader.read_u8_vec(data_len)?),
            BE_SIGNED => Data::BeSigned(reader.read_u8_vec(data_len)?),
            BMP => Data::Bmp(reader.read_u8_vec(data_len)?),
            _ => {
                log::warn!("Unknown data class {class} of '{ident}'");
                Data::Unknown { code: class, data: reader.read_u8_vec(data_len)? }
            }
        };

        match &data {
            Data::Utf8(_) => (),
            _ => remember_class(ident, class),
        }

        Ok(data)
    }

    /// Creates string data for the identifier, using the class code the identifier was
    /// previously read with. Integer classes parse the string as a number, everything else is
    /// stored as utf-8.
    pub fn with_remembered_class(ident: &DataIdent, value: impl Into<String>) -> Self {
        let value = value.into();
        match remembered_class(ident) {
            Some(BE_SIGNED) => match value.parse::<i32>() {
                Ok(n) => Data::be_signed(n),
                Err(_) => Data::Utf8(value),
            },
            _ => Data::Utf8(value),
        }
    }

    /// Creates big endian signed integer data in the smallest of 1, 2 or 4 bytes.
    pub fn be_signed(value: i32) -> Self {
        if let Ok(n) = i8::try_from(value) {
            Self::BeSigned(n.to_be_bytes().to_vec())
        } else if let Ok(n) = i16::try_from(value) {
            Self::BeSigned(n.to_be_bytes().to_vec())
        } else {
            Self::BeSigned(value.to_be_bytes().to_vec())
        }
    }

    /// Attempts to write the data atom to the writer.
    pub fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        write_head(writer, Head::from(self.size(), DATA))?;

        let class = match self {
            Self::Reserved(_) => RESERVED,
            Self::Utf8(_) => UTF8,
            Self::Utf16(_) => UTF16,
            Self::Gif(_) => GIF,
            Self::Jpeg(_) => JPEG,
            Self::Png(_) => PNG,
            Self::BeSigned(_) => BE_SIGNED,
            Self::Bmp(_) => BMP,
            Self::Unknown { code, .. } => *code,
        };

        writer.write_be_u32(class)?;
        // 4 byte locale indicator
        writer.write_all(&[0; 4])?;

        match self {
            Self::Reserved(v) => writer.write_all(v)?,
            Self::Utf8(s) => writer.write_utf8(s)?,
            Self::Utf16(s) => {
                for c in s.encode_utf16() {
                    writer.write_be_u16(c)?;
                }
            }
            Self::Gif(v) => writer.write_all(v)?,
            Self::Jpeg(v) => writer.write_all(v)?,
            Self::Png(v) => writer.write_all(v)?,
            Self::BeSigned(v) => writer.write_all(v)?,
            Self::Bmp(v) => writer.write_all(v)?,
            Self::Unknown { data, .. } => writer.write_all(data)?,
        }

        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::from(8 + self.data_len())
    }

    /// Returns the length of the raw data (without version, class and locale header) in bytes.
    pub fn data_len(&self) -> u64 {
        (match self {
            Self::Reserved(v) => v.len(),
            Self::Utf8(s) => s.len(),
            Self::Utf16(s) => 2 * s.encode_utf16().count(),
            Self::Gif(v) => v.len(),
            Self::Jpeg(v) => v.len(),
            Self::Png(v) => v.len(),
            Self::BeSigned(v) => v.len(),
            Self::Bmp(v) => v.len(),
            Self::Unknown { data, .. } => data.len(),
        }) as u64
    }

    /// Returns true if the data is of length 0, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.data_len() == 0
    }

    /// Returns a reference to byte data if `self` is of type [`Self::Reserved`] or
    /// [`Self::BeSigned`].
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Reserved(v) => Some(v),
            Self::BeSigned(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a reference to a string if `self` is of type [`Self::Utf8`] or [`Self::Utf16`].
    pub fn string(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            Self::Utf16(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns a mutable reference to a string if `self` is of type [`Self::Utf8`] or
    /// [`Self::Utf16`].
    pub fn string_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Utf8(s) => Some(s),
            Self::Utf16(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes `self` and returns a string if `self` is of type [`Self::Utf8`] or
    /// [`Self::Utf16`].
    pub fn take_string(self) -> Option<String> {
        match self {
            Self::Utf8(s) => Some(s),
            Self::Utf16(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to an image if `self` is of an image type.
    pub fn image(&self) -> Option<ImgRef<'_>> {
        match self {
            Self::Gif(v) => Some(Img::gif(v)),
            Self::Jpeg(v) => Some(Img::jpeg(v)),
            Self::Png(v) => Some(Img::png(v)),
            Self::Bmp(v) => Some(Img::bmp(v)),
            _ => None,
        }
    }

    /// Consumes `self` and returns an image if `self` is of an image type.
    pub fn take_image(self) -> Option<ImgBuf> {
        match self {
            Self::Gif(v) => Some(Img::gif(v)),
            Self::Jpeg(v) => Some(Img::jpeg(v)),
            Self::Png(v) => Some(Img::png(v)),
            Self::Bmp(v) => Some(Img::bmp(v)),
            _ => None,
        }
    }

    /// Returns an integer parsed from up to 4 bytes of big endian integer data.
    pub fn be_int(&self) -> Option<i64> {
        let bytes = self.bytes()?;
        match bytes.len() {
            1 => Some(i8::from_be_bytes([bytes[0]]) as i64),
            2 => Some(i16::from_be_bytes([bytes[0], bytes[1]]) as i64),
            3 => Some(i32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]) as i64),
            4 => Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64),
            _ => None,
        }
    }
}
