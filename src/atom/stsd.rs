//! Sample description atom
//!
//! ```md
//! stsd
//! ├─ mp4a, enca, alac, samr, sawb (audio sample entry)
//! │  6 bytes reserved
//! │  2 bytes data reference index
//! │  8 bytes version, revision, vendor
//! │  2 bytes channel count
//! │  2 bytes sample size
//! │  4 bytes compression id, packet size
//! │  4 bytes sample rate (16.16 fixed point)
//! │  │
//! │  └─ esds atom
//! └─ text (chapter title sample entry)
//! ```

use super::*;
use crate::Codec;

/// Es descriptor tag
const ELEMENTARY_STREAM_DESCRIPTOR: u8 = 0x03;
/// Decoder config descriptor tag
const DECODER_CONFIG_DESCRIPTOR: u8 = 0x04;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsd {
    pub audio: Option<AudioEntry>,
}

/// An audio sample description.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AudioEntry {
    pub codec: Codec,
    pub channel_count: u16,
    /// The sample rate in herz, truncated from the 16.16 fixed point value.
    pub sample_rate: u32,
    pub avg_bitrate: Option<u32>,
    pub max_bitrate: Option<u32>,
}

impl Atom for Stsd {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_DESCRIPTION;
}

impl ParseAtom for Stsd {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown sample table sample description (stsd) version",
            ));
        }

        reader.skip(4)?; // number of entries

        let mut stsd = Self::default();
        let mut parsed_bytes = 8;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            let codec = match head.fourcc() {
                MP4_AUDIO | ENCRYPTED_AUDIO => Some(Codec::Aac),
                APPLE_LOSSLESS => Some(Codec::Alac),
                AMR_NARROW_BAND | AMR_WIDE_BAND => Some(Codec::Amr),
                _ => None,
            };

            match codec {
                Some(codec) => {
                    let entry = parse_audio_entry(reader, codec, head.size())?;
                    stsd.audio = Some(entry);
                }
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(stsd)
    }
}

fn parse_audio_entry(
    reader: &mut (impl Read + Seek),
    codec: Codec,
    size: Size,
) -> crate::Result<AudioEntry> {
    let bounds = find_bounds(reader, size)?;
    let mut entry = AudioEntry { codec, ..Default::default() };

    // 6 bytes reserved
    // 2 bytes data reference index
    // 8 bytes version, revision, vendor
    reader.skip(16)?;
    entry.channel_count = reader.read_be_u16()?;
    // 2 bytes sample size
    // 4 bytes compression id, packet size
    reader.skip(6)?;
    entry.sample_rate = reader.read_be_u32()? >> 16;

    if codec == Codec::Aac && size.content_len() > 28 + 8 {
        let remaining = size.content_len() - 28;
        let head = parse_head(reader, remaining)?;
        if head.fourcc() == ELEMENTARY_STREAM_DESCRIPTION {
            if let Err(e) = parse_esds(reader, &mut entry, head.size()) {
                log::warn!("Error parsing elementary stream description (esds): {e}");
            }
        }
    }

    seek_to_end(reader, &bounds)?;

    Ok(entry)
}

/// esds atom
///
/// ```md
/// 1 byte version
/// 3 bytes flags
/// │
/// └─ elementary stream descriptor
///    1 byte tag (0x03)
///    1~4 bytes len
///    2 bytes id
///    1 byte flag
///    │
///    └─ decoder config descriptor
///       1 byte tag (0x04)
///       1~4 bytes len
///       1 byte object type indication
///       1 byte stream type
///       3 bytes buffer size
///       4 bytes maximum bitrate
///       4 bytes average bitrate
/// ```
fn parse_esds(
    reader: &mut (impl Read + Seek),
    entry: &mut AudioEntry,
    _size: Size,
) -> crate::Result<()> {
    let (version, _) = parse_full_head(reader)?;

    if version != 0 {
        return Err(crate::Error::new(
            ErrorKind::UnknownVersion(version),
            "Unknown elementary stream description (esds) version",
        ));
    }

    let (tag, _, es_len) = parse_desc_head(reader)?;
    if tag != ELEMENTARY_STREAM_DESCRIPTOR {
        return Err(crate::Error::new(
            ErrorKind::DescriptorNotFound(ELEMENTARY_STREAM_DESCRIPTOR),
            "Missing elementary stream descriptor",
        ));
    }

    reader.skip(3)?;

    let mut parsed_bytes = 3;
    while parsed_bytes < es_len {
        let (tag, head_len, desc_len) = parse_desc_head(reader)?;

        match tag {
            DECODER_CONFIG_DESCRIPTOR if desc_len >= 13 => {
                reader.skip(5)?;
                entry.max_bitrate = Some(reader.read_be_u32()?).filter(|b| *b > 0);
                entry.avg_bitrate = Some(reader.read_be_u32()?).filter(|b| *b > 0);
                reader.skip(desc_len as i64 - 13)?;
            }
            _ => reader.skip(desc_len as i64)?,
        }

        parsed_bytes += head_len + desc_len;
    }

    Ok(())
}

fn parse_desc_head(reader: &mut impl Read) -> crate::Result<(u8, u64, u64)> {
    let tag = reader.read_u8()?;

    let mut head_len = 1;
    let mut len = 0;
    while head_len < 5 {
        let b = reader.read_u8()?;
        len = (len << 7) | (b & 0x7F) as u64;
        head_len += 1;
        if b & 0x80 == 0 {
            break;
        }
    }

    Ok((tag, head_len, len))
}
