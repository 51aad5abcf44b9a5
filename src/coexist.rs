//! Coexisting tag systems.
//!
//! MPEG-4 files only carry a native item list tag, but other tools append ID3v1 or APE blocks
//! to the end, or prepend an ID3v2 block to the beginning of a file. Each detected block is
//! tracked as an independent zone so that saving the native tag copies them verbatim, and so
//! that they can be removed on request.

use std::io::{Read, Seek, SeekFrom};

use crate::atom::util::{ReadUtil, SeekUtil};

/// A tagging system that may be present in a file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagSystem {
    /// The container native metadata, for MPEG-4 the item list (`ilst`) atom and the chapter
    /// representations.
    Native,
    /// An ID3v1 block in the last 128 bytes of the file.
    Id3v1,
    /// An ID3v2 block at the beginning of the file.
    Id3v2,
    /// An APE block at the end of the file, in front of any ID3v1 block.
    Ape,
}

impl TagSystem {
    /// The zone name the system's block is tracked under.
    pub(crate) fn zone_name(&self) -> &'static str {
        match self {
            Self::Native => "ilst",
            Self::Id3v1 => "id3v1",
            Self::Id3v2 => "id3v2",
            Self::Ape => "ape",
        }
    }
}

/// A sibling tag block of another tagging system.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SiblingBlock {
    pub system: TagSystem,
    pub pos: u64,
    pub len: u64,
}

/// Checks for an ID3v2 block at the beginning of the file and returns it. The reader is left
/// positioned after the block, at the start of the MPEG-4 data.
pub fn detect_head(reader: &mut (impl Read + Seek)) -> crate::Result<Option<SiblingBlock>> {
    let file_len = reader.remaining_stream_len()?;
    if file_len < 10 {
        return Ok(None);
    }

    let mut magic = [0; 3];
    reader.read_exact(&mut magic)?;
    if magic != *b"ID3" {
        reader.seek(SeekFrom::Start(0))?;
        return Ok(None);
    }

    // 2 bytes version
    reader.skip(2)?;
    let flags = reader.read_u8()?;
    let size = read_syncsafe_u32(reader)?;

    // a footer is not included in the size
    let footer_len = if flags & 0x10 != 0 { 10 } else { 0 };
    let len = (10 + size as u64 + footer_len).min(file_len);

    reader.seek(SeekFrom::Start(len))?;

    Ok(Some(SiblingBlock { system: TagSystem::Id3v2, pos: 0, len }))
}

/// Checks for ID3v1 and APE blocks at the end of the file, in ascending position order.
pub fn detect_tail(
    reader: &mut (impl Read + Seek),
    file_len: u64,
    data_start: u64,
) -> crate::Result<Vec<SiblingBlock>> {
    let mut blocks = Vec::new();
    let mut end = file_len;

    if end >= data_start + 128 {
        reader.seek(SeekFrom::Start(end - 128))?;
        let mut magic = [0; 3];
        reader.read_exact(&mut magic)?;
        if magic == *b"TAG" {
            end -= 128;
            blocks.push(SiblingBlock { system: TagSystem::Id3v1, pos: end, len: 128 });
        }
    }

    if end >= data_start + 32 {
        reader.seek(SeekFrom::Start(end - 32))?;
        let mut preamble = [0; 8];
        reader.read_exact(&mut preamble)?;
        if preamble == *b"APETAGEX" {
            // 4 bytes version
            reader.skip(4)?;
            let size = read_le_u32(reader)? as u64;
            // 4 bytes item count
            reader.skip(4)?;
            let flags = read_le_u32(reader)?;

            // the size includes the footer but not the optional header
            let header_len = if flags & 0x8000_0000 != 0 { 32 } else { 0 };
            let len = size + header_len;
            if len <= end - data_start {
                let pos = end - len;
                blocks.push(SiblingBlock { system: TagSystem::Ape, pos, len });
            } else {
                log::warn!("APE block of {len} bytes exceeds the file, ignoring it");
            }
        }
    }

    blocks.sort_by_key(|b| b.pos);
    Ok(blocks)
}

/// Reads a 28 bit syncsafe integer stored in the lower 7 bits of 4 bytes.
fn read_syncsafe_u32(reader: &mut impl Read) -> crate::Result<u32> {
    let mut buf = [0; 4];
    reader.read_exact(&mut buf)?;
    let mut value = 0u32;
    for b in buf {
        value = (value << 7) | (b & 0x7F) as u32;
    }
    Ok(value)
}

fn read_le_u32(reader: &mut impl Read) -> crate::Result<u32> {
    let mut buf = [0; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
