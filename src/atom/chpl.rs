use super::*;
use crate::Chapter;

/// Timescale of the absolute chapter start timestamps, in 100 nanosecond units.
pub const CHPL_TIMESCALE: u32 = 10_000_000;

/// Attempts to parse a chapter list (`chpl`) atom. Chapter ends are filled in by the caller.
pub fn parse_chpl(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Vec<Chapter>> {
    let bounds = find_bounds(reader, size)?;
    let (version, _) = parse_full_head(reader)?;
    if version > 1 {
        return Err(crate::Error::new(
            ErrorKind::UnknownVersion(version),
            "Unknown chapter list (chpl) version",
        ));
    }

    reader.skip(1)?; // reserved
    let num_entries = reader.read_be_u32()?;
    let mut parsed_bytes = 9;

    let mut chapters = Vec::with_capacity(num_entries as usize);
    while parsed_bytes < size.content_len() && chapters.len() < num_entries as usize {
        let start = reader.read_be_u64()?;

        let str_len = reader.read_u8()?;
        let title = reader.read_utf8(str_len as u64)?;

        chapters.push(Chapter::new(scale_duration(CHPL_TIMESCALE, start), title));

        parsed_bytes += 9 + str_len as u64;
    }

    if chapters.len() < num_entries as usize {
        log::warn!(
            "Chapter list (chpl) declares {num_entries} entries but contains {}",
            chapters.len(),
        );
    }

    seek_to_end(reader, &bounds)?;

    Ok(chapters)
}

/// Serializes a chapter list atom. An empty chapter list serializes to nothing, the atom is
/// omitted entirely.
pub fn write_chpl(chapters: &[Chapter]) -> crate::Result<Vec<u8>> {
    if chapters.is_empty() {
        return Ok(Vec::new());
    }

    let content_len: u64 = 9 + chapters.iter().map(|c| 9 + title_len(&c.title) as u64).sum::<u64>();
    let size = Size::from(content_len);

    let mut buf = Vec::with_capacity(size.len() as usize);
    write_head(&mut buf, Head::from(size, CHAPTER_LIST))?;
    write_full_head(&mut buf, 1, [0; 3])?;
    buf.write_u8(0)?; // reserved
    buf.write_be_u32(chapters.len() as u32)?;

    for c in chapters.iter() {
        let len = title_len(&c.title);
        buf.write_be_u64(unscale_duration(CHPL_TIMESCALE, c.start))?;
        buf.write_u8(len as u8)?;
        buf.write_utf8(&c.title[..len])?;
    }

    Ok(buf)
}

/// Returns the length of the title clamped to 255 bytes, on a char boundary.
fn title_len(title: &str) -> usize {
    if title.len() <= 255 {
        return title.len();
    }

    let mut len = 255;
    while !title.is_char_boundary(len) {
        len -= 1;
    }
    log::warn!("Chapter title of {} bytes clamped to {len}", title.len());
    len
}
