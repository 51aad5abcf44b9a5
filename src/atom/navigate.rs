use super::*;

/// The maximum number of sibling atoms that are scanned over before giving up.
const MAX_SCANNED_ATOMS: u32 = 100;

/// Attempts to find the next atom with the identifier at the current nesting level.
///
/// Starting at the current position atom heads are parsed and non-matching atoms are skipped,
/// until either a matching atom is found, or the end of the level is reached. `level_end` is the
/// absolute offset at which the enclosing atom's content ends. On a match the reader is
/// positioned at the first content byte and the bounds including the head are returned.
///
/// Atoms with a 32 bit length of 0 extend to the end of the level and are accepted. Scanning is
/// additionally bounded to prevent runaway searches on malformed input.
pub fn find_atom(
    reader: &mut (impl Read + Seek),
    fourcc: Fourcc,
    level_end: u64,
) -> crate::Result<Option<AtomBounds>> {
    let mut pos = reader.stream_position()?;

    for _ in 0..MAX_SCANNED_ATOMS {
        if pos + 8 > level_end {
            return Ok(None);
        }

        let head = parse_head(reader, level_end - pos)?;
        let bounds = AtomBounds::new(pos, head.size());

        if bounds.end() > level_end {
            log::warn!(
                "Atom '{}' at {} exceeds the enclosing level end at {}",
                head.fourcc(),
                pos,
                level_end,
            );
            return Ok(None);
        }

        if head.fourcc() == fourcc {
            return Ok(Some(bounds));
        }

        reader.seek(SeekFrom::Start(bounds.end()))?;
        pos = bounds.end();
    }

    Ok(None)
}

/// Attempts to find a nested atom following the path of identifiers, descending one level at
/// each step. Returns the bounds of the last atom on the path, with the reader positioned at
/// its first content byte.
pub fn find_atom_path(
    reader: &mut (impl Read + Seek),
    path: &[Fourcc],
    mut level_end: u64,
) -> crate::Result<Option<AtomBounds>> {
    let mut bounds = None;

    for fourcc in path {
        match find_atom(reader, *fourcc, level_end)? {
            Some(b) => {
                level_end = b.end();
                bounds = Some(b);
            }
            None => return Ok(None),
        }
    }

    Ok(bounds)
}
