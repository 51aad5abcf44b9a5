use super::*;

/// A sample table chunk offset atom (`stco`) storing 32 bit chunk offsets.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stco {
    /// The absolute position of the first table entry.
    pub table_pos: u64,
    pub offsets: Vec<u32>,
}

impl Atom for Stco {
    const FOURCC: Fourcc = SAMPLE_TABLE_CHUNK_OFFSET;
}

impl ParseAtom for Stco {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown sample table chunk offset (stco) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 4 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                "Sample table chunk offset (stco) table size doesn't match atom length",
            ));
        }

        let table_pos = reader.stream_position()?;
        let mut offsets = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            offsets.push(reader.read_be_u32()?);
        }

        Ok(Self { table_pos, offsets })
    }
}
