use super::*;

/// A sample table chunk offset atom (`co64`) storing 64 bit chunk offsets.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Co64 {
    /// The absolute position of the first table entry.
    pub table_pos: u64,
    pub offsets: Vec<u64>,
}

impl Atom for Co64 {
    const FOURCC: Fourcc = SAMPLE_TABLE_CHUNK_OFFSET_64;
}

impl ParseAtom for Co64 {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown sample table chunk offset (co64) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 8 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                "Sample table chunk offset (co64) table size doesn't match atom length",
            ));
        }

        let table_pos = reader.stream_position()?;
        let mut offsets = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            offsets.push(reader.read_be_u64()?);
        }

        Ok(Self { table_pos, offsets })
    }
}
