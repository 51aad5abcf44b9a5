use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsc {
    pub items: Vec<StscItem>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StscItem {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_id: u32,
}

impl Atom for Stsc {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_TO_CHUNK;
}

impl ParseAtom for Stsc {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown sample table sample to chunk (stsc) version",
            ));
        }

        let entries = reader.read_be_u32()?;
        if 8 + 12 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                "Sample table sample to chunk (stsc) table size doesn't match atom length",
            ));
        }

        let mut items = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            items.push(StscItem {
                first_chunk: reader.read_be_u32()?,
                samples_per_chunk: reader.read_be_u32()?,
                sample_description_id: reader.read_be_u32()?,
            });
        }

        Ok(Self { items })
    }
}

impl Stsc {
    /// Resolves the samples per chunk runs into a per sample chunk index list, for `num_chunks`
    /// chunks. Chunk indices are 1 based.
    pub fn sample_chunks(&self, num_chunks: u32) -> Vec<u32> {
        let mut chunks = Vec::new();

        for (i, item) in self.items.iter().enumerate() {
            let end_chunk = match self.items.get(i + 1) {
                Some(next) => next.first_chunk,
                None => num_chunks + 1,
            };

            for c in item.first_chunk..end_chunk {
                for _ in 0..item.samples_per_chunk {
                    chunks.push(c);
                }
            }
        }

        chunks
    }
}
