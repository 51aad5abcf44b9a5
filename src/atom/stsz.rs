use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stsz {
    /// The uniform sample size, or 0 if the sizes vary.
    pub sample_size: u32,
    pub sizes: Vec<u32>,
}

impl Atom for Stsz {
    const FOURCC: Fourcc = SAMPLE_TABLE_SAMPLE_SIZE;
}

impl ParseAtom for Stsz {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let bounds = find_bounds(reader, size)?;
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown sample table sample size (stsz) version",
            ));
        }

        let sample_size = reader.read_be_u32()?;
        let entries = reader.read_be_u32()?;

        if sample_size != 0 {
            seek_to_end(reader, &bounds)?;
            return Ok(Self { sample_size, sizes: Vec::new() });
        }

        if 12 + 4 * entries as u64 != size.content_len() {
            return Err(crate::Error::new(
                ErrorKind::Parsing,
                "Sample table sample size (stsz) table size doesn't match atom length",
            ));
        }

        let mut sizes = Vec::with_capacity(entries as usize);
        for _ in 0..entries {
            sizes.push(reader.read_be_u32()?);
        }

        Ok(Self { sample_size, sizes })
    }
}

impl Stsz {
    /// Returns the size of the sample, taking the uniform sample size into account.
    pub fn size_of(&self, sample: usize) -> Option<u32> {
        if self.sample_size != 0 {
            return Some(self.sample_size);
        }
        self.sizes.get(sample).copied()
    }

    /// Returns whether the sample sizes vary by more than 1 percent.
    pub fn is_vbr(&self) -> bool {
        if self.sample_size != 0 {
            return false;
        }

        let min = self.sizes.iter().copied().min().unwrap_or(0);
        let max = self.sizes.iter().copied().max().unwrap_or(0);

        (max - min) as u64 * 100 > max as u64
    }
}
