use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tref {
    pub chap: Option<Chap>,
}

impl Atom for Tref {
    const FOURCC: Fourcc = TRACK_REFERENCE;
}

impl ParseAtom for Tref {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let mut tref = Self::default();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                CHAPTER_REFERENCE => tref.chap = Some(Chap::parse(reader, cfg, head.size())?),
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(tref)
    }
}

/// A chapter reference listing the ids of chapter title tracks.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Chap {
    pub chapter_ids: Vec<u32>,
}

impl Atom for Chap {
    const FOURCC: Fourcc = CHAPTER_REFERENCE;
}

impl ParseAtom for Chap {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let count = size.content_len() as usize / 4;
        let mut chapter_ids = Vec::with_capacity(count);

        for _ in 0..count {
            chapter_ids.push(reader.read_be_u32()?);
        }

        Ok(Self { chapter_ids })
    }
}
