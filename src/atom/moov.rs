use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Moov {
    pub mvhd: Option<Mvhd>,
    pub trak: Vec<Trak>,
    pub udta: Option<Udta>,
}

impl Atom for Moov {
    const FOURCC: Fourcc = MOVIE;
}

impl ParseAtom for Moov {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let mut moov = Self::default();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                MOVIE_HEADER => moov.mvhd = Some(Mvhd::parse(reader, cfg, head.size())?),
                TRACK => moov.trak.push(Trak::parse(reader, cfg, head.size())?),
                USER_DATA => moov.udta = Some(Udta::parse(reader, cfg, head.size())?),
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(moov)
    }
}
