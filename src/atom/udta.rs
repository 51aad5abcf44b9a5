use super::*;
use crate::Chapter;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Udta {
    pub chpl: Option<Vec<Chapter>>,
    pub meta: Option<Meta>,
}

impl Atom for Udta {
    const FOURCC: Fourcc = USER_DATA;
}

impl ParseAtom for Udta {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let mut udta = Self::default();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                CHAPTER_LIST if cfg.read_chapters => {
                    udta.chpl = Some(parse_chpl(reader, head.size())?)
                }
                METADATA => udta.meta = Some(Meta::parse(reader, cfg, head.size())?),
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(udta)
    }
}
