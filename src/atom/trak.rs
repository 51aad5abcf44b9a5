use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Trak {
    pub tkhd: Option<Tkhd>,
    pub tref: Option<Tref>,
    pub mdia: Option<Mdia>,
}

impl Atom for Trak {
    const FOURCC: Fourcc = TRACK;
}

impl ParseAtom for Trak {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let mut trak = Self::default();
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                TRACK_HEADER => trak.tkhd = Some(Tkhd::parse(reader, cfg, head.size())?),
                TRACK_REFERENCE if cfg.read_chapters => {
                    trak.tref = Some(Tref::parse(reader, cfg, head.size())?)
                }
                MEDIA => trak.mdia = Some(Mdia::parse(reader, cfg, head.size())?),
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(trak)
    }
}

impl Trak {
    /// Returns the handler type of the track's media.
    pub fn media_type(&self) -> Option<Fourcc> {
        self.mdia.as_ref()?.hdlr.as_ref().map(|h| h.handler_type)
    }

    pub fn stbl(&self) -> Option<&Stbl> {
        self.mdia.as_ref()?.minf.as_ref()?.stbl.as_ref()
    }
}
