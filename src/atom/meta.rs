use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Meta {
    pub ilst: Option<Vec<MetaItem>>,
}

impl Atom for Meta {
    const FOURCC: Fourcc = METADATA;
}

impl ParseAtom for Meta {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let (version, _) = parse_full_head(reader)?;

        if version != 0 {
            return Err(crate::Error::new(
                ErrorKind::UnknownVersion(version),
                "Unknown metadata (meta) version",
            ));
        }

        let mut meta = Self::default();
        let mut parsed_bytes = 4;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                HANDLER_REFERENCE => {
                    let hdlr = Hdlr::parse(reader, cfg, head.size())?;
                    if hdlr.handler_type != METADATA_DIRECTORY {
                        return Err(crate::Error::new(
                            ErrorKind::UnsupportedMetaHandler(hdlr.handler_type),
                            format!(
                                "Unsupported metadata handler type '{}'",
                                hdlr.handler_type,
                            ),
                        ));
                    }
                }
                ITEM_LIST => meta.ilst = Some(parse_ilst(reader, head.size())?),
                _ => reader.skip(head.content_len() as i64)?,
            }

            parsed_bytes += head.len();
        }

        Ok(meta)
    }
}
