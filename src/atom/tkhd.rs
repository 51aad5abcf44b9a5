use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tkhd {
    /// The id of the track.
    pub id: u32,
}

impl Atom for Tkhd {
    const FOURCC: Fourcc = TRACK_HEADER;
}

impl ParseAtom for Tkhd {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let bounds = find_bounds(reader, size)?;
        let mut tkhd = Self::default();

        let (version, _) = parse_full_head(reader)?;
        match version {
            // 4 byte creation and modification times
            0 => reader.skip(8)?,
            // 8 byte creation and modification times
            1 => reader.skip(16)?,
            v => {
                return Err(crate::Error::new(
                    ErrorKind::UnknownVersion(version),
                    format!("Error unknown track header (tkhd) version {v}"),
                ))
            }
        }
        tkhd.id = reader.read_be_u32()?;

        seek_to_end(reader, &bounds)?;

        Ok(tkhd)
    }
}
