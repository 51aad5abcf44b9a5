use super::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hdlr {
    /// The handler type (component subtype) of the media or metadata.
    pub handler_type: Fourcc,
}

impl Atom for Hdlr {
    const FOURCC: Fourcc = HANDLER_REFERENCE;
}

impl ParseAtom for Hdlr {
    fn parse_atom(
        reader: &mut (impl Read + Seek),
        _cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        let bounds = find_bounds(reader, size)?;

        // 1 byte version
        // 3 bytes flags
        // 4 bytes component type
        reader.skip(8)?;
        let mut handler_type = Fourcc([0; 4]);
        reader.read_exact(&mut *handler_type)?;

        seek_to_end(reader, &bounds)?;

        Ok(Self { handler_type })
    }
}

/// The bytes of an item list metadata handler atom.
pub fn meta_hdlr() -> Vec<u8> {
    vec![
        0x00, 0x00, 0x00, 0x21, // length
        b'h', b'd', b'l', b'r', // identifier
        0x00, 0x00, 0x00, 0x00, // version + flags
        0x00, 0x00, 0x00, 0x00, // component type
        0x6d, 0x64, 0x69, 0x72, // component subtype
        0x61, 0x70, 0x70, 0x6c, // component manufacturer
        0x00, 0x00, 0x00, 0x00, // component flags
        0x00, 0x00, 0x00, 0x00, // component flags mask
        0x00, // component name
    ]
}
