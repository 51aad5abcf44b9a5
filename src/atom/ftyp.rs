use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ftyp(pub String);

impl Ftyp {
    pub fn parse(reader: &mut (impl Read + Seek), file_len: u64) -> crate::Result<Self> {
        let head = parse_head(reader, file_len)?;
        if head.fourcc() != FILETYPE {
            return Err(crate::Error::new(ErrorKind::NoFtyp, "No filetype atom found."));
        }

        let string = reader
            .read_u8_vec(head.content_len())?
            .into_iter()
            .map(char::from)
            .collect();

        Ok(Ftyp(string))
    }
}
