//! A meta item can either have a plain fourcc as its identifier:
//! **** (any fourcc)
//! └─ data
//!
//! Or it can contain a mean and name child atom which make up the identifier.
//! ---- (freeform fourcc)
//! ├─ mean
//! ├─ name
//! └─ data
use super::*;

/// A struct representing a metadata item, containing data that is associated with an identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetaItem {
    /// The identifier of the atom.
    pub ident: DataIdent,
    /// The data contained in the atom.
    pub data: Vec<Data>,
    /// Whether the item is marked for deletion. Marked items are kept in the tag so that edits
    /// compose, and are dropped when the tag is written.
    pub remove: bool,
}

impl MetaItem {
    /// Creates a meta item with the identifier and data.
    pub const fn new(ident: DataIdent, data: Vec<Data>) -> Self {
        Self { ident, data, remove: false }
    }

    /// Returns the external length of the atom in bytes.
    pub fn len(&self) -> u64 {
        let data_len: u64 = self.data.iter().map(|d| d.size().len()).sum();

        match &self.ident {
            DataIdent::Fourcc(_) => 8 + data_len,
            DataIdent::Freeform { mean, name } => {
                let mean_len = 12 + mean.len() as u64;
                let name_len = 12 + name.len() as u64;

                8 + mean_len + name_len + data_len
            }
        }
    }

    /// Returns whether the item contains no data, or only empty data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.data.iter().all(|d| d.is_empty())
    }

    pub fn parse(
        reader: &mut (impl Read + Seek),
        parent: Fourcc,
        size: Size,
    ) -> crate::Result<Self> {
        let mut data = Vec::new();
        let mut mean: Option<String> = None;
        let mut name: Option<String> = None;
        let mut parsed_bytes = 0;

        while parsed_bytes < size.content_len() {
            let remaining = size.content_len() - parsed_bytes;
            let head = parse_head(reader, remaining)?;

            match head.fourcc() {
                DATA => {
                    let ident = item_ident(parent, mean.as_deref(), name.as_deref());
                    data.push(Data::parse(reader, &ident, head.size())?);
                }
                MEAN => {
                    let (version, _) = parse_full_head(reader)?;
                    if version != 0 {
                        return Err(crate::Error::new(
                            ErrorKind::UnknownVersion(version),
                            "Unknown mean atom (mean) version",
                        ));
                    }

                    mean = Some(reader.read_latin1(head.content_len() - 4)?);
                }
                NAME => {
                    let (version, _) = parse_full_head(reader)?;
                    if version != 0 {
                        return Err(crate::Error::new(
                            ErrorKind::UnknownVersion(version),
                            "Unknown name atom (name) version",
                        ));
                    }

                    name = Some(reader.read_latin1(head.content_len() - 4)?);
                }
                _ => {
                    reader.skip(head.content_len() as i64)?;
                }
            }

            parsed_bytes += head.len();
        }

        if data.is_empty() {
            return Err(crate::Error::new(
                ErrorKind::AtomNotFound(DATA),
                format!("Error constructing meta item '{parent}', missing data atom"),
            ));
        }

        let ident = item_ident(parent, mean.as_deref(), name.as_deref());
        Ok(MetaItem::new(ident, data))
    }

    /// Attempts to write the meta item to the writer.
    pub fn write(&self, writer: &mut impl Write) -> crate::Result<()> {
        writer.write_be_u32(self.len() as u32)?;

        match &self.ident {
            DataIdent::Fourcc(ident) => writer.write_all(ident.deref())?,
            DataIdent::Freeform { mean, name } => {
                writer.write_all(FREEFORM.deref())?;

                let mean_len: u32 = 12 + mean.len() as u32;
                writer.write_be_u32(mean_len)?;
                writer.write_all(MEAN.deref())?;
                writer.write_all(&[0; 4])?;
                writer.write_latin1(mean)?;

                let name_len: u32 = 12 + name.len() as u32;
                writer.write_be_u32(name_len)?;
                writer.write_all(NAME.deref())?;
                writer.write_all(&[0; 4])?;
                writer.write_latin1(name)?;
            }
        }

        for d in self.data.iter() {
            d.write(writer)?;
        }

        Ok(())
    }
}

fn item_ident(parent: Fourcc, mean: Option<&str>, name: Option<&str>) -> DataIdent {
    match (parent, mean, name) {
        (FREEFORM, Some(mean), Some(name)) => DataIdent::freeform(mean, name),
        (fourcc, _, _) => DataIdent::Fourcc(fourcc),
    }
}
