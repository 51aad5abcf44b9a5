use super::*;

/// The canonical 8 byte signature an empty item list starts with.
pub const ILST_SIGNATURE: [u8; 8] = [0x00, 0x00, 0x00, 0x08, b'i', b'l', b's', b't'];

/// Attempts to parse the children of an item list (`ilst`) atom.
///
/// A bare data atom at list level continues the previous item, multiple atoms with the same
/// identifier are merged into one multi valued item.
pub fn parse_ilst(reader: &mut (impl Read + Seek), size: Size) -> crate::Result<Vec<MetaItem>> {
    let mut items = Vec::<MetaItem>::new();
    let mut parsed_bytes = 0;

    while parsed_bytes < size.content_len() {
        let remaining = size.content_len() - parsed_bytes;
        let head = parse_head(reader, remaining)?;

        match head.fourcc() {
            FREE => reader.skip(head.content_len() as i64)?,
            DATA => match items.last_mut() {
                // a data atom following a previous item continues that item's value list
                Some(prev) => {
                    let ident = prev.ident.clone();
                    let data = Data::parse(reader, &ident, head.size())?;
                    prev.data.push(data);
                }
                None => {
                    log::warn!("Skipping data atom without a preceding item");
                    reader.skip(head.content_len() as i64)?;
                }
            },
            _ => {
                let item = MetaItem::parse(reader, head.fourcc(), head.size())?;
                let other = items.iter_mut().find(|o| item.ident == o.ident);

                match other {
                    Some(other) => other.data.extend(item.data),
                    None => items.push(item),
                }
            }
        }

        parsed_bytes += head.len();
    }

    Ok(items)
}

/// Serializes an item list atom containing the items. Empty and tombstoned items are dropped.
/// The resulting bytes always start with the canonical signature, even if no item survives.
pub fn write_ilst(items: &[MetaItem]) -> crate::Result<Vec<u8>> {
    let items: Vec<&MetaItem> = items.iter().filter(|i| !i.remove && !i.is_empty()).collect();

    let content_len: u64 = items.iter().map(|i| i.len()).sum();
    let size = Size::from(content_len);
    if size.len() > u32::MAX as u64 {
        return Err(crate::Error::new(
            ErrorKind::Overflow("item list length"),
            "Item list (ilst) exceeds the 32 bit atom length",
        ));
    }

    let mut buf = Vec::with_capacity(size.len() as usize);
    write_head(&mut buf, Head::from(size, ITEM_LIST))?;
    for i in items {
        i.write(&mut buf)?;
    }

    Ok(buf)
}
