use crate::{Data, MetaItem, Tag};

/// A list of standard genre values found in the `gnre` atom. The codes are equivalent to the
/// ID3v1 genre codes plus 1.
pub const STANDARD_GENRES: [&str; 80] = [
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychadelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
];

/// Replaces a standard genre (`gnre`) item with the equivalent textual genre (`©gen`) item.
/// Standard genres are only read, writing always emits the textual form, so a byte identical
/// round trip of the `gnre` atom is not attempted.
pub(crate) fn convert_standard_genre(item: MetaItem) -> MetaItem {
    let genre = item
        .data
        .iter()
        .filter_map(|d| d.bytes())
        .filter(|v| v.len() >= 2)
        .map(|v| u16::from_be_bytes([v[0], v[1]]))
        .find_map(|code| {
            let index = usize::from(code).checked_sub(1)?;
            STANDARD_GENRES.get(index)
        });

    match genre {
        Some(genre) => MetaItem::new(
            crate::ident::GENRE.into(),
            vec![Data::Utf8((*genre).to_owned())],
        ),
        None => {
            log::warn!("Unknown standard genre code");
            item
        }
    }
}

/// ### Genre index
impl Tag {
    /// Returns the index into the standard genre table matching the textual genre (`©gen`), the
    /// ID3v1 genre code plus 1.
    pub fn standard_genre_code(&self) -> Option<u16> {
        let genre = self.genre()?;
        let index = STANDARD_GENRES.iter().position(|g| *g == genre)?;
        Some(index as u16 + 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ident;
    use crate::DataIdent;

    #[test]
    fn standard_genre_is_converted_to_text() {
        let item = MetaItem::new(
            DataIdent::Fourcc(ident::STANDARD_GENRE),
            vec![Data::Reserved(vec![0x00, 0x50])],
        );
        let converted = convert_standard_genre(item);
        assert_eq!(converted.ident, DataIdent::Fourcc(ident::GENRE));
        assert_eq!(converted.data[0].string(), Some("Hard Rock"));
    }

    #[test]
    fn unknown_genre_code_is_kept() {
        let item = MetaItem::new(
            DataIdent::Fourcc(ident::STANDARD_GENRE),
            vec![Data::Reserved(vec![0x01, 0x00])],
        );
        let converted = convert_standard_genre(item.clone());
        assert_eq!(converted, item);
    }

    #[test]
    fn genre_code_lookup() {
        let mut tag = Tag::default();
        tag.set_genre("Hard Rock");
        assert_eq!(tag.standard_genre_code(), Some(80));

        tag.set_genre("Something niche");
        assert_eq!(tag.standard_genre_code(), None);
    }
}
