use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

pub use chapter::Chapter;
pub use picture::{PicType, Picture};

use crate::atom;
use crate::coexist::TagSystem;
use crate::ident::{self, idents_match, DataIdent, Ident};
use crate::{AudioInfo, Data, Img, MetaItem, ReadConfig, WriteConfig};

pub(crate) mod chapter;
pub(crate) mod genre;
mod picture;
mod rating;
mod readonly;
mod tuple;

/// An MPEG-4 audio tag containing metadata items, pictures and chapters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
    /// The `ftyp` atom.
    pub(crate) ftyp: String,
    /// Whether a metadata item list was present in the file.
    pub(crate) tag_exists: bool,
    /// Readonly audio information.
    pub(crate) info: AudioInfo,
    /// The metadata items, including tombstoned ones.
    pub(crate) items: Vec<MetaItem>,
    /// The embedded pictures, including tombstoned ones.
    pub(crate) pictures: Vec<Picture>,
    /// The chapters of the file.
    pub(crate) chapters: Vec<Chapter>,
    /// Tag systems that will be removed from the file on save.
    pub(crate) removed_systems: Vec<TagSystem>,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in self.items() {
            write!(f, "{}:", i.ident)?;
            for d in i.data.iter() {
                match d.string() {
                    Some(s) => write!(f, " {s}")?,
                    None => write!(f, " {d:?}")?,
                }
            }
            writeln!(f)?;
        }
        for p in self.pictures() {
            writeln!(f, "picture: {} {} bytes", p.fmt, p.data.len())?;
        }
        for c in self.chapters.iter() {
            writeln!(f, "chapter: {}ms {}", c.start.as_millis(), c.title)?;
        }
        writeln!(f, "filetype: {}", self.ftyp)
    }
}

impl Tag {
    /// Attempts to read an MPEG-4 audio tag from the reader.
    pub fn read_from(reader: &mut (impl Read + Seek)) -> crate::Result<Self> {
        atom::read_tag(reader, &ReadConfig::default())
    }

    /// Attempts to read an MPEG-4 audio tag from the reader using the config.
    pub fn read_with(reader: &mut (impl Read + Seek), cfg: &ReadConfig) -> crate::Result<Self> {
        atom::read_tag(reader, cfg)
    }

    /// Attempts to read an MPEG-4 audio tag from the file at the indicated path.
    pub fn read_from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        Self::read_from_path_with(path, &ReadConfig::default())
    }

    /// Attempts to read an MPEG-4 audio tag from the file at the indicated path using the
    /// config.
    pub fn read_from_path_with(path: impl AsRef<Path>, cfg: &ReadConfig) -> crate::Result<Self> {
        let mut file = BufReader::new(File::open(&path)?);
        let mut tag = Self::read_with(&mut file, cfg)?;

        if cfg.use_filename_as_title && tag.title().is_none() {
            if let Some(stem) = path.as_ref().file_stem().and_then(|s| s.to_str()) {
                tag.set_title(stem);
            }
        }

        Ok(tag)
    }

    /// Attempts to save the tag to the file at the indicated path. The write goes through a
    /// temporary file and an atomic rename, on failure the original file is left untouched.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.save_to_path_with(path, &WriteConfig::default())
    }

    /// Attempts to save the tag to the file at the indicated path using the config.
    pub fn save_to_path_with(
        &self,
        path: impl AsRef<Path>,
        cfg: &WriteConfig,
    ) -> crate::Result<()> {
        atom::write_tag(self, path.as_ref(), cfg)
    }

    /// Attempts to dump the metadata atoms to the writer. This doesn't include a complete MPEG-4
    /// container hierarchy and won't result in a usable file.
    pub fn dump_to(&self, writer: &mut impl Write) -> crate::Result<()> {
        atom::dump_tag(self, writer)
    }

    /// Returns whether a metadata item list was present when the tag was read.
    pub fn tag_exists(&self) -> bool {
        self.tag_exists
    }

    /// Returns whether this tag contains no metadata items, pictures or chapters.
    pub fn is_empty(&self) -> bool {
        self.items().next().is_none() && self.pictures().next().is_none() && self.chapters.is_empty()
    }

    /// Marks a whole tagging system for removal on save. Removing the native system clears all
    /// items, pictures and chapters.
    pub fn remove_tags(&mut self, system: TagSystem) {
        if system == TagSystem::Native {
            self.items.iter_mut().for_each(|i| i.remove = true);
            self.pictures.iter_mut().for_each(|p| p.remove = true);
            self.chapters.clear();
        }
        if !self.removed_systems.contains(&system) {
            self.removed_systems.push(system);
        }
    }
}

/// ## Item accessors
impl Tag {
    /// Returns all metadata items that aren't marked for deletion.
    pub fn items(&self) -> impl Iterator<Item = &MetaItem> {
        self.items.iter().filter(|i| !i.remove)
    }

    /// Returns all data corresponding to the identifier.
    pub fn data<'a>(&'a self, ident: &'a impl Ident) -> impl Iterator<Item = &'a Data> {
        match self.items().find(|i| idents_match(&i.ident, ident)) {
            Some(i) => i.data.iter(),
            None => [].iter(),
        }
    }

    /// Returns all string references corresponding to the identifier.
    pub fn string<'a>(&'a self, ident: &'a impl Ident) -> impl Iterator<Item = &'a str> {
        self.data(ident).filter_map(Data::string)
    }

    /// Returns all byte data references corresponding to the identifier.
    pub fn bytes<'a>(&'a self, ident: &'a impl Ident) -> impl Iterator<Item = &'a [u8]> {
        self.data(ident).filter_map(Data::bytes)
    }

    /// Returns all mutable data references corresponding to the identifier.
    pub fn data_mut<'a>(&'a mut self, ident: &'a impl Ident) -> impl Iterator<Item = &'a mut Data> {
        match self.items.iter_mut().find(|i| !i.remove && idents_match(&i.ident, ident)) {
            Some(i) => i.data.iter_mut(),
            None => [].iter_mut(),
        }
    }

    /// If an item corresponding to the identifier exists, its data will be replaced by the new
    /// data, otherwise a new item containing the data will be created. Replacing data clears a
    /// deletion mark.
    pub fn set_data(&mut self, ident: impl Ident + Into<DataIdent>, data: Data) {
        self.set_all_data(ident, vec![data]);
    }

    /// If an item corresponding to the identifier exists, its data will be replaced by the new
    /// data, otherwise a new item containing the data will be created.
    pub fn set_all_data(
        &mut self,
        ident: impl Ident + Into<DataIdent>,
        data: impl IntoIterator<Item = Data>,
    ) {
        match self.items.iter_mut().find(|i| idents_match(&i.ident, &ident)) {
            Some(i) => {
                i.remove = false;
                i.data.clear();
                i.data.extend(data);
            }
            None => {
                self.items.push(MetaItem::new(ident.into(), data.into_iter().collect()));
            }
        }
    }

    /// If an item corresponding to the identifier exists, the new data will be added to it,
    /// otherwise a new item containing the data will be created.
    pub fn add_data(&mut self, ident: impl Ident + Into<DataIdent>, data: Data) {
        match self.items.iter_mut().find(|i| !i.remove && idents_match(&i.ident, &ident)) {
            Some(i) => i.data.push(data),
            None => self.items.push(MetaItem::new(ident.into(), vec![data])),
        }
    }

    /// Marks all items corresponding to the identifier for deletion. The items are dropped when
    /// the tag is saved.
    pub fn remove_data(&mut self, ident: &impl Ident) {
        self.items
            .iter_mut()
            .filter(|i| idents_match(&i.ident, ident))
            .for_each(|i| i.remove = true);
    }

    /// Removes the items corresponding to the identifier and returns all of their data.
    pub fn take_data(&mut self, ident: &impl Ident) -> impl Iterator<Item = Data> {
        let mut i = 0;
        while i < self.items.len() {
            if idents_match(&self.items[i].ident, ident) {
                let removed = self.items.remove(i);
                return removed.data.into_iter();
            }

            i += 1;
        }

        Vec::new().into_iter()
    }
}

/// ## Additional fields
///
/// Every metadata item that isn't mapped to a typed accessor, exposed with its canonical code:
/// the plain four character code, or `----:<mean>:<name>` for freeform items.
impl Tag {
    /// Returns all unmapped fields as `(code, value)` pairs.
    pub fn additional_fields(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.items().filter(|i| !is_mapped_ident(&i.ident)).filter_map(|i| {
            let value = i.data.iter().find_map(|d| match d.string() {
                Some(s) => Some(s.to_owned()),
                None => d.be_int().map(|n| n.to_string()),
            })?;
            Some((i.ident.to_string(), value))
        })
    }

    /// Returns the value of the unmapped field with the code.
    pub fn additional_field(&self, code: &str) -> Option<String> {
        let ident = DataIdent::from_code(code)?;
        let item = self.items().find(|i| i.ident == ident && !is_mapped_ident(&i.ident))?;
        item.data.iter().find_map(|d| match d.string() {
            Some(s) => Some(s.to_owned()),
            None => d.be_int().map(|n| n.to_string()),
        })
    }

    /// Sets the field with the code. The value is written with the data class the field was
    /// previously read with.
    pub fn set_additional_field(&mut self, code: &str, value: impl Into<String>) {
        let ident = match DataIdent::from_code(code) {
            Some(i) => i,
            None => {
                log::warn!("Ignoring field with invalid code '{code}'");
                return;
            }
        };
        let data = Data::with_remembered_class(&ident, value);
        match self.items.iter_mut().find(|i| i.ident == ident) {
            Some(i) => {
                i.remove = false;
                i.data = vec![data];
            }
            None => self.items.push(MetaItem::new(ident, vec![data])),
        }
    }

    /// Marks the field with the code for deletion.
    pub fn remove_additional_field(&mut self, code: &str) {
        if let Some(ident) = DataIdent::from_code(code) {
            self.items.iter_mut().filter(|i| i.ident == ident).for_each(|i| i.remove = true);
        }
    }
}

/// ## Pictures
impl Tag {
    /// Returns all embedded pictures that aren't marked for deletion.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.pictures.iter().filter(|p| !p.remove)
    }

    /// Returns the first embedded picture.
    pub fn picture(&self) -> Option<&Picture> {
        self.pictures().next()
    }

    /// Returns mutable references to all embedded pictures, including ones marked for deletion.
    /// Set [`Picture::remove`] to mark a single picture.
    pub fn pictures_mut(&mut self) -> impl Iterator<Item = &mut Picture> {
        self.pictures.iter_mut()
    }

    /// Adds an embedded picture.
    pub fn add_picture(&mut self, img: Img<impl Into<Vec<u8>>>) {
        self.pictures.push(Picture::new(img));
    }

    /// Sets the embedded pictures. This will remove all other pictures.
    pub fn set_pictures(&mut self, pictures: impl IntoIterator<Item = Picture>) {
        self.pictures.iter_mut().for_each(|p| p.remove = true);
        self.pictures.extend(pictures);
    }

    /// Marks all embedded pictures for deletion.
    pub fn remove_pictures(&mut self) {
        self.pictures.iter_mut().for_each(|p| p.remove = true);
    }
}

/// ## Chapters
impl Tag {
    /// Returns the chapters of the file.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Returns a mutable reference to the chapter list.
    pub fn chapters_mut(&mut self) -> &mut Vec<Chapter> {
        &mut self.chapters
    }

    /// Replaces the chapter list.
    pub fn set_chapters(&mut self, chapters: impl IntoIterator<Item = Chapter>) {
        self.chapters = chapters.into_iter().collect();
    }
}

// ## Individual string values
audiometa_proc::string_value_accessor!("title", "©nam");
audiometa_proc::string_value_accessor!("artist", "©ART");
audiometa_proc::string_value_accessor!("composer", "©wrt");
audiometa_proc::string_value_accessor!("comment", "©cmt");
audiometa_proc::string_value_accessor!("album", "©alb");
audiometa_proc::string_value_accessor!("album_artist", "aART");
audiometa_proc::string_value_accessor!("copyright", "cprt");
audiometa_proc::string_value_accessor!("description", "desc");
audiometa_proc::string_value_accessor!("date", "©day");
audiometa_proc::string_value_accessor!("genre", "©gen");
audiometa_proc::string_value_accessor!("conductor", "----:com.apple.iTunes:CONDUCTOR");
audiometa_proc::string_value_accessor!("publisher", "----:com.apple.iTunes:PUBLISHER");
audiometa_proc::string_value_accessor!("original_artist", "----:com.apple.iTunes:ORIGINAL ARTIST");
audiometa_proc::string_value_accessor!("original_album", "----:com.apple.iTunes:ORIGINAL ALBUM");

/// ### Year
impl Tag {
    /// Returns the year, the first sequence of 4 digits of the date (`©day`).
    pub fn year(&self) -> Option<&str> {
        let date = self.date()?;
        date.split(|c: char| !c.is_ascii_digit()).find(|part| part.len() == 4)
    }
}

/// The idents covered by typed accessors. Everything else is an additional field.
pub(crate) fn is_mapped_ident(ident: &DataIdent) -> bool {
    const MAPPED_FOURCC: [crate::Fourcc; 15] = [
        ident::ARTWORK,
        ident::TITLE,
        ident::ARTIST,
        ident::COMPOSER,
        ident::COMMENT,
        ident::ALBUM,
        ident::ALBUM_ARTIST,
        ident::COPYRIGHT,
        ident::DESCRIPTION,
        ident::DATE,
        ident::GENRE,
        ident::STANDARD_GENRE,
        ident::RATING,
        ident::TRACK_NUMBER,
        ident::DISC_NUMBER,
    ];
    const MAPPED_FREEFORM: [crate::FreeformIdent<'static>; 5] = [
        ident::CONDUCTOR,
        ident::PUBLISHER,
        ident::ORIGINAL_ARTIST,
        ident::ORIGINAL_ALBUM,
        ident::FREEFORM_RATING,
    ];

    MAPPED_FOURCC.iter().any(|i| idents_match(i, ident))
        || MAPPED_FREEFORM.iter().any(|i| idents_match(i, ident))
}
