//! Relevant structure of an mp4 file
//!
//! ```md
//! ftyp
//! mdat
//! moov
//! ├─ mvhd
//! ├─ trak
//! │  ├─ tkhd
//! │  ├─ tref
//! │  │  └─ chap
//! │  └─ mdia
//! │     ├─ mdhd
//! │     ├─ hdlr
//! │     └─ minf
//! │        └─ stbl
//! │           ├─ stsd
//! │           │  └─ mp4a
//! │           ├─ stts
//! │           ├─ stsc
//! │           ├─ stsz
//! │           ├─ stco
//! │           └─ co64
//! └─ udta
//!    ├─ chpl
//!    └─ meta
//!       ├─ hdlr
//!       └─ ilst
//!          ├─ **** (any fourcc)
//!          │  └─ data
//!          └─ ---- (freeform fourcc)
//!             ├─ mean
//!             ├─ name
//!             └─ data
//! free
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::coexist::{self, TagSystem};
use crate::structure::{FileStructure, Width};
use crate::tag::chapter::assign_chapter_ends;
use crate::tag::Picture;
use crate::{AudioInfo, Chapter, ErrorKind, ReadConfig, Tag, WriteConfig};

use head::*;
use navigate::*;
use util::*;

use chpl::*;
use co64::*;
use ftyp::*;
use hdlr::*;
use ilst::*;
use mdhd::*;
use mdia::*;
use meta::*;
use minf::*;
use moov::*;
use mvhd::*;
use stbl::*;
use stco::*;
use stsc::*;
use stsd::*;
use stsz::*;
use stts::*;
use tkhd::*;
use trak::*;
use tref::*;
use udta::*;

pub use data::Data;
pub use ident::*;
pub use metaitem::MetaItem;

/// A module for working with identifiers.
pub mod ident;

mod head;
mod navigate;
pub(crate) mod util;

mod chpl;
mod co64;
mod data;
mod ftyp;
mod hdlr;
mod ilst;
mod mdhd;
mod mdia;
mod meta;
mod metaitem;
mod minf;
mod moov;
mod mvhd;
mod stbl;
mod stco;
mod stsc;
mod stsd;
mod stsz;
mod stts;
mod tkhd;
mod trak;
mod tref;
mod udta;

/// Zone name of the container native metadata item list.
const ZONE_ILST: &str = "ilst";
/// Zone name of the Nero chapter list.
const ZONE_NERO_CHAPTERS: &str = "chpl";
/// Zone name of the elastic padding atom.
const ZONE_PADDING: &str = "free";

trait Atom: Sized {
    const FOURCC: Fourcc;
}

trait ParseAtom: Atom {
    fn parse(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self> {
        match Self::parse_atom(reader, cfg, size) {
            Err(mut e) => {
                let mut d = e.description.into_owned();
                insert_str(&mut d, "Error parsing", Self::FOURCC);
                e.description = d.into();
                Err(e)
            }
            a => a,
        }
    }

    fn parse_atom(
        reader: &mut (impl Read + Seek),
        cfg: &ReadConfig,
        size: Size,
    ) -> crate::Result<Self>;
}

fn insert_str(description: &mut String, msg: &str, fourcc: Fourcc) {
    description.reserve(msg.len() + 6);
    description.insert_str(0, ": ");
    fourcc.iter().for_each(|c| {
        description.insert(0, char::from(*c));
    });
    description.insert(0, ' ');
    description.insert_str(0, msg);
}

/// Attempts to read MPEG-4 audio metadata from the reader.
///
/// Missing required atoms are logged as errors and degrade to a tag without metadata and zeroed
/// audio information. IO errors and unsupported formats are returned.
pub(crate) fn read_tag(reader: &mut (impl Read + Seek), cfg: &ReadConfig) -> crate::Result<Tag> {
    reader.seek(SeekFrom::Start(0))?;
    let id3v2 = coexist::detect_head(reader)?;
    let data_start = id3v2.map_or(0, |b| b.len);
    let file_len = data_start + reader.remaining_stream_len()?;

    let tail = coexist::detect_tail(reader, file_len, data_start)?;
    let scan_end = tail.first().map_or(file_len, |b| b.pos);

    reader.seek(SeekFrom::Start(data_start))?;
    let Ftyp(ftyp) = Ftyp::parse(reader, scan_end - data_start)?;

    match read_tag_inner(reader, cfg, scan_end) {
        Ok(mut tag) => {
            tag.ftyp = ftyp;
            Ok(tag)
        }
        Err(e) if e.kind.is_malformed_input() => {
            log::error!("Error reading MPEG-4 metadata: {e}");
            Ok(Tag { ftyp, ..Tag::default() })
        }
        Err(e) => Err(e),
    }
}

fn read_tag_inner(
    reader: &mut (impl Read + Seek),
    cfg: &ReadConfig,
    scan_end: u64,
) -> crate::Result<Tag> {
    let mut moov = None;
    let mut mdat_len = 0;

    let mut pos = reader.stream_position()?;
    while pos + 8 <= scan_end {
        let head = parse_head(reader, scan_end - pos)?;

        match head.fourcc() {
            MOVIE => moov = Some(Moov::parse(reader, cfg, head.size())?),
            MEDIA_DATA => {
                mdat_len += head.content_len();
                reader.seek(SeekFrom::Start(pos + head.len()))?;
            }
            _ => {
                reader.seek(SeekFrom::Start(pos + head.len()))?;
            }
        }

        pos += head.len();
    }

    let moov = moov.ok_or_else(|| {
        crate::Error::new(
            ErrorKind::AtomNotFound(MOVIE),
            "Missing necessary data, no movie (moov) atom found",
        )
    })?;

    let mut tag = Tag::default();
    read_audio_info(&moov, mdat_len, &mut tag.info);

    if cfg.read_chapters {
        tag.chapters = match moov.udta.as_ref().and_then(|a| a.chpl.clone()) {
            Some(chpl) => chpl,
            None => read_chapter_track(reader, &moov).unwrap_or_default(),
        };
        assign_chapter_ends(&mut tag.chapters, tag.info.duration);
    }

    let ilst = moov.udta.and_then(|a| a.meta).and_then(|a| a.ilst);
    tag.tag_exists = ilst.is_some();
    for item in ilst.unwrap_or_default() {
        if item.ident == DataIdent::Fourcc(ARTWORK) {
            tag.pictures.extend(item.data.into_iter().filter_map(Picture::from_data));
        } else if item.ident == DataIdent::Fourcc(STANDARD_GENRE) {
            tag.items.push(crate::tag::genre::convert_standard_genre(item));
        } else if cfg.read_all_meta_frames || crate::tag::is_mapped_ident(&item.ident) {
            tag.items.push(item);
        }
    }

    Ok(tag)
}

fn read_audio_info(moov: &Moov, mdat_len: u64, info: &mut AudioInfo) {
    if let Some(mvhd) = &moov.mvhd {
        if mvhd.timescale > 0 {
            info.duration = Some(scale_duration(mvhd.timescale, mvhd.duration));
        }
    }

    let audio_trak = moov.trak.iter().find(|t| {
        t.stbl().map_or(false, |s| s.stsd.as_ref().map_or(false, |d| d.audio.is_some()))
    });
    let audio_trak = match audio_trak {
        Some(t) => t,
        None => return,
    };
    let stbl = match audio_trak.stbl() {
        Some(s) => s,
        None => return,
    };

    if let Some(AudioEntry { codec, channel_count, sample_rate, avg_bitrate, max_bitrate }) =
        stbl.stsd.as_ref().and_then(|d| d.audio.clone())
    {
        info.codec = codec;
        info.channel_count = Some(channel_count).filter(|c| *c > 0);
        info.sample_rate = Some(sample_rate).filter(|s| *s > 0);
        info.avg_bitrate = avg_bitrate;
        info.max_bitrate = max_bitrate;
    }

    if let Some(stsz) = &stbl.stsz {
        info.is_vbr = stsz.is_vbr();
    }

    if info.avg_bitrate.is_none() {
        if let Some(duration) = info.duration.filter(|d| !d.is_zero()) {
            let bitrate = mdat_len as f64 * 8.0 / duration.as_secs_f64();
            info.avg_bitrate = Some(bitrate as u32);
        }
    }
}

/// Attempts to read chapters from a Quicktime chapter title track: a text track referenced by
/// another track's chapter reference (`tref/chap`) atom, whose samples are length prefixed
/// titles and whose start times derive from the sample durations.
fn read_chapter_track(reader: &mut (impl Read + Seek), moov: &Moov) -> Option<Vec<Chapter>> {
    let chap_id = moov
        .trak
        .iter()
        .filter_map(|t| t.tref.as_ref()?.chap.as_ref()?.chapter_ids.first().copied())
        .next()?;

    let trak = match moov.trak.iter().find(|t| t.tkhd.as_ref().map_or(false, |h| h.id == chap_id)) {
        Some(t) => t,
        None => {
            log::warn!("Chapter title track {chap_id} not found");
            return None;
        }
    };

    if trak.media_type().map_or(false, |m| m != TEXT_MEDIA) {
        log::warn!("Chapter title track {chap_id} is no text track");
    }

    let timescale = trak.mdia.as_ref()?.mdhd.as_ref()?.timescale;
    if timescale == 0 {
        return None;
    }
    let stbl = trak.stbl()?;
    let stts = stbl.stts.as_ref()?;
    let stsc = stbl.stsc.as_ref()?;
    let stsz = stbl.stsz.as_ref()?;
    let offsets: Vec<u64> = match (&stbl.stco, &stbl.co64) {
        (Some(stco), _) => stco.offsets.iter().map(|o| *o as u64).collect(),
        (_, Some(co64)) => co64.offsets.clone(),
        (None, None) => return None,
    };

    let durations = stts.sample_durations();
    let chunks = stsc.sample_chunks(offsets.len() as u32);

    let mut chapters = Vec::with_capacity(durations.len());
    let mut start_ticks = 0u64;
    let mut current_chunk = 0u32;
    let mut in_chunk_offset = 0u64;

    for (i, duration) in durations.iter().enumerate() {
        let chunk = match chunks.get(i) {
            Some(c) => *c,
            None => break,
        };
        if chunk != current_chunk {
            current_chunk = chunk;
            in_chunk_offset = 0;
        }
        let chunk_offset = match offsets.get(chunk as usize - 1) {
            Some(o) => *o,
            None => break,
        };

        let title = match read_chapter_title(reader, chunk_offset + in_chunk_offset) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Error reading chapter title: {e}");
                break;
            }
        };
        chapters.push(Chapter::new(scale_duration(timescale, start_ticks), title));

        start_ticks += *duration as u64;
        in_chunk_offset += stsz.size_of(i)? as u64;
    }

    Some(chapters)
}

/// Reads a 16 bit big endian length prefixed utf-8 chapter title at the position.
fn read_chapter_title(reader: &mut (impl Read + Seek), pos: u64) -> crate::Result<String> {
    reader.seek(SeekFrom::Start(pos))?;
    let len = reader.read_be_u16()?;
    reader.read_utf8(len as u64)
}

/// How much of the item list hierarchy is missing and has to be created around the new item
/// list bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum IlstWrap {
    /// The item list can be written as is.
    None,
    /// The metadata handler is missing, `hdlr` is prepended.
    Hdlr,
    /// The metadata atom is missing, `meta` with an `hdlr` is created.
    Meta,
    /// The user data atom is missing, `udta/meta/hdlr` is created.
    Udta,
}

/// The result of scanning a file for zones and dependent fields in preparation of a save.
struct Mp4Scan {
    structure: FileStructure,
    wrap: IlstWrap,
    /// Whether a Nero chapters zone was registered. Without one (no `udta`), chapters are
    /// emitted as part of the wrapped item list content.
    has_nero_zone: bool,
    /// Whether a padding atom existed on file.
    has_padding: bool,
}

/// Scans the file, registering every zone and dependent field with the structure helper.
fn scan_structure(reader: &mut (impl Read + Seek)) -> crate::Result<Mp4Scan> {
    let file_len = reader.remaining_stream_len()?;

    let id3v2 = coexist::detect_head(reader)?;
    let data_start = id3v2.as_ref().map_or(0, |b| b.len);
    let tail = coexist::detect_tail(reader, file_len, data_start)?;
    let scan_end = tail.first().map_or(file_len, |b| b.pos);

    let mut structure = FileStructure::new(file_len);

    reader.seek(SeekFrom::Start(data_start))?;
    let ftyp = find_atom(reader, FILETYPE, scan_end)?
        .ok_or_else(|| crate::Error::new(ErrorKind::NoFtyp, "No filetype atom found."))?;

    let root_pos = ftyp.end();
    reader.seek(SeekFrom::Start(root_pos))?;
    let moov = find_atom(reader, MOVIE, scan_end)?.ok_or_else(|| {
        crate::Error::new(
            ErrorKind::AtomNotFound(MOVIE),
            "Missing necessary data, no movie (moov) atom found",
        )
    })?;

    // chunk offsets of every track
    reader.seek(SeekFrom::Start(moov.content_pos()))?;
    loop {
        let trak = match find_atom(reader, TRACK, moov.end())? {
            Some(t) => t,
            None => break,
        };

        let stbl_path = [MEDIA, MEDIA_INFORMATION, SAMPLE_TABLE];
        if let Some(stbl) = find_atom_path(reader, &stbl_path, trak.end())? {
            let cfg = ReadConfig::default();

            reader.seek(SeekFrom::Start(stbl.content_pos()))?;
            if let Some(bounds) = find_atom(reader, SAMPLE_TABLE_CHUNK_OFFSET, stbl.end())? {
                let stco = Stco::parse(reader, &cfg, bounds.size())?;
                for (i, offset) in stco.offsets.iter().enumerate() {
                    structure.add_offset(stco.table_pos + 4 * i as u64, *offset as u64, Width::U32)?;
                }
            }

            reader.seek(SeekFrom::Start(stbl.content_pos()))?;
            if let Some(bounds) = find_atom(reader, SAMPLE_TABLE_CHUNK_OFFSET_64, stbl.end())? {
                let co64 = Co64::parse(reader, &cfg, bounds.size())?;
                for (i, offset) in co64.offsets.iter().enumerate() {
                    structure.add_offset(co64.table_pos + 8 * i as u64, *offset, Width::U64)?;
                }
            }
        }

        reader.seek(SeekFrom::Start(trak.end()))?;
    }

    // the metadata hierarchy
    reader.seek(SeekFrom::Start(moov.content_pos()))?;
    let udta = find_atom(reader, USER_DATA, moov.end())?;

    let mut wrap = IlstWrap::Udta;
    let mut has_nero_zone = false;

    match &udta {
        Some(udta) => {
            reader.seek(SeekFrom::Start(udta.content_pos()))?;
            let chpl = find_atom(reader, CHAPTER_LIST, udta.end())?;

            reader.seek(SeekFrom::Start(udta.content_pos()))?;
            let meta = find_atom(reader, METADATA, udta.end())?;

            let ilst = match &meta {
                Some(meta) => {
                    // meta is a full atom, its children follow 4 bytes of version and flags
                    let children_pos = meta.content_pos() + 4;

                    reader.seek(SeekFrom::Start(children_pos))?;
                    let hdlr = find_atom(reader, HANDLER_REFERENCE, meta.end())?;
                    if let Some(hdlr) = &hdlr {
                        reader.seek(SeekFrom::Start(hdlr.content_pos() + 8))?;
                        let mut handler_type = Fourcc([0; 4]);
                        reader.read_exact(&mut *handler_type)?;
                        if handler_type != METADATA_DIRECTORY {
                            return Err(crate::Error::new(
                                ErrorKind::UnsupportedMetaHandler(handler_type),
                                format!("Unsupported metadata handler type '{handler_type}'"),
                            ));
                        }
                    }
                    wrap = match hdlr {
                        Some(_) => IlstWrap::None,
                        None => IlstWrap::Hdlr,
                    };

                    reader.seek(SeekFrom::Start(children_pos))?;
                    find_atom(reader, ITEM_LIST, meta.end())?
                }
                None => {
                    wrap = IlstWrap::Meta;
                    None
                }
            };

            match &ilst {
                Some(ilst) => {
                    structure.add_zone(
                        ZONE_ILST,
                        ilst.pos(),
                        ilst.len(),
                        ILST_SIGNATURE.to_vec(),
                        false,
                    );
                }
                None => {
                    let pos = meta.as_ref().map_or(udta.end(), |m| m.end());
                    structure.add_zone(ZONE_ILST, pos, 0, ILST_SIGNATURE.to_vec(), false);
                }
            }

            match &chpl {
                Some(chpl) => {
                    structure.add_zone(ZONE_NERO_CHAPTERS, chpl.pos(), chpl.len(), Vec::new(), false)
                }
                None => structure.add_zone(ZONE_NERO_CHAPTERS, udta.end(), 0, Vec::new(), false),
            }
            has_nero_zone = true;

            add_size_field(&mut structure, udta, &[ZONE_ILST, ZONE_NERO_CHAPTERS])?;
            if let Some(meta) = &meta {
                add_size_field(&mut structure, meta, &[ZONE_ILST])?;
            }
            add_size_field(&mut structure, &moov, &[ZONE_ILST, ZONE_NERO_CHAPTERS])?;
        }
        None => {
            // the whole hierarchy is created as part of the item list zone
            structure.add_zone(ZONE_ILST, moov.end(), 0, ILST_SIGNATURE.to_vec(), false);
            add_size_field(&mut structure, &moov, &[ZONE_ILST])?;
        }
    }

    // elastic padding at the root level
    reader.seek(SeekFrom::Start(root_pos))?;
    let free = find_atom(reader, FREE, scan_end)?;
    let has_padding = free.is_some();
    match &free {
        Some(free) => {
            structure.add_zone(ZONE_PADDING, free.pos(), free.len(), free_signature(), true)
        }
        None => structure.add_zone(ZONE_PADDING, moov.end(), 0, free_signature(), true),
    }

    // sibling tag systems
    if let Some(block) = &id3v2 {
        structure.add_zone(block.system.zone_name(), block.pos, block.len, Vec::new(), false);
    }
    for block in &tail {
        structure.add_zone(block.system.zone_name(), block.pos, block.len, Vec::new(), false);
    }

    Ok(Mp4Scan { structure, wrap, has_nero_zone, has_padding })
}

/// Registers the atom's size field for the zones it depends on.
fn add_size_field(
    structure: &mut FileStructure,
    bounds: &AtomBounds,
    zones: &[&str],
) -> crate::Result<()> {
    for zone in zones {
        if bounds.ext() {
            structure.add_size(bounds.pos() + 8, bounds.len(), Width::U64, *zone)?;
        } else {
            structure.add_size(bounds.pos(), bounds.len(), Width::U32, *zone)?;
        }
    }
    Ok(())
}

/// The head of an empty padding atom.
fn free_signature() -> Vec<u8> {
    vec![0x00, 0x00, 0x00, 0x08, b'f', b'r', b'e', b'e']
}

/// Builds a padding atom of the size.
fn free_box(size: u32) -> Vec<u8> {
    let size = size.max(8);
    let mut buf = free_signature();
    buf[..4].copy_from_slice(&size.to_be_bytes());
    buf.resize(size as usize, 0);
    buf
}

/// Wraps content bytes in an atom with the identifier. `meta` is written as a full atom with
/// version and flags.
fn wrap_box(fourcc: Fourcc, content: &[u8]) -> crate::Result<Vec<u8>> {
    let full_head_len = if fourcc == METADATA { 4 } else { 0 };
    let size = Size::from(content.len() as u64 + full_head_len);
    if size.len() > u32::MAX as u64 {
        return Err(crate::Error::new(
            ErrorKind::Overflow("atom length"),
            format!("Created atom '{fourcc}' exceeds the 32 bit atom length"),
        ));
    }

    let mut buf = Vec::with_capacity(size.len() as usize);
    write_head(&mut buf, Head::from(size, fourcc))?;
    if full_head_len > 0 {
        write_full_head(&mut buf, 0, [0; 3])?;
    }
    buf.extend_from_slice(content);
    Ok(buf)
}

/// Serializes the tag's metadata items and pictures into item list bytes.
fn stage_ilst(tag: &Tag) -> crate::Result<Vec<u8>> {
    let mut items = tag.items.clone();

    let artworks: Vec<Data> =
        tag.pictures.iter().filter(|p| !p.remove).map(|p| p.to_data()).collect();
    if !artworks.is_empty() {
        items.push(MetaItem::new(DataIdent::Fourcc(ARTWORK), artworks));
    }

    write_ilst(&items)
}

/// Attempts to write the tag to the file at the path. The new file is assembled in a temporary
/// file next to the original and moved over it once it is complete.
pub(crate) fn write_tag(tag: &Tag, path: &Path, cfg: &WriteConfig) -> crate::Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let scan = scan_structure(&mut reader)?;

    let mut contents: HashMap<String, Vec<u8>> = HashMap::new();

    // the native tag zone, wrapped in the missing parts of its hierarchy
    let ilst = stage_ilst(tag)?;
    let native = match scan.wrap {
        IlstWrap::None => ilst,
        IlstWrap::Hdlr => {
            let mut buf = meta_hdlr();
            buf.extend_from_slice(&ilst);
            buf
        }
        IlstWrap::Meta => {
            let mut content = meta_hdlr();
            content.extend_from_slice(&ilst);
            wrap_box(METADATA, &content)?
        }
        IlstWrap::Udta => {
            let mut content = meta_hdlr();
            content.extend_from_slice(&ilst);
            let mut udta = write_chpl(&tag.chapters)?;
            udta.extend(wrap_box(METADATA, &content)?);
            wrap_box(USER_DATA, &udta)?
        }
    };
    contents.insert(ZONE_ILST.to_owned(), native);

    if scan.has_nero_zone {
        contents.insert(ZONE_NERO_CHAPTERS.to_owned(), write_chpl(&tag.chapters)?);
    }

    if cfg.add_new_padding && !scan.has_padding {
        contents.insert(ZONE_PADDING.to_owned(), free_box(cfg.default_padding_size));
    }

    for system in tag.removed_systems.iter().filter(|s| **s != TagSystem::Native) {
        if scan.structure.zone(system.zone_name()).is_some() {
            contents.insert(system.zone_name().to_owned(), Vec::new());
        }
    }

    let tmp_path = tmp_path_for(path);
    let result = (|| -> crate::Result<()> {
        let tmp = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(tmp);
        scan.structure.rewrite(&mut reader, &mut writer, &contents, cfg)?;
        writer.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp_path, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Attempts to dump the metadata atoms to the writer. This doesn't include a complete MPEG-4
/// container hierarchy and won't result in a usable file.
pub(crate) fn dump_tag(tag: &Tag, writer: &mut impl Write) -> crate::Result<()> {
    let ftyp = b"M4A \x00\x00\x02\x00isomiso2";
    let mut buf = Vec::with_capacity(8 + ftyp.len());
    write_head(&mut buf, Head::from(Size::from(ftyp.len() as u64), FILETYPE))?;
    buf.extend_from_slice(ftyp);

    let mut content = meta_hdlr();
    content.extend_from_slice(&stage_ilst(tag)?);
    let mut udta = write_chpl(&tag.chapters)?;
    udta.extend(wrap_box(METADATA, &content)?);
    let moov = wrap_box(MOVIE, &wrap_box(USER_DATA, &udta)?)?;

    writer.write_all(&buf)?;
    writer.write_all(&moov)?;

    Ok(())
}
