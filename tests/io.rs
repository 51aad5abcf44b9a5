use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use audiometa::{Chapter, Img, ImgFmt, ReadConfig, Tag, TagSystem, WriteConfig};
use walkdir::WalkDir;

const EXTENSIONS: [&str; 6] = [".m4a", ".m4b", ".m4p", ".m4v", ".mp4", ".3gp"];

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

// ## fixture construction

fn atom(fourcc: &str, content: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + content.len());
    buf.extend_from_slice(&(content.len() as u32 + 8).to_be_bytes());
    buf.extend_from_slice(fourcc.as_bytes());
    buf.extend_from_slice(content);
    buf
}

/// An atom with a version and flags prefix.
fn full_atom(fourcc: &str, content: &[u8]) -> Vec<u8> {
    let mut full = vec![0; 4];
    full.extend_from_slice(content);
    atom(fourcc, &full)
}

fn data_atom(class: u32, payload: &[u8]) -> Vec<u8> {
    let mut content = class.to_be_bytes().to_vec();
    content.extend_from_slice(&[0; 4]);
    content.extend_from_slice(payload);
    atom("data", &content)
}

fn item(fourcc: &str, class: u32, payload: &[u8]) -> Vec<u8> {
    let mut latin1 = Vec::new();
    for c in fourcc.chars() {
        latin1.push(c as u8);
    }
    let mut buf = Vec::new();
    let data = data_atom(class, payload);
    buf.extend_from_slice(&(data.len() as u32 + 8).to_be_bytes());
    buf.extend_from_slice(&latin1);
    buf.extend_from_slice(&data);
    buf
}

fn freeform_item(mean: &str, name: &str, value: &str) -> Vec<u8> {
    let mut content = full_atom("mean", mean.as_bytes());
    content.extend(full_atom("name", name.as_bytes()));
    content.extend(data_atom(1, value.as_bytes()));
    atom("----", &content)
}

fn hdlr(subtype: &[u8; 4]) -> Vec<u8> {
    let mut content = vec![0; 4]; // component type
    content.extend_from_slice(subtype);
    content.extend_from_slice(&[0; 13]);
    full_atom("hdlr", &content)
}

fn mvhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut content = vec![0; 8]; // creation and modification time
    content.extend_from_slice(&timescale.to_be_bytes());
    content.extend_from_slice(&duration.to_be_bytes());
    full_atom("mvhd", &content)
}

fn tkhd(id: u32) -> Vec<u8> {
    let mut content = vec![0; 8];
    content.extend_from_slice(&id.to_be_bytes());
    full_atom("tkhd", &content)
}

fn mdhd(timescale: u32) -> Vec<u8> {
    let mut content = vec![0; 8];
    content.extend_from_slice(&timescale.to_be_bytes());
    content.extend_from_slice(&0u32.to_be_bytes());
    full_atom("mdhd", &content)
}

fn mp4a_entry(channels: u16, sample_rate: u32) -> Vec<u8> {
    let mut content = vec![0; 16];
    content.extend_from_slice(&channels.to_be_bytes());
    content.extend_from_slice(&16u16.to_be_bytes());
    content.extend_from_slice(&[0; 4]);
    content.extend_from_slice(&(sample_rate << 16).to_be_bytes());
    atom("mp4a", &content)
}

fn text_entry() -> Vec<u8> {
    atom("text", &[0; 8])
}

fn stsd(entry: &[u8]) -> Vec<u8> {
    let mut content = 1u32.to_be_bytes().to_vec();
    content.extend_from_slice(entry);
    full_atom("stsd", &content)
}

fn stts(runs: &[(u32, u32)]) -> Vec<u8> {
    let mut content = (runs.len() as u32).to_be_bytes().to_vec();
    for (count, duration) in runs {
        content.extend_from_slice(&count.to_be_bytes());
        content.extend_from_slice(&duration.to_be_bytes());
    }
    full_atom("stts", &content)
}

fn stsc(runs: &[(u32, u32)]) -> Vec<u8> {
    let mut content = (runs.len() as u32).to_be_bytes().to_vec();
    for (first_chunk, samples) in runs {
        content.extend_from_slice(&first_chunk.to_be_bytes());
        content.extend_from_slice(&samples.to_be_bytes());
        content.extend_from_slice(&1u32.to_be_bytes());
    }
    full_atom("stsc", &content)
}

fn stsz(sizes: &[u32]) -> Vec<u8> {
    let mut content = 0u32.to_be_bytes().to_vec();
    content.extend_from_slice(&(sizes.len() as u32).to_be_bytes());
    for s in sizes {
        content.extend_from_slice(&s.to_be_bytes());
    }
    full_atom("stsz", &content)
}

fn stco(offsets: &[u32]) -> Vec<u8> {
    let mut content = (offsets.len() as u32).to_be_bytes().to_vec();
    for o in offsets {
        content.extend_from_slice(&o.to_be_bytes());
    }
    full_atom("stco", &content)
}

fn tref_chap(track_id: u32) -> Vec<u8> {
    let chap = atom("chap", &track_id.to_be_bytes());
    atom("tref", &chap)
}

fn chpl(chapters: &[(u64, &str)]) -> Vec<u8> {
    let mut content = vec![1, 0, 0, 0]; // version 1
    content.push(0); // reserved
    content.extend_from_slice(&(chapters.len() as u32).to_be_bytes());
    for (start_ms, title) in chapters {
        content.extend_from_slice(&(start_ms * 10_000).to_be_bytes());
        content.push(title.len() as u8);
        content.extend_from_slice(title.as_bytes());
    }
    atom("chpl", &content)
}

/// The description of a synthesized MPEG-4 audio file.
#[derive(Default)]
struct FileSpec {
    /// Raw metadata item atoms inside the item list. `None` omits the whole `udta` hierarchy.
    ilst_items: Option<Vec<Vec<u8>>>,
    /// A raw `chpl` atom inside `udta`.
    chpl: Option<Vec<u8>>,
    /// Chapter titles stored as a Quicktime chapter title track, with per sample durations in
    /// milliseconds.
    text_samples: Option<Vec<(u32, String)>>,
    /// The content length of a root level `free` atom between `moov` and `mdat`.
    free_len: Option<u32>,
    /// The metadata handler type, `mdir` unless overridden.
    meta_handler: Option<[u8; 4]>,
}

const AUDIO_SAMPLES: u32 = 4;
const AUDIO_SAMPLE_LEN: u32 = 100;

fn audio_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    for i in 0..AUDIO_SAMPLES {
        payload.extend(std::iter::repeat(0xA0 + i as u8).take(AUDIO_SAMPLE_LEN as usize));
    }
    payload
}

fn build_file(spec: &FileSpec) -> Vec<u8> {
    // the chunk offsets depend on the moov length, build twice
    let first = assemble(spec, 0, 0);
    let audio_pos = first.mdat_content_pos;
    let text_pos = audio_pos + audio_payload().len() as u32;
    assemble(spec, audio_pos, text_pos).bytes
}

struct Assembled {
    bytes: Vec<u8>,
    mdat_content_pos: u32,
}

fn assemble(spec: &FileSpec, audio_pos: u32, text_pos: u32) -> Assembled {
    let ftyp = atom("ftyp", b"M4A \x00\x00\x02\x00isomiso2");

    let mut audio_trak_content = tkhd(1);
    if spec.text_samples.is_some() {
        audio_trak_content.extend(tref_chap(2));
    }
    let mut audio_mdia = mdhd(44100);
    audio_mdia.extend(hdlr(b"soun"));
    let mut audio_stbl = stsd(&mp4a_entry(2, 44100));
    audio_stbl.extend(stts(&[(AUDIO_SAMPLES, 44100)]));
    audio_stbl.extend(stsc(&[(1, AUDIO_SAMPLES)]));
    audio_stbl.extend(stsz(&[AUDIO_SAMPLE_LEN; 4]));
    audio_stbl.extend(stco(&[audio_pos]));
    audio_mdia.extend(atom("minf", &atom("stbl", &audio_stbl)));
    audio_trak_content.extend(atom("mdia", &audio_mdia));
    let audio_trak = atom("trak", &audio_trak_content);

    let mut moov_content = mvhd(1000, 4000);
    moov_content.extend(&audio_trak);

    let mut text_payload = Vec::new();
    if let Some(samples) = &spec.text_samples {
        let mut sizes = Vec::new();
        let mut durations = Vec::new();
        for (duration, title) in samples {
            sizes.push(title.len() as u32 + 2);
            durations.push(*duration);
            text_payload.extend_from_slice(&(title.len() as u16).to_be_bytes());
            text_payload.extend_from_slice(title.as_bytes());
        }

        let mut text_mdia = mdhd(1000);
        text_mdia.extend(hdlr(b"text"));
        let mut text_stbl = stsd(&text_entry());
        text_stbl.extend(stts(&durations.iter().map(|d| (1, *d)).collect::<Vec<_>>()));
        text_stbl.extend(stsc(&[(1, samples.len() as u32)]));
        text_stbl.extend(stsz(&sizes));
        text_stbl.extend(stco(&[text_pos]));
        text_mdia.extend(atom("minf", &atom("stbl", &text_stbl)));

        let mut text_trak = tkhd(2);
        text_trak.extend(atom("mdia", &text_mdia));
        moov_content.extend(atom("trak", &text_trak));
    }

    let mut udta_content = Vec::new();
    if let Some(chpl) = &spec.chpl {
        udta_content.extend_from_slice(chpl);
    }
    if let Some(items) = &spec.ilst_items {
        let handler = spec.meta_handler.unwrap_or(*b"mdir");
        let mut meta_content = hdlr(&handler);
        meta_content.extend(atom("ilst", &items.concat()));
        udta_content.extend(full_atom("meta", &meta_content));
    }
    if !udta_content.is_empty() {
        moov_content.extend(atom("udta", &udta_content));
    }

    let moov = atom("moov", &moov_content);

    let mut bytes = ftyp;
    bytes.extend(&moov);
    if let Some(free_len) = spec.free_len {
        bytes.extend(atom("free", &vec![0; free_len as usize]));
    }

    let mdat_content_pos = bytes.len() as u32 + 8;
    let mut mdat_content = audio_payload();
    mdat_content.extend(&text_payload);
    bytes.extend(atom("mdat", &mdat_content));

    Assembled { bytes, mdat_content_pos }
}

fn tagged_file_spec() -> FileSpec {
    let mut jpeg = JPEG_MAGIC.to_vec();
    jpeg.extend_from_slice(&[0xE0; 64]);

    FileSpec {
        ilst_items: Some(vec![
            item("\u{a9}nam", 1, "TEST TITLE".as_bytes()),
            freeform_item("com.apple.iTunes", "TEST", "xxx"),
            item("covr", 13, &jpeg),
        ]),
        ..FileSpec::default()
    }
}

// ## test file plumbing

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("audiometa_{}_{name}", std::process::id()))
}

fn write_tmp(name: &str, bytes: &[u8]) -> PathBuf {
    let path = tmp_path(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[track_caller]
fn read_tag(path: &Path) -> Tag {
    Tag::read_from_path(path).unwrap()
}

/// Returns the position and length of every top level atom.
fn top_level_atoms(buf: &[u8]) -> Vec<(String, usize, usize)> {
    let mut atoms = Vec::new();
    let mut pos = 0;
    while pos + 8 <= buf.len() {
        let len = u32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]) as usize;
        let fourcc = String::from_utf8_lossy(&buf[pos + 4..pos + 8]).into_owned();
        if len < 8 {
            break;
        }
        atoms.push((fourcc, pos, len));
        pos += len;
    }
    atoms
}

fn top_level(buf: &[u8], fourcc: &str) -> Option<(usize, usize)> {
    top_level_atoms(buf)
        .into_iter()
        .find(|(f, _, _)| f == fourcc)
        .map(|(_, pos, len)| (pos, len))
}

fn chapter_starts(tag: &Tag) -> Vec<(u128, String)> {
    tag.chapters().iter().map(|c| (c.start.as_millis(), c.title.clone())).collect()
}

// ## scenarios

#[test]
fn read_tagged_file() {
    let path = write_tmp("read.m4a", &build_file(&tagged_file_spec()));

    let tag = read_tag(&path);
    assert!(tag.tag_exists());
    assert_eq!(tag.title(), Some("TEST TITLE"));
    assert_eq!(tag.pictures().count(), 1);
    assert_eq!(tag.picture().unwrap().fmt, ImgFmt::Jpeg);
    assert_eq!(tag.additional_field("----:com.apple.iTunes:TEST").as_deref(), Some("xxx"));

    assert_eq!(tag.duration(), Some(Duration::from_secs(4)));
    assert_eq!(tag.sample_rate(), Some(44100));
    assert_eq!(tag.channel_count(), Some(2));
    assert!(!tag.is_vbr());

    let _ = fs::remove_file(path);
}

#[test]
fn add_conductor_and_picture() {
    let path = write_tmp("conductor.m4a", &build_file(&tagged_file_spec()));

    let mut png = PNG_MAGIC.to_vec();
    png.extend_from_slice(&[0x0D; 175]);

    let mut tag = read_tag(&path);
    tag.set_conductor("John Jackman");
    tag.add_picture(Img::png(png.clone()));
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    assert_eq!(tag.conductor(), Some("John Jackman"));
    assert_eq!(tag.pictures().count(), 2);
    let second = tag.pictures().nth(1).unwrap();
    assert_eq!(second.fmt, ImgFmt::Png);
    assert_eq!(second.data, png);
    // the original field and picture survived
    assert_eq!(tag.additional_field("----:com.apple.iTunes:TEST").as_deref(), Some("xxx"));
    assert_eq!(tag.picture().unwrap().fmt, ImgFmt::Jpeg);

    let _ = fs::remove_file(path);
}

#[test]
fn clear_conductor_and_delete_picture() {
    let path = write_tmp("clear.m4a", &build_file(&tagged_file_spec()));

    let mut tag = read_tag(&path);
    tag.set_conductor("John Jackman");
    tag.add_picture(Img::png(PNG_MAGIC.to_vec()));
    tag.save_to_path(&path).unwrap();

    let mut tag = read_tag(&path);
    tag.set_conductor("");
    for p in tag.pictures_mut().filter(|p| p.fmt == ImgFmt::Png) {
        p.remove = true;
    }
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    assert_eq!(tag.conductor(), None);
    assert_eq!(tag.pictures().count(), 1);
    assert_eq!(tag.picture().unwrap().fmt, ImgFmt::Jpeg);

    let _ = fs::remove_file(path);
}

#[test]
fn custom_fields_round_trip() {
    let empty = FileSpec { ilst_items: Some(Vec::new()), ..FileSpec::default() };
    let path = write_tmp("custom.m4a", &build_file(&empty));

    let mut jpeg_1 = JPEG_MAGIC.to_vec();
    jpeg_1.extend_from_slice(&[0x11; 900]);
    let mut jpeg_2 = JPEG_MAGIC.to_vec();
    jpeg_2.extend_from_slice(&[0x22; 290]);

    let mut tag = read_tag(&path);
    assert!(tag.is_empty());
    tag.set_additional_field("----:com.apple.iTunes:TEST", "This is a test 父");
    tag.set_additional_field("----:com.apple.iTunes:TES2", "This is another test 父");
    tag.add_picture(Img::jpeg(jpeg_1.clone()));
    tag.add_picture(Img::jpeg(jpeg_2.clone()));
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    assert_eq!(
        tag.additional_field("----:com.apple.iTunes:TEST").as_deref(),
        Some("This is a test 父"),
    );
    assert_eq!(
        tag.additional_field("----:com.apple.iTunes:TES2").as_deref(),
        Some("This is another test 父"),
    );
    let pictures: Vec<_> = tag.pictures().collect();
    assert_eq!(pictures.len(), 2);
    assert_eq!(pictures[0].data, jpeg_1);
    assert_eq!(pictures[1].data, jpeg_2);

    let _ = fs::remove_file(path);
}

#[test]
fn delete_custom_field_and_picture() {
    let empty = FileSpec { ilst_items: Some(Vec::new()), ..FileSpec::default() };
    let path = write_tmp("delete.m4a", &build_file(&empty));

    let mut jpeg_2 = JPEG_MAGIC.to_vec();
    jpeg_2.extend_from_slice(&[0x22; 290]);

    let mut tag = read_tag(&path);
    tag.set_additional_field("----:com.apple.iTunes:TEST", "This is a test 父");
    tag.set_additional_field("----:com.apple.iTunes:TES2", "This is another test 父");
    tag.add_picture(Img::jpeg({
        let mut j = JPEG_MAGIC.to_vec();
        j.extend_from_slice(&[0x11; 900]);
        j
    }));
    tag.add_picture(Img::jpeg(jpeg_2.clone()));
    tag.save_to_path(&path).unwrap();

    let mut tag = read_tag(&path);
    tag.remove_additional_field("----:com.apple.iTunes:TEST");
    tag.pictures_mut().next().unwrap().remove = true;
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    let fields: Vec<_> = tag.additional_fields().collect();
    assert_eq!(
        fields,
        vec![(
            "----:com.apple.iTunes:TES2".to_owned(),
            "This is another test 父".to_owned(),
        )],
    );
    let pictures: Vec<_> = tag.pictures().collect();
    assert_eq!(pictures.len(), 1);
    assert_eq!(pictures[0].data, jpeg_2);

    let _ = fs::remove_file(path);
}

#[test]
fn nero_chapters_round_trip() {
    let spec = FileSpec {
        ilst_items: Some(Vec::new()),
        chpl: Some(chpl(&[
            (0, "Chapter One"),
            (1139, "Chapter 2"),
            (2728, "Chapter 003"),
            (3269, "Chapter 四"),
        ])),
        ..FileSpec::default()
    };
    let path = write_tmp("nero.mp4", &build_file(&spec));

    let mut tag = read_tag(&path);
    assert_eq!(
        chapter_starts(&tag),
        vec![
            (0, "Chapter One".to_owned()),
            (1139, "Chapter 2".to_owned()),
            (2728, "Chapter 003".to_owned()),
            (3269, "Chapter 四".to_owned()),
        ],
    );
    // chapter ends follow the next chapter's start, the last one the file duration
    assert_eq!(tag.chapters()[0].end, Duration::from_millis(1139));
    assert_eq!(tag.chapters()[3].end, Duration::from_secs(4));

    tag.set_chapters(vec![
        Chapter::new(Duration::from_millis(123), "aaa"),
        Chapter::new(Duration::from_millis(1230), "aaa0"),
    ]);
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    assert_eq!(
        chapter_starts(&tag),
        vec![(123, "aaa".to_owned()), (1230, "aaa0".to_owned())],
    );

    let _ = fs::remove_file(path);
}

#[test]
fn qt_chapters_read() {
    let spec = FileSpec {
        ilst_items: Some(Vec::new()),
        text_samples: Some(vec![
            (1139, "Chapter One".to_owned()),
            (1589, "Chapter 2".to_owned()),
            (541, "Chapter 003".to_owned()),
            (731, "Chapter 四".to_owned()),
        ]),
        ..FileSpec::default()
    };
    let path = write_tmp("qt.m4v", &build_file(&spec));

    let tag = read_tag(&path);
    assert_eq!(
        chapter_starts(&tag),
        vec![
            (0, "Chapter One".to_owned()),
            (1139, "Chapter 2".to_owned()),
            (2728, "Chapter 003".to_owned()),
            (3269, "Chapter 四".to_owned()),
        ],
    );

    let _ = fs::remove_file(path);
}

#[test]
fn qt_chapters_survive_a_save() {
    let spec = FileSpec {
        ilst_items: Some(Vec::new()),
        text_samples: Some(vec![(1139, "Chapter One".to_owned()), (1589, "Chapter 2".to_owned())]),
        ..FileSpec::default()
    };
    let path = write_tmp("qt_save.m4v", &build_file(&spec));

    let mut tag = read_tag(&path);
    let chapters = chapter_starts(&tag);
    tag.set_chapters([]);
    tag.set_title("TEST TITLE");
    tag.save_to_path(&path).unwrap();

    // the chapter title track is still readable after the item list grew
    let tag = read_tag(&path);
    assert_eq!(tag.title(), Some("TEST TITLE"));
    assert_eq!(chapter_starts(&tag), chapters);

    let _ = fs::remove_file(path);
}

#[test]
fn media_data_is_preserved() {
    let path = write_tmp("mdat.m4a", &build_file(&tagged_file_spec()));
    let original = fs::read(&path).unwrap();
    let (mdat_pos, mdat_len) = top_level(&original, "mdat").unwrap();

    let mut tag = read_tag(&path);
    tag.set_title("A new and significantly longer title than before");
    tag.set_album("TEST ALBUM");
    tag.save_to_path(&path).unwrap();

    let written = fs::read(&path).unwrap();
    let (new_pos, new_len) = top_level(&written, "mdat").unwrap();
    assert_eq!(new_len, mdat_len);
    assert_eq!(written[new_pos..new_pos + new_len], original[mdat_pos..mdat_pos + mdat_len]);

    // every chunk offset points at the same sample bytes as before
    let tag = read_tag(&path);
    assert_eq!(tag.duration(), Some(Duration::from_secs(4)));
    let offset = chunk_offset_of_first_track(&written);
    assert_eq!(written[offset..offset + 4], original[mdat_pos + 8..mdat_pos + 12]);
    assert_eq!(written[offset], 0xA0);

    let _ = fs::remove_file(path);
}

/// Follows moov/trak/mdia/minf/stbl/stco of the first track and returns the first chunk offset.
fn chunk_offset_of_first_track(buf: &[u8]) -> usize {
    let (moov_pos, moov_len) = top_level(buf, "moov").unwrap();
    let mut pos = moov_pos + 8;
    let end = moov_pos + moov_len;
    let path = ["trak", "mdia", "minf", "stbl", "stco"];
    let mut level_end = end;
    for fourcc in path {
        let mut found = None;
        while pos + 8 <= level_end {
            let len =
                u32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]) as usize;
            if &buf[pos + 4..pos + 8] == fourcc.as_bytes() {
                found = Some((pos, len));
                break;
            }
            pos += len;
        }
        let (p, l) = found.unwrap();
        level_end = p + l;
        pos = p + 8;
    }
    // version, flags and entry count precede the table
    let table_pos = pos + 8;
    u32::from_be_bytes([buf[table_pos], buf[table_pos + 1], buf[table_pos + 2], buf[table_pos + 3]])
        as usize
}

#[test]
fn save_is_idempotent() {
    let path = write_tmp("idempotent.m4a", &build_file(&tagged_file_spec()));

    let mut tag = read_tag(&path);
    tag.set_title("NEW TITLE");
    tag.save_to_path(&path).unwrap();
    let first = fs::read(&path).unwrap();

    let tag = read_tag(&path);
    tag.save_to_path(&path).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);

    let _ = fs::remove_file(path);
}

#[test]
fn container_sizes_are_consistent_after_save() {
    let path = write_tmp("sizes.m4a", &build_file(&tagged_file_spec()));

    let mut tag = read_tag(&path);
    tag.set_title("A considerably longer title to grow the item list");
    tag.save_to_path(&path).unwrap();

    // every top level atom is accounted for and the atoms cover the whole file
    let written = fs::read(&path).unwrap();
    let atoms = top_level_atoms(&written);
    let total: usize = atoms.iter().map(|(_, _, len)| len).sum();
    assert_eq!(total, written.len());
    // rereading validates the nested sizes
    let tag = read_tag(&path);
    assert_eq!(tag.title(), Some("A considerably longer title to grow the item list"));

    let _ = fs::remove_file(path);
}

#[test]
fn padding_absorbs_changes() {
    let spec = FileSpec { free_len: Some(256), ..tagged_file_spec() };
    let path = write_tmp("padding.m4a", &build_file(&spec));
    let original = fs::read(&path).unwrap();
    let (mdat_pos, _) = top_level(&original, "mdat").unwrap();

    let mut tag = read_tag(&path);
    tag.set_title("A slightly longer test title");
    tag.save_to_path(&path).unwrap();

    let written = fs::read(&path).unwrap();
    // the padding absorbed the growth, nothing moved
    assert_eq!(written.len(), original.len());
    assert_eq!(top_level(&written, "mdat").unwrap().0, mdat_pos);
    let offset = chunk_offset_of_first_track(&written);
    assert_eq!(written[offset..offset + 4], original[offset..offset + 4]);

    let _ = fs::remove_file(path);
}

#[test]
fn new_padding_is_created() {
    let path = write_tmp("new_padding.m4a", &build_file(&tagged_file_spec()));

    let tag = read_tag(&path);
    let cfg = WriteConfig { add_new_padding: true, ..WriteConfig::default() };
    tag.save_to_path_with(&path, &cfg).unwrap();

    let written = fs::read(&path).unwrap();
    let (_, free_len) = top_level(&written, "free").unwrap();
    assert_eq!(free_len, 1024);
    // the file is still fully readable
    let tag = read_tag(&path);
    assert_eq!(tag.title(), Some("TEST TITLE"));

    let _ = fs::remove_file(path);
}

#[test]
fn id3v1_block_survives_save() {
    let mut bytes = build_file(&tagged_file_spec());
    let mut id3v1 = b"TAG".to_vec();
    id3v1.resize(128, 0);
    id3v1[3..8].copy_from_slice(b"OTHER");
    bytes.extend_from_slice(&id3v1);
    let path = write_tmp("id3v1.m4a", &bytes);

    let mut tag = read_tag(&path);
    tag.set_title("NEW TITLE");
    tag.save_to_path(&path).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(&written[written.len() - 128..], &id3v1[..]);
    let tag = read_tag(&path);
    assert_eq!(tag.title(), Some("NEW TITLE"));

    let _ = fs::remove_file(path);
}

#[test]
fn id3v1_block_can_be_removed() {
    let mut bytes = build_file(&tagged_file_spec());
    let len_without_block = bytes.len();
    let mut id3v1 = b"TAG".to_vec();
    id3v1.resize(128, 0);
    bytes.extend_from_slice(&id3v1);
    let path = write_tmp("id3v1_remove.m4a", &bytes);

    let mut tag = read_tag(&path);
    tag.remove_tags(TagSystem::Id3v1);
    tag.save_to_path(&path).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(written.len(), len_without_block);
    assert_ne!(&written[written.len() - 128..written.len() - 125], b"TAG");

    let _ = fs::remove_file(path);
}

#[test]
fn tag_is_created_without_a_udta() {
    let spec = FileSpec::default();
    let path = write_tmp("no_udta.m4a", &build_file(&spec));

    let mut tag = read_tag(&path);
    assert!(!tag.tag_exists());
    tag.set_title("TEST TITLE");
    tag.set_chapters(vec![Chapter::new(Duration::ZERO, "Intro")]);
    tag.save_to_path(&path).unwrap();

    let tag = read_tag(&path);
    assert!(tag.tag_exists());
    assert_eq!(tag.title(), Some("TEST TITLE"));
    assert_eq!(chapter_starts(&tag), vec![(0, "Intro".to_owned())]);

    let _ = fs::remove_file(path);
}

#[test]
fn unsupported_meta_handler_fails_fast() {
    let spec = FileSpec {
        ilst_items: Some(vec![item("\u{a9}nam", 1, b"TEST TITLE")]),
        meta_handler: Some(*b"mp7t"),
        ..FileSpec::default()
    };
    let path = write_tmp("mp7t.m4a", &build_file(&spec));

    let err = Tag::read_from_path(&path).unwrap_err();
    assert!(matches!(err.kind, audiometa::ErrorKind::UnsupportedMetaHandler(_)));

    let _ = fs::remove_file(path);
}

#[test]
fn missing_moov_degrades_to_an_empty_tag() {
    let mut bytes = atom("ftyp", b"M4A \x00\x00\x02\x00isomiso2");
    bytes.extend(atom("mdat", &[0; 64]));

    let tag = Tag::read_from(&mut Cursor::new(bytes)).unwrap();
    assert!(!tag.tag_exists());
    assert_eq!(tag.duration(), None);
    assert_eq!(tag.sample_rate(), None);
}

#[test]
fn filename_fallback_title() {
    let spec = FileSpec { ilst_items: Some(Vec::new()), ..FileSpec::default() };
    let path = write_tmp("fallback_title.m4a", &build_file(&spec));

    let cfg = ReadConfig { use_filename_as_title: true, ..ReadConfig::default() };
    let tag = Tag::read_from_path_with(&path, &cfg).unwrap();
    let stem = path.file_stem().unwrap().to_str().unwrap();
    assert_eq!(tag.title(), Some(stem));

    let _ = fs::remove_file(path);
}

#[test]
fn failed_save_leaves_the_file_untouched() {
    let spec = FileSpec {
        ilst_items: Some(vec![item("\u{a9}nam", 1, b"TEST TITLE")]),
        meta_handler: Some(*b"mp7t"),
        ..FileSpec::default()
    };
    let bytes = build_file(&spec);
    let path = write_tmp("failed_save.m4a", &bytes);

    let mut tag = Tag::default();
    tag.set_title("SOMETHING");
    assert!(tag.save_to_path(&path).is_err());
    assert_eq!(fs::read(&path).unwrap(), bytes);

    let _ = fs::remove_file(path);
}

#[test]
fn read_sample_files() {
    for d in WalkDir::new("files")
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.metadata().map(|m| m.is_file()).unwrap_or(false))
    {
        let filename = d.file_name().to_str().unwrap();
        if !EXTENSIONS.iter().any(|e| filename.ends_with(e)) {
            continue;
        }

        let filepath = d.into_path();
        println!("{}:", filepath.display());
        let tag = Tag::read_from_path(&filepath).unwrap();
        println!("{tag}");
    }
}
