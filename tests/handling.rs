use std::io::Cursor;
use std::time::Duration;

use audiometa::{Chapter, Img, ImgFmt, Tag, TagSystem};

#[test]
fn string_accessors() {
    let mut tag = Tag::default();
    tag.set_title("TEST TITLE");
    tag.set_artist("TEST ARTIST");
    tag.set_composer("TEST COMPOSER");
    tag.set_comment("TEST COMMENT");
    tag.set_album("TEST ALBUM");
    tag.set_album_artist("TEST ALBUM ARTIST");
    tag.set_copyright("TEST COPYRIGHT");
    tag.set_description("TEST DESCRIPTION");
    tag.set_genre("Hard Rock");
    tag.set_conductor("TEST CONDUCTOR");
    tag.set_publisher("TEST PUBLISHER");
    tag.set_original_artist("TEST ORIGINAL ARTIST");
    tag.set_original_album("TEST ORIGINAL ALBUM");

    assert_eq!(tag.title(), Some("TEST TITLE"));
    assert_eq!(tag.artist(), Some("TEST ARTIST"));
    assert_eq!(tag.composer(), Some("TEST COMPOSER"));
    assert_eq!(tag.comment(), Some("TEST COMMENT"));
    assert_eq!(tag.album(), Some("TEST ALBUM"));
    assert_eq!(tag.album_artist(), Some("TEST ALBUM ARTIST"));
    assert_eq!(tag.copyright(), Some("TEST COPYRIGHT"));
    assert_eq!(tag.description(), Some("TEST DESCRIPTION"));
    assert_eq!(tag.genre(), Some("Hard Rock"));
    assert_eq!(tag.conductor(), Some("TEST CONDUCTOR"));
    assert_eq!(tag.publisher(), Some("TEST PUBLISHER"));
    assert_eq!(tag.original_artist(), Some("TEST ORIGINAL ARTIST"));
    assert_eq!(tag.original_album(), Some("TEST ORIGINAL ALBUM"));

    tag.remove_title();
    assert_eq!(tag.title(), None);
}

#[test]
fn removed_values_are_tombstoned() {
    let mut tag = Tag::default();
    tag.set_title("TEST TITLE");
    tag.remove_title();
    assert_eq!(tag.title(), None);

    // setting a value again clears the mark
    tag.set_title("NEW TITLE");
    assert_eq!(tag.title(), Some("NEW TITLE"));
}

#[test]
fn date_and_year() {
    let mut tag = Tag::default();
    tag.set_date("2013-05-21T09:00:00Z");
    assert_eq!(tag.year(), Some("2013"));

    tag.set_date("13");
    assert_eq!(tag.year(), None);

    tag.remove_date();
    assert_eq!(tag.year(), None);
}

#[test]
fn additional_fields_are_order_independent() {
    let fields = [
        ("----:com.apple.iTunes:TEST", "This is a test 父"),
        ("----:com.apple.iTunes:TES2", "This is another test 父"),
        ("cust", "custom fourcc"),
    ];

    let mut forward = Tag::default();
    for (code, value) in fields.iter() {
        forward.set_additional_field(*code, *value);
    }
    let mut backward = Tag::default();
    for (code, value) in fields.iter().rev() {
        backward.set_additional_field(*code, *value);
    }

    let mut a: Vec<_> = forward.additional_fields().collect();
    let mut b: Vec<_> = backward.additional_fields().collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
}

#[test]
fn mapped_fields_are_not_additional() {
    let mut tag = Tag::default();
    tag.set_title("TEST TITLE");
    tag.set_conductor("TEST CONDUCTOR");
    tag.set_track(1, 2);
    tag.set_additional_field("----:com.apple.iTunes:TEST", "xxx");

    let fields: Vec<_> = tag.additional_fields().collect();
    assert_eq!(fields, vec![("----:com.apple.iTunes:TEST".to_owned(), "xxx".to_owned())]);
}

#[test]
fn invalid_additional_field_codes_are_ignored() {
    let mut tag = Tag::default();
    tag.set_additional_field("way too long", "xxx");
    tag.set_additional_field("----:missing-name", "xxx");
    assert_eq!(tag.additional_fields().count(), 0);
}

#[test]
fn picture_tombstones() {
    let mut tag = Tag::default();
    tag.add_picture(Img::jpeg(vec![0xFF, 0xD8, 0xFF, 0x01]));
    tag.add_picture(Img::png(vec![0x89, 0x50, 0x4E, 0x47]));
    assert_eq!(tag.pictures().count(), 2);

    tag.pictures_mut().next().unwrap().remove = true;
    assert_eq!(tag.pictures().count(), 1);
    assert_eq!(tag.picture().unwrap().fmt, ImgFmt::Png);

    tag.remove_pictures();
    assert_eq!(tag.pictures().count(), 0);
}

#[test]
fn removing_the_native_system_clears_everything() {
    let mut tag = Tag::default();
    tag.set_title("TEST TITLE");
    tag.add_picture(Img::jpeg(vec![0xFF, 0xD8, 0xFF, 0x01]));
    tag.chapters_mut().push(Chapter::new(Duration::ZERO, "Intro"));

    tag.remove_tags(TagSystem::Native);
    assert!(tag.is_empty());
    assert_eq!(tag.title(), None);
}

#[test]
fn dump_is_readable() {
    let mut tag = Tag::default();
    tag.set_title("TEST TITLE");
    tag.set_additional_field("----:com.apple.iTunes:TEST", "xxx");
    tag.add_picture(Img::jpeg(vec![0xFF, 0xD8, 0xFF, 0x01]));
    tag.chapters_mut().push(Chapter::new(Duration::from_millis(123), "aaa"));

    let mut buf = Vec::new();
    tag.dump_to(&mut buf).unwrap();

    let dumped = Tag::read_from(&mut Cursor::new(buf)).unwrap();
    assert_eq!(dumped.title(), Some("TEST TITLE"));
    assert_eq!(dumped.additional_field("----:com.apple.iTunes:TEST").as_deref(), Some("xxx"));
    assert_eq!(dumped.pictures().count(), 1);
    assert_eq!(dumped.chapters().len(), 1);
    assert_eq!(dumped.chapters()[0].title, "aaa");
}

#[test]
fn genre_round_trips_through_the_standard_table() {
    let mut tag = Tag::default();
    tag.set_genre(audiometa::STANDARD_GENRES[17]);
    assert_eq!(tag.genre(), Some("Rock"));
    assert_eq!(tag.standard_genre_code(), Some(18));
}
