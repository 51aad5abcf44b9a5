/// Configuration of a read operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReadConfig {
    /// Whether to keep metadata items that aren't mapped to a typed accessor. They are exposed
    /// through [`Tag::additional_fields`](crate::Tag::additional_fields).
    pub read_all_meta_frames: bool,
    /// Whether to read chapter information, both from a chapter list (`chpl`) atom and from a
    /// chapter title track.
    pub read_chapters: bool,
    /// Whether to read audio information like the channel count, sample rate and bitrate.
    pub read_audio_info: bool,
    /// Whether to fall back to the file stem as the title if no title (`©nam`) atom is present.
    /// Only takes effect when reading from a path.
    pub use_filename_as_title: bool,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            read_all_meta_frames: true,
            read_chapters: true,
            read_audio_info: true,
            use_filename_as_title: false,
        }
    }
}

/// Configuration of a save operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WriteConfig {
    /// Whether to create a new padding (`free`) atom if none exists, so that the next edit can
    /// be absorbed without shifting the media data.
    pub add_new_padding: bool,
    /// The total length of a newly created padding atom in bytes, including its 8 byte head.
    pub default_padding_size: u32,
    /// The maximum number of bytes a growing tag may take out of an existing padding atom.
    /// Bigger deltas resize the file instead.
    pub padding_shrink_ceiling: u32,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            add_new_padding: false,
            default_padding_size: 1024,
            padding_shrink_ceiling: 4096,
        }
    }
}
