use std::fmt;
use std::time::Duration;

/// The codec family of an audio track, determined by its sample description.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Codec {
    /// Advanced audio coding (`mp4a` or `enca`).
    Aac,
    /// Apple lossless audio codec (`alac`).
    Alac,
    /// Adaptive multi-rate narrow or wide band speech coding (`samr` or `sawb`).
    Amr,
    /// A sample description this library doesn't know about.
    Unknown,
}

impl Default for Codec {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aac => write!(f, "AAC"),
            Self::Alac => write!(f, "ALAC"),
            Self::Amr => write!(f, "AMR"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Readonly audio information of a file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AudioInfo {
    /// The total duration of the file.
    pub duration: Option<Duration>,
    /// The channel count of the audio track.
    pub channel_count: Option<u16>,
    /// The sample rate of the audio track in herz.
    pub sample_rate: Option<u32>,
    /// The average bitrate in bits per second. Taken from the elementary stream descriptor if
    /// present, otherwise computed from the media data length and the duration.
    pub avg_bitrate: Option<u32>,
    /// The maximum bitrate in bits per second.
    pub max_bitrate: Option<u32>,
    /// Whether the sample sizes vary by more than 1 percent.
    pub is_vbr: bool,
    /// The codec family of the audio track.
    pub codec: Codec,
}
