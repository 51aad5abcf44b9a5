use std::time::Duration;

use crate::{Codec, Tag};

/// ### Audio information
impl Tag {
    /// Returns the total duration of the file.
    pub fn duration(&self) -> Option<Duration> {
        self.info.duration
    }

    /// Returns the channel count of the audio track.
    pub fn channel_count(&self) -> Option<u16> {
        self.info.channel_count
    }

    /// Returns the sample rate of the audio track in herz.
    pub fn sample_rate(&self) -> Option<u32> {
        self.info.sample_rate
    }

    /// Returns the average bitrate in bits per second.
    pub fn avg_bitrate(&self) -> Option<u32> {
        self.info.avg_bitrate
    }

    /// Returns the maximum bitrate in bits per second.
    pub fn max_bitrate(&self) -> Option<u32> {
        self.info.max_bitrate
    }

    /// Returns whether the audio track is variable bitrate encoded.
    pub fn is_vbr(&self) -> bool {
        self.info.is_vbr
    }

    /// Returns the codec family of the audio track.
    pub fn codec(&self) -> Codec {
        self.info.codec
    }

    /// Returns the filetype (`ftyp`).
    pub fn filetype(&self) -> &str {
        self.ftyp.as_str()
    }
}
