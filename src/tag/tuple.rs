use crate::{ident, Data, Tag};

/// ### Track
///
/// The track number and total number of tracks are stored in a tuple. If only one is present
/// the other is represented as 0 and will be treated as if nonexistent.
impl Tag {
    /// Returns the track number and the total number of tracks (`trkn`).
    pub fn track(&self) -> (Option<u16>, Option<u16>) {
        let vec = match self.bytes(&ident::TRACK_NUMBER).next() {
            Some(v) => v,
            None => return (None, None),
        };

        (number(vec), total(vec))
    }

    /// Returns the track number (`trkn`).
    pub fn track_number(&self) -> Option<u16> {
        self.track().0
    }

    /// Returns the total number of tracks (`trkn`).
    pub fn total_tracks(&self) -> Option<u16> {
        self.track().1
    }

    /// Sets the track number and the total number of tracks (`trkn`).
    pub fn set_track(&mut self, track_number: u16, total_tracks: u16) {
        let mut vec = Vec::with_capacity(8);
        vec.extend_from_slice(&[0, 0]);
        vec.extend_from_slice(&track_number.to_be_bytes());
        vec.extend_from_slice(&total_tracks.to_be_bytes());
        vec.extend_from_slice(&[0, 0]);

        self.set_data(ident::TRACK_NUMBER, Data::Reserved(vec));
    }

    /// Removes the track number and the total number of tracks (`trkn`).
    pub fn remove_track(&mut self) {
        self.remove_data(&ident::TRACK_NUMBER);
    }
}

/// ### Disc
///
/// The disc number and total number of discs are stored in a tuple. If only one is present the
/// other is represented as 0 and will be treated as if nonexistent.
impl Tag {
    /// Returns the disc number and the total number of discs (`disk`).
    pub fn disc(&self) -> (Option<u16>, Option<u16>) {
        let vec = match self.bytes(&ident::DISC_NUMBER).next() {
            Some(v) => v,
            None => return (None, None),
        };

        (number(vec), total(vec))
    }

    /// Returns the disc number (`disk`).
    pub fn disc_number(&self) -> Option<u16> {
        self.disc().0
    }

    /// Returns the total number of discs (`disk`).
    pub fn total_discs(&self) -> Option<u16> {
        self.disc().1
    }

    /// Sets the disc number and the total number of discs (`disk`).
    pub fn set_disc(&mut self, disc_number: u16, total_discs: u16) {
        let mut vec = Vec::with_capacity(6);
        vec.extend_from_slice(&[0, 0]);
        vec.extend_from_slice(&disc_number.to_be_bytes());
        vec.extend_from_slice(&total_discs.to_be_bytes());

        self.set_data(ident::DISC_NUMBER, Data::Reserved(vec));
    }

    /// Removes the disc number and the total number of discs (`disk`).
    pub fn remove_disc(&mut self) {
        self.remove_data(&ident::DISC_NUMBER);
    }
}

/// Returns the number at bytes 2..4, 0 is treated as nonexistent.
fn number(vec: &[u8]) -> Option<u16> {
    if vec.len() < 4 {
        return None;
    }
    Some(u16::from_be_bytes([vec[2], vec[3]])).filter(|n| *n != 0)
}

/// Returns the total at bytes 4..6, 0 is treated as nonexistent.
fn total(vec: &[u8]) -> Option<u16> {
    if vec.len() < 6 {
        return None;
    }
    Some(u16::from_be_bytes([vec[4], vec[5]])).filter(|n| *n != 0)
}
