use crate::{ident, Data, Tag};

/// ### Popularity
///
/// A normalized rating in the range of 0.0 to 1.0, where 1.0 corresponds to 5 stars. Ratings
/// are stored on a 0 to 100 scale, either in the `rtng` atom or the freeform
/// `----:com.apple.iTunes:RATING` atom. Both the MediaMonkey and MusicBee conventions store
/// half star steps as multiples of 10 on that scale.
impl Tag {
    /// Returns the normalized rating.
    pub fn popularity(&self) -> Option<f32> {
        let raw = self
            .data(&ident::RATING)
            .find_map(Data::be_int)
            .or_else(|| {
                self.string(&ident::FREEFORM_RATING).find_map(|s| s.trim().parse::<i64>().ok())
            })?;

        Some((raw as f32 / 100.0).clamp(0.0, 1.0))
    }

    /// Sets the normalized rating, clamped to the range of 0.0 to 1.0.
    pub fn set_popularity(&mut self, popularity: f32) {
        let raw = (popularity.clamp(0.0, 1.0) * 100.0).round() as i32;
        self.set_data(ident::RATING, Data::be_signed(raw));
    }

    /// Removes the rating.
    pub fn remove_popularity(&mut self) {
        self.remove_data(&ident::RATING);
        self.remove_data(&ident::FREEFORM_RATING);
    }
}
