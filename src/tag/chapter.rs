use std::time::Duration;

/// A chapter of an audio file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Chapter {
    /// The start of the chapter.
    pub start: Duration,
    /// The end of the chapter. Filled in when reading, the next chapter's start or the file
    /// duration. Ignored when writing, chapters are delimited by their starts.
    pub end: Duration,
    /// The title of the chapter.
    pub title: String,
}

impl Chapter {
    /// Creates a new chapter with the start and title.
    pub fn new(start: Duration, title: impl Into<String>) -> Self {
        Self { start, end: Duration::ZERO, title: title.into() }
    }
}

/// Fills in the chapter ends from the following chapter's start, the last one from the total
/// duration.
pub(crate) fn assign_chapter_ends(chapters: &mut [Chapter], duration: Option<Duration>) {
    for i in 0..chapters.len() {
        chapters[i].end = match chapters.get(i + 1) {
            Some(next) => next.start,
            None => duration.unwrap_or(chapters[i].start),
        };
    }
}
