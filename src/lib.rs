//! A library for reading and in-place rewriting of audio file metadata.
//!
//! Metadata lives in rewritable zones of a file, every size and offset field whose value
//! depends on those zones is tracked and patched when the file is rewritten. The canonical
//! container is MPEG-4 audio (AAC/ALAC) with iTunes style metadata.
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub use crate::atom::{ident, Data, DataIdent, Fourcc, FreeformIdent, Ident, MetaItem};
pub use crate::coexist::TagSystem;
pub use crate::config::{ReadConfig, WriteConfig};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::img::{Img, ImgBuf, ImgFmt, ImgRef};
pub use crate::tag::genre::STANDARD_GENRES;
pub use crate::tag::{Chapter, PicType, Picture, Tag};
pub use crate::types::{AudioInfo, Codec};

mod atom;
mod coexist;
mod config;
mod error;
mod img;
mod structure;
mod tag;
mod types;
