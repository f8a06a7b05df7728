mod format;
mod track;

pub use format::Format;
pub use track::{Track, TrackDescriptor};
