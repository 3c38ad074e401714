//! # Local Library Module
//!
//! This module models the locally stored side of the synchronisation: audio
//! files on disk, the tag metadata read from them, and the playlists that
//! group them.
//!
//! The remote identifier of a local track is a tri-state value modelled by
//! [`Uri`]: a track is either unresolved (never searched), confirmed
//! unavailable on the remote service, or resolved to a concrete URI. The
//! distinction between "never searched" and "searched but absent" is load
//! bearing for every other module and must survive every serialization path.
//!
//! Tag access goes through the [`TagProvider`] seam so the matching and
//! checking engines never touch file formats directly. [`FileTagProvider`]
//! is the lofty-backed implementation covering FLAC, MP3, M4A, and WMA.

mod file;
mod library;
mod track;

pub use file::FileTagProvider;
pub use file::LoadError;
pub use file::TagProvider;
pub use file::WriteResult;
pub use library::LocalLibrary;
pub use library::TrackCollection;
pub use track::LocalTrack;
pub use track::UNAVAILABLE_URI;
pub use track::Uri;
