//! # Matching Module
//!
//! This module implements the fuzzy track-matching engine that maps a local
//! track's noisy tag metadata to a remote track URI. It is the core of the
//! whole synchroniser: everything else either feeds it (the library scan) or
//! consumes its output (the interactive checker, the reconciler).
//!
//! ## Pipeline
//!
//! ```text
//! LocalTrack tags
//!     ↓ clean        (strip brackets, feat./ft. markers, articles, punctuation)
//! CleanTags
//!     ↓ query ladder (title+artist → title+album → title)
//! RemoteTrack candidates
//!     ↓ tier walk    (simple / title / quick / deep gates, karaoke pre-filter)
//! URI match or unresolved
//! ```
//!
//! ## Tiers
//!
//! Each tier is a hard pass/fail gate over the candidate set; the visitation
//! order is derived from a signed algorithm id (see [`scorer::tier_walk`]).
//! A positive id walks the tiers from strictest to loosest and stops at the
//! first match; a negative id walks a reversed ladder. The deep tier is the
//! one exception to first-match semantics: it evaluates every candidate and
//! keeps the acceptable one closest in duration.
//!
//! ## Album matching
//!
//! Non-compilation folders are matched as whole albums first: candidate
//! albums are ranked by track-count distance, gated on album/artist word
//! containment, and their track listings are consumed positionally so no
//! remote track is ever assigned twice. Remaining tracks fall back to the
//! per-track search.
//!
//! Cleaned tags exist only for querying and comparison. Nothing in this
//! module ever writes a cleaned value back to a track.

pub mod clean;
pub mod scorer;
mod searcher;

pub use clean::CleanTags;
pub use scorer::Tier;
pub use searcher::SearchOutcome;
pub use searcher::SearchReport;
pub use searcher::Searcher;
