//! # CLI Module
//!
//! This module provides the command-line interface layer for Splisync, a
//! Spotify API client that synchronises a local music library's tag data and
//! playlists with a user's Spotify account. It implements all user-facing
//! CLI commands and coordinates between the matching engine, the interactive
//! checker, data management, and the Spotify integration layer.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Initiates the Spotify OAuth PKCE flow and stores the token
//!
//! ### Pipeline Stages
//!
//! - [`search`] - Finds remote URI matches for every local collection
//! - [`check`] - Interactive verification of matches via temp playlists
//! - [`sync`] - Writes resolved URIs to file tags and pushes playlists
//! - [`run`] - The full pipeline: search, check, tags, push, report
//!
//! ### Data Management
//!
//! - [`backup`] - Saves the lightweight `path -> uri` map
//! - [`restore`] - Overlays a saved backup onto the library and its files
//! - [`report`] - Prints match status tables from the latest checkpoint
//!
//! ## Safety
//!
//! Every command that can mutate remote playlists or local files defaults to
//! a dry run; mutation requires the explicit `--live` flag. Stages read
//! their input from the previous stage's checkpoint when one exists, so an
//! interrupted run resumes instead of repeating completed work.

mod auth;
mod backup;
mod check;
mod report;
mod search;
mod sync;

pub use auth::auth;
pub use backup::backup;
pub use backup::restore;
pub use check::check;
pub use report::report;
pub use search::search;
pub use sync::run;
pub use sync::sync;
