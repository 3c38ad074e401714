//! Spotify Library Sync CLI Library
//!
//! This library synchronises a locally stored music library with a user's
//! Spotify library. It reads tag metadata from local audio files, finds the
//! matching tracks on Spotify through a tiered fuzzy-search algorithm, lets
//! the user verify ambiguous matches interactively through temporary
//! playlists, writes resolved track URIs back into the local files, and
//! reconciles local playlists against their remote counterparts.
//!
//! # Modules
//!
//! - `check` - Interactive verification of matched URIs via temporary playlists
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `driver` - Staged sync pipeline with resumable checkpoints
//! - `library` - Local audio library model and tag access
//! - `management` - Checkpoint, backup, and token persistence
//! - `matching` - Tag cleaning, match scoring tiers, and track/album search
//! - `remote` - Spotify Web API client, the `RemoteApi` seam, and playlist
//!   reconciliation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use splisync::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> splisync::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod check;
pub mod cli;
pub mod config;
pub mod driver;
pub mod library;
pub mod management;
pub mod matching;
pub mod remote;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use splisync::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Searching {} collections...", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Matched {} of {} tracks", matched, total);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. It should only be used for fatal
/// errors where recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program
/// termination.
///
/// # Example
///
/// ```
/// warning!("Playlist {} not found remotely, skipping", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
