use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use splisync::{cli, config, error, remote::SyncKind};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Find remote matches for all local collections
    Search,

    /// Verify matches interactively via temporary playlists
    Check,

    /// Write resolved URIs to file tags and push playlists
    Sync(SyncOptions),

    /// Run the full pipeline: search, check, tags, push, report
    Run(SyncOptions),

    /// Back up the path-to-URI map of the whole library
    Backup,

    /// Restore URIs from the last backup
    Restore(RestoreOptions),

    /// Print match status from the latest checkpoint
    Report,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Reconciliation strategy for remote playlists
    #[clap(long, value_enum, default_value_t = SyncKind::New)]
    pub kind: SyncKind,

    /// Actually modify remote playlists and local files (default is dry run)
    #[clap(long)]
    pub live: bool,

    /// Rewrite the full tag set, not just the URI comment
    #[clap(long)]
    pub replace_tags: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RestoreOptions {
    /// Actually modify local files (default is dry run)
    #[clap(long)]
    pub live: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Search => cli::search().await,
        Command::Check => cli::check().await,
        Command::Sync(opt) => cli::sync(opt.kind, opt.live, opt.replace_tags).await,
        Command::Run(opt) => cli::run(opt.kind, opt.live, opt.replace_tags).await,
        Command::Backup => cli::backup().await,
        Command::Restore(opt) => cli::restore(opt.live).await,
        Command::Report => cli::report().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
