use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "tdx")]
#[command(bin_name = "tdx")]
#[command(version)]
#[command(about = "Tone preset lookup and block catalog resolver")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'L',
        long,
        env = "TONEDEX_LIBRARY",
        default_value = ".",
        help = "Library root containing blocks.json, aliases.json, and tones/."
    )]
    pub library: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Recommend a tone preset for a genre query.")]
    Recommend(RecommendArgs),
    #[command(about = "Smart search for a band or genre by free text.")]
    Search(SearchArgs),
    #[command(about = "Resolve one effect name against the block catalog.")]
    Block(BlockArgs),
    #[command(about = "Strict batch lookup of block insights by exact name.")]
    Insights(InsightsArgs),
    #[command(about = "List the genres available in the tone library.")]
    Genres(GenresArgs),
    #[command(about = "Flag unresolved effect names in tone files for review.")]
    Sync(SyncArgs),
    #[command(about = "Validate the library read-only; fails on any issue.")]
    Check(CheckArgs),
}

#[derive(Debug, Args)]
#[command(about = "Recommend a tone preset.")]
pub struct RecommendArgs {
    #[arg(help = "Genre query (prompted on stdin when omitted).")]
    pub query: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Smart band/genre search.")]
pub struct SearchArgs {
    #[arg(help = "Free-text query, e.g. '90s grunge fuzz'.")]
    pub query: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Resolve one effect name.")]
pub struct BlockArgs {
    #[arg(help = "Effect/block name (typos tolerated).")]
    pub name: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Batch insight lookup.")]
pub struct InsightsArgs {
    #[arg(required = true, help = "Effect names, matched exactly (case-insensitive).")]
    pub names: Vec<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "List genres.")]
pub struct GenresArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Sync tone files against the catalog.")]
pub struct SyncArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Read-only library diagnostics.")]
pub struct CheckArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
