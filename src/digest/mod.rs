//! Digest assembly: per-team lines, highlights and top games

pub mod builder;
pub mod formatter;

pub use builder::DigestBuilder;
pub use formatter::render_digest;

/// The named text blocks of one digest. Each block is never empty; a
/// placeholder line stands in when nothing qualifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestBlocks {
    pub yesterday: String,
    pub today: String,
    pub highlights: String,
    pub top_games: String,
}
