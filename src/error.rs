use std::io;
use thiserror::Error;

/// Errors surfaced by encoding, decoding and table parsing.
///
/// An empty alphabet is not listed here: empty input is a valid degenerate
/// case that yields an empty table and an empty packed stream.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Encode-time: the input contains a byte the table has no code for.
    #[error("no code for byte {0:#04x} in the table")]
    UnknownSymbol(u8),

    /// Table parse failed; the whole table is rejected, never partially applied.
    #[error("malformed table record at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    /// The bitstream ended before the expected number of symbols was decoded.
    #[error("bitstream exhausted after {decoded} of {expected} symbols")]
    DecodeExhaustion { decoded: u64, expected: u64 },

    /// The accumulated bits matched more than one table entry. Cannot happen
    /// with a generated table; indicates a corrupt or foreign one.
    #[error("bits match more than one table entry")]
    DecodeAmbiguity,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HuffmanError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTable { line, reason: reason.into() }
    }
}
