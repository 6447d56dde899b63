use crate::bit_io::{self, BitReader, ReadError};
use crate::error::HuffmanError;
use crate::huffman::table::{Code, CodeTable};

/// A packed bitstream plus the metadata needed to reverse it.
///
/// The symbol count travels with the bytes because the packed form alone
/// cannot say where valid data ends: the last byte may carry pad bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub data: Vec<u8>,
    pub symbol_count: u64,
}

/// Maps every input byte through the table and packs the resulting bits,
/// MSB-first, zero-padding the final byte.
///
/// Fails with [`HuffmanError::UnknownSymbol`] if a byte has no code; the
/// table must cover the whole input alphabet. Empty input yields empty
/// packed bytes and count 0.
pub fn encode(input: &[u8], table: &CodeTable) -> Result<Encoded, HuffmanError> {
    let mut bits = Code::with_capacity(input.len());
    for &byte in input {
        let code = table.get(byte).ok_or(HuffmanError::UnknownSymbol(byte))?;
        bits.extend_from_bitslice(code);
    }

    Ok(Encoded {
        data: bit_io::pack(&bits),
        symbol_count: input.len() as u64,
    })
}

/// Reconstructs the original bytes from the packed stream, the table and
/// the original symbol count.
///
/// The accumulator state machine runs as a walk over a bit-trie rebuilt
/// from the table: each bit descends one edge, and a node holding a symbol
/// means the accumulated bits exactly match that symbol's code, so it is
/// emitted and the walk resets to the root. Decoding stops at
/// `symbol_count` symbols; pad bits past that point are never examined.
pub fn decode(
    packed: &[u8],
    table: &CodeTable,
    symbol_count: u64,
) -> Result<Vec<u8>, HuffmanError> {
    let trie = DecodeTrie::from_table(table);
    let mut reader = BitReader::new(packed);
    let mut out = Vec::new();
    let mut decoded = 0u64;
    // None once the accumulated bits are no prefix of any code; no further
    // bit can produce a match then, so the walk drains into exhaustion
    let mut node = Some(DecodeTrie::ROOT);

    while decoded < symbol_count {
        let bit = reader.read_bit().map_err(|err| match err {
            ReadError::Eof => HuffmanError::DecodeExhaustion { decoded, expected: symbol_count },
            ReadError::Other(kind) => HuffmanError::Io(kind.into()),
        })?;

        node = node.and_then(|n| trie.nodes[n].children[usize::from(bit)]);
        if let Some(n) = node {
            if trie.nodes[n].ambiguous {
                return Err(HuffmanError::DecodeAmbiguity);
            }
            if let Some(symbol) = trie.nodes[n].symbol {
                out.push(symbol);
                decoded += 1;
                node = Some(DecodeTrie::ROOT);
            }
        }
    }

    Ok(out)
}

/// Bit-trie over the table's codes, nodes held in an index-addressed arena.
struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

#[derive(Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    /// the symbol whose full code ends at this node, if any
    symbol: Option<u8>,
    /// two table entries share this exact code; matching it cannot name
    /// a single symbol
    ambiguous: bool,
}

impl DecodeTrie {
    const ROOT: usize = 0;

    fn from_table(table: &CodeTable) -> Self {
        let mut nodes = vec![TrieNode::default()];

        for (byte, code) in table.iter() {
            let mut n = Self::ROOT;
            for bit in code {
                let slot = usize::from(*bit);
                n = match nodes[n].children[slot] {
                    Some(next) => next,
                    None => {
                        nodes.push(TrieNode::default());
                        let next = nodes.len() - 1;
                        nodes[n].children[slot] = Some(next);
                        next
                    }
                };
            }
            match nodes[n].symbol {
                None => nodes[n].symbol = Some(byte),
                Some(_) => nodes[n].ambiguous = true,
            }
        }

        Self { nodes }
    }
}
