/*!
Static Huffman coding for byte streams.

The pipeline: a histogram of the input picks the alphabet, [`tree`] merges
minimum-weight nodes into an optimal prefix tree, [`table`] flattens it
into a symbol-indexed code table, and [`codec`] turns bytes into a packed
bitstream and back. The table plus the original symbol count are the only
artifacts a later, independent decode needs.
*/

pub mod codec;
pub mod table;
pub mod tree;

pub use codec::{decode, encode, Encoded};
pub use table::{Code, CodeTable};
pub use tree::HuffmanTree;
