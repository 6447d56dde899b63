pub mod bit_io;
pub mod error;
pub mod helpers;
pub mod histogram;
pub mod huffman;

pub use error::HuffmanError;
pub use histogram::{histogram, par_histogram};
pub use huffman::{decode, encode, CodeTable, Encoded, HuffmanTree};
