//! Huffman coding with a self-describing code table.
//!
//! The encoder counts byte frequencies, builds the code tree in a fixed
//! node pool and emits a table prefix (256 code lengths and code bodies)
//! followed by the payload codes. The decoder rebuilds the table from the
//! prefix alone, so the two sides never need to agree on tie-breaking
//! during tree construction.

pub mod huffman;

pub use huffman::{easy_decode, easy_encode, Decoder, Encoder, MAX_SYMBOLS};
