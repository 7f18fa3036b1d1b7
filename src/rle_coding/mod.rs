//! Run-Length Encoding over caller-provided byte buffers.
//!
//! The only codec in the crate with no bitstream: output is a sequence of
//! byte-aligned `(count, byte)` packets. The width of the count word is a
//! build-time choice via the `rle-word-16` cargo feature.

pub mod rle;

pub use rle::{easy_decode, easy_encode, max_encoded_size, MAX_RUN_LENGTH, WORD_BYTES};
