//! Small library of lossless byte-oriented compression codecs.
//!
//! Four codecs over flat byte buffers, each usable on its own:
//!
//! - `rle_coding`: Run-Length Encoding as (count, byte) packets.
//! - `huffman_coding`: Huffman coding with a self-describing code table.
//! - `lzw_coding`: Lempel-Ziv-Welch with variable-width codes.
//! - `rice_coding`: Rice/Golomb coding with a parameter-selection pass.
//!
//! The three bitstream codecs share the `bitstream` module: a writer and
//! reader over byte buffers with exact bit accounting. All operations are
//! one-shot over contiguous buffers; there is no streaming API.
//!
//! Basic usage:
//!
//! ```
//! let text = "Goofy teeeeeeeest".as_bytes();
//! let encoded = squeeze::huffman_coding::easy_encode(text).unwrap();
//! let mut decoded = vec![0_u8; text.len()];
//! let n = squeeze::huffman_coding::easy_decode(
//!     &encoded.bytes,
//!     encoded.bit_count,
//!     &mut decoded,
//! )
//! .unwrap();
//! assert_eq!(&decoded[..n], text);
//! ```
//!
//! Fatal, payload-dependent conditions (an over-long code, an exhausted
//! node pool, a corrupt stream prefix) are reported through a process-wide
//! hook which by default logs and aborts. Install a replacement with
//! [`set_fatal_handler`] before running any codec if that is not wanted.
#![warn(rust_2018_idioms)]
pub mod bitstream;
pub mod error;
pub mod huffman_coding;
pub mod lzw_coding;
pub mod rice_coding;
pub mod rle_coding;
pub mod tools;

pub use bitstream::Encoded;
pub use error::{set_fatal_handler, Error};
