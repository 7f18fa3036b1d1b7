//! Lempel-Ziv-Welch coding with variable-width codes.
//!
//! Codes start 9 bits wide and grow to 12 as the dictionary fills; when
//! the dictionary would overflow its 4096 entries both sides reset to the
//! initial single-byte alphabet. There is no clear code and no end code:
//! the reset is implicit, and the decoder is driven by the exact bit
//! count reported by the encoder.

pub mod lzw;

pub use lzw::{easy_decode, easy_encode};
