//! Rice/Golomb coding of bytes.
//!
//! Every byte is split by a power-of-two divisor `2^k`: the quotient goes
//! out in unary (one-bits plus a terminating zero), the remainder in `k`
//! plain bits. A short search picks the `k` that minimises the whole
//! stream before anything is written; the winning parameter is the first
//! four bits of the stream.

pub mod rice;

pub use rice::{code_length, easy_decode, easy_encode, find_best_k, K_MAX};
