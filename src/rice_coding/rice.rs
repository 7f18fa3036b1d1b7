use log::trace;

use crate::bitstream::{BitReader, BitWriter, Encoded};
use crate::error::{fatal, Error};

/// Largest Rice parameter tried by the search. Bytes never benefit from
/// more than 8 remainder bits.
pub const K_MAX: u32 = 8;

/// Width of the parameter word that opens the stream.
const K_WORD_BITS: u32 = 4;

/// Bits one value occupies under parameter `k`: the unary quotient, its
/// terminator, then `k` remainder bits.
pub const fn code_length(value: u8, k: u32) -> u64 {
    (value as u64 >> k) + 1 + k as u64
}

/// Scan `k` in `0..=K_MAX` and return the parameter giving the smallest
/// total stream, along with that size in bits. Ties keep the smaller `k`.
pub fn find_best_k(input: &[u8]) -> (u32, u64) {
    let mut best_k = 0;
    let mut best_size = u64::MAX;
    for k in 0..=K_MAX {
        let total: u64 = input.iter().map(|&value| code_length(value, k)).sum();
        if total < best_size {
            best_size = total;
            best_k = k;
        }
    }
    (best_k, best_size)
}

/// The remainder goes out most-significant-bit first, unlike everything
/// else in the stream; the decoder rebuilds it with the mirrored loop.
fn encode_value(stream: &mut BitWriter, value: u8, k: u32) {
    let quotient = (value as u64) >> k;
    for _ in 0..quotient {
        stream.append_bit(1);
    }
    stream.append_bit(0);
    for i in (0..k).rev() {
        stream.append_bit((value >> i) & 1);
    }
}

/// One-shot Rice compression. The returned buffer is owned by the caller.
pub fn easy_encode(input: &[u8]) -> Result<Encoded, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let (k, payload_bits) = find_best_k(input);
    trace!("rice: k = {k}, predicted payload {payload_bits} bits");

    let mut stream = BitWriter::with_capacity(payload_bits + u64::from(K_WORD_BITS), 2);
    stream.append_bits(k as u64, K_WORD_BITS);
    for &value in input {
        encode_value(&mut stream, value, k);
    }

    let bit_count = stream.bit_count();
    Ok(Encoded {
        bytes: stream.release(),
        bit_count,
    })
}

/// One-shot Rice decompression into `output`, returning the bytes
/// written. There is no terminator in the stream; the output length
/// bounds the loop.
pub fn easy_decode(input: &[u8], size_in_bits: u64, output: &mut [u8]) -> Result<usize, Error> {
    if input.is_empty() || size_in_bits == 0 {
        return Err(Error::EmptyInput);
    }
    if output.is_empty() {
        return Err(Error::EmptyOutput);
    }

    let mut stream = BitReader::new(input, size_in_bits);
    let k = match stream.read_bits(K_WORD_BITS) {
        Ok(value) => value as u32,
        Err(_) => {
            fatal("rice: missing parameter word");
            return Ok(0);
        }
    };

    let mut written = 0_usize;
    while written < output.len() {
        let mut quotient = 0_u64;
        loop {
            match stream.read_bit() {
                Some(1) => quotient += 1,
                Some(_) => break,
                None => {
                    fatal("rice: unexpected end in a unary quotient");
                    return Ok(written);
                }
            }
        }

        let mut value = quotient << k;
        for i in (0..k).rev() {
            match stream.read_bit() {
                Some(bit) => value |= u64::from(bit) << i,
                None => {
                    fatal("rice: unexpected end in a remainder");
                    return Ok(written);
                }
            }
        }

        output[written] = value as u8;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod test {
    use super::{code_length, easy_decode, easy_encode, find_best_k};
    use crate::error::{set_fatal_handler, Error};

    fn quiet(_message: &str) {}

    fn roundtrip(input: &[u8]) {
        let encoded = easy_encode(input).unwrap();
        let mut output = vec![0_u8; input.len()];
        let written = easy_decode(&encoded.bytes, encoded.bit_count, &mut output).unwrap();
        assert_eq!(written, input.len());
        assert_eq!(output, input);
    }

    #[test]
    fn code_length_counts_quotient_terminator_and_remainder() {
        assert_eq!(code_length(0, 0), 1);
        assert_eq!(code_length(5, 0), 6);
        assert_eq!(code_length(5, 1), 4);
        assert_eq!(code_length(255, 8), 9);
    }

    #[test]
    fn best_k_for_zeros_is_zero() {
        let (k, size) = find_best_k(&[0_u8; 32]);
        assert_eq!(k, 0);
        assert_eq!(size, 32);
    }

    #[test]
    fn best_k_for_large_values_is_large() {
        let (k, _) = find_best_k(&[255_u8; 32]);
        assert_eq!(k, 8);
    }

    #[test]
    fn chosen_k_beats_every_other_k() {
        let input: Vec<u8> = (0..200_u16).map(|i| (i * 31 % 256) as u8).collect();
        let (best_k, best_size) = find_best_k(&input);
        for k in 0..=8 {
            let total: u64 = input.iter().map(|&v| code_length(v, k)).sum();
            assert!(total >= best_size, "k={k} beat the chosen k={best_k}");
        }
    }

    #[test]
    fn known_bit_layout_for_one_value() {
        // value 5 picks k=1: parameter word 0b0001 LSB-first, quotient 2
        // in unary, terminator, then the single remainder bit (MSB-first).
        let encoded = easy_encode(&[5]).unwrap();
        assert_eq!(encoded.bit_count, 8);
        assert_eq!(encoded.bytes, vec![0b1011_0001]);
    }

    #[test]
    fn mixed_text_roundtrips() {
        roundtrip(b"Hello world!");
    }

    #[test]
    fn extremes_roundtrip() {
        roundtrip(&[0_u8; 18]);
        roundtrip(&[255_u8; 18]);
        let ramp: Vec<u8> = (0..=255).collect();
        roundtrip(&ramp);
    }

    #[test]
    fn truncated_stream_reports_partial_output() {
        set_fatal_handler(quiet);
        let encoded = easy_encode(b"abcd").unwrap();
        let mut output = [0_u8; 4];
        let written = easy_decode(&encoded.bytes, encoded.bit_count - 3, &mut output).unwrap();
        assert!(written < 4);
    }

    #[test]
    fn empty_input_is_an_argument_error() {
        assert_eq!(easy_encode(&[]), Err(Error::EmptyInput));
        let mut output = [0_u8; 4];
        assert_eq!(easy_decode(&[], 0, &mut output), Err(Error::EmptyInput));
    }
}
