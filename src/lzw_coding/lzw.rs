use std::collections::HashMap;

use log::debug;

use crate::bitstream::{BitReader, BitWriter, Encoded};
use crate::error::{fatal, Error};

/// Widest code emitted; the dictionary holds `1 << MAX_CODE_WIDTH` codes.
const MAX_CODE_WIDTH: u32 = 12;
const MAX_ENTRIES: u16 = 1 << MAX_CODE_WIDTH;

/// Codes below this are single-byte literals; the first dictionary entry
/// created at runtime takes this value.
const FIRST_FREE_CODE: u16 = 256;
const INITIAL_WIDTH: u32 = 9;

/// One-shot LZW compression. The returned buffer is owned by the caller;
/// keep the bit count, the decoder cannot work without it.
pub fn easy_encode(input: &[u8]) -> Result<Encoded, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut stream = BitWriter::new();
    // Runtime entries keyed by (prefix code, suffix byte); the 256
    // literals are implicit and never stored.
    let mut dictionary: HashMap<(u16, u8), u16> =
        HashMap::with_capacity((MAX_ENTRIES - FIRST_FREE_CODE) as usize);
    let mut next_code = FIRST_FREE_CODE;
    let mut width = INITIAL_WIDTH;

    let mut current = input[0] as u16;
    for &suffix in &input[1..] {
        if let Some(&code) = dictionary.get(&(current, suffix)) {
            current = code;
            continue;
        }

        stream.append_bits(current as u64, width);
        if next_code == MAX_ENTRIES {
            // Table full: drop the pending entry and start over. The
            // decoder detects the same stream position from its own
            // entry count.
            debug!("lzw: dictionary reset at {} bits out", stream.bit_count());
            dictionary.clear();
            next_code = FIRST_FREE_CODE;
            width = INITIAL_WIDTH;
        } else {
            dictionary.insert((current, suffix), next_code);
            next_code += 1;
            // Width steps between emissions, once the next code no
            // longer fits the current width.
            if next_code == (1 << width) as u16 && width < MAX_CODE_WIDTH {
                width += 1;
            }
        }
        current = suffix as u16;
    }
    stream.append_bits(current as u64, width);

    let bit_count = stream.bit_count();
    Ok(Encoded {
        bytes: stream.release(),
        bit_count,
    })
}

/// One-shot LZW decompression into `output`, returning the bytes written.
/// Stops at the exact bit count or a full output, whichever comes first.
pub fn easy_decode(input: &[u8], size_in_bits: u64, output: &mut [u8]) -> Result<usize, Error> {
    if input.is_empty() || size_in_bits == 0 {
        return Err(Error::EmptyInput);
    }
    if output.is_empty() {
        return Err(Error::EmptyOutput);
    }

    let mut stream = BitReader::new(input, size_in_bits);
    // Entry for code `c` lives at `c - 256`; literals are implicit.
    let mut table: Vec<(u16, u8)> =
        Vec::with_capacity((MAX_ENTRIES - FIRST_FREE_CODE) as usize);
    let mut next_code = FIRST_FREE_CODE;
    let mut width = INITIAL_WIDTH;
    let mut previous: Option<u16> = None;
    let mut scratch: Vec<u8> = Vec::new();
    let mut written = 0_usize;

    while written < output.len() && stream.remaining() > 0 {
        let code = match stream.read_bits(width) {
            Ok(value) => value as u16,
            Err(_) => {
                fatal("lzw: code straddles the end of the stream");
                return Ok(written);
            }
        };

        scratch.clear();
        if code < FIRST_FREE_CODE {
            scratch.push(code as u8);
        } else if ((code - FIRST_FREE_CODE) as usize) < table.len() {
            unwind(&table, code, &mut scratch);
            scratch.reverse();
        } else if code == next_code && previous.is_some() {
            // The KwKwK pattern: the code names the entry the decoder is
            // one step away from creating, which is prev + prev[0].
            unwind(&table, previous.unwrap(), &mut scratch);
            scratch.reverse();
            scratch.push(scratch[0]);
        } else {
            fatal("lzw: invalid code in stream");
            return Ok(written);
        }

        let first = scratch[0];
        let take = scratch.len().min(output.len() - written);
        output[written..written + take].copy_from_slice(&scratch[..take]);
        written += take;

        match previous {
            Some(prefix) => {
                table.push((prefix, first));
                next_code += 1;
                if next_code == MAX_ENTRIES {
                    // Mirror of the encoder reset: it fires one insertion
                    // later here because the decoder's table always lags
                    // the encoder's by one entry.
                    debug!("lzw: dictionary reset at {} bits in", stream.bits_read());
                    table.clear();
                    next_code = FIRST_FREE_CODE;
                    width = INITIAL_WIDTH;
                    previous = None;
                } else {
                    // One earlier than the encoder's step, for the same
                    // lag-by-one reason.
                    if next_code == (1 << width) as u16 - 1 && width < MAX_CODE_WIDTH {
                        width += 1;
                    }
                    previous = Some(code);
                }
            }
            None => previous = Some(code),
        }
    }
    Ok(written)
}

/// Walk the prefix chain of `code` down to its literal root, pushing the
/// bytes in reverse order.
fn unwind(table: &[(u16, u8)], code: u16, out: &mut Vec<u8>) {
    let mut c = code;
    while c >= FIRST_FREE_CODE {
        let (prefix, suffix) = table[(c - FIRST_FREE_CODE) as usize];
        out.push(suffix);
        c = prefix;
    }
    out.push(c as u8);
}
