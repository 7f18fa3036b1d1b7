use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::bitstream::{BitReader, BitWriter, Code, Encoded, MAX_CODE_BITS};
use crate::error::{fatal, Error};
use crate::tools::freq_count;

/// Number of leaf symbols: every byte value.
pub const MAX_SYMBOLS: usize = 256;

/// Leaf slots plus inner-node slots. A binary tree over 256 leaves needs
/// at most 255 inner nodes, so 512 spare slots is comfortable.
const MAX_NODES: usize = MAX_SYMBOLS + 512;

/// Index sentinel for "no child".
const NIL: u16 = u16::MAX;

/// Width of each of the two counters that open the table prefix.
const PREFIX_WORD_BITS: u32 = 16;

/// A slot in the fixed node pool. Leaves occupy indices `0..256` with the
/// symbol value implicit in the index; inner nodes are allocated above.
/// A slot is in use once its frequency is non-zero.
#[derive(Debug, Clone, Copy)]
struct Node {
    frequency: u32,
    left: u16,
    right: u16,
    code: Code,
}

impl Node {
    const EMPTY: Self = Self {
        frequency: 0,
        left: NIL,
        right: NIL,
        code: Code::new(),
    };

    fn is_valid(&self) -> bool {
        self.frequency > 0
    }
}

/// Priority-queue entry. `Ord` is reversed on frequency so the std
/// max-heap pops the lowest-frequency node first; ties break on the pool
/// index to keep repeated encodes bit-identical.
#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    frequency: u32,
    index: u16,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman encoder. Construction runs the whole encode; fetch the result
/// with [`Encoder::into_encoded`].
pub struct Encoder {
    stream: BitWriter,
    nodes: Box<[Node; MAX_NODES]>,
    tree_prefix_bits: u64,
}

impl Encoder {
    /// Count frequencies, build the tree, then write the table prefix
    /// (when `prepend_table` is set) and the payload codes.
    pub fn new(data: &[u8], prepend_table: bool) -> Self {
        let mut encoder = Self {
            stream: BitWriter::new(),
            nodes: Box::new([Node::EMPTY; MAX_NODES]),
            tree_prefix_bits: 0,
        };
        encoder.count_frequencies(data);
        encoder.build_tree();
        if prepend_table {
            encoder.write_table();
        }
        encoder.write_data(data);
        encoder
    }

    fn count_frequencies(&mut self, data: &[u8]) {
        let freqs = freq_count::freqs(data);
        for (symbol, &count) in freqs.iter().enumerate() {
            self.nodes[symbol].frequency = count;
        }
    }

    /// Standard Huffman construction: repeatedly join the two
    /// lowest-frequency nodes under a fresh inner node until one root
    /// remains, then walk the tree assigning codes.
    fn build_tree(&mut self) {
        let mut queue = BinaryHeap::with_capacity(MAX_SYMBOLS);
        for s in 0..MAX_SYMBOLS {
            if self.nodes[s].is_valid() {
                queue.push(QueueEntry {
                    frequency: self.nodes[s].frequency,
                    index: s as u16,
                });
            }
        }

        while queue.len() > 1 {
            let a = queue.pop().unwrap();
            let b = queue.pop().unwrap();
            let frequency = a.frequency + b.frequency;
            let index = self.add_inner_node(frequency, a.index, b.index);
            queue.push(QueueEntry { frequency, index });
        }

        if let Some(root) = queue.pop() {
            self.assign_codes(root.index, None, 0);
        }
    }

    fn add_inner_node(&mut self, frequency: u32, left: u16, right: u16) -> u16 {
        for n in MAX_SYMBOLS..MAX_NODES {
            if !self.nodes[n].is_valid() {
                self.nodes[n].frequency = frequency;
                self.nodes[n].left = left;
                self.nodes[n].right = right;
                return n as u16;
            }
        }
        fatal("huffman: node pool exhausted");
        (MAX_NODES - 1) as u16
    }

    /// Inherit the parent's code, then append this node's branch bit:
    /// 0 descending left, 1 descending right. The root itself gets the
    /// one-bit code `0`, not an empty code; the emitted table describes
    /// whatever lengths result, so the decoder follows along either way.
    fn assign_codes(&mut self, index: u16, parent: Option<Code>, bit: u8) {
        let mut code = parent.unwrap_or_default();
        code.push_bit(bit);
        self.nodes[index as usize].code = code;

        let (left, right) = {
            let node = &self.nodes[index as usize];
            (node.left, node.right)
        };
        if left != NIL {
            self.assign_codes(left, Some(code), 0);
        }
        if right != NIL {
            self.assign_codes(right, Some(code), 1);
        }
    }

    /// Emit the self-describing table prefix:
    ///
    /// ```text
    /// | 16 bits | 16 bits |          256 entries           | padding |
    /// |  N=256  |    L    | len (L bits) | code (len bits) | to byte |
    /// ```
    ///
    /// `L` is the smallest width holding the longest code length in use.
    /// Absent symbols write a zero length and no code body.
    fn write_table(&mut self) {
        let mut max_code_len = 0_u8;
        for s in 0..MAX_SYMBOLS {
            let node = &self.nodes[s];
            if node.is_valid() && node.code.len() > max_code_len {
                max_code_len = node.code.len();
            }
        }
        if max_code_len == 0 {
            fatal("huffman: no code lengths to describe");
            return;
        }

        let length_width = bits_for_integer(max_code_len as u64);
        self.stream.append_bits(MAX_SYMBOLS as u64, PREFIX_WORD_BITS);
        self.stream.append_bits(length_width as u64, PREFIX_WORD_BITS);
        self.tree_prefix_bits = u64::from(2 * PREFIX_WORD_BITS);

        for s in 0..MAX_SYMBOLS {
            let code = self.nodes[s].code;
            self.stream.append_bits(code.len() as u64, length_width);
            self.stream.append_bits(code.bits(), code.len() as u32);
            self.tree_prefix_bits += u64::from(length_width) + u64::from(code.len());
        }

        while self.tree_prefix_bits % 8 != 0 {
            self.stream.append_bit(0);
            self.tree_prefix_bits += 1;
        }
        trace!(
            "huffman: table prefix {} bits, longest code {} bits",
            self.tree_prefix_bits,
            max_code_len
        );
    }

    fn write_data(&mut self, data: &[u8]) {
        for &b in data {
            let code = self.nodes[b as usize].code;
            self.stream.append_code(&code);
        }
    }

    /// Bit length of the emitted table prefix, always byte-aligned.
    pub fn tree_prefix_bits(&self) -> u64 {
        self.tree_prefix_bits
    }

    /// The leaf code assigned to `symbol`; length 0 when the symbol never
    /// occurred in the input.
    pub fn code_for_symbol(&self, symbol: u8) -> Code {
        self.nodes[symbol as usize].code
    }

    /// Finish and take the packed stream.
    pub fn into_encoded(mut self) -> Encoded {
        let bit_count = self.stream.bit_count();
        Encoded {
            bytes: self.stream.release(),
            bit_count,
        }
    }
}

/// Smallest number of bits that can represent `value`.
fn bits_for_integer(mut value: u64) -> u32 {
    let mut bits = 0;
    while value > 0 {
        value >>= 1;
        bits += 1;
    }
    bits
}

/// Huffman decoder. Construction reads the table prefix; [`Decoder::decode`]
/// walks the payload.
pub struct Decoder<'a> {
    stream: BitReader<'a>,
    codes: [Code; MAX_SYMBOLS],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8], size_in_bits: u64) -> Self {
        let mut decoder = Self {
            stream: BitReader::new(data, size_in_bits),
            codes: [Code::new(); MAX_SYMBOLS],
        };
        decoder.read_table();
        decoder
    }

    /// Rebuild the 256-entry code table from the stream prefix, then skip
    /// the same byte-alignment padding the encoder wrote.
    fn read_table(&mut self) {
        let count = match self.stream.read_bits(PREFIX_WORD_BITS) {
            Ok(value) => value,
            Err(_) => {
                fatal("huffman: unexpected end reading the code count");
                return;
            }
        };
        let length_width = match self.stream.read_bits(PREFIX_WORD_BITS) {
            Ok(value) => value,
            Err(_) => {
                fatal("huffman: unexpected end reading the length width");
                return;
            }
        };
        let mut prefix_bits = u64::from(2 * PREFIX_WORD_BITS);

        if count != MAX_SYMBOLS as u64 {
            fatal("huffman: unexpected code count in stream");
            return;
        }
        // Code lengths cap at 64, so their width field fits in 7 bits.
        if length_width == 0 || length_width > 7 {
            fatal("huffman: corrupt code-length width in stream");
            return;
        }

        for s in 0..MAX_SYMBOLS {
            let len = match self.stream.read_bits(length_width as u32) {
                Ok(value) => value,
                Err(_) => {
                    fatal("huffman: unexpected end reading a code length");
                    return;
                }
            };
            if len > u64::from(MAX_CODE_BITS) {
                fatal("huffman: code length over 64 bits in stream");
                return;
            }

            let mut code = Code::new();
            for _ in 0..len {
                match self.stream.read_bit() {
                    Some(bit) => code.push_bit(bit),
                    None => {
                        fatal("huffman: unexpected end reading code bits");
                        return;
                    }
                }
            }
            prefix_bits += length_width + len;
            self.codes[s] = code;
        }

        while prefix_bits % 8 != 0 {
            self.stream.read_bit();
            prefix_bits += 1;
        }
    }

    /// Decode payload bits into `output`, returning the bytes written.
    ///
    /// Bits accumulate into a candidate code until it matches a table
    /// entry. A full output buffer stops the walk early and surfaces the
    /// partial count; an accumulator reaching 64 bits without a match
    /// means the payload does not belong to this table.
    pub fn decode(&mut self, output: &mut [u8]) -> usize {
        let mut bytes_decoded = 0_usize;
        let mut accum = Code::new();

        while let Some(bit) = self.stream.read_bit() {
            if accum.len() == MAX_CODE_BITS {
                fatal("huffman: no matching code within 64 bits");
                break;
            }
            accum.push_bit(bit);

            if let Some(symbol) = self.find_matching_code(&accum) {
                if bytes_decoded == output.len() {
                    break;
                }
                output[bytes_decoded] = symbol;
                bytes_decoded += 1;
                accum.clear();
            }
        }
        bytes_decoded
    }

    fn find_matching_code(&self, code: &Code) -> Option<u8> {
        // Absent symbols keep a zero-length entry, which can never equal a
        // non-empty accumulator.
        self.codes.iter().position(|c| c == code).map(|s| s as u8)
    }

    /// The code table reconstructed from the prefix, indexed by symbol.
    pub fn prefix_codes(&self) -> &[Code; MAX_SYMBOLS] {
        &self.codes
    }
}

/// One-shot compression. The returned buffer is owned by the caller.
pub fn easy_encode(input: &[u8]) -> Result<Encoded, Error> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(Encoder::new(input, true).into_encoded())
}

/// One-shot decompression of an [`easy_encode`] stream into `output`.
/// Returns the bytes written, which is less than the uncompressed size
/// when `output` is too small.
pub fn easy_decode(input: &[u8], size_in_bits: u64, output: &mut [u8]) -> Result<usize, Error> {
    if input.is_empty() || size_in_bits == 0 {
        return Err(Error::EmptyInput);
    }
    if output.is_empty() {
        return Err(Error::EmptyOutput);
    }
    let mut decoder = Decoder::new(input, size_in_bits);
    Ok(decoder.decode(output))
}
