//! Byte-frequency counting for a slice of u8 data.
//!
//! Produces an array of 256 u32 counts, one per byte value. Blocks over
//! the threshold are counted in parallel chunks and merged; smaller
//! blocks stay on one thread, where the fork overhead would dominate.

use rayon::prelude::*;

/// Below this size a single thread wins.
const PARALLEL_THRESHOLD: usize = 64_000;

/// 16k is pretty much the sweet spot for chunk size.
const CHUNK_SIZE: usize = 16_000;

/// Returns a frequency count of the input data.
pub fn freqs(data: &[u8]) -> [u32; 256] {
    if data.len() > PARALLEL_THRESHOLD {
        data.par_chunks(CHUNK_SIZE)
            .fold(
                || [0_u32; 256],
                |mut counts, chunk| {
                    chunk.iter().for_each(|&b| counts[b as usize] += 1);
                    counts
                },
            )
            .reduce(
                || [0_u32; 256],
                |mut acc, counts| {
                    for (a, c) in acc.iter_mut().zip(counts.iter()) {
                        *a += c;
                    }
                    acc
                },
            )
    } else {
        let mut counts = [0_u32; 256];
        data.iter().for_each(|&b| counts[b as usize] += 1);
        counts
    }
}

#[cfg(test)]
mod test {
    use super::freqs;

    #[test]
    fn counts_small_input() {
        let counts = freqs(b"abracadabra");
        assert_eq!(counts[b'a' as usize], 5);
        assert_eq!(counts[b'b' as usize], 2);
        assert_eq!(counts[b'r' as usize], 2);
        assert_eq!(counts[b'c' as usize], 1);
        assert_eq!(counts[b'd' as usize], 1);
        assert_eq!(counts[b'z' as usize], 0);
        assert_eq!(counts.iter().map(|&c| c as usize).sum::<usize>(), 11);
    }

    #[test]
    fn parallel_path_matches_sequential() {
        let data: Vec<u8> = (0..100_000_u32).map(|i| (i % 251) as u8).collect();
        let parallel = freqs(&data);

        let mut sequential = [0_u32; 256];
        data.iter().for_each(|&b| sequential[b as usize] += 1);
        assert_eq!(parallel, sequential);
    }
}
