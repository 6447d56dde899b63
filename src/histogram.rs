use rayon::prelude::*;

/// Chunk size for the parallel counter. Small enough to load-balance,
/// big enough that merging the per-chunk tables is noise.
const PAR_CHUNK_SIZE: usize = 1 << 20;

/// Counts occurrences of each byte value. Entries left at 0 are bytes
/// absent from the input; the non-zero entries define the alphabet.
pub fn histogram(buf: &[u8]) -> [u64; 256] {
    let mut res = [0u64; 256];
    for &byte in buf {
        res[usize::from(byte)] += 1;
    }
    res
}

/// Same counts as [`histogram`], computed over chunks in parallel and
/// summed per symbol. Counting commutes, so the result is bit-identical
/// to the sequential version.
pub fn par_histogram(buf: &[u8]) -> [u64; 256] {
    buf.par_chunks(PAR_CHUNK_SIZE).map(histogram).reduce(
        || [0u64; 256],
        |mut acc, partial| {
            for (a, p) in acc.iter_mut().zip(partial.iter()) {
                *a += p;
            }
            acc
        },
    )
}
