//! Rolling-hash shingles over a filtered word table.
//!
//! Each shingle covers `seed_size` consecutive filtered words; the hash at
//! position `i` keys the shingle starting at filtered word index `i`. Hashes
//! are a polynomial roll over per-word xxh3 hashes, O(n) for the whole table.
//! Hash equality is a candidate signal only; exact matching re-verifies the
//! underlying words, so collisions cannot produce false matches.

use tokenize::DocumentTable;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Compute the shingle hash sequence for `table`. Returns one hash per start
/// position; empty when the table holds fewer than `seed_size` words.
pub fn shingle_hashes(table: &DocumentTable, seed_size: usize, seed: u64) -> Vec<u64> {
    let n = table.len();
    if seed_size == 0 || n < seed_size {
        return Vec::new();
    }

    let th: Vec<u64> = table
        .records
        .iter()
        .map(|r| xxh3_64_with_seed(r.normalized.as_bytes(), seed))
        .collect();

    // Large prime base, perturbed by the seed.
    const BASE: u64 = 1_000_003;
    let base = BASE ^ splitmix64(seed);

    // base^(k-1), for dropping the oldest word out of the window.
    let mut base_km1 = 1u64;
    for _ in 1..seed_size {
        base_km1 = base_km1.wrapping_mul(base);
    }

    let mut out = Vec::with_capacity(n - seed_size + 1);
    let mut h = 0u64;
    for &val in th.iter().take(seed_size) {
        h = h.wrapping_mul(base).wrapping_add(val);
    }
    out.push(h);

    for (&old, &new) in th.iter().zip(th.iter().skip(seed_size)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(base).wrapping_add(new);
        out.push(h);
    }
    out
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
