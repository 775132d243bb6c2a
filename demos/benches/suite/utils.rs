//! Helpers shared by the demo modules

/// Deterministic pseudo-random sequence of `len` values
pub fn scrambled(len: usize) -> Vec<u64> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % 100_000
        })
        .collect()
}

/// Sum `0..n` one step at a time
pub fn count_to(n: u64) -> u64 {
    let mut total = 0u64;
    for i in 0..n {
        total = std::hint::black_box(total + i);
    }
    total
}
