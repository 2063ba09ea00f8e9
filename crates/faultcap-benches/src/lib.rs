use std::hint::black_box;

/// A small amount of work that doesn't panic: sums `0..len`.
pub fn sum_to(len: u64) -> u64 {
    (0..black_box(len)).sum()
}

/// Like [`sum_to`], but panics with a formatted message once the sum passes
/// `limit`.
pub fn sum_to_limit(len: u64, limit: u64) -> u64 {
    let mut total = 0;
    for i in 0..black_box(len) {
        total += i;
        if total > limit {
            panic!("sum {total} exceeded {limit}");
        }
    }
    total
}
