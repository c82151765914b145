//! Exhaustive enumeration of boolean assignments.
//!
//! Every assignment of `n` booleans is produced exactly once by counting in
//! binary from `0` to `2^n - 1`. Bit `i` of the counter (from the most
//! significant end) is the value of position `i`, with a set bit meaning
//! `false`, so the first assignment is all-true and the last is all-false.
//! This mirrors the CPT indexing convention: the `k`-th assignment yielded
//! for a parent list is exactly the row `k` of that variable's CPT.

/// Iterator over all `2^n` boolean vectors of length `n`.
#[derive(Debug, Clone)]
pub struct BooleanAssignments {
    len: usize,
    next: u64,
    end: u64,
}

/// Enumerate all boolean assignments of length `len`.
///
/// `len == 0` yields a single empty assignment.
///
/// # Panics
///
/// Panics if `len >= 64`; such a table could never be materialized anyway.
pub fn boolean_assignments(len: usize) -> BooleanAssignments {
    assert!(len < 64, "cannot enumerate 2^{len} assignments");
    BooleanAssignments {
        len,
        next: 0,
        end: 1u64 << len,
    }
}

impl BooleanAssignments {
    /// Number of positions in each assignment.
    pub fn width(&self) -> usize {
        self.len
    }
}

/// Decode a row index into the assignment it stands for.
pub fn decode(index: u64, len: usize) -> Vec<bool> {
    (0..len)
        .map(|i| (index >> (len - 1 - i)) & 1 == 0)
        .collect()
}

impl Iterator for BooleanAssignments {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let row = decode(self.next, self.len);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BooleanAssignments {}
