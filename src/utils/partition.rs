/*
 * SPDX-FileCopyrightText: 2026 The pagerank-pools authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Partitions of node ranges into contiguous, disjoint pieces.

use std::ops::Range;

/// Splits [0 . . `n`) into blocks of `block_size` elements, the last block
/// absorbing the remainder.
///
/// There are max(1, ⌊`n` / `block_size`⌋) blocks if `n` is positive, and no
/// block otherwise.
///
/// # Panics
///
/// Panics if `block_size` is zero.
pub fn blocks(n: usize, block_size: usize) -> impl ExactSizeIterator<Item = Range<usize>> {
    assert!(block_size > 0, "The block size must be positive");
    let count = if n == 0 { 0 } else { (n / block_size).max(1) };
    (0..count).map(move |i| {
        let start = i * block_size;
        let end = if i == count - 1 { n } else { start + block_size };
        start..end
    })
}

/// Splits [0 . . `n`) into exactly `parts` ranges of ⌈`n` / `parts`⌉
/// elements, except for the last nonempty one; trailing ranges might be empty.
///
/// # Panics
///
/// Panics if `parts` is zero.
pub fn even_ranges(n: usize, parts: usize) -> impl ExactSizeIterator<Item = Range<usize>> {
    assert!(parts > 0, "The number of parts must be positive");
    let chunk = n.div_ceil(parts);
    (0..parts).map(move |i| (i * chunk).min(n)..((i + 1) * chunk).min(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], n: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next);
            assert!(r.start <= r.end);
            next = r.end;
        }
        assert_eq!(next, n);
    }

    #[test]
    fn test_blocks() {
        let b = blocks(1000, 160).collect::<Vec<_>>();
        assert_eq!(b.len(), 6);
        assert_eq!(b[5], 800..1000);
        assert_covers(&b, 1000);

        assert_eq!(blocks(10, 160).collect::<Vec<_>>(), vec![0..10]);
        assert_eq!(blocks(320, 160).collect::<Vec<_>>(), vec![0..160, 160..320]);
        assert_eq!(blocks(0, 160).count(), 0);
    }

    #[test]
    fn test_even_ranges() {
        let r = even_ranges(10, 4).collect::<Vec<_>>();
        assert_eq!(r, vec![0..3, 3..6, 6..9, 9..10]);

        let r = even_ranges(3, 8).collect::<Vec<_>>();
        assert_eq!(r.len(), 8);
        assert_covers(&r, 3);
        assert!(r[3..].iter().all(|r| r.is_empty()));

        assert!(even_ranges(0, 2).all(|r| r.is_empty()));
    }
}
