//! Internal-buffer extraction, collapse, and end-of-level redistribution.
//!
//! `A` and `B` are each individually sorted by the time this runs (every
//! merge pair at a given level starts from two already-sorted halves),
//! which is what makes the adjacent-pairwise-distinct scan below actually
//! find *globally* distinct values: in a sorted range, once the scan has
//! moved past a run of equal values it can never see that value again.

use crate::primitives::{insertion_sort, rotate, Less, Range};

/// Per-level persistent state: the two internal buffers (`buffer1` carries
/// the tag values used by the block roll, `buffer2` is the merge swap
/// space) plus the positions they were collapsed to on the pair that first
/// carved them out of the array (`buffer_a`/`buffer_b`), needed again only
/// at end-of-level redistribution.
pub struct LevelState {
    pub active: bool,
    pub buffer1: Range,
    pub buffer2: Range,
    pub buffer_a: Range,
    pub buffer_b: Range,
}

impl LevelState {
    pub fn new() -> Self {
        LevelState {
            active: false,
            buffer1: Range::new(0, 0),
            buffer2: Range::new(0, 0),
            buffer_a: Range::new(0, 0),
            buffer_b: Range::new(0, 0),
        }
    }
}

/// The two buffers found (or reused) for one pair's merge, already
/// collapsed to the outer edges of `A`/`B`. `buffer2` is empty when the
/// caller should use the scratch cache as swap space instead (only
/// possible the first time a level extracts buffers, when `buffer_size <=
/// cache_size`).
pub struct Buffers {
    pub buffer_a: Range,
    pub buffer_b: Range,
    pub buffer1: Range,
    pub buffer2: Range,
}

/// Find the index of the `target`-th pairwise-distinct value scanning
/// `from..limit` left to right, counting the element at `from - 1` as the
/// first (already accounted for in `count`). Returns `None` if `limit` is
/// reached first.
unsafe fn scan_forward<T, F: Less<T>>(
    arr: *const T,
    from: usize,
    limit: usize,
    target: usize,
    mut count: usize,
    less: &mut F,
) -> Option<usize> {
    for i in from..limit {
        if less(&*arr.add(i - 1), &*arr.add(i)) || less(&*arr.add(i), &*arr.add(i - 1)) {
            count += 1;
            if count == target {
                return Some(i);
            }
        }
    }
    None
}

/// Mirror of [`scan_forward`], scanning `from` down to `limit` (both
/// inclusive), counting the element at `from + 1` as the first.
unsafe fn scan_backward<T, F: Less<T>>(
    arr: *const T,
    from: usize,
    limit: usize,
    target: usize,
    less: &mut F,
) -> Option<usize> {
    let mut count = 1usize;
    let mut i = from;
    loop {
        if less(&*arr.add(i), &*arr.add(i + 1)) || less(&*arr.add(i + 1), &*arr.add(i)) {
            count += 1;
            if count == target {
                return Some(i);
            }
        }
        if i == limit {
            return None;
        }
        i -= 1;
    }
}

/// Gather `length` pairwise-distinct values into `[a_start, a_start +
/// length)`, given that the `length`-th one was just found at
/// `scan_from` scanning forward from `a_start`. Walks backward from
/// `scan_from`, rotating each newly-found distinct element past the
/// already-collected group so the group grows leftward one element at a
/// time; non-buffer elements keep their relative order throughout.
unsafe fn collapse_to_start<T, F: Less<T>>(
    arr: *mut T,
    a_start: usize,
    scan_from: usize,
    length: usize,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) -> Range {
    let mut group_end = scan_from;
    let mut count = 0usize;
    let mut index = scan_from;

    while count < length {
        if index == a_start
            || less(&*arr.add(index - 1), &*arr.add(index))
            || less(&*arr.add(index), &*arr.add(index - 1))
        {
            rotate(arr, -(count as isize), Range::new(index + 1, group_end + 1), cache, cache_size);
            group_end = index + count;
            count += 1;
        }
        index -= 1;
    }

    Range::new(a_start, a_start + length)
}

/// Mirror of [`collapse_to_start`]: gathers `length` pairwise-distinct
/// values into `[b_end - length, b_end)`, walking forward from `scan_from`
/// (the leftmost one, just found scanning backward from `b_end`).
unsafe fn collapse_to_end<T, F: Less<T>>(
    arr: *mut T,
    b_end: usize,
    scan_from: usize,
    length: usize,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) -> Range {
    let mut group_start = scan_from;
    let mut count = 0usize;
    let mut index = scan_from;

    while count < length {
        if index == b_end - 1
            || less(&*arr.add(index), &*arr.add(index + 1))
            || less(&*arr.add(index + 1), &*arr.add(index))
        {
            rotate(arr, count as isize, Range::new(group_start, index), cache, cache_size);
            group_start = index - count;
            count += 1;
        }
        index += 1;
    }

    Range::new(b_end - length, b_end)
}

/// Try to find two buffers of `buffer_size` pairwise-distinct values each,
/// to use as the roll-tag buffer and the merge swap buffer for merging `a`
/// with `b`. Returns `None` if fewer than `buffer_size` distinct values
/// exist in the whole pair, in which case the caller should fall back to
/// the repeated-values merge.
pub unsafe fn find_buffers<T, F: Less<T>>(
    arr: *mut T,
    a: Range,
    b: Range,
    buffer_size: usize,
    cache_size: usize,
    cache: *mut T,
    less: &mut F,
) -> Option<Buffers> {
    let buffer1_in_a = scan_forward(arr, a.start + 1, a.end, buffer_size, 1, less);

    if buffer_size <= cache_size {
        // Only one physical buffer is needed; the cache stands in for the
        // merge swap space, signaled by an empty `buffer2`.
        return if let Some(found) = buffer1_in_a {
            let buffer_a = collapse_to_start(arr, a.start, found, buffer_size, cache, cache_size, less);
            Some(Buffers {
                buffer_a,
                buffer_b: Range::new(b.end, b.end),
                buffer1: buffer_a,
                buffer2: Range::new(a.start, a.start),
            })
        } else {
            let found = scan_backward(arr, b.end - 2, b.start, buffer_size, less)?;
            let buffer_b = collapse_to_end(arr, b.end, found, buffer_size, cache, cache_size, less);
            Some(Buffers {
                buffer_a: Range::new(a.start, a.start),
                buffer_b,
                buffer1: buffer_b,
                buffer2: Range::new(a.start, a.start),
            })
        };
    }

    // Need two distinct physical buffers.
    if let Some(found1) = buffer1_in_a {
        if let Some(found2) = scan_forward(arr, found1 + 1, a.end, buffer_size, 0, less) {
            let combined = collapse_to_start(arr, a.start, found2, buffer_size * 2, cache, cache_size, less);
            let buffer1 = Range::new(a.start, a.start + buffer_size);
            let buffer2 = Range::new(a.start + buffer_size, a.start + buffer_size * 2);
            return Some(Buffers {
                buffer_a: combined,
                buffer_b: Range::new(b.end, b.end),
                buffer1,
                buffer2,
            });
        }

        let buffer_a = collapse_to_start(arr, a.start, found1, buffer_size, cache, cache_size, less);
        let found2b = scan_backward(arr, b.end - 2, b.start, buffer_size, less)?;
        let buffer_b = collapse_to_end(arr, b.end, found2b, buffer_size, cache, cache_size, less);

        return Some(Buffers {
            buffer_a,
            buffer_b,
            buffer1: Range::new(a.start, a.start + buffer_size),
            buffer2: Range::new(b.end - buffer_size, b.end),
        });
    }

    // Nothing usable in A at all: both buffers must come from B.
    let found1 = scan_backward(arr, b.end - 2, b.start, buffer_size, less)?;
    let found2 = scan_backward(arr, found1 - 1, b.start, buffer_size, less)?;
    let combined = collapse_to_end(arr, b.end, found2, buffer_size * 2, cache, cache_size, less);

    Some(Buffers {
        buffer_a: Range::new(a.start, a.start),
        buffer_b: combined,
        buffer1: Range::new(b.end - buffer_size, b.end),
        buffer2: Range::new(b.end - buffer_size * 2, b.end - buffer_size),
    })
}

/// End-of-level epilogue: `buffer2` holds the jumbled original distinct
/// values, so sort it back into ascending order, then
/// rotate `buffer_a`/`buffer_b` back into their correct sorted positions
/// -- a rightward sweep for `buffer_a`, a leftward sweep for `buffer_b`.
/// Each buffer element has a unique correct slot because the non-buffer
/// region is already fully sorted and the buffer values are pairwise
/// distinct.
pub unsafe fn redistribute<T, F: Less<T>>(
    arr: *mut T,
    level: &LevelState,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    insertion_sort(arr, level.buffer2, less);

    let level_start = level.buffer_a.start;

    let mut buffer_a = level.buffer_a;
    let mut index = buffer_a.end as isize;

    while !buffer_a.is_empty() {
        let idx = index as usize;

        if idx == level.buffer_b.start || !less(&*arr.add(idx), &*arr.add(buffer_a.start)) {
            let amount = index - buffer_a.end as isize;
            rotate(arr, -amount, Range::new(buffer_a.start, idx), cache, cache_size);
            buffer_a.start = (buffer_a.start as isize + amount + 1) as usize;
            buffer_a.end = (buffer_a.end as isize + amount) as usize;
            index -= 1;
        }

        index += 1;
    }

    let mut buffer_b = level.buffer_b;
    let mut index = buffer_b.start as isize;

    while !buffer_b.is_empty() {
        let idx = index as usize;

        if idx == level_start || !less(&*arr.add(buffer_b.end - 1), &*arr.add(idx - 1)) {
            let amount = buffer_b.start as isize - index;
            rotate(arr, amount, Range::new(idx, buffer_b.end), cache, cache_size);
            buffer_b.start = (buffer_b.start as isize - amount) as usize;
            buffer_b.end = (buffer_b.end as isize - amount - 1) as usize;
            index += 1;
        }

        index -= 1;
    }
}
