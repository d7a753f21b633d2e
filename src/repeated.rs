//! Repeated-values fallback: used when [`crate::buffer::find_buffers`]
//! can't find `buffer_size` pairwise-distinct values anywhere in `A ∪ B`,
//! meaning there's nowhere to carve out a scratch buffer at all. Instead of
//! buffering, repeatedly binary-search `A`'s leading value into `B` and
//! rotate the matching `B`-prefix ahead of it.
//!
//! This is the Hwang-and-Lin style in-place merge WikiSort falls back to
//! for this case: normally too slow for general use, but only ever invoked
//! here on inputs small enough (or repetitive enough) that it doesn't
//! matter, since any level merging runs that actually found a buffer
//! instead uses the cheaper block roll.

use crate::primitives::{binary_first, binary_last, rotate, Less, Range};

/// Merge `a` and `b` (each individually sorted) into one sorted run, in
/// place, with no scratch buffer beyond the rotation cache.
///
/// Panics if `less` fails to impose a strict weak ordering badly enough
/// that a full loop iteration makes no progress through `a` -- the same
/// contract violation the in-array buffer path would otherwise silently
/// corrupt elements over.
pub unsafe fn merge_no_buffer<T, F: Less<T>>(
    arr: *mut T,
    mut a: Range,
    mut b: Range,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }

    if !less(&*arr.add(b.start), &*arr.add(a.end - 1)) {
        return;
    }

    loop {
        let mid = binary_first(arr, arr.add(a.start), b, less);
        let amount = mid - a.end;

        rotate(arr, -(amount as isize), Range::new(a.start, mid), cache, cache_size);

        b.start = mid;
        a = Range::new(a.start + amount, b.start);

        if a.is_empty() || b.is_empty() {
            return;
        }

        let next_a_start = binary_last(arr, arr.add(a.start), a, less);
        if next_a_start == a.start {
            panic!("comparator violates a strict weak ordering (no progress made merging)");
        }
        a.start = next_a_start;

        if a.is_empty() {
            return;
        }
    }
}
