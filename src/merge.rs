//! The stable two-way merge primitive, in its two swap-space flavors:
//! merging against a copy of `A` sitting in the scratch cache, and merging
//! against a copy of `A` sitting in an in-array buffer elsewhere.
//!
//! Both read `A` from the swap space and `B` in place, writing the merged
//! run starting at `dest_start` (which overlaps `A`'s old position). On
//! equal keys the swap-space side (`A`) is taken first, which is what makes
//! the merge stable.

use core::ptr;

use crate::primitives::{block_swap, Less, Range};

/// Merge `A` (already copied into `cache[0..a_len]`) with `B` (still living
/// in the array at `b`), writing the result starting at `dest_start`.
pub unsafe fn merge_with_cache<T, F: Less<T>>(
    arr: *mut T,
    dest_start: usize,
    a_len: usize,
    b: Range,
    cache: *const T,
    less: &mut F,
) {
    let mut a_i = 0usize;
    let mut b_i = b.start;
    let mut dst = dest_start;

    if a_len > 0 && !b.is_empty() {
        loop {
            if !less(&*arr.add(b_i), &*cache.add(a_i)) {
                arr.add(dst).write(cache.add(a_i).read());
                a_i += 1;
                dst += 1;
                if a_i >= a_len {
                    break;
                }
            } else {
                arr.add(dst).write(arr.add(b_i).read());
                b_i += 1;
                dst += 1;
                if b_i >= b.end {
                    break;
                }
            }
        }
    }

    // B's remainder, if any, is already sitting where it needs to be: `dst`
    // and `b_i` have advanced in lockstep since the array positions of `A`
    // and `B` are contiguous. Only A's leftover needs copying back in.
    ptr::copy_nonoverlapping(cache.add(a_i), arr.add(dst), a_len - a_i);
}

/// Merge `A` (currently living at the disjoint in-array range
/// `[buffer_start, buffer_start + a_len)`) with `B` (at `b`), writing the
/// result starting at `dest_start`. Instead of overwriting, each selected
/// element is *swapped* with the destination slot, so `buffer_start..` ends
/// up holding a permutation of whatever used to occupy `dest_start..`
/// (the multiset of buffer values is preserved, just reordered).
pub unsafe fn merge_with_buffer<T, F: Less<T>>(
    arr: *mut T,
    dest_start: usize,
    a_len: usize,
    b: Range,
    buffer_start: usize,
    less: &mut F,
) {
    let mut a_i = 0usize;
    let mut b_i = b.start;
    let mut insert = dest_start;

    if a_len > 0 && !b.is_empty() {
        loop {
            if !less(&*arr.add(b_i), &*arr.add(buffer_start + a_i)) {
                ptr::swap(arr.add(insert), arr.add(buffer_start + a_i));
                a_i += 1;
                insert += 1;
                if a_i >= a_len {
                    break;
                }
            } else {
                ptr::swap(arr.add(insert), arr.add(b_i));
                b_i += 1;
                insert += 1;
                if b_i >= b.end {
                    break;
                }
            }
        }
    }

    block_swap(arr, buffer_start + a_i, insert, a_len - a_i);
}
