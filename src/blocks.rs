//! Block roll and local merge -- the heart of the in-place merge once two
//! internal buffers are available. `A'` is broken into `block_size`-sized
//! blocks (plus one uneven leading block); each full A-block has its
//! second element swapped out for a unique tag from `buffer1`, so that
//! comparing tags orders the A-blocks by their original position without
//! needing to touch the blocks themselves. The roll then walks the
//! globally-smallest remaining A-block through the B-blocks that precede
//! it, resolving each boundary with a small local merge bounded by
//! `buffer2`'s size.
//!
//! Ported from the `WikiSort.c` block-roll loop (the `minA`/`lastA`/
//! `lastB` variables below are named the same as there). The C source
//! passes `minA` as an *index* into [`crate::primitives::binary_first`];
//! this port copies the *value* out instead via [`ManuallyDrop`], so the
//! binary search doesn't depend on `array[minA]` staying unmoved between
//! the cache swap and the call.

use core::mem::ManuallyDrop;
use core::ptr;

use crate::merge::{merge_with_buffer, merge_with_cache};
use crate::primitives::{binary_first, block_swap, rotate, Less, Range};

/// Copy `a`'s current contents out to scratch -- the cache if it fits,
/// else the in-array `buffer2` -- returning whether the cache was used.
unsafe fn stash<T>(arr: *mut T, a: Range, buffer2_start: usize, cache: *mut T, cache_size: usize) -> bool {
    if a.len() <= cache_size {
        ptr::copy_nonoverlapping(arr.add(a.start), cache, a.len());
        true
    } else {
        block_swap(arr, a.start, buffer2_start, a.len());
        false
    }
}

/// Merge the `a_len` elements stashed by [`stash`] with `b`, writing the
/// result starting at `dest_start`.
unsafe fn merge_stashed<T, F: Less<T>>(
    arr: *mut T,
    dest_start: usize,
    a_len: usize,
    b: Range,
    buffer2_start: usize,
    in_cache: bool,
    cache: *const T,
    less: &mut F,
) {
    if in_cache {
        merge_with_cache(arr, dest_start, a_len, b, cache, less);
    } else {
        merge_with_buffer(arr, dest_start, a_len, b, buffer2_start, less);
    }
}

/// Roll `a` (already collapsed so `buffer1` fits before it) through `b`
/// (already collapsed so `buffer2`'s owning buffer fits after it),
/// merging the two in place. `buffer1_start` must have room for
/// `a.len() / block_size` elements (the number of full A-blocks, which is
/// exactly what `buffer_size` is sized to cover); `buffer2_start` must
/// have room for `block_size` elements.
#[allow(clippy::too_many_arguments)]
pub unsafe fn block_roll<T, F: Less<T>>(
    arr: *mut T,
    a: Range,
    b: Range,
    buffer1_start: usize,
    buffer2_start: usize,
    block_size: usize,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }

    let first_len = a.len() % block_size;
    let mut last_a = Range::new(a.start, a.start + first_len);
    let mut block_a = Range::new(last_a.end, a.end);

    // Tag the second element of each full A-block with a unique buffer1 value.
    let mut tag_index = 0usize;
    let mut index_a = block_a.start + 1;
    while index_a < block_a.end {
        ptr::swap(arr.add(buffer1_start + tag_index), arr.add(index_a));
        tag_index += 1;
        index_a += block_size;
    }

    let mut last_b = Range::new(0, 0);
    let mut block_b = Range::new(b.start, b.start + block_size.min(b.len()));

    let mut min_a = block_a.start;
    let mut used_tags = 0usize;

    let mut in_cache = stash(arr, last_a, buffer2_start, cache, cache_size);

    loop {
        let min_key = ManuallyDrop::new(ptr::read(arr.add(min_a)));
        let merge_now = (!last_b.is_empty() && !less(&*arr.add(last_b.end - 1), &*min_key)) || block_b.is_empty();

        if merge_now {
            let b_split = binary_first(arr, &*min_key as *const T, last_b, less);
            let b_remaining = last_b.end - b_split;

            block_swap(arr, block_a.start, min_a, block_size);

            // Restore the tag swapped out of the A-block now at `block_a.start`.
            ptr::swap(arr.add(block_a.start + 1), arr.add(buffer1_start + used_tags));
            used_tags += 1;

            merge_stashed(
                arr,
                last_a.start,
                last_a.len(),
                Range::new(last_a.end, b_split),
                buffer2_start,
                in_cache,
                cache,
                less,
            );

            in_cache = stash(
                arr,
                Range::new(block_a.start, block_a.start + block_size),
                buffer2_start,
                cache,
                cache_size,
            );

            block_swap(arr, b_split, block_a.start + block_size - b_remaining, b_remaining);

            last_a = Range::new(block_a.start - b_remaining, block_a.start - b_remaining + block_size);
            last_b = Range::new(last_a.end, last_a.end + b_remaining);
            block_a.start += block_size;

            if block_a.is_empty() {
                break;
            }

            min_a = block_a.start + 1;
            let mut find_a = min_a + block_size;
            while find_a < block_a.end {
                if less(&*arr.add(find_a), &*arr.add(min_a)) {
                    min_a = find_a;
                }
                find_a += block_size;
            }
            min_a -= 1;
        } else if block_b.len() < block_size {
            // Uneven B tail: move it ahead of the remaining A-blocks. The cache
            // currently holds `last_a`'s contents, so it must not be used here.
            rotate(arr, -(block_b.len() as isize), Range::new(block_a.start, block_b.end), cache, 0);
            last_b = Range::new(block_a.start, block_a.start + block_b.len());
            block_a.start += block_b.len();
            block_a.end += block_b.len();
            min_a += block_b.len();
            block_b.end = block_b.start;
        } else {
            block_swap(arr, block_a.start, block_b.start, block_size);
            last_b = Range::new(block_a.start, block_a.start + block_size);
            if min_a == block_a.start {
                min_a = block_a.end;
            }

            block_a.start += block_size;
            block_a.end += block_size;
            block_b.start += block_size;
            block_b.end += block_size;
            if block_b.end > b.end {
                block_b.end = b.end;
            }
        }
    }

    merge_stashed(arr, last_a.start, last_a.len(), Range::new(last_a.end, b.end), buffer2_start, in_cache, cache, less);
}
