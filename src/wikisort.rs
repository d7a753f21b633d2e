//! The main driver (`spec.md` §4.3): reverses descending runs, takes the
//! small-`N` shortcut, insertion-sorts the level-0 base runs the range
//! scaler lays out, then merges levels bottom-up -- reusing one pair of
//! internal buffers across an entire level (`spec.md` §3's "level state")
//! and redistributing them once the level is done.

use core::mem::MaybeUninit;
use core::ptr;

use crate::blocks::block_roll;
use crate::buffer::{find_buffers, redistribute, Buffers, LevelState};
use crate::merge::merge_with_cache;
use crate::primitives::{insertion_sort, isqrt, reverse, rotate, Less, Range};
use crate::repeated::merge_no_buffer;
use crate::scale::{floor_power_of_two, Scale};

/// Size of the fixed stack-resident scratch cache (`spec.md` §3: "a small
/// fixed-size scratch area independent of input length"; 512 is the size
/// `WikiSort.c` recommends).
pub const CACHE_SIZE: usize = 512;

/// Sort `arr[0..n)` in place and in `O(N log N)` time using `O(1)`
/// auxiliary memory beyond [`CACHE_SIZE`].
pub unsafe fn sort<T, F: Less<T>>(arr: *mut T, n: usize, less: &mut F) {
    reverse_descending_runs(arr, n, less);

    if n <= 32 {
        insertion_sort(arr, Range::new(0, n), less);
        return;
    }

    let mut cache: [MaybeUninit<T>; CACHE_SIZE] = unsafe { MaybeUninit::uninit().assume_init() };
    let cache = cache.as_mut_ptr() as *mut T;

    let mut scale = Scale::new(n);
    let power_of_two = floor_power_of_two(n);

    // Level 0: insertion-sort every base run (16-31 elements).
    scale.rewind();
    let mut start = 0usize;
    while !scale.done(n) {
        let end = scale.next_boundary();
        insertion_sort(arr, Range::new(start, end), less);
        start = end;
    }

    let mut merge_size = 16usize;
    while merge_size < power_of_two {
        let block_size = isqrt(scale.dec_step());
        let buffer_size = scale.dec_step() / block_size + 1;

        let mut level = LevelState::new();
        scale.rewind();
        let mut start = 0usize;

        while !scale.done(n) {
            let mid = scale.next_boundary();
            let end = scale.next_boundary();

            merge_pair(arr, Range::new(start, mid), Range::new(mid, end), buffer_size, block_size, &mut level, cache, CACHE_SIZE, less);

            start = end;
        }

        if level.active {
            redistribute(arr, &level, cache, CACHE_SIZE, less);
        }

        scale.double();
        merge_size *= 2;
    }
}

/// Reverse every maximal strictly-descending run in place (`spec.md` §4.3
/// preamble). A strictly-descending run has no adjacent equal elements,
/// so reversing it cannot disturb stability.
unsafe fn reverse_descending_runs<T, F: Less<T>>(arr: *mut T, n: usize, less: &mut F) {
    let mut i = 0usize;
    while i < n {
        let mut j = i + 1;
        while j < n && less(&*arr.add(j), &*arr.add(j - 1)) {
            j += 1;
        }
        reverse(arr, Range::new(i, j));
        i = j;
    }
}

/// Merge one adjacent pair of base runs at the current level.
#[allow(clippy::too_many_arguments)]
unsafe fn merge_pair<T, F: Less<T>>(
    arr: *mut T,
    a: Range,
    b: Range,
    buffer_size: usize,
    block_size: usize,
    level: &mut LevelState,
    cache: *mut T,
    cache_size: usize,
    less: &mut F,
) {
    if less(&*arr.add(b.end - 1), &*arr.add(a.start)) {
        // Fully reversed relative to each other: a plain rotation suffices.
        rotate(arr, a.len() as isize, Range::new(a.start, b.end), cache, cache_size);
        return;
    }

    if !less(&*arr.add(b.start), &*arr.add(b.start - 1)) {
        // Already in order.
        return;
    }

    if a.len() <= cache_size {
        ptr::copy_nonoverlapping(arr.add(a.start), cache, a.len());
        merge_with_cache(arr, a.start, a.len(), b, cache as *const T, less);
        return;
    }

    let buffers = if level.active {
        Buffers {
            buffer_a: Range::new(a.start, a.start),
            buffer_b: Range::new(b.end, b.end),
            buffer1: level.buffer1,
            buffer2: level.buffer2,
        }
    } else {
        match find_buffers(arr, a, b, buffer_size, cache_size, cache, less) {
            Some(found) => {
                level.active = true;
                level.buffer1 = found.buffer1;
                level.buffer2 = found.buffer2;
                level.buffer_a = found.buffer_a;
                level.buffer_b = found.buffer_b;
                found
            }
            None => {
                // Too few distinct values to carve a buffer out of this pair.
                merge_no_buffer(arr, a, b, cache, cache_size, less);
                return;
            }
        }
    };

    let a_inner = Range::new(buffers.buffer_a.end, a.end);
    let b_inner = Range::new(b.start, buffers.buffer_b.start);

    block_roll(arr, a_inner, b_inner, buffers.buffer1.start, buffers.buffer2.start, block_size, cache, cache_size, less);
}
