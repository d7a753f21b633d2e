//! A simpler sort variant: the same power-of-two range-scaling scheduler
//! as [`crate::wikisort`], but trading the internal buffer for a
//! fixed-size circular swap buffer, so the merge loop never needs to carve
//! scratch space out of the array itself.
//!
//! Ported from `original_source/bzSort.c`'s macro body. Case (b) (a run
//! fully exceeding the one after it) is resolved with [`rotate`] rather
//! than the macro's hand-unrolled single-variable exchange -- `rotate`
//! already picks the same cache-assisted fast path that exchange was
//! hand-rolling, so there is nothing left to gain by keeping a second
//! copy of it. Case (c) (the general merge) is the macro's circular-buffer
//! loop translated idiom-for-idiom: it degrades towards quadratic when
//! `swap_size` is exceeded by runs whose values interleave heavily in the
//! "wrong" direction, and that is inherited here unchanged rather than
//! silently patched.

use core::mem::MaybeUninit;
use core::ptr;

use crate::primitives::{insertion_sort, rotate, Less, Range};
use crate::scale::floor_power_of_two;

/// Size of the fixed circular swap buffer.
pub const SWAP_SIZE: usize = 1024;

/// Sort `arr[0..n)` in place with the bzSort algorithm.
pub unsafe fn bz_sort<T, F: Less<T>>(arr: *mut T, n: usize, less: &mut F) {
    if n < 32 {
        insertion_sort(arr, Range::new(0, n), less);
        return;
    }

    let pot = floor_power_of_two(n);
    let scale = n as f64 / pot as f64;
    let at = |i: usize| -> usize { (i as f64 * scale) as usize };

    let mut swap: [MaybeUninit<T>; SWAP_SIZE] = unsafe { MaybeUninit::uninit().assume_init() };
    let swap = swap.as_mut_ptr() as *mut T;

    let mut index = 0usize;
    while index < pot {
        let start = at(index);
        let mid = at(index + 16);
        let end = at(index + 32);

        insertion_sort(arr, Range::new(start, mid), less);
        insertion_sort(arr, Range::new(mid, end), less);

        let mut merge = index;
        index += 32;
        let mut iteration = index >> 4;
        let mut length = 16usize;

        while iteration & 1 == 0 {
            let start = at(merge);
            let mid = at(merge + length);
            let end = at(merge + length + length);

            merge_pair(arr, start, mid, end, swap, less);

            length <<= 1;
            merge -= length;
            iteration >>= 1;
        }
    }
}

/// Merge `[start,mid)` with `[mid,end)`, dispatching on whether the runs
/// are already in order, fully reversed, or need a general circular merge.
unsafe fn merge_pair<T, F: Less<T>>(arr: *mut T, start: usize, mid: usize, end: usize, swap: *mut T, less: &mut F) {
    if !less(&*arr.add(mid), &*arr.add(mid - 1)) {
        return;
    }

    if less(&*arr.add(end - 1), &*arr.add(start)) {
        // The scaler guarantees the two sides here never differ in length
        // by more than one, so a plain rotation is all case (b) needs.
        rotate(arr, (mid - start) as isize, Range::new(start, end), swap, SWAP_SIZE);
        return;
    }

    circular_merge(arr, Range::new(start, mid), Range::new(mid, end), swap, less);
}

/// General merge case: stream the smaller-valued head of `a`/`b` into the
/// circular `swap` buffer. Whenever the buffer fills, either flush it
/// straight back (if at least a quarter of it worth of space has opened
/// up ahead of `a`'s unread remainder) or slide that remainder rightward
/// first to make room, then flush.
unsafe fn circular_merge<T, F: Less<T>>(arr: *mut T, a: Range, b: Range, swap: *mut T, less: &mut F) {
    let mut insert = 0usize;
    let mut count = 0usize;
    let mut index1 = a.start;
    let mut index2 = b.start;
    let mut swap_to = a.start;
    let mut swap_from = 0usize;
    let mut mid = a.end;

    while index1 < mid && index2 < b.end {
        let take_left = !less(&*arr.add(index2), &*arr.add(index1));
        let src = if take_left { index1 } else { index2 };
        swap.add(insert).write(arr.add(src).read());
        insert += 1;
        if take_left {
            index1 += 1;
        } else {
            index2 += 1;
        }
        count += 1;

        if insert >= SWAP_SIZE {
            insert = 0;
        }

        if count >= SWAP_SIZE {
            if index1 - swap_to <= count / 4 {
                ptr::copy(arr.add(index1), arr.add(index2 - (mid - index1)), mid - index1);
                index1 = index2 - (mid - index1);
                mid = index2;
                count = 0;
            } else {
                count -= index1 - swap_to;
            }

            while swap_to < index1 {
                arr.add(swap_to).write(swap.add(swap_from).read());
                swap_to += 1;
                swap_from += 1;
                if swap_from >= SWAP_SIZE {
                    swap_from = 0;
                }
            }
        }
    }

    if mid < index2 {
        ptr::copy(arr.add(index1), arr.add(index2 - (mid - index1)), mid - index1);
        index1 = index2 - (mid - index1);
    }

    while swap_to < index1 {
        arr.add(swap_to).write(swap.add(swap_from).read());
        swap_to += 1;
        swap_from += 1;
        if swap_from >= SWAP_SIZE {
            swap_from = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    unsafe fn run(v: &mut [i32]) {
        let less = &mut |x: &i32, y: &i32| x < y;
        bz_sort(v.as_mut_ptr(), v.len(), less);
    }

    #[test]
    fn tiny_inputs_match_insertion_sort() {
        for n in 0..32 {
            let mut v: Vec<i32> = (0..n).rev().collect();
            let mut expected = v.clone();
            expected.sort();
            unsafe { run(&mut v) };
            assert_eq!(v, expected, "n={n}");
        }
    }

    #[test]
    fn sorts_random_input() {
        let mut state = 0x9E3779B97F4A7C15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        for &n in &[33usize, 500, 10_000] {
            let mut v: Vec<i64> = (0..n).map(|_| (next() % 500) as i64).collect();
            let mut expected = v.clone();
            expected.sort();
            unsafe {
                let less = &mut |x: &i64, y: &i64| x < y;
                bz_sort(v.as_mut_ptr(), v.len(), less);
            }
            assert_eq!(v, expected, "n={n}");
        }
    }

    #[test]
    fn already_sorted_is_untouched() {
        let v: Vec<i32> = (0..5000).collect();
        let mut copy = v.clone();
        unsafe { run(&mut copy) };
        assert_eq!(copy, v);
    }

    #[test]
    fn descending_input_reverses() {
        let n = 4096;
        let mut v: Vec<i32> = (0..n).rev().collect();
        unsafe { run(&mut v) };
        let expected: Vec<i32> = (0..n).collect();
        assert_eq!(v, expected);
    }

    #[test]
    fn stays_stable_on_repeated_values() {
        let mut v: Vec<(i32, usize)> = (0..20_000).map(|i| (i % 3, i)).collect();
        let less = &mut |x: &(i32, usize), y: &(i32, usize)| x.0 < y.0;
        unsafe { bz_sort(v.as_mut_ptr(), v.len(), less) };

        for w in v.windows(2) {
            assert!(w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1));
        }
    }
}
