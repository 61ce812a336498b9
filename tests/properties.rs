//! Randomised checks of the sorting and set-combination laws.
//!
//! Inputs come from seeded `fastrand` generators so failures reproduce.

use std::cmp::Ordering;

use rstest::rstest;
use seqview::{Join, SetOp, SortCopy, Sorter, View, ViewMut, rotate, search};

/// Elements tagged with their input position; only the key is compared.
type Tagged = (u32, usize);

fn by_key(a: &Tagged, b: &Tagged) -> Ordering {
    a.0.cmp(&b.0)
}

fn tagged_input(seed: u64, n: usize, keys: u32) -> Vec<Tagged> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n).map(|i| (rng.u32(..keys), i)).collect()
}

fn sorted_keys(seed: u64, n: usize, keys: u32) -> Vec<u32> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut out: Vec<u32> = (0..n).map(|_| rng.u32(..keys)).collect();
    out.sort();
    out
}

fn sort_with_buffer(input: &[Tagged], buffer_len: usize) -> Vec<Tagged> {
    let mut data = input.to_vec();
    let mut scratch = vec![(0, 0); buffer_len];
    Sorter::new(ViewMut::new(&mut data), by_key)
        .buffer(ViewMut::new(&mut scratch))
        .in_place();
    data
}

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(3, 3)]
#[case(4, 25)]
#[case(5, 64)]
#[case(6, 256)]
fn sort_is_ordered_and_stable(#[case] seed: u64, #[case] buffer_len: usize) {
    for n in [0, 1, 2, 15, 16, 17, 100, 256] {
        let input = tagged_input(seed, n, 12);
        let output = sort_with_buffer(&input, buffer_len);
        // Stable iff ordered by (key, original position).
        for w in output.windows(2) {
            assert!(w[0] < w[1], "n={n} buffer={buffer_len}: {:?} before {:?}", w[0], w[1]);
        }
        assert_eq!(output.len(), n);
    }
}

#[test]
fn buffer_size_does_not_change_the_result() {
    let input = tagged_input(99, 400, 30);
    let reference = sort_with_buffer(&input, 0);
    for buffer_len in [3, 25, 100, 400] {
        assert_eq!(sort_with_buffer(&input, buffer_len), reference, "buffer {buffer_len}");
    }
}

#[rstest]
#[case(10, 3)]
#[case(10, 10)]
#[case(10, 15)]
#[case(0, 4)]
fn copy_to_conserves_elements(#[case] n: usize, #[case] capacity: usize) {
    let input = tagged_input(n as u64, n, 5);
    let mut out = vec![(u32::MAX, usize::MAX); capacity];
    let outcome = Sorter::new(View::new(&input), by_key).copy_to(&mut ViewMut::new(&mut out));

    let unconsumed = n - outcome.consumed;
    assert_eq!(outcome.consumed + unconsumed, n);
    if n > capacity {
        assert_eq!(outcome, SortCopy { consumed: capacity, written: capacity });
    } else {
        assert_eq!(outcome, SortCopy { consumed: n, written: n });
    }
    let expected = sort_with_buffer(&input, n);
    assert_eq!(out[..outcome.written], expected[..outcome.written]);
}

fn join(a: &[u32], b: &[u32], op: SetOp) -> Vec<u32> {
    Join::new(View::new(a), View::new(b), u32::cmp, op).collect()
}

fn contains(haystack: &[u32], needle: u32) -> bool {
    haystack.binary_search(&needle).is_ok()
}

#[rstest]
#[case(11)]
#[case(12)]
#[case(13)]
fn set_laws_hold(#[case] seed: u64) {
    for (n, m, keys) in [(0, 10, 8), (40, 40, 30), (100, 20, 50), (64, 64, 4)] {
        let a = sorted_keys(seed, n, keys);
        let b = sorted_keys(seed + 100, m, keys);
        let union = join(&a, &b, SetOp::Union);
        let inter = join(&a, &b, SetOp::Intersect);
        let sym = join(&a, &b, SetOp::SymmetricDifference);

        for op in [SetOp::Union, SetOp::Intersect, SetOp::SymmetricDifference, SetOp::Difference] {
            let out = join(&a, &b, op);
            assert!(search::is_sorted_by(View::new(&out), u32::cmp), "{op:?} output not sorted");
        }

        assert!(inter.iter().all(|&x| contains(&a, x) && contains(&b, x)));
        assert!(a.iter().chain(&b).all(|&x| contains(&union, x)));

        // Intersection and symmetric difference partition the union, counting
        // repeated keys.
        let mut recombined = inter.clone();
        recombined.extend(&sym);
        recombined.sort();
        assert_eq!(recombined, union);
    }
}

#[test]
fn in_place_join_matches_collect() {
    for seed in 0..20u64 {
        let a = sorted_keys(seed, 30, 40);
        let b = sorted_keys(seed + 1000, 25, 40);
        for op in [SetOp::Union, SetOp::Intersect, SetOp::SymmetricDifference, SetOp::Difference] {
            let mut target = a.clone();
            let view = Join::new(ViewMut::new(&mut target), View::new(&b), u32::cmp, op).in_place().unwrap();
            assert_eq!(view.len(), join(&a, &b, op).len());
            assert_eq!(target, join(&a, &b, op), "seed {seed} {op:?}");
        }
    }
}

#[test]
fn rotating_back_restores_order() {
    let mut rng = fastrand::Rng::with_seed(5);
    for n in [0usize, 1, 9, 128] {
        let original: Vec<u8> = (0..n).map(|_| rng.u8(..)).collect();
        for mid in 0..=n {
            let mut data = original.clone();
            let mut view = ViewMut::new(&mut data);
            rotate(&mut view, mid).unwrap();
            rotate(&mut view, n - mid).unwrap();
            assert_eq!(data, original);
        }
    }
}
