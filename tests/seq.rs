use std::{cmp::Ordering, time::Duration};

use paste::paste;
use upcache::seq::{
    deep_clone, partial_sequence_compare, sequence_compare, sequence_equals, ForEachExt, SliceExt,
};

// Runs the same checks for every element type. `$low` sorts before `$high`.
macro_rules! generate_ord_tests {
    ($($ty:ident => ($low:expr, $high:expr)),* $(,)?) => {
        paste! {
            $(
                #[test]
                fn [<sequence_ops_ $ty:snake>]() {
                    let a: Vec<$ty> = vec![$low, $high, $low];
                    let same: Vec<$ty> = vec![$low, $high, $low];
                    let bigger: Vec<$ty> = vec![$low, $high, $high];
                    let prefix: Vec<$ty> = vec![$low, $high];
                    let empty: Vec<$ty> = Vec::new();

                    assert!(sequence_equals(Some(&a[..]), Some(&same[..])));
                    assert_eq!(sequence_compare(Some(&a[..]), Some(&same[..])), Ordering::Equal);

                    assert!(!sequence_equals(Some(&a[..]), Some(&bigger[..])));
                    assert_eq!(sequence_compare(Some(&a[..]), Some(&bigger[..])), Ordering::Less);
                    assert_eq!(sequence_compare(Some(&bigger[..]), Some(&a[..])), Ordering::Greater);

                    assert_eq!(sequence_compare(Some(&prefix[..]), Some(&a[..])), Ordering::Less);

                    assert_eq!(sequence_compare(None, Some(&empty[..])), Ordering::Less);
                    assert_eq!(sequence_compare::<$ty>(None, None), Ordering::Equal);
                    assert!(sequence_equals::<$ty>(None, None));
                    assert!(!sequence_equals(None, Some(&empty[..])));

                    let copy = deep_clone(Some(&a[..])).unwrap();
                    assert_eq!(copy, a);
                    assert_eq!(deep_clone::<$ty>(None), None);
                }
            )*
        }
    };
}

generate_ord_tests! {
    u8 => (1, 2),
    i8 => (-1, 1),
    i16 => (-300, 300),
    u16 => (1, 60_000),
    char => ('a', 'z'),
    i32 => (i32::MIN, i32::MAX),
    u32 => (0, u32::MAX),
    i64 => (-1, 0),
    u64 => (7, 8),
    bool => (false, true),
    Duration => (Duration::from_millis(1), Duration::from_secs(1)),
    String => (String::from("apple"), String::from("banana")),
}

macro_rules! generate_float_tests {
    ($($ty:ident),*) => {
        paste! {
            $(
                #[test]
                fn [<partial_sequence_ops_ $ty>]() {
                    let a: [$ty; 2] = [0.5, 1.5];
                    let b: [$ty; 2] = [0.5, 2.5];

                    assert!(sequence_equals(Some(&a[..]), Some(&a[..])));
                    assert_eq!(partial_sequence_compare(Some(&a[..]), Some(&b[..])), Some(Ordering::Less));
                    assert_eq!(partial_sequence_compare(Some(&a[..1]), Some(&a[..])), Some(Ordering::Less));
                    assert_eq!(partial_sequence_compare(None, Some(&a[..0])), Some(Ordering::Less));
                    assert_eq!(partial_sequence_compare::<$ty>(None, None), Some(Ordering::Equal));

                    let nan: [$ty; 1] = [$ty::NAN];
                    assert!(!sequence_equals(Some(&nan[..]), Some(&nan[..])));
                    assert_eq!(partial_sequence_compare(Some(&nan[..]), Some(&a[..])), None);
                }
            )*
        }
    };
}

generate_float_tests!(f32, f64);

#[test]
fn compare_examples() {
    assert_eq!(
        sequence_compare(Some(&[1, 2, 3][..]), Some(&[1, 2, 4][..])),
        Ordering::Less
    );
    assert_eq!(
        sequence_compare(Some(&[1, 2][..]), Some(&[1, 2, 3][..])),
        Ordering::Less
    );
    assert_eq!(sequence_compare::<i32>(None, Some(&[][..])), Ordering::Less);
    assert_eq!(sequence_compare::<i32>(None, None), Ordering::Equal);
}

#[test]
fn deep_clone_of_nested_arrays() {
    let rows = [vec![String::from("a")], vec![String::from("b"), String::from("c")]];
    let mut copy = rows.deep_clone();
    copy[1].push(String::from("d"));
    assert_eq!(rows[1].len(), 2);
    assert_eq!(copy[1].len(), 3);
}

#[test]
fn for_each_with_context() {
    struct Totals {
        sum: i64,
        count: usize,
    }

    let scale = 3;
    let mut totals = Totals { sum: 0, count: 0 };
    (1..=4).for_each_with_mut(&mut totals, |n, t| {
        t.sum += n * scale;
        t.count += 1;
    });
    assert_eq!(totals.sum, 30);
    assert_eq!(totals.count, 4);

    let step = 3usize;
    let mut labels = Vec::new();
    ["x", "y"]
        .iter()
        .for_each_indexed_with(&step, |i, s, step| labels.push(format!("{s}{}", i * step)));
    assert_eq!(labels, ["x0", "y3"]);
}
