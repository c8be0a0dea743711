//! Generic helpers for slices and iterators.
//!
//! - [`ForEachExt`] runs a closure on every item of an iterator together with an
//!   extra context argument, passed either by shared or by mutable reference.
//! - [`deep_clone`] and [`SliceExt::deep_clone`] copy a slice into a new `Vec`.
//! - [`sequence_equals`] and [`sequence_compare`] compare two optional slices
//!   element by element.
//!
//! Absent sequences are modelled with `Option<&[T]>`. Two absent sequences are
//! equal, and an absent sequence sorts before any present one, including an
//! empty one.

use std::cmp::Ordering;

/// Extends every [`Iterator`] with for-each methods that take a context
/// argument.
///
/// Items are visited left to right.
///
/// # Example
///
/// ```rust
/// use upcache::seq::ForEachExt;
///
/// let mut total = 0;
/// [1, 2, 3].iter().for_each_with_mut(&mut total, |n, total| *total += n);
/// assert_eq!(total, 6);
/// ```
pub trait ForEachExt: Iterator + Sized {
    /// Calls `f` with each item and a shared reference to `ctx`.
    fn for_each_with<C, F>(self, ctx: &C, mut f: F)
    where
        C: ?Sized,
        F: FnMut(Self::Item, &C),
    {
        for item in self {
            f(item, ctx);
        }
    }

    /// Calls `f` with each item and a mutable reference to `ctx`.
    fn for_each_with_mut<C, F>(self, ctx: &mut C, mut f: F)
    where
        C: ?Sized,
        F: FnMut(Self::Item, &mut C),
    {
        for item in self {
            f(item, &mut *ctx);
        }
    }

    /// Calls `f` with the zero-based index of each item, the item and a shared
    /// reference to `ctx`.
    fn for_each_indexed_with<C, F>(self, ctx: &C, mut f: F)
    where
        C: ?Sized,
        F: FnMut(usize, Self::Item, &C),
    {
        for (i, item) in self.enumerate() {
            f(i, item, ctx);
        }
    }
}

impl<I: Iterator> ForEachExt for I {}

/// Extends slices (and, through unsizing, arrays) with a deep clone.
pub trait SliceExt<T> {
    /// Returns a new `Vec` holding a clone of every element.
    ///
    /// Nested owned containers are cloned recursively by their `Clone`
    /// implementations, so the result shares no storage with `self`. Shared
    /// pointers such as `Arc` are cloned as pointers.
    fn deep_clone(&self) -> Vec<T>;
}

impl<T: Clone> SliceExt<T> for [T] {
    fn deep_clone(&self) -> Vec<T> {
        self.to_vec()
    }
}

/// Deep-clones an optional slice. An absent slice stays absent.
///
/// # Example
///
/// ```rust
/// use upcache::seq::deep_clone;
///
/// let grid = vec![vec![1, 2], vec![3]];
/// let copy = deep_clone(Some(&grid[..])).unwrap();
/// assert_eq!(copy, grid);
/// assert_eq!(deep_clone::<u8>(None), None);
/// ```
pub fn deep_clone<T: Clone>(source: Option<&[T]>) -> Option<Vec<T>> {
    source.map(<[T]>::deep_clone)
}

/// Returns `true` if both sequences are absent, or both are present with equal
/// lengths and pairwise equal elements.
///
/// # Example
///
/// ```rust
/// use upcache::seq::sequence_equals;
///
/// assert!(sequence_equals(Some(&[1, 2][..]), Some(&[1, 2][..])));
/// assert!(sequence_equals::<u8>(None, None));
/// assert!(!sequence_equals(None, Some(&[0u8; 0][..])));
/// ```
pub fn sequence_equals<T: PartialEq>(a: Option<&[T]>, b: Option<&[T]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns `true` if two iterables yield pairwise equal items and end at the
/// same time.
pub fn iter_equals<A, B>(a: A, b: B) -> bool
where
    A: IntoIterator,
    B: IntoIterator,
    A::Item: PartialEq<B::Item>,
{
    a.into_iter().eq(b)
}

/// Compares two optional sequences lexicographically.
///
/// - Two absent sequences are `Equal`.
/// - An absent sequence is `Less` than a present one, even an empty one.
/// - Otherwise the first pair of unequal elements decides. If one sequence is a
///   prefix of the other, the shorter one is `Less`.
///
/// # Example
///
/// ```rust
/// use std::cmp::Ordering;
/// use upcache::seq::sequence_compare;
///
/// assert_eq!(sequence_compare(Some(&[1, 2, 3][..]), Some(&[1, 2, 4][..])), Ordering::Less);
/// assert_eq!(sequence_compare(Some(&[1, 2][..]), Some(&[1, 2, 3][..])), Ordering::Less);
/// assert_eq!(sequence_compare(None, Some(&[0u8; 0][..])), Ordering::Less);
/// assert_eq!(sequence_compare::<u8>(None, None), Ordering::Equal);
/// ```
pub fn sequence_compare<T: Ord>(a: Option<&[T]>, b: Option<&[T]>) -> Ordering {
    sequence_compare_by(a, b, T::cmp)
}

/// Works like [`sequence_compare`], but compares elements with `cmp`.
pub fn sequence_compare_by<T, F>(a: Option<&[T]>, b: Option<&[T]>, mut cmp: F) -> Ordering
where
    F: FnMut(&T, &T) -> Ordering,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            for (x, y) in a.iter().zip(b) {
                match cmp(x, y) {
                    Ordering::Equal => continue,
                    non_eq => return non_eq,
                }
            }
            a.len().cmp(&b.len())
        }
    }
}

/// Works like [`sequence_compare`] for elements that are only partially ordered,
/// such as floating point numbers.
///
/// Returns `None` if the first pair of elements that is not equal cannot be
/// compared (e.g. one of them is `NaN`).
pub fn partial_sequence_compare<T: PartialOrd>(
    a: Option<&[T]>,
    b: Option<&[T]>,
) -> Option<Ordering> {
    match (a, b) {
        (None, None) => Some(Ordering::Equal),
        (None, Some(_)) => Some(Ordering::Less),
        (Some(_), None) => Some(Ordering::Greater),
        (Some(a), Some(b)) => a.iter().partial_cmp(b.iter()),
    }
}
