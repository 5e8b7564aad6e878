//! Helpers for sets whose elements are primitive numbers.
//!
//! The set itself only ever sees bytes; these turn numbers into fixed-size elements and back, and
//! build a comparator that orders elements by numeric value rather than by raw bytes.

use std::cmp::Ordering;

use num_traits::ops::bytes::{FromBytes, ToBytes};
use num_traits::Zero;
use smallvec::SmallVec;

/// An encoded element. Wide enough for every primitive up to `u128` without spilling.
pub type Encoded = SmallVec<[u8; 16]>;

/// Native-endian bytes of `value`, ready to insert.
pub fn encode<T: ToBytes>(value: T) -> Encoded {
    SmallVec::from_slice(value.to_ne_bytes().as_ref())
}

/// Read an element back as a `T`. `None` if `bytes` is the wrong length for `T`.
pub fn decode<T>(bytes: &[u8]) -> Option<T>
where
    T: FromBytes + ToBytes<Bytes = <T as FromBytes>::Bytes> + Zero,
    <T as FromBytes>::Bytes: Sized,
{
    let mut buf = T::zero().to_ne_bytes();
    let dst = buf.as_mut();
    if dst.len() != bytes.len() {
        return None;
    }
    dst.copy_from_slice(bytes);
    Some(T::from_ne_bytes(&buf))
}

/// Comparator ordering elements by the numeric value of `T`. Elements that don't decode (wrong
/// length) fall back to byte order so the comparator stays total.
pub fn natural_order<T>() -> impl Fn(&[u8], &[u8]) -> Ordering + 'static
where
    T: FromBytes + ToBytes<Bytes = <T as FromBytes>::Bytes> + Zero + Ord + 'static,
    <T as FromBytes>::Bytes: Sized,
{
    |a: &[u8], b: &[u8]| match (decode::<T>(a), decode::<T>(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
