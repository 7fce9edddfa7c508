//! Sequences with a minimum length.
//!
//! Tuples need at least two components and clause lists at least one. The
//! bound is checked once, when the sequence is built or deserialized, so
//! consumers never see a short sequence.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;

/// Two or more elements, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Many<T>(Vec<T>);

/// One or more elements, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmpty<T>(Vec<T>);

impl<T> Many<T> {
    /// Returns the elements back when there are fewer than two.
    pub fn new(items: Vec<T>) -> Result<Self, Vec<T>> {
        if items.len() >= 2 {
            Ok(Many(items))
        } else {
            Err(items)
        }
    }

    pub fn pair(first: T, second: T) -> Self {
        Many(vec![first, second])
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Apply `f` to each element; the length cannot change.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Many<U> {
        Many(self.0.into_iter().map(f).collect())
    }

    /// Like [`Many::map`], stopping at the first error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Many<U>, E> {
        self.0.into_iter().map(f).collect::<Result<_, _>>().map(Many)
    }
}

impl<T> NonEmpty<T> {
    /// Returns `None` for an empty vector.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() { None } else { Some(NonEmpty(items)) }
    }

    pub fn singleton(item: T) -> Self {
        NonEmpty(vec![item])
    }

    pub fn first(&self) -> &T {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> NonEmpty<U> {
        NonEmpty(self.0.into_iter().map(f).collect())
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<NonEmpty<U>, E> {
        self.0.into_iter().map(f).collect::<Result<_, _>>().map(NonEmpty)
    }
}

impl<T> Deref for Many<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Deref for NonEmpty<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a Many<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a, T> IntoIterator for &'a NonEmpty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> IntoIterator for Many<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> IntoIterator for NonEmpty<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Serialize> Serialize for Many<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Many<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        let found = items.len();
        Many::new(items).map_err(|_| {
            serde::de::Error::custom(format!("expected at least 2 elements, found {found}"))
        })
    }
}

impl<T: Serialize> Serialize for NonEmpty<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NonEmpty<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        NonEmpty::new(items).ok_or_else(|| serde::de::Error::custom("expected at least 1 element"))
    }
}
