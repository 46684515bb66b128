//! Dialect definitions.
//!
//! A dialect is a set of typed op views plus a `register` function that
//! installs their descriptors in a [`Context`](crate::Context).

pub mod standard;
