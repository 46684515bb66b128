//! Index-based iteration over operands and results.
//!
//! [`IndexedAccessorIter`] holds an object reference and an index, and
//! dereferences by calling a per-index accessor on the object instead of
//! walking a cached slice. Moving the iterator changes the index only; the
//! object stays fixed.
//!
//! Comparing or subtracting iterators over different objects is a contract
//! violation: it panics in debug builds and yields an unspecified answer in
//! release builds.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::operation::Operation;
use crate::refs::ValueRef;

/// Per-index access into an object, e.g. "the i-th operand".
pub trait IndexedAccessor<O: ?Sized> {
    type Item;

    fn count(object: &O) -> usize;
    fn get(object: &O, index: usize) -> Self::Item;
}

/// Accessor for [`Operation::operand`].
pub enum OperandAccess {}

/// Accessor for [`Operation::result`].
pub enum ResultAccess {}

impl<'ctx, O: Operation<'ctx> + ?Sized> IndexedAccessor<O> for OperandAccess {
    type Item = ValueRef;

    fn count(object: &O) -> usize {
        object.num_operands()
    }

    fn get(object: &O, index: usize) -> ValueRef {
        object.operand(index)
    }
}

impl<'ctx, O: Operation<'ctx> + ?Sized> IndexedAccessor<O> for ResultAccess {
    type Item = ValueRef;

    fn count(object: &O) -> usize {
        object.num_results()
    }

    fn get(object: &O, index: usize) -> ValueRef {
        object.result(index)
    }
}

pub type OperandIter<'a, O> = IndexedAccessorIter<'a, O, OperandAccess>;
pub type ResultIter<'a, O> = IndexedAccessorIter<'a, O, ResultAccess>;

/// Random-access cursor `(object, index)` that also iterates up to the
/// object's element count at construction time.
pub struct IndexedAccessorIter<'a, O: ?Sized, A> {
    object: &'a O,
    index: usize,
    end: usize,
    _accessor: PhantomData<fn() -> A>,
}

impl<'a, O: ?Sized, A: IndexedAccessor<O>> IndexedAccessorIter<'a, O, A> {
    /// Cursor at `index`, iterating up to the current element count.
    pub fn new(object: &'a O, index: usize) -> Self {
        Self {
            object,
            index,
            end: A::count(object),
            _accessor: PhantomData,
        }
    }

    pub fn begin(object: &'a O) -> Self {
        Self::new(object, 0)
    }

    pub fn end(object: &'a O) -> Self {
        Self::new(object, A::count(object))
    }

    /// Element at the cursor position.
    pub fn get(&self) -> A::Item {
        A::get(self.object, self.index)
    }
}

impl<'a, O: ?Sized, A> IndexedAccessorIter<'a, O, A> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn object(&self) -> &'a O {
        self.object
    }

    fn same_object(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.object, other.object)
    }

    fn offset(&mut self, offset: isize) {
        let index = self.index as isize + offset;
        debug_assert!(index >= 0, "iterator moved before index 0");
        self.index = index as usize;
    }
}

impl<O: ?Sized, A> Clone for IndexedAccessorIter<'_, O, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized, A> Copy for IndexedAccessorIter<'_, O, A> {}

impl<O: ?Sized, A> fmt::Debug for IndexedAccessorIter<'_, O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedAccessorIter")
            .field("object", &(self.object as *const O as *const ()))
            .field("index", &self.index)
            .field("end", &self.end)
            .finish()
    }
}

impl<O: ?Sized, A> PartialEq for IndexedAccessorIter<'_, O, A> {
    fn eq(&self, other: &Self) -> bool {
        self.same_object(other) && self.index == other.index
    }
}

impl<O: ?Sized, A> Eq for IndexedAccessorIter<'_, O, A> {}

impl<O: ?Sized, A> PartialOrd for IndexedAccessorIter<'_, O, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        debug_assert!(self.same_object(other), "incompatible iterators");
        Some(self.index.cmp(&other.index))
    }
}

impl<O: ?Sized, A> Sub for IndexedAccessorIter<'_, O, A> {
    type Output = isize;

    fn sub(self, rhs: Self) -> isize {
        debug_assert!(self.same_object(&rhs), "incompatible iterators");
        self.index as isize - rhs.index as isize
    }
}

impl<O: ?Sized, A> AddAssign<isize> for IndexedAccessorIter<'_, O, A> {
    fn add_assign(&mut self, offset: isize) {
        self.offset(offset);
    }
}

impl<O: ?Sized, A> SubAssign<isize> for IndexedAccessorIter<'_, O, A> {
    fn sub_assign(&mut self, offset: isize) {
        self.offset(-offset);
    }
}

impl<O: ?Sized, A> Add<isize> for IndexedAccessorIter<'_, O, A> {
    type Output = Self;

    fn add(mut self, offset: isize) -> Self {
        self.offset(offset);
        self
    }
}

impl<O: ?Sized, A: IndexedAccessor<O>> Iterator for IndexedAccessorIter<'_, O, A> {
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        if self.index >= self.end {
            return None;
        }
        let item = A::get(self.object, self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end.saturating_sub(self.index);
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<A::Item> {
        self.index = self.index.saturating_add(n).min(self.end);
        self.next()
    }
}

impl<O: ?Sized, A: IndexedAccessor<O>> DoubleEndedIterator for IndexedAccessorIter<'_, O, A> {
    fn next_back(&mut self) -> Option<A::Item> {
        if self.index >= self.end {
            return None;
        }
        self.end -= 1;
        Some(A::get(self.object, self.end))
    }
}

impl<O: ?Sized, A: IndexedAccessor<O>> ExactSizeIterator for IndexedAccessorIter<'_, O, A> {}

impl<O: ?Sized, A: IndexedAccessor<O>> FusedIterator for IndexedAccessorIter<'_, O, A> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares(usize);

    enum SquareAccess {}

    impl IndexedAccessor<Squares> for SquareAccess {
        type Item = usize;

        fn count(object: &Squares) -> usize {
            object.0
        }

        fn get(object: &Squares, index: usize) -> usize {
            assert!(index < object.0, "index out of range");
            index * index
        }
    }

    type SquareIter<'a> = IndexedAccessorIter<'a, Squares, SquareAccess>;

    #[test]
    fn walks_every_index_through_the_accessor() {
        let squares = Squares(4);
        let items: Vec<_> = SquareIter::begin(&squares).collect();
        assert_eq!(items, [0, 1, 4, 9]);
        assert_eq!(SquareIter::begin(&squares).len(), 4);
        assert_eq!(SquareIter::end(&squares).next(), None);
    }

    #[test]
    fn arithmetic_moves_index_only() {
        let squares = Squares(5);
        let begin = SquareIter::begin(&squares);
        let end = SquareIter::end(&squares);
        assert_eq!(end - begin, 5);

        let mut it = begin;
        it += 3;
        assert_eq!(it.index(), 3);
        assert_eq!(it.get(), 9);
        assert!(std::ptr::eq(it.object(), &squares));
        it -= 1;
        assert_eq!(it.get(), 4);
        assert_eq!(it, begin + 2);
        assert!(begin < it);
        assert_eq!(begin - it, -2);
    }

    #[test]
    fn equality_requires_same_object() {
        let a = Squares(3);
        let b = Squares(3);
        assert_eq!(SquareIter::begin(&a), SquareIter::new(&a, 0));
        assert_ne!(SquareIter::begin(&a), SquareIter::begin(&b));
    }

    #[test]
    fn reversible_and_restartable() {
        let squares = Squares(3);
        let rev: Vec<_> = SquareIter::begin(&squares).rev().collect();
        assert_eq!(rev, [4, 1, 0]);
        let again: Vec<_> = SquareIter::begin(&squares).collect();
        assert_eq!(again, [0, 1, 4]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "incompatible iterators")]
    fn difference_across_objects_panics_in_debug() {
        let a = Squares(3);
        let b = Squares(3);
        let _ = SquareIter::end(&a) - SquareIter::begin(&b);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "incompatible iterators")]
    fn ordering_across_objects_panics_in_debug() {
        let a = Squares(3);
        let b = Squares(3);
        let _ = SquareIter::begin(&a) < SquareIter::begin(&b);
    }
}
