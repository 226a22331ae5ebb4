// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::marker::PhantomData;

use super::entry::ListEntry;
use crate::link::Link;
use crate::traits::{DefaultTag, ListElement, ListTag};

/// A position in a list that only permits read access to the element at that position.
///
/// A cursor either points to an element or to the end of the list, which is the list header.
/// It can be moved in both directions, and moving past the end wraps around to the first
/// element.
///
/// Cursors don't borrow the list.
/// They stay valid as long as the link they point to is neither removed nor dropped, which is
/// why almost all functions taking or returning cursors are `unsafe`.
///
/// Two cursors are equal if they point to the same position, regardless of the list they were
/// obtained from.
pub struct Cursor<E: ListElement<L>, L: ListTag = DefaultTag> {
    pub(crate) current: *const Link,
    pub(crate) end: *const Link,
    marker: PhantomData<*const (E, L)>,
}

impl<E, L> Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    pub(crate) fn new(current: *const Link, end: *const Link) -> Self {
        Self {
            current,
            end,
            marker: PhantomData,
        }
    }

    /// Returns `true` if the cursor points to the end of the list it was obtained from.
    pub fn is_end(&self) -> bool {
        self.current == self.end
    }

    /// Returns a reference to the element at the cursor, or `None` if the cursor points to
    /// the end of the list.
    ///
    /// # Safety
    ///
    /// The cursor must be valid, and the element must not be mutated for `'a`.
    pub unsafe fn get<'a>(&self) -> Option<&'a E> {
        (!self.is_end()).then(|| self.get_unchecked())
    }

    /// Returns a reference to the element at the cursor without checking for the end of the
    /// list.
    ///
    /// # Safety
    ///
    /// The cursor must be valid and must not point to the end of the list, and the element
    /// must not be mutated for `'a`.
    pub unsafe fn get_unchecked<'a>(&self) -> &'a E {
        debug_assert!(!self.is_end(), "dereferencing the end of a list");
        &*ListEntry::<E, L>::element_ptr(self.current)
    }

    /// Moves the cursor to the next position.
    ///
    /// # Safety
    ///
    /// The cursor must be valid.
    pub unsafe fn move_next(&mut self) {
        self.current = (*self.current).next;
    }

    /// Moves the cursor to the previous position.
    ///
    /// # Safety
    ///
    /// The cursor must be valid.
    pub unsafe fn move_prev(&mut self) {
        self.current = (*self.current).prev;
    }
}

impl<E, L> Clone for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, L> Copy for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}

impl<E, L> PartialEq for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<E, L> Eq for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}

impl<E, L> fmt::Debug for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current)
            .field("end", &self.end)
            .finish()
    }
}

impl<E, L> From<CursorMut<E, L>> for Cursor<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn from(cursor: CursorMut<E, L>) -> Self {
        Self::new(cursor.current, cursor.end)
    }
}

/// A position in a list that permits mutable access to the element at that position.
///
/// This is the mutable counterpart of [`Cursor`], which it converts into.
/// There is no conversion in the other direction.
pub struct CursorMut<E: ListElement<L>, L: ListTag = DefaultTag> {
    pub(crate) current: *mut Link,
    pub(crate) end: *mut Link,
    marker: PhantomData<*mut (E, L)>,
}

impl<E, L> CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    pub(crate) fn new(current: *mut Link, end: *mut Link) -> Self {
        Self {
            current,
            end,
            marker: PhantomData,
        }
    }

    /// Returns `true` if the cursor points to the end of the list it was obtained from.
    pub fn is_end(&self) -> bool {
        self.current == self.end
    }

    /// Returns a reference to the element at the cursor, or `None` if the cursor points to
    /// the end of the list.
    ///
    /// # Safety
    ///
    /// The cursor must be valid, and the element must not be mutated for `'a`.
    pub unsafe fn get<'a>(&self) -> Option<&'a E> {
        (!self.is_end()).then(|| &*ListEntry::<E, L>::element_ptr(self.current))
    }

    /// Returns a mutable reference to the element at the cursor, or `None` if the cursor
    /// points to the end of the list.
    ///
    /// # Safety
    ///
    /// The cursor must be valid, and the element must not be accessed through any other
    /// reference for `'a`.
    pub unsafe fn get_mut<'a>(&mut self) -> Option<&'a mut E> {
        (!self.is_end()).then(|| self.get_unchecked_mut())
    }

    /// Returns a mutable reference to the element at the cursor without checking for the
    /// end of the list.
    ///
    /// # Safety
    ///
    /// The cursor must be valid and must not point to the end of the list, and the element
    /// must not be accessed through any other reference for `'a`.
    pub unsafe fn get_unchecked_mut<'a>(&mut self) -> &'a mut E {
        debug_assert!(!self.is_end(), "dereferencing the end of a list");
        &mut *ListEntry::<E, L>::element_ptr(self.current)
    }

    /// Moves the cursor to the next position.
    ///
    /// # Safety
    ///
    /// The cursor must be valid.
    pub unsafe fn move_next(&mut self) {
        self.current = (*self.current).next;
    }

    /// Moves the cursor to the previous position.
    ///
    /// # Safety
    ///
    /// The cursor must be valid.
    pub unsafe fn move_prev(&mut self) {
        self.current = (*self.current).prev;
    }
}

impl<E, L> Clone for CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, L> Copy for CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}

impl<E, L> PartialEq for CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<E, L> Eq for CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}

impl<E, L> fmt::Debug for CursorMut<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("current", &self.current)
            .field("end", &self.end)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListHead;
    use moveit::moveit;

    #[derive(Default, ListElement)]
    struct Number {
        entry: ListEntry<Self>,
        value: i32,
    }

    impl Number {
        fn new(value: i32) -> Self {
            Self {
                value,
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_walk_both_directions() {
        moveit! {
            let mut list = ListHead::<Number>::new();
        }

        let mut numbers = [Number::new(1), Number::new(2), Number::new(3)];

        unsafe {
            for number in numbers.iter_mut() {
                list.as_mut().push_back(number);
            }

            let mut cursor = list.as_ref().begin();
            assert_eq!(cursor.get().unwrap().value, 1);
            cursor.move_next();
            assert_eq!(cursor.get().unwrap().value, 2);
            cursor.move_next();
            assert_eq!(cursor.get_unchecked().value, 3);
            cursor.move_next();
            assert!(cursor.is_end());
            assert!(cursor.get().is_none());
            assert_eq!(cursor, list.as_ref().end());

            // Stepping back from the end yields the last element.
            cursor.move_prev();
            assert_eq!(cursor.get().unwrap().value, 3);
            cursor.move_prev();
            cursor.move_prev();
            assert_eq!(cursor, list.as_ref().begin());

            // Stepping back from the first element yields the end.
            cursor.move_prev();
            assert!(cursor.is_end());

            // And the ring continues with the first element again.
            cursor.move_next();
            assert_eq!(cursor.get().unwrap().value, 1);
        }
    }

    #[test]
    fn test_get_mut() {
        moveit! {
            let mut list = ListHead::<Number>::new();
        }

        let mut a = Number::new(1);
        let mut b = Number::new(2);

        unsafe {
            list.as_mut().push_back(&mut a);
            list.as_mut().push_back(&mut b);

            let mut cursor = list.as_mut().begin_mut();
            while let Some(number) = cursor.get_mut() {
                number.value *= 10;
                cursor.move_next();
            }

            assert_eq!(cursor, list.as_mut().end_mut());
        }

        assert_eq!(a.value, 10);
        assert_eq!(b.value, 20);
    }

    #[test]
    fn test_equality_is_identity() {
        moveit! {
            let mut list = ListHead::<Number>::new();
        }

        let mut a = Number::new(7);
        let mut b = Number::new(7);

        unsafe {
            list.as_mut().push_back(&mut a);
            list.as_mut().push_back(&mut b);

            let first = list.as_ref().begin();
            let mut second = first;
            second.move_next();

            // Equal values, but different positions.
            assert_eq!(first.get().unwrap().value, second.get().unwrap().value);
            assert_ne!(first, second);

            second.move_prev();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_mut_into_const() {
        moveit! {
            let mut list = ListHead::<Number>::new();
        }

        let mut a = Number::new(1);

        unsafe {
            list.as_mut().push_back(&mut a);

            let cursor_mut = list.as_mut().begin_mut();
            let cursor: Cursor<Number> = cursor_mut.into();
            assert_eq!(cursor, list.as_ref().begin());
            assert_eq!(cursor.get().unwrap().value, 1);
        }
    }
}
