// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::pin::Pin;

use moveit::{new, MoveNew, MoveRef, New};

use super::cursor::{Cursor, CursorMut};
use super::entry::ListEntry;
use crate::link::Link;
use crate::traits::{DefaultTag, ListElement, ListTag};

/// The header of an intrusive doubly linked list of `E` elements, linked via their
/// `ListEntry<E, L>` fields.
///
/// The header contains a sentinel [`Link`] that forms a ring with the entries of all elements.
/// An empty list is a ring consisting of the sentinel alone.
/// The sentinel is also the end position of every [`Cursor`] and [`CursorMut`].
///
/// Elements must be allocated beforehand on a stable address and be valid as long as they are
/// part of the list.
/// As the Rust compiler cannot guarantee the validity of them, almost all `ListHead` functions
/// are `unsafe`.
/// The list never allocates or deallocates an element: dropping the header only unlinks all
/// remaining elements, and dropping an element only unlinks it from the list.
///
/// See the [module-level documentation](crate::list) for more details.
pub struct ListHead<E: ListElement<L>, L: ListTag = DefaultTag> {
    sentinel: Link,
    marker: PhantomData<*const (E, L)>,
}

impl<E, L> ListHead<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    /// Creates a new empty list.
    pub fn new() -> impl New<Output = Self> {
        new::of(Self {
            sentinel: Link::new(),
            marker: PhantomData,
        })
        .with(|this| unsafe {
            let this = this.get_unchecked_mut();
            Link::tie(&mut this.sentinel);
        })
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`.
    /// After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn append(mut self: Pin<&mut Self>, mut other: Pin<&mut Self>) {
        let pos = self.as_mut().end_mut().into();
        let first = other.as_mut().begin_mut().into();
        let last = other.as_mut().end_mut().into();
        self.splice(pos, first, last);
    }

    /// Provides a reference to the last element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn back(self: Pin<&Self>) -> Option<&E> {
        (!self.is_empty()).then(|| &*ListEntry::<E, L>::element_ptr(self.sentinel.prev))
    }

    /// Provides a mutable reference to the last element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn back_mut(self: Pin<&mut Self>) -> Option<&mut E> {
        (!self.as_ref().is_empty())
            .then(|| &mut *ListEntry::<E, L>::element_ptr(self.sentinel.prev))
    }

    /// Returns a cursor to the first element, or the end cursor if the list is empty.
    pub fn begin(self: Pin<&Self>) -> Cursor<E, L> {
        Cursor::new(self.sentinel.next, self.sentinel_ptr())
    }

    /// Returns a mutable cursor to the first element, or the end cursor if the list is empty.
    pub fn begin_mut(mut self: Pin<&mut Self>) -> CursorMut<E, L> {
        let end = self.as_mut().sentinel_mut_ptr();
        CursorMut::new(self.sentinel.next, end)
    }

    /// Removes all elements from the list.
    ///
    /// Every element is unlinked, but none of them is dropped.
    ///
    /// This operation computes in *O*(*n*) time, because every element entry needs to be
    /// reset to the unlinked state.
    pub fn clear(mut self: Pin<&mut Self>) {
        let end = self.as_mut().sentinel_mut_ptr();

        unsafe {
            while (*end).next != end {
                Link::remove((*end).next);
            }
        }
    }

    /// Returns the cursor pointing to the end of the list, which is the list header itself.
    pub fn end(self: Pin<&Self>) -> Cursor<E, L> {
        let end = self.sentinel_ptr();
        Cursor::new(end, end)
    }

    /// Returns the mutable cursor pointing to the end of the list, which is the list header
    /// itself.
    pub fn end_mut(self: Pin<&mut Self>) -> CursorMut<E, L> {
        let end = self.sentinel_mut_ptr();
        CursorMut::new(end, end)
    }

    /// Removes the element at `pos` from the list and returns a cursor to the element that
    /// followed it.
    ///
    /// The element itself is left untouched apart from its now unlinked entry.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// `pos` must be a valid cursor of this list and must not point to the end of it.
    pub unsafe fn erase(mut self: Pin<&mut Self>, pos: CursorMut<E, L>) -> CursorMut<E, L> {
        debug_assert!(!pos.is_end(), "erasing the end of a list");

        let next = Link::remove(pos.current);
        CursorMut::new(next, self.as_mut().sentinel_mut_ptr())
    }

    /// Provides a reference to the first element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn front(self: Pin<&Self>) -> Option<&E> {
        (!self.is_empty()).then(|| &*ListEntry::<E, L>::element_ptr(self.sentinel.next))
    }

    /// Provides a mutable reference to the first element, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn front_mut(self: Pin<&mut Self>) -> Option<&mut E> {
        (!self.as_ref().is_empty())
            .then(|| &mut *ListEntry::<E, L>::element_ptr(self.sentinel.next))
    }

    /// Links `element` immediately before `pos` and returns a cursor to it.
    ///
    /// If `element` is already part of a list with the same tag (this one or another one),
    /// it is removed from there first.
    /// If `pos` points to `element` or to its successor, the element already is at the
    /// requested position and nothing happens.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// `pos` must be a valid cursor of this list.
    /// `element` must stay at its address and outlive its membership in the list.
    pub unsafe fn insert(
        mut self: Pin<&mut Self>,
        pos: CursorMut<E, L>,
        element: &mut E,
    ) -> CursorMut<E, L> {
        let link = ListEntry::<E, L>::link_ptr(element);
        let end = self.as_mut().sentinel_mut_ptr();

        if link != pos.current && link != (*pos.current).prev {
            Link::insert_before(pos.current, link);
        }

        CursorMut::new(link, end)
    }

    /// Returns `true` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn is_empty(self: Pin<&Self>) -> bool {
        self.begin() == self.end()
    }

    /// Returns an iterator yielding references to each element of the list.
    pub unsafe fn iter(self: Pin<&Self>) -> Iter<E, L> {
        let head = self.get_ref();
        let flink = head.sentinel.next;
        let blink = head.sentinel.prev;

        Iter { head, flink, blink }
    }

    /// Returns an iterator yielding mutable references to each element of the list.
    pub unsafe fn iter_mut(self: Pin<&mut Self>) -> IterMut<E, L> {
        let head = self.get_unchecked_mut();
        let flink = head.sentinel.next;
        let blink = head.sentinel.prev;

        IterMut { head, flink, blink }
    }

    /// Counts all elements and returns the length of the list.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn len(self: Pin<&Self>) -> usize {
        self.iter().count()
    }

    /// Removes all elements from this list and then moves all elements of `other` into it.
    /// After this operation, `other` becomes empty.
    ///
    /// This is the move assignment counterpart to the [`MoveNew`] implementation.
    ///
    /// This operation computes in *O*(*n*) time for unlinking the previous elements of
    /// this list, and in *O*(*1*) time for taking over the elements of `other`.
    pub fn move_from(mut self: Pin<&mut Self>, mut other: Pin<&mut Self>) {
        self.as_mut().clear();

        let src = other.as_mut().sentinel_mut_ptr();
        let dst = self.as_mut().sentinel_mut_ptr();

        unsafe {
            Link::relocate(src, dst);
            Link::tie(src);
        }
    }

    /// Removes the last element from the list and returns it, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn pop_back(self: Pin<&mut Self>) -> Option<&mut E> {
        (!self.as_ref().is_empty()).then(|| {
            let link = self.sentinel.prev;
            Link::remove(link);
            &mut *ListEntry::<E, L>::element_ptr(link)
        })
    }

    /// Removes the first element from the list and returns it, or `None` if the list is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn pop_front(self: Pin<&mut Self>) -> Option<&mut E> {
        (!self.as_ref().is_empty()).then(|| {
            let link = self.sentinel.next;
            Link::remove(link);
            &mut *ListEntry::<E, L>::element_ptr(link)
        })
    }

    /// Appends an element to the back of the list.
    ///
    /// If the element is already part of a list with the same tag, it is moved from there.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// `element` must stay at its address and outlive its membership in the list.
    pub unsafe fn push_back(mut self: Pin<&mut Self>, element: &mut E) {
        let pos = self.as_mut().end_mut();
        self.insert(pos, element);
    }

    /// Appends an element to the front of the list.
    ///
    /// If the element is already part of a list with the same tag, it is moved from there.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// `element` must stay at its address and outlive its membership in the list.
    pub unsafe fn push_front(mut self: Pin<&mut Self>, element: &mut E) {
        let pos = self.as_mut().begin_mut();
        self.insert(pos, element);
    }

    /// Retains only the elements specified by the predicate, passing a mutable reference to it.
    ///
    /// In other words, unlink all elements `e` for which `f(&mut e)` returns `false`.
    /// This method operates in place, visiting each element exactly once in the original order,
    /// and preserves the order of the retained elements.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn retain<F>(mut self: Pin<&mut Self>, mut f: F)
    where
        F: FnMut(&mut E) -> bool,
    {
        let mut pos = self.as_mut().begin_mut();

        while let Some(element) = pos.get_mut() {
            if f(element) {
                pos.move_next();
            } else {
                pos = self.as_mut().erase(pos);
            }
        }
    }

    /// Moves the elements in the range `[first, last)` to the position immediately before `pos`.
    ///
    /// The range may belong to this list or to any other list with the same tag.
    /// It keeps its order, and the list it is taken from keeps the elements outside of it.
    /// An empty range does nothing.
    ///
    /// This operation computes in *O*(*1*) time, regardless of the length of the range.
    ///
    /// # Safety
    ///
    /// All cursors must be valid, `pos` must belong to this list, and `last` must be
    /// reachable from `first` by moving forward without passing the end of their list.
    /// `pos` must not lie within `[first, last)`, which is not checked.
    pub unsafe fn splice(
        self: Pin<&mut Self>,
        pos: Cursor<E, L>,
        first: Cursor<E, L>,
        last: Cursor<E, L>,
    ) {
        if first == last {
            return;
        }

        let pos = pos.current as *mut Link;
        let first = first.current as *mut Link;
        let last = last.current as *mut Link;
        let back = (*last).prev;

        // Close the gap left by the range.
        (*(*first).prev).next = last;
        (*last).prev = (*first).prev;

        // Mount the range before `pos`.
        (*(*pos).prev).next = first;
        (*first).prev = (*pos).prev;
        (*back).next = pos;
        (*pos).prev = back;
    }

    fn sentinel_ptr(self: Pin<&Self>) -> *const Link {
        &self.get_ref().sentinel
    }

    fn sentinel_mut_ptr(self: Pin<&mut Self>) -> *mut Link {
        unsafe { &mut self.get_unchecked_mut().sentinel }
    }
}

impl<E, L> Drop for ListHead<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn drop(&mut self) {
        let mut pinned = unsafe { Pin::new_unchecked(self) };

        // Leave no element pointing to us.
        pinned.as_mut().clear();
        unsafe {
            Link::reset(pinned.sentinel_mut_ptr());
        }
    }
}

unsafe impl<E, L> MoveNew for ListHead<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let mut src = Pin::into_inner_unchecked(src);
        let this = Pin::into_inner_unchecked(this).write(Self {
            sentinel: Link::new(),
            marker: PhantomData,
        });

        Link::relocate(&mut src.sentinel, &mut this.sentinel);
        Link::tie(&mut src.sentinel);

        // `src` is dropped here as an empty list.
    }
}

/// Iterator over the elements of a doubly linked list.
///
/// This iterator is returned from the [`ListHead::iter`] function.
pub struct Iter<'a, E: ListElement<L>, L: ListTag = DefaultTag> {
    head: &'a ListHead<E, L>,
    flink: *const Link,
    blink: *const Link,
}

impl<'a, E, L> Iter<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn terminate(&mut self) {
        self.flink = &self.head.sentinel;
        self.blink = self.flink;
    }
}

impl<'a, E, L> Iterator for Iter<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        if self.flink == &self.head.sentinel as *const Link {
            None
        } else {
            unsafe {
                let element = &*ListEntry::<E, L>::element_ptr(self.flink);

                if self.flink == self.blink {
                    // We are crossing the other end of the iterator and must not iterate any further.
                    self.terminate();
                } else {
                    self.flink = (*self.flink).next;
                }

                Some(element)
            }
        }
    }

    fn last(mut self) -> Option<&'a E> {
        self.next_back()
    }
}

impl<'a, E, L> DoubleEndedIterator for Iter<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn next_back(&mut self) -> Option<&'a E> {
        if self.blink == &self.head.sentinel as *const Link {
            None
        } else {
            unsafe {
                let element = &*ListEntry::<E, L>::element_ptr(self.blink);

                if self.blink == self.flink {
                    // We are crossing the other end of the iterator and must not iterate any further.
                    self.terminate();
                } else {
                    self.blink = (*self.blink).prev;
                }

                Some(element)
            }
        }
    }
}

impl<'a, E, L> FusedIterator for Iter<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}

/// Mutable iterator over the elements of a doubly linked list.
///
/// This iterator is returned from the [`ListHead::iter_mut`] function.
pub struct IterMut<'a, E: ListElement<L>, L: ListTag = DefaultTag> {
    head: &'a mut ListHead<E, L>,
    flink: *mut Link,
    blink: *mut Link,
}

impl<'a, E, L> IterMut<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn terminate(&mut self) {
        self.flink = &mut self.head.sentinel;
        self.blink = self.flink;
    }
}

impl<'a, E, L> Iterator for IterMut<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    type Item = &'a mut E;

    fn next(&mut self) -> Option<&'a mut E> {
        if self.flink == &mut self.head.sentinel as *mut Link {
            None
        } else {
            unsafe {
                let element = &mut *ListEntry::<E, L>::element_ptr(self.flink);

                if self.flink == self.blink {
                    // We are crossing the other end of the iterator and must not iterate any further.
                    self.terminate();
                } else {
                    self.flink = (*self.flink).next;
                }

                Some(element)
            }
        }
    }

    fn last(mut self) -> Option<&'a mut E> {
        self.next_back()
    }
}

impl<'a, E, L> DoubleEndedIterator for IterMut<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn next_back(&mut self) -> Option<&'a mut E> {
        if self.blink == &mut self.head.sentinel as *mut Link {
            None
        } else {
            unsafe {
                let element = &mut *ListEntry::<E, L>::element_ptr(self.blink);

                if self.blink == self.flink {
                    // We are crossing the other end of the iterator and must not iterate any further.
                    self.terminate();
                } else {
                    self.blink = (*self.blink).prev;
                }

                Some(element)
            }
        }
    }
}

impl<'a, E, L> FusedIterator for IterMut<'a, E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
}
