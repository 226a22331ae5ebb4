// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::pin::Pin;

use moveit::{MoveNew, MoveRef};

use crate::link::Link;
use crate::traits::{DefaultTag, ListElement, ListTag};

/// The link field of an element structure for the list identified via the tag `L`.
///
/// An element structure embeds one `ListEntry` per list it can be part of.
/// All of them behave exactly like a [`Link`]: a linked entry unlinks itself when dropped, and
/// moving it through [`MoveNew`] moves its position in the ring along with it.
#[repr(transparent)]
pub struct ListEntry<E: ListElement<L>, L: ListTag = DefaultTag> {
    pub(crate) link: Link,
    marker: PhantomData<*const (E, L)>,
}

impl<E, L> ListEntry<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    /// Creates an unlinked `ListEntry`.
    ///
    /// It is only linked when its element is inserted into a list.
    pub fn new() -> Self {
        Self {
            link: Link::new(),
            marker: PhantomData,
        }
    }

    /// Returns `true` if the element is currently part of a list via this entry.
    pub fn is_linked(&self) -> bool {
        self.link.is_linked()
    }

    /// Removes the element from the list it is part of via this entry.
    /// Does nothing if the entry is not linked.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// The neighbors of this entry must still be valid, which holds as long as they have not
    /// been moved without [`MoveNew`].
    pub unsafe fn unlink(&mut self) {
        if self.is_linked() {
            Link::remove(&mut self.link);
        }
    }

    /// Puts this entry at the position `other` has in its list, leaving `other` unlinked.
    ///
    /// If this entry is linked, it is removed from its list first.
    /// If `other` is not linked, both entries end up unlinked.
    ///
    /// This is the building block for implementing [`MoveNew`] for an element structure.
    ///
    /// This operation computes in *O*(*1*) time.
    ///
    /// # Safety
    ///
    /// The neighbors of both entries must still be valid.
    pub unsafe fn take_place_of(&mut self, other: &mut Self) {
        self.unlink();
        Link::relocate(&mut other.link, &mut self.link);
    }

    /// Returns a pointer to the element structure containing the given link.
    ///
    /// # Safety
    ///
    /// `link` must be the link of a `ListEntry<E, L>` embedded in an `E`.
    pub(crate) unsafe fn element_ptr(link: *const Link) -> *mut E {
        // This is the canonical implementation of `byte_sub`
        link.cast::<u8>().sub(E::offset()).cast::<E>() as *mut E
    }

    /// Returns the link of the `ListEntry<E, L>` embedded in the given element.
    pub(crate) fn link_ptr(element: &mut E) -> *mut Link {
        let element_ptr = element as *mut E;

        // This is the canonical implementation of `byte_add`
        unsafe { element_ptr.cast::<u8>().add(E::offset()).cast::<Link>() }
    }
}

impl<E, L> Default for ListEntry<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl<E, L> MoveNew for ListEntry<E, L>
where
    E: ListElement<L>,
    L: ListTag,
{
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let mut src = Pin::into_inner_unchecked(src);
        let this = Pin::into_inner_unchecked(this).write(Self::new());
        Link::relocate(&mut src.link, &mut this.link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListHead;
    use alloc::vec::Vec;
    use moveit::{moveit, new};

    #[derive(ListTag)]
    enum Pending {}

    #[derive(ListTag)]
    enum Everything {}

    #[derive(Default, ListElement)]
    struct Job {
        pending: ListEntry<Self, Pending>,
        id: u32,
        everything: ListEntry<Self, Everything>,
    }

    impl Job {
        fn new(id: u32) -> Self {
            Self {
                id,
                ..Default::default()
            }
        }
    }

    unsafe impl MoveNew for Job {
        unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
            let mut src = Pin::into_inner_unchecked(src);
            let this = Pin::into_inner_unchecked(this).write(Job::new(src.id));
            this.pending.take_place_of(&mut src.pending);
            this.everything.take_place_of(&mut src.everything);
        }
    }

    fn ids<L: ListTag>(list: Pin<&ListHead<Job, L>>) -> Vec<u32>
    where
        Job: ListElement<L>,
    {
        unsafe { list.iter().map(|job| job.id).collect() }
    }

    #[test]
    fn test_offsets_differ_per_tag() {
        let mut job = Job::new(1);
        let base = &mut job as *mut Job as usize;

        let pending = ListEntry::<Job, Pending>::link_ptr(&mut job) as usize;
        let everything = ListEntry::<Job, Everything>::link_ptr(&mut job) as usize;
        assert_ne!(pending, everything);
        assert_eq!(pending - base, <Job as ListElement<Pending>>::offset());
        assert_eq!(everything - base, <Job as ListElement<Everything>>::offset());

        unsafe {
            let recovered = ListEntry::<Job, Everything>::element_ptr(everything as *const Link);
            assert_eq!(recovered as usize, base);
        }
    }

    #[test]
    fn test_independent_roles() {
        moveit! {
            let mut pending = ListHead::<Job, Pending>::new();
            let mut everything = ListHead::<Job, Everything>::new();
        }

        let mut a = Job::new(1);
        let mut b = Job::new(2);
        let mut c = Job::new(3);

        unsafe {
            everything.as_mut().push_back(&mut a);
            everything.as_mut().push_back(&mut b);
            everything.as_mut().push_back(&mut c);

            pending.as_mut().push_back(&mut c);
            pending.as_mut().push_back(&mut a);
        }

        assert_eq!(ids(pending.as_ref()), [3, 1]);
        assert_eq!(ids(everything.as_ref()), [1, 2, 3]);

        // Unlinking one role leaves the other one untouched.
        unsafe {
            a.pending.unlink();
        }
        assert!(!a.pending.is_linked());
        assert!(a.everything.is_linked());
        assert!(!b.pending.is_linked());
        assert_eq!(ids(pending.as_ref()), [3]);
        assert_eq!(ids(everything.as_ref()), [1, 2, 3]);

        // Unlinking twice is fine.
        unsafe {
            a.pending.unlink();
        }
        assert_eq!(ids(pending.as_ref()), [3]);
    }

    #[test]
    fn test_drop_unlinks_all_roles() {
        moveit! {
            let mut pending = ListHead::<Job, Pending>::new();
            let mut everything = ListHead::<Job, Everything>::new();
        }

        let mut a = Job::new(1);
        let mut c = Job::new(3);

        unsafe {
            everything.as_mut().push_back(&mut a);

            {
                let mut b = Job::new(2);
                everything.as_mut().push_back(&mut b);
                pending.as_mut().push_back(&mut b);
                everything.as_mut().push_back(&mut c);
                pending.as_mut().push_back(&mut c);

                assert_eq!(ids(pending.as_ref()), [2, 3]);
                assert_eq!(ids(everything.as_ref()), [1, 2, 3]);
            }
        }

        assert_eq!(ids(pending.as_ref()), [3]);
        assert_eq!(ids(everything.as_ref()), [1, 3]);
        assert_eq!(unsafe { everything.as_ref().len() }, 2);
    }

    #[test]
    fn test_move_element() {
        moveit! {
            let mut pending = ListHead::<Job, Pending>::new();
            let mut everything = ListHead::<Job, Everything>::new();
        }

        let mut a = Job::new(1);
        let mut c = Job::new(3);

        moveit! {
            let mut b = new::of(Job::new(2));
        }

        unsafe {
            let b = b.as_mut().get_unchecked_mut();
            everything.as_mut().push_back(&mut a);
            everything.as_mut().push_back(&mut *b);
            everything.as_mut().push_back(&mut c);
            pending.as_mut().push_back(b);
        }

        moveit! {
            let moved = new::mov(b);
        }

        assert!(moved.pending.is_linked());
        assert!(moved.everything.is_linked());
        assert_eq!(ids(pending.as_ref()), [2]);
        assert_eq!(ids(everything.as_ref()), [1, 2, 3]);

        unsafe {
            let middle = everything.as_ref().iter().nth(1).unwrap();
            assert!(core::ptr::eq(middle, &*moved));
            assert!(core::ptr::eq(pending.as_ref().front().unwrap(), &*moved));
        }
    }
}
