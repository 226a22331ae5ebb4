// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::marker::PhantomPinned;
use core::mem::MaybeUninit;
use core::pin::Pin;
use core::ptr;

use moveit::{MoveNew, MoveRef};

/// The untyped link pair embedded in every list entry and every list header.
///
/// A `Link` is either unlinked (both pointers null) or part of exactly one circular ring.
/// An empty list header forms a ring of its own (a self-loop).
///
/// Links are never copied, because two links can never share one position in a ring.
/// Moving a linked `Link` is only possible through [`MoveNew`], which patches both neighbors
/// to point to the new location and leaves the source unlinked.
/// When a linked `Link` is dropped, it first removes itself from its ring, so that no neighbor
/// ever points to freed memory.
#[derive(Debug)]
pub struct Link {
    pub(crate) prev: *mut Link,
    pub(crate) next: *mut Link,
    pin: PhantomPinned,
}

impl Link {
    /// Creates an unlinked `Link`.
    pub const fn new() -> Self {
        Self {
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
            pin: PhantomPinned,
        }
    }

    /// Returns `true` if this `Link` is currently part of a ring.
    pub fn is_linked(&self) -> bool {
        !self.next.is_null()
    }

    /// Makes `this` a ring of its own.
    pub(crate) unsafe fn tie(this: *mut Link) {
        (*this).prev = this;
        (*this).next = this;
    }

    /// Clears both pointers without touching any neighbor.
    pub(crate) unsafe fn reset(this: *mut Link) {
        (*this).prev = ptr::null_mut();
        (*this).next = ptr::null_mut();
    }

    /// Detaches `this` from its ring by connecting its neighbors directly to each other.
    ///
    /// Returns the link that followed `this`.
    ///
    /// This operation computes in *O*(*1*) time.
    pub(crate) unsafe fn remove(this: *mut Link) -> *mut Link {
        debug_assert!((*this).is_linked(), "removing an unlinked Link");

        let next = (*this).next;
        let prev = (*this).prev;
        (*prev).next = next;
        (*next).prev = prev;
        Self::reset(this);

        next
    }

    /// Links `node` immediately before `pos`.
    ///
    /// If `node` is currently part of a ring, it is removed from that ring first.
    /// `node` must not be `pos`.
    ///
    /// This operation computes in *O*(*1*) time.
    pub(crate) unsafe fn insert_before(pos: *mut Link, node: *mut Link) {
        debug_assert!(pos != node);

        if (*node).is_linked() {
            Self::remove(node);
        }

        let prev = (*pos).prev;
        (*node).prev = prev;
        (*node).next = pos;
        (*prev).next = node;
        (*pos).prev = node;
    }

    /// Makes `dst` take over the ring position of `src` and leaves `src` unlinked.
    ///
    /// A self-loop at `src` becomes a self-loop at `dst`.
    /// Whatever `dst` pointed to before is overwritten, so it must not be part of a ring
    /// with other links.
    ///
    /// This operation computes in *O*(*1*) time.
    pub(crate) unsafe fn relocate(src: *mut Link, dst: *mut Link) {
        let prev = (*src).prev;
        let next = (*src).next;

        if next.is_null() {
            Self::reset(dst);
            return;
        }

        if next == src {
            Self::tie(dst);
        } else {
            (*dst).prev = prev;
            (*dst).next = next;
            (*prev).next = dst;
            (*next).prev = dst;
        }

        Self::reset(src);
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        if self.is_linked() {
            unsafe {
                Self::remove(self);
            }
        }
    }
}

unsafe impl MoveNew for Link {
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let mut src = Pin::into_inner_unchecked(src);
        let this = Pin::into_inner_unchecked(this).write(Link::new());
        Self::relocate(&mut *src, this);

        // `src` is dropped here as an unlinked `Link`.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moveit::{moveit, new};

    /// Builds a ring out of the given links in the given order.
    unsafe fn ring(links: &[*mut Link]) {
        Link::tie(links[0]);
        for &link in &links[1..] {
            Link::insert_before(links[0], link);
        }
    }

    #[test]
    fn test_new_is_unlinked() {
        let link = Link::new();
        assert!(!link.is_linked());
        assert!(link.prev.is_null());
        assert!(link.next.is_null());
    }

    #[test]
    fn test_tie() {
        let mut link = Link::new();
        let ptr = &mut link as *mut Link;

        unsafe {
            Link::tie(ptr);
            assert!(link.is_linked());
            assert_eq!(link.prev, ptr);
            assert_eq!(link.next, ptr);

            // Removing the only member of a ring leaves it unlinked.
            assert_eq!(Link::remove(ptr), ptr);
        }

        assert!(!link.is_linked());
    }

    #[test]
    fn test_remove_returns_next() {
        let mut a = Link::new();
        let mut b = Link::new();
        let mut c = Link::new();
        let (a, b, c) = (&mut a as *mut Link, &mut b as *mut Link, &mut c as *mut Link);

        unsafe {
            ring(&[a, b, c]);

            assert_eq!(Link::remove(b), c);
            assert!(!(*b).is_linked());
            assert_eq!((*a).next, c);
            assert_eq!((*c).prev, a);
            assert_eq!((*c).next, a);
            assert_eq!((*a).prev, c);

            Link::remove(c);
            Link::remove(a);
        }
    }

    #[test]
    fn test_insert_before_relinks() {
        let mut a = Link::new();
        let mut b = Link::new();
        let mut c = Link::new();
        let (a, b, c) = (&mut a as *mut Link, &mut b as *mut Link, &mut c as *mut Link);

        unsafe {
            ring(&[a, b, c]);

            // Moving `c` before `b` detaches it from its old position first.
            Link::insert_before(b, c);
            assert_eq!((*a).next, c);
            assert_eq!((*c).next, b);
            assert_eq!((*b).next, a);
            assert_eq!((*a).prev, b);
            assert_eq!((*b).prev, c);
            assert_eq!((*c).prev, a);

            Link::remove(b);
            Link::remove(c);
            Link::remove(a);
        }
    }

    #[test]
    fn test_drop_repairs_ring() {
        let mut a = Link::new();
        let mut c = Link::new();
        let (a, c) = (&mut a as *mut Link, &mut c as *mut Link);

        unsafe {
            ring(&[a, c]);

            {
                let mut b = Link::new();
                Link::insert_before(c, &mut b);
                assert_eq!((*a).next, &mut b as *mut Link);
            }

            assert_eq!((*a).next, c);
            assert_eq!((*c).prev, a);

            Link::remove(c);
            Link::remove(a);
        }
    }

    #[test]
    fn test_move_linked() {
        let mut a = Link::new();
        let a = &mut a as *mut Link;

        moveit! {
            let mut b = new::of(Link::new());
        }

        unsafe {
            Link::tie(a);
            Link::insert_before(a, b.as_mut().get_unchecked_mut());
        }

        moveit! {
            let moved = new::mov(b);
        }

        let moved_ptr = &*moved as *const Link as *mut Link;
        assert!(moved.is_linked());

        unsafe {
            assert_eq!((*a).next, moved_ptr);
            assert_eq!((*a).prev, moved_ptr);
            assert_eq!(moved.next, a);
            assert_eq!(moved.prev, a);

            Link::remove(moved_ptr);
            assert_eq!((*a).next, a);
            Link::remove(a);
        }

        assert!(!moved.is_linked());
    }

    #[test]
    fn test_move_self_loop() {
        moveit! {
            let mut sentinel = new::of(Link::new());
        }

        unsafe {
            Link::tie(sentinel.as_mut().get_unchecked_mut());
        }

        moveit! {
            let moved = new::mov(sentinel);
        }

        let moved_ptr = &*moved as *const Link as *mut Link;
        assert_eq!(moved.next, moved_ptr);
        assert_eq!(moved.prev, moved_ptr);
    }

    #[test]
    fn test_move_unlinked() {
        moveit! {
            let link = new::of(Link::new());
            let moved = new::mov(link);
        }

        assert!(!moved.is_linked());
    }
}
