// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Intrusive doubly linked lists whose link fields live inside the elements.
//!
//! Inserting, removing and splicing elements never allocates and computes in *O*(*1*) time.
//! An element structure can be part of several lists at the same time by embedding one
//! [`ListEntry`] field per list, each one identified by an empty enum that serves as a tag.
//!
//! The lists never own their elements. They only manage the links between them.
//! Every linked entry unlinks itself when it is dropped, and every list header unlinks all of
//! its elements when it is dropped.
//!
//! None of the types in this crate are `Send` or `Sync`.
//! A list and its elements must only be accessed from a single thread at a time; sharing them
//! across threads requires external synchronization by the caller.
//!
//! See the [`list`] module for an example.
//!
//! [`ListEntry`]: crate::list::ListEntry

#![no_std]

#[cfg(test)]
extern crate alloc;

// Required for deriving our traits when testing.
#[cfg(test)]
extern crate self as tagged_list;

mod link;
pub mod list;
mod traits;

pub use link::Link;
pub use traits::*;

#[doc(hidden)]
pub mod __private {
    pub use memoffset::offset_of;
}
