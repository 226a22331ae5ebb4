// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! An intrusive doubly linked list with tagged entries.
//!
//! To make this list type-safe, `tagged-list` first asks you to declare an empty enum, which then
//! serves as the `L` type parameter to distinguish different lists.
//! A list element can be part of multiple lists by having multiple entry fields in the element
//! structure.
//! You need to declare an empty enum for every entry field of every element structure.
//! Elements that are only part of a single list can omit the tag and use [`DefaultTag`].
//!
//! ```
//! # use tagged_list::ListTag;
//! #[derive(ListTag)]
//! enum Runnable {}
//! ```
//!
//! Next you define your element structure, adding a [`ListEntry`] field for each list you want
//! your element to be part of, and derive [`ListElement`] to register the entry fields:
//!
//! ```
//! # use tagged_list::{ListElement, ListTag};
//! # use tagged_list::list::ListEntry;
//! # #[derive(ListTag)]
//! # enum Runnable {}
//! #[derive(Default, ListElement)]
//! struct Thread {
//!     runnable: ListEntry<Self, Runnable>,
//!     id: u32,
//! }
//! ```
//!
//! You can then manage that list using [`ListHead`].
//! The list header is pinned on the stack via [`moveit`](moveit::moveit), and the elements stay
//! owned by you:
//!
//! ```
//! # use tagged_list::{ListElement, ListTag};
//! # use tagged_list::list::{ListEntry, ListHead};
//! # use moveit::moveit;
//! # #[derive(ListTag)]
//! # enum Runnable {}
//! # #[derive(Default, ListElement)]
//! # struct Thread {
//! #     runnable: ListEntry<Self, Runnable>,
//! #     id: u32,
//! # }
//! moveit! {
//!     let mut queue = ListHead::<Thread, Runnable>::new();
//! }
//!
//! let mut first = Thread { id: 1, ..Default::default() };
//! let mut second = Thread { id: 2, ..Default::default() };
//!
//! unsafe {
//!     queue.as_mut().push_back(&mut first);
//!     queue.as_mut().push_back(&mut second);
//!     assert_eq!(queue.as_ref().front().unwrap().id, 1);
//!
//!     // Pushing a linked element moves it.
//!     queue.as_mut().push_back(&mut first);
//!     assert_eq!(queue.as_ref().front().unwrap().id, 2);
//! }
//!
//! // Dropping an element unlinks it.
//! drop(second);
//! assert_eq!(unsafe { queue.as_ref().len() }, 1);
//! ```
//!
//! The list never owns its elements.
//! It requires them to be allocated beforehand on a stable address and be valid as long as they
//! are part of the list.
//! The Rust compiler cannot guarantee this, which is why almost all [`ListHead`] functions are
//! `unsafe`.
//! What the crate does guarantee is that dropping a linked element removes it from its list, and
//! dropping a list header unlinks all of its elements.
//!
//! Tags are checked at compile time.
//! An element without an entry for a list's tag cannot be used with that list:
//!
//! ```compile_fail
//! # use tagged_list::{ListElement, ListTag};
//! # use tagged_list::list::{ListEntry, ListHead};
//! # use moveit::moveit;
//! #[derive(ListTag)]
//! enum Runnable {}
//!
//! #[derive(ListTag)]
//! enum Blocked {}
//!
//! #[derive(Default, ListElement)]
//! struct Thread {
//!     runnable: ListEntry<Self, Runnable>,
//! }
//!
//! moveit! {
//!     let mut blocked = ListHead::<Thread, Blocked>::new();
//! }
//! ```
//!
//! [`DefaultTag`]: crate::DefaultTag
//! [`ListElement`]: crate::ListElement

mod base;
mod cursor;
mod entry;

pub use base::*;
pub use cursor::*;
pub use entry::*;
