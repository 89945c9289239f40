//! Arena-backed doubly linked list used for recency ordering.
//!
//! Nodes live in a slot vector and refer to their neighbours by [`Handle`]
//! (a slot index) instead of by pointer, so the list needs no `unsafe` and
//! handles can be stored in a hash index without creating a second owner.
//! Freed slots are recycled through a free list, which keeps the arena from
//! growing past the list capacity.
//!
//! ```text
//!   front (MRU)                                   back (LRU)
//!      │                                              │
//!      ▼                                              ▼
//!   ┌──────┐ next  ┌──────┐ next  ┌──────┐
//!   │slot 2│──────▶│slot 0│──────▶│slot 1│
//!   │      │◀──────│      │◀──────│      │
//!   └──────┘ prev  └──────┘ prev  └──────┘
//! ```

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

/// Opaque reference to a node in a [`List`].
///
/// A handle stays valid from the `add` that returned it until the node is
/// removed. After that the slot may be reused by a later `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

impl Handle {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// A node in the doubly linked list.
struct Node<T> {
    val: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// A doubly linked list of at most `cap` items stored in a slot arena.
///
/// New items are added at the front; the back holds the item that has gone
/// longest without being added or moved to the front.
pub(crate) struct List<T> {
    /// Maximum number of live nodes.
    cap: NonZeroUsize,
    /// Number of live nodes.
    len: usize,
    /// Node storage. `None` marks a vacant slot listed in `free`.
    slots: Vec<Option<Node<T>>>,
    /// Vacant slots available for reuse.
    free: Vec<Handle>,
    /// Most recently added or promoted node.
    front: Option<Handle>,
    /// Least recently added or promoted node.
    back: Option<Handle>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items.
    ///
    /// Slot storage is reserved up front so that filling the list never
    /// reallocates.
    pub(crate) fn new(cap: NonZeroUsize) -> List<T> {
        List {
            cap,
            len: 0,
            slots: Vec::with_capacity(cap.get()),
            free: Vec::new(),
            front: None,
            back: None,
        }
    }

    /// Returns the maximum number of items the list can hold.
    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the current number of items in the list.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the list is at capacity.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    /// Handle of the front (most recently used) node.
    #[inline]
    pub(crate) fn front(&self) -> Option<Handle> {
        self.front
    }

    /// Handle of the back (least recently used) node.
    #[inline]
    pub(crate) fn back(&self) -> Option<Handle> {
        self.back
    }

    fn node(&self, handle: Handle) -> Option<&Node<T>> {
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut Node<T>> {
        self.slots.get_mut(handle.index()).and_then(Option::as_mut)
    }

    /// Returns a reference to the value stored at `handle`.
    #[inline]
    pub(crate) fn get_value(&self, handle: Handle) -> Option<&T> {
        self.node(handle).map(|node| &node.val)
    }

    /// Returns a mutable reference to the value stored at `handle`.
    #[inline]
    pub(crate) fn get_value_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.node_mut(handle).map(|node| &mut node.val)
    }

    /// Adds a value at the front of the list.
    ///
    /// Returns the value back as `Err` when the list is already full.
    pub(crate) fn add(&mut self, val: T) -> Result<Handle, T> {
        if self.is_full() {
            return Err(val);
        }

        let node = Node {
            val,
            prev: None,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(handle) => {
                debug_assert!(self.slots[handle.index()].is_none(), "free slot in use");
                self.slots[handle.index()] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                Handle(self.slots.len() - 1)
            }
        };

        self.attach(handle);
        self.len += 1;
        Ok(handle)
    }

    /// Moves the node at `handle` to the front of the list.
    ///
    /// Returns false if `handle` does not refer to a live node.
    pub(crate) fn move_to_front(&mut self, handle: Handle) -> bool {
        if self.front == Some(handle) {
            return true;
        }
        if self.detach(handle).is_none() {
            return false;
        }
        self.attach(handle);
        true
    }

    /// Removes the node at `handle` and returns its value.
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<T> {
        self.detach(handle)?;
        let node = self.slots.get_mut(handle.index())?.take()?;
        self.free.push(handle);
        self.len -= 1;
        Some(node.val)
    }

    /// Removes the back node and returns its value.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let handle = self.back?;
        self.remove(handle)
    }

    /// Removes all nodes. Reserved slot storage is kept.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.front = None;
        self.back = None;
        self.len = 0;
    }

    /// Iterates from front to back.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.front,
            back: self.back,
            remaining: self.len,
        }
    }

    /// Unlinks the node at `handle` from its neighbours, leaving it in its slot.
    fn detach(&mut self, handle: Handle) -> Option<()> {
        let (prev, next) = {
            let node = self.node(handle)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev)?.next = next,
            None => self.front = next,
        }
        match next {
            Some(next) => self.node_mut(next)?.prev = prev,
            None => self.back = prev,
        }

        let node = self.node_mut(handle)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    /// Links an already-detached node in at the front.
    fn attach(&mut self, handle: Handle) {
        let old_front = self.front;
        if let Some(node) = self.node_mut(handle) {
            node.prev = None;
            node.next = old_front;
        }
        match old_front {
            Some(front) => {
                if let Some(node) = self.node_mut(front) {
                    node.prev = Some(handle);
                }
            }
            None => self.back = Some(handle),
        }
        self.front = Some(handle);
    }

    /// Walks the list in both directions and checks every link.
    #[cfg(test)]
    pub(crate) fn check_links(&self) {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.front;
        while let Some(handle) = cursor {
            let node = self.node(handle).expect("dangling handle");
            assert_eq!(node.prev, prev, "prev link mismatch");
            prev = Some(handle);
            cursor = node.next;
            count += 1;
            assert!(count <= self.len, "cycle in forward links");
        }
        assert_eq!(prev, self.back, "back anchor mismatch");
        assert_eq!(count, self.len, "forward walk length mismatch");

        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(live, self.len, "live slot count mismatch");
        assert_eq!(live + self.free.len(), self.slots.len(), "slot leak");
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.val)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}
