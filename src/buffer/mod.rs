//! Fixed-Capacity Circular Buffer
//!
//! `RingBuffer<T>` holds at most `capacity` elements in a fixed backing store.
//! Pushing into a full buffer overwrites the oldest element. Features:
//! - Logical indexing, oldest element first (position 0 is the front)
//! - Overwrite-on-full push that hands back the evicted element
//! - Explicit resize that keeps the newest elements
//! - Binary and text persistence (see [`crate::persist`])
//!
//! Element at logical position `i` lives in physical slot
//! `(tail + i) % capacity`. Slots outside the live window hold `None`.

mod iter;
mod serde_impl;

pub use iter::{IntoIter, Iter, IterMut};

use crate::errors::{BufferError, Result};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use tracing::{debug, trace};

pub struct RingBuffer<T> {
    storage: Box<[Option<T>]>,
    /// Slot the next push writes.
    head: usize,
    /// Slot of the oldest live element; meaningless while `count == 0`.
    tail: usize,
    count: usize,
}

impl<T> RingBuffer<T> {
    /// Create an empty buffer with room for `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                requested: capacity,
            });
        }

        Ok(Self {
            storage: allocate(capacity),
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    /// Like [`RingBuffer::new`], but allocation failure is an error instead
    /// of an abort. Used wherever the capacity comes from untrusted input.
    pub(crate) fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                requested: capacity,
            });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::CapacityTooLarge {
                requested: capacity,
            })?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            storage: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    /// Create a full buffer where every slot holds a copy of `value`.
    pub fn new_filled(capacity: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut buffer = Self::new(capacity)?;
        for _ in 0..capacity {
            buffer.push(value.clone());
        }
        Ok(buffer)
    }

    /// Create a full buffer whose capacity is the number of `items`.
    pub fn from_sequence<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        let mut buffer = Self::new(items.len())?;
        buffer.extend(items);
        Ok(buffer)
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    fn physical(&self, position: usize) -> usize {
        (self.tail + position) % self.capacity()
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }

    /// Element at logical position `index`, or `None` past the last live element.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            return None;
        }
        self.storage[self.physical(index)].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.count {
            return None;
        }
        let slot = self.physical(index);
        self.storage[slot].as_mut()
    }

    /// Bounds-checked access by logical position.
    ///
    /// The bound is the current length, not the capacity: once the buffer has
    /// wrapped, positions still count from the oldest element.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.count;
        self.get(index)
            .ok_or(BufferError::IndexOutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.count;
        self.get_mut(index)
            .ok_or(BufferError::IndexOutOfRange { index, len })
    }

    /// Oldest element.
    pub fn front(&self) -> Result<&T> {
        self.get(0).ok_or(BufferError::EmptyBuffer)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.get_mut(0).ok_or(BufferError::EmptyBuffer)
    }

    /// Newest element.
    pub fn back(&self) -> Result<&T> {
        self.count
            .checked_sub(1)
            .and_then(|last| self.get(last))
            .ok_or(BufferError::EmptyBuffer)
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.count.checked_sub(1) {
            Some(last) => self.get_mut(last).ok_or(BufferError::EmptyBuffer),
            None => Err(BufferError::EmptyBuffer),
        }
    }

    /// Append `value` as the newest element.
    ///
    /// When the buffer is already full the oldest element is overwritten and
    /// returned; otherwise the length grows by one and `None` is returned.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = self.storage[self.head].replace(value);

        if self.is_full() {
            self.tail = self.advance(self.tail);
            trace!(capacity = self.capacity(), "Overwrote oldest element");
        } else {
            self.count += 1;
        }
        self.head = self.advance(self.head);

        evicted
    }

    /// Build the new element from `args` and push it.
    pub fn emplace<A>(&mut self, args: A) -> Option<T>
    where
        T: From<A>,
    {
        self.push(T::from(args))
    }

    pub fn emplace_with<F>(&mut self, make: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        self.push(make())
    }

    /// Remove and return the oldest element.
    pub fn pop(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(BufferError::EmptyBuffer);
        }

        let value = self.storage[self.tail]
            .take()
            .ok_or(BufferError::EmptyBuffer)?;
        self.tail = self.advance(self.tail);
        self.count -= 1;

        Ok(value)
    }

    /// Drop every live element and rewind the cursors. The allocation is kept.
    pub fn clear(&mut self) {
        for slot in self.storage.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Change the capacity, keeping the newest `min(len, new_capacity)` elements.
    ///
    /// Kept elements are moved oldest-first into slots `0..kept` of a fresh
    /// store; excess elements are dropped from the front. Resizing to the
    /// current capacity leaves the buffer untouched.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                requested: new_capacity,
            });
        }

        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return Ok(());
        }

        let kept = self.count.min(new_capacity);
        let discarded = self.count - kept;
        let mut storage = allocate(new_capacity);
        for (offset, slot) in storage.iter_mut().take(kept).enumerate() {
            let index = self.physical(discarded + offset);
            *slot = self.storage[index].take();
        }

        self.storage = storage;
        self.tail = 0;
        self.count = kept;
        self.head = kept % new_capacity;

        debug!(
            from = old_capacity,
            to = new_capacity,
            kept,
            discarded,
            "Resized ring buffer"
        );
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let tail = self.tail;
        let first_end = (tail + self.count).min(self.capacity());
        let wrapped = tail + self.count - first_end;

        let (before_tail, from_tail) = self.storage.split_at_mut(tail);
        IterMut::new(&mut from_tail[..first_end - tail], &mut before_tail[..wrapped])
    }

    /// Clone the logical contents out, oldest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Raw `(head, tail)` cursors, as recorded in persisted headers.
    pub(crate) fn cursors(&self) -> (usize, usize) {
        (self.head, self.tail)
    }
}

fn allocate<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            head: self.head,
            tail: self.tail,
            count: self.count,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Buffers are equal when they share a capacity and the same logical sequence;
/// physical layout is ignored.
impl<T: PartialEq> PartialEq for RingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

impl<T: Hash> Hash for RingBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.capacity().hash(state);
        self.count.hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> TryFrom<Vec<T>> for RingBuffer<T> {
    type Error = BufferError;

    fn try_from(items: Vec<T>) -> Result<Self> {
        Self::from_sequence(items)
    }
}

impl<T, const N: usize> TryFrom<[T; N]> for RingBuffer<T> {
    type Error = BufferError;

    fn try_from(items: [T; N]) -> Result<Self> {
        Self::from_sequence(items)
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
