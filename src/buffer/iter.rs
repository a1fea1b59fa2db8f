use super::RingBuffer;
use std::iter::FusedIterator;
use std::slice;

/// Forward cursor over logical positions, oldest first.
///
/// Each step goes through [`RingBuffer::at`], so the cursor never caches a
/// physical offset. The range visited is fixed when the iterator is created.
pub struct Iter<'a, T> {
    buffer: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(buffer: &'a RingBuffer<T>) -> Self {
        Self {
            buffer,
            front: 0,
            back: buffer.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buffer.at(self.front).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buffer.at(self.back).ok()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iteration, oldest first.
///
/// Built from the two contiguous runs of the live window: `tail..` up to the
/// physical end, then the wrapped part from slot 0.
pub struct IterMut<'a, T> {
    first: slice::IterMut<'a, Option<T>>,
    second: slice::IterMut<'a, Option<T>>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(first: &'a mut [Option<T>], second: &'a mut [Option<T>]) -> Self {
        Self {
            first: first.iter_mut(),
            second: second.iter_mut(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.first
            .next()
            .or_else(|| self.second.next())
            .and_then(Option::as_mut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.first.len() + self.second.len();
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.second
            .next_back()
            .or_else(|| self.first.next_back())
            .and_then(Option::as_mut)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator; drains the buffer from the front.
pub struct IntoIter<T> {
    buffer: RingBuffer<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(buffer: RingBuffer<T>) -> Self {
        Self { buffer }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buffer.len(), Some(self.buffer.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
