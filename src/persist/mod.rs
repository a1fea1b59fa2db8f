//! Buffer Persistence
//!
//! Two interchangeable encodings of the same logical content:
//! - Binary: four native-endian `usize` header fields, then fixed-width records
//! - Text: a `capacity count head tail` line, then the elements on one line
//!
//! Both record elements oldest-first. The stored `head`/`tail` describe the
//! writer's physical layout and are not trusted on load: a loaded buffer is
//! always rebuilt with `tail = 0` and `head = count % capacity`.
//!
//! Neither format carries a magic number, version or endianness marker, so
//! binary files are only readable on platforms with the same `usize` width
//! and byte order.

mod binary;
mod text;

pub use binary::FixedCodec;

use crate::buffer::RingBuffer;
use crate::errors::{BufferError, PersistenceError, Result};
use std::io;
use tracing::warn;

/// Upper bound on records reserved up front; a header's count is untrusted.
const PREALLOC_LIMIT: usize = 4096;

/// The four header fields shared by both encodings, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub capacity: usize,
    pub count: usize,
    pub head: usize,
    pub tail: usize,
}

impl Header {
    pub fn of<T>(buffer: &RingBuffer<T>) -> Self {
        let (head, tail) = buffer.cursors();
        Self {
            capacity: buffer.capacity(),
            count: buffer.len(),
            head,
            tail,
        }
    }

    /// Reject headers no buffer could have produced.
    ///
    /// Inconsistent cursors are only reported, since they are discarded anyway.
    pub fn validate(&self) -> std::result::Result<(), PersistenceError> {
        if self.capacity == 0 {
            return Err(PersistenceError::Malformed(
                "declared capacity is 0".to_string(),
            ));
        }
        if self.count > self.capacity {
            return Err(PersistenceError::Malformed(format!(
                "declared count {} exceeds capacity {}",
                self.count, self.capacity
            )));
        }

        let cursors_in_range = self.head < self.capacity && self.tail < self.capacity;
        if !cursors_in_range
            || (self.count > 0 && self.head != (self.tail + self.count) % self.capacity)
        {
            warn!(
                capacity = self.capacity,
                count = self.count,
                head = self.head,
                tail = self.tail,
                "Stored cursors are inconsistent; rebuilding layout from count"
            );
        }
        Ok(())
    }
}

/// Build a buffer from a validated header and its elements, oldest first.
fn rebuild<T>(header: &Header, items: Vec<T>) -> Result<RingBuffer<T>> {
    let mut buffer = RingBuffer::try_new(header.capacity).map_err(|e| match e {
        BufferError::CapacityTooLarge { requested } => BufferError::from(
            PersistenceError::Malformed(format!(
                "declared capacity {requested} cannot be allocated"
            )),
        ),
        other => other,
    })?;
    buffer.extend(items);
    Ok(buffer)
}

/// Classify a read failure: running out of input mid-body is truncation.
fn read_error(e: io::Error, expected: usize, found: usize) -> PersistenceError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => PersistenceError::Truncated { expected, found },
        io::ErrorKind::InvalidData => PersistenceError::Malformed(e.to_string()),
        _ => PersistenceError::Io(e),
    }
}
