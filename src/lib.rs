//! circbuf - Fixed-Capacity Circular Buffer
//!
//! A generic ring buffer that holds at most `capacity` elements and
//! overwrites the oldest one when pushed beyond that.
//!
//! - **Access**: front/back and logical-position indexing, oldest first
//! - **Modifiers**: push (overwrite-on-full), emplace, pop, clear, resize
//! - **Persistence**: binary (fixed-width records) and text encodings
//! - **Iteration**: restartable cursors over logical positions
//!
//! # Quick Start
//!
//! ```
//! use circbuf::RingBuffer;
//!
//! let mut buffer = RingBuffer::new(3)?;
//! for i in 1..=4 {
//!     buffer.push(i);
//! }
//! assert!(buffer.is_full());
//! assert_eq!(*buffer.front()?, 2);
//! assert_eq!(buffer.to_vec(), vec![2, 3, 4]);
//! # Ok::<(), circbuf::BufferError>(())
//! ```

// ─── Core ──────────────────────────────────────────────────────────
pub mod buffer;
pub mod errors;
pub mod persist;

// ─── Binary support ────────────────────────────────────────────────
pub mod cli;
pub mod config;
pub mod demo;
pub mod telemetry;

pub use buffer::RingBuffer;
pub use errors::{BufferError, PersistenceError, Result};
pub use persist::FixedCodec;
