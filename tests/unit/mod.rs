//! Unit tests for circbuf's public API
//!
//! These tests exercise the buffer contract and persistence through the
//! crate's public surface only.

mod test_buffer;
mod test_persistence;
