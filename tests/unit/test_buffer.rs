//! Behavioural scenarios for `RingBuffer`
//!
//! Covers construction, overwrite-on-full, logical indexing, resize and
//! value semantics (clone/move) through the public API.

use circbuf::{BufferError, RingBuffer};

fn pushed(capacity: usize, values: impl IntoIterator<Item = i32>) -> RingBuffer<i32> {
    let mut buffer = RingBuffer::new(capacity).unwrap();
    buffer.extend(values);
    buffer
}

// ============================================================================
// Construction
// ============================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_fresh_buffer_for_many_capacities() {
        for capacity in [1, 2, 3, 7, 64, 1000] {
            let buffer: RingBuffer<u64> = RingBuffer::new(capacity).unwrap();
            assert!(buffer.is_empty());
            assert!(!buffer.is_full());
            assert_eq!(buffer.len(), 0);
            assert_eq!(buffer.capacity(), capacity);
        }
    }

    #[test]
    fn test_filled_constructor() {
        let buffer = RingBuffer::new_filled(4, 7u8).unwrap();
        assert!(buffer.is_full());
        assert_eq!(buffer.to_vec(), vec![7, 7, 7, 7]);
    }

    #[test]
    fn test_sequence_constructor() {
        let buffer = RingBuffer::from_sequence(["a", "b", "c"]).unwrap();
        assert_eq!(buffer.capacity(), 3);
        assert!(buffer.is_full());
        assert_eq!(*buffer.front().unwrap(), "a");
        assert_eq!(*buffer.back().unwrap(), "c");
    }
}

// ============================================================================
// Overwrite and ordering
// ============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn test_exactly_capacity_pushes() {
        let buffer = pushed(6, 10..16);
        assert!(buffer.is_full());
        for (position, expected) in (10..16).enumerate() {
            assert_eq!(*buffer.at(position).unwrap(), expected);
        }
    }

    #[test]
    fn test_one_past_capacity_overwrites_oldest() {
        for capacity in 1..=8 {
            let buffer = pushed(capacity, 1..=(capacity as i32 + 1));
            assert_eq!(*buffer.front().unwrap(), 2);
            assert_eq!(buffer.to_vec(), (2..=(capacity as i32 + 1)).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_capacity_three_scenario() {
        let buffer = pushed(3, [1, 2, 3, 4]);
        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 3);
        assert_eq!(*buffer.front().unwrap(), 2);
        assert_eq!(*buffer.at(0).unwrap(), 2);
        assert_eq!(*buffer.at(1).unwrap(), 3);
        assert_eq!(*buffer.at(2).unwrap(), 4);
        assert_eq!(*buffer.back().unwrap(), 4);
    }

    #[test]
    fn test_capacity_one_scenario() {
        let buffer = pushed(1, [42, 99]);
        assert_eq!(*buffer.front().unwrap(), 99);
        assert_eq!(buffer.len(), 1);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_index_bounds_are_logical() {
        let buffer = pushed(5, 0..12);
        let last = buffer.len() - 1;
        assert_eq!(buffer.at(last).unwrap(), buffer.back().unwrap());
        assert!(matches!(
            buffer.at(buffer.len()),
            Err(BufferError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    #[test]
    fn test_interleaved_push_pop() {
        let mut buffer = pushed(3, [1, 2]);
        assert_eq!(buffer.pop().unwrap(), 1);
        buffer.extend([3, 4, 5]);
        assert_eq!(buffer.to_vec(), vec![3, 4, 5]);
        assert_eq!(buffer.pop().unwrap(), 3);
        buffer.push(6);
        assert_eq!(buffer.to_vec(), vec![4, 5, 6]);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut buffer = pushed(4, 0..9);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
        buffer.extend([1, 2]);
        assert_eq!(buffer.to_vec(), vec![1, 2]);
    }
}

// ============================================================================
// Resize
// ============================================================================

mod resize_tests {
    use super::*;

    #[test]
    fn test_grow_preserves_everything() {
        let mut buffer = pushed(4, 1..=6);
        let before = buffer.to_vec();
        buffer.resize(10).unwrap();
        assert_eq!(buffer.to_vec(), before);
        assert_eq!(buffer.capacity(), 10);
        assert!(!buffer.is_full());
    }

    #[test]
    fn test_shrink_keeps_most_recent_window() {
        let mut buffer = pushed(6, 1..=6);
        buffer.resize(4).unwrap();
        assert_eq!(buffer.to_vec(), vec![3, 4, 5, 6]);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_shrink_above_len_keeps_all() {
        let mut buffer = pushed(8, [1, 2]);
        buffer.resize(3).unwrap();
        assert_eq!(buffer.to_vec(), vec![1, 2]);
        buffer.extend([3, 4]);
        assert_eq!(buffer.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn test_resize_empty_buffer() {
        let mut buffer: RingBuffer<i32> = RingBuffer::new(2).unwrap();
        buffer.resize(5).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 5);
    }
}

// ============================================================================
// Value semantics
// ============================================================================

mod value_semantics_tests {
    use super::*;

    #[test]
    fn test_clone_matches_then_diverges() {
        let mut original = pushed(3, [100, 200]);
        let mut copy = original.clone();
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.capacity(), 3);
        assert_eq!(*copy.front().unwrap(), 100);
        assert_eq!(copy[1], 200);

        copy.push(300);
        copy.push(400);
        original.clear();
        assert!(original.is_empty());
        assert_eq!(copy.to_vec(), vec![200, 300, 400]);
    }

    #[test]
    fn test_move_and_reassign() {
        let mut source = pushed(3, [50, 60]);
        let target = std::mem::replace(&mut source, RingBuffer::new(1).unwrap());
        assert_eq!(target.to_vec(), vec![50, 60]);
        assert_eq!(target.capacity(), 3);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 1);
    }

    #[test]
    fn test_owned_elements_are_dropped_on_overwrite() {
        use std::rc::Rc;

        let tracked = Rc::new(());
        let mut buffer = RingBuffer::new(2).unwrap();
        buffer.push(Rc::clone(&tracked));
        buffer.push(Rc::clone(&tracked));
        assert_eq!(Rc::strong_count(&tracked), 3);

        drop(buffer.push(Rc::new(())));
        assert_eq!(Rc::strong_count(&tracked), 2);

        buffer.clear();
        assert_eq!(Rc::strong_count(&tracked), 1);
    }
}
