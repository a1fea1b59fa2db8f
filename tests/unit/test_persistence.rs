//! File-level persistence tests
//!
//! Round-trips through both encodings on disk, plus the in-place loaders.

use circbuf::{BufferError, PersistenceError, RingBuffer};
use std::fs;
use tempfile::tempdir;

fn wrapped() -> RingBuffer<i32> {
    let mut buffer = RingBuffer::new(4).unwrap();
    buffer.extend([100, 200, 300, 400, 500, 600]);
    buffer.pop().unwrap();
    buffer
}

fn assert_same_logical_content(a: &RingBuffer<i32>, b: &RingBuffer<i32>) {
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.front().unwrap(), b.front().unwrap());
    assert_eq!(a.back().unwrap(), b.back().unwrap());
    for position in 0..a.len() {
        assert_eq!(a.at(position).unwrap(), b.at(position).unwrap());
    }
}

mod binary_file_tests {
    use super::*;

    #[test]
    fn test_binary_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        let original = wrapped();

        original.save_binary(&path).unwrap();
        let loaded = RingBuffer::<i32>::load_binary(&path).unwrap();
        assert_same_logical_content(&original, &loaded);
    }

    #[test]
    fn test_binary_file_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        wrapped().save_binary(&path).unwrap();

        let expected = 4 * std::mem::size_of::<usize>() + 3 * std::mem::size_of::<i32>();
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, expected);
    }

    #[test]
    fn test_load_into_replaces_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        wrapped().save_binary(&path).unwrap();

        let mut target: RingBuffer<i32> = RingBuffer::new(1).unwrap();
        target.push(-1);
        target.load_binary_into(&path).unwrap();
        assert_eq!(target.capacity(), 4);
        assert_eq!(target.to_vec(), vec![400, 500, 600]);
    }

    #[test]
    fn test_failed_load_into_leaves_target_untouched() {
        let dir = tempdir().unwrap();
        let mut target: RingBuffer<i32> = RingBuffer::new(2).unwrap();
        target.extend([1, 2]);

        let result = target.load_binary_into(dir.path().join("missing.bin"));
        assert!(matches!(
            result,
            Err(BufferError::Persistence(PersistenceError::Open { .. }))
        ));
        assert_eq!(target.to_vec(), vec![1, 2]);
        assert_eq!(target.capacity(), 2);
    }

    #[test]
    fn test_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.bin");
        wrapped().save_binary(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        let err = RingBuffer::<i32>::load_binary(&path).unwrap_err();
        assert!(matches!(
            err,
            BufferError::Persistence(PersistenceError::Truncated {
                expected: 3,
                found: 2
            })
        ));
    }
}

mod text_file_tests {
    use super::*;

    #[test]
    fn test_text_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.txt");
        let original = wrapped();

        original.save_text(&path).unwrap();
        let loaded = RingBuffer::<i32>::load_text(&path).unwrap();
        assert_same_logical_content(&original, &loaded);
    }

    #[test]
    fn test_text_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.txt");
        wrapped().save_text(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("4 3 2 3"));
        assert_eq!(lines.next(), Some("400 500 600"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_text_load_into() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.txt");
        fs::write(&path, "3 2 2 0\n-8 9\n").unwrap();

        let mut target: RingBuffer<i32> = RingBuffer::new(10).unwrap();
        target.load_text_into(&path).unwrap();
        assert_eq!(target.capacity(), 3);
        assert_eq!(target.to_vec(), vec![-8, 9]);
    }

    #[test]
    fn test_binary_and_text_agree() {
        let dir = tempdir().unwrap();
        let original = wrapped();
        original.save_binary(dir.path().join("b.bin")).unwrap();
        original.save_text(dir.path().join("b.txt")).unwrap();

        let from_binary = RingBuffer::<i32>::load_binary(dir.path().join("b.bin")).unwrap();
        let from_text = RingBuffer::<i32>::load_text(dir.path().join("b.txt")).unwrap();
        assert_eq!(from_binary, from_text);
    }

    #[test]
    fn test_text_huge_declared_capacity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.txt");
        fs::write(&path, format!("{} 1 1 0\n7\n", usize::MAX / 2)).unwrap();

        let err = RingBuffer::<i64>::load_text(&path).unwrap_err();
        assert!(matches!(
            err,
            BufferError::Persistence(PersistenceError::Malformed(_))
        ));
    }
}
