use super::{rebuild, Header, PREALLOC_LIMIT};
use crate::buffer::RingBuffer;
use crate::errors::{PersistenceError, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

fn parse_header(line: Option<&str>) -> std::result::Result<Header, PersistenceError> {
    let line = line.ok_or_else(|| PersistenceError::Malformed("missing header line".to_string()))?;

    let fields = line
        .split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|e| {
                PersistenceError::Malformed(format!("bad header field {token:?}: {e}"))
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let [capacity, count, head, tail] = fields[..] else {
        return Err(PersistenceError::Malformed(format!(
            "header needs 4 fields, found {}",
            fields.len()
        )));
    };

    let header = Header {
        capacity,
        count,
        head,
        tail,
    };
    header.validate()?;
    Ok(header)
}

impl<T: Display> RingBuffer<T> {
    /// Write the text encoding: the header line, then the elements
    /// oldest-first separated by single spaces.
    ///
    /// Every element must render as one non-empty token without whitespace.
    /// A buffer holding any other element is rejected as `Malformed` before
    /// anything is written.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        let tokens = self
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let token = item.to_string();
                if token.is_empty() || token.contains(char::is_whitespace) {
                    return Err(PersistenceError::Malformed(format!(
                        "element {position} ({token:?}) is not a single text token"
                    )));
                }
                Ok(token)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let header = Header::of(self);
        writeln!(
            writer,
            "{} {} {} {}",
            header.capacity, header.count, header.head, header.tail
        )
        .map_err(PersistenceError::Io)?;

        writeln!(writer, "{}", tokens.join(" ")).map_err(PersistenceError::Io)?;
        writer.flush().map_err(PersistenceError::Io)?;
        Ok(())
    }

    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PersistenceError::open(path, e))?;
        self.write_text(BufWriter::new(file))?;

        debug!(
            path = %path.display(),
            capacity = self.capacity(),
            count = self.len(),
            "Saved text buffer"
        );
        Ok(())
    }
}

impl<T> RingBuffer<T>
where
    T: FromStr,
    T::Err: Display,
{
    /// Read a buffer from its text encoding.
    ///
    /// Elements are whitespace-separated tokens after the header line. Fewer
    /// tokens than the declared count is truncation; more is malformed.
    pub fn read_text<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(PersistenceError::Io)?;

        let (header_line, body) = match content.split_once('\n') {
            Some((first, rest)) => (Some(first), rest),
            None => (Some(content.as_str()).filter(|s| !s.trim().is_empty()), ""),
        };
        let header = parse_header(header_line)?;

        let mut tokens = body.split_whitespace();
        let mut items = Vec::with_capacity(header.count.min(PREALLOC_LIMIT));
        for found in 0..header.count {
            let token = tokens.next().ok_or(PersistenceError::Truncated {
                expected: header.count,
                found,
            })?;
            let item = token.parse::<T>().map_err(|e| {
                PersistenceError::Malformed(format!("element {found} ({token:?}): {e}"))
            })?;
            items.push(item);
        }

        let extra = tokens.count();
        if extra > 0 {
            return Err(PersistenceError::Malformed(format!(
                "{extra} tokens beyond declared count {}",
                header.count
            ))
            .into());
        }

        rebuild(&header, items)
    }

    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PersistenceError::open(path, e))?;
        let buffer = Self::read_text(BufReader::new(file))?;

        debug!(
            path = %path.display(),
            capacity = buffer.capacity(),
            count = buffer.len(),
            "Loaded text buffer"
        );
        Ok(buffer)
    }

    /// Replace this buffer with the one stored at `path`.
    ///
    /// Capacity follows the file. On failure `self` is left unchanged.
    pub fn load_text_into<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load_text(path)?;
        Ok(())
    }
}
