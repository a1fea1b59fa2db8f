use super::{read_error, rebuild, Header, PREALLOC_LIMIT};
use crate::buffer::RingBuffer;
use crate::errors::{PersistenceError, Result};
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

const USIZE_BYTES: usize = std::mem::size_of::<usize>();

/// Explicit fixed-width encoding of one element record.
///
/// Every value of the type encodes to exactly `WIDTH` bytes in native byte
/// order. Decoding a byte pattern that is not a valid value must fail with
/// `io::ErrorKind::InvalidData`.
pub trait FixedCodec: Sized {
    const WIDTH: usize;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self>;
}

macro_rules! impl_fixed_codec {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl FixedCodec for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
                    writer.$write::<NativeEndian>(*self)
                }

                fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
                    reader.$read::<NativeEndian>()
                }
            }
        )*
    };
}

impl_fixed_codec! {
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
    i16 => write_i16, read_i16;
    i32 => write_i32, read_i32;
    i64 => write_i64, read_i64;
    i128 => write_i128, read_i128;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

impl FixedCodec for u8 {
    const WIDTH: usize = 1;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(*self)
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl FixedCodec for i8 {
    const WIDTH: usize = 1;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i8(*self)
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_i8()
    }
}

impl FixedCodec for usize {
    const WIDTH: usize = USIZE_BYTES;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_uint::<NativeEndian>(*self as u64, USIZE_BYTES)
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let value = reader.read_uint::<NativeEndian>(USIZE_BYTES)?;
        usize::try_from(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl FixedCodec for isize {
    const WIDTH: usize = USIZE_BYTES;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_int::<NativeEndian>(*self as i64, USIZE_BYTES)
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let value = reader.read_int::<NativeEndian>(USIZE_BYTES)?;
        isize::try_from(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl FixedCodec for bool {
    const WIDTH: usize = 1;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(u8::from(*self))
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid bool byte {other:#04x}"),
            )),
        }
    }
}

impl FixedCodec for char {
    const WIDTH: usize = 4;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<NativeEndian>(u32::from(*self))
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let code = reader.read_u32::<NativeEndian>()?;
        char::from_u32(code).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid char code point {code:#x}"),
            )
        })
    }
}

impl<T: FixedCodec, const N: usize> FixedCodec for [T; N] {
    const WIDTH: usize = T::WIDTH * N;

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for item in self {
            item.encode(writer)?;
        }
        Ok(())
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let items = (0..N)
            .map(|_| T::decode(reader))
            .collect::<io::Result<Vec<T>>>()?;
        items
            .try_into()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "array length mismatch"))
    }
}

fn read_header<R: Read>(reader: &mut R) -> std::result::Result<Header, PersistenceError> {
    let mut fields = [0usize; 4];
    for field in fields.iter_mut() {
        *field = usize::decode(reader).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                PersistenceError::Malformed("header truncated".to_string())
            }
            _ => read_error(e, 0, 0),
        })?;
    }

    let [capacity, count, head, tail] = fields;
    let header = Header {
        capacity,
        count,
        head,
        tail,
    };
    header.validate()?;
    Ok(header)
}

impl<T: FixedCodec> RingBuffer<T> {
    /// Write the binary encoding: header, then `len()` records oldest-first.
    pub fn write_binary<W: Write>(&self, mut writer: W) -> Result<()> {
        let header = Header::of(self);
        for field in [header.capacity, header.count, header.head, header.tail] {
            field.encode(&mut writer).map_err(PersistenceError::Io)?;
        }
        for item in self.iter() {
            item.encode(&mut writer).map_err(PersistenceError::Io)?;
        }
        writer.flush().map_err(PersistenceError::Io)?;
        Ok(())
    }

    /// Read a buffer from its binary encoding.
    pub fn read_binary<R: Read>(mut reader: R) -> Result<Self> {
        let header = read_header(&mut reader)?;

        let mut items = Vec::with_capacity(header.count.min(PREALLOC_LIMIT));
        for found in 0..header.count {
            let item =
                T::decode(&mut reader).map_err(|e| read_error(e, header.count, found))?;
            items.push(item);
        }

        rebuild(&header, items)
    }

    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| PersistenceError::open(path, e))?;
        self.write_binary(BufWriter::new(file))?;

        debug!(
            path = %path.display(),
            capacity = self.capacity(),
            count = self.len(),
            "Saved binary buffer"
        );
        Ok(())
    }

    pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PersistenceError::open(path, e))?;
        let buffer = Self::read_binary(BufReader::new(file))?;

        debug!(
            path = %path.display(),
            capacity = buffer.capacity(),
            count = buffer.len(),
            "Loaded binary buffer"
        );
        Ok(buffer)
    }

    /// Replace this buffer with the one stored at `path`.
    ///
    /// Capacity follows the file. On failure `self` is left unchanged.
    pub fn load_binary_into<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load_binary(path)?;
        Ok(())
    }
}
