/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter};

use crate::bytestream::ByteSource;

pub(crate) mod cursor;
pub(crate) mod std_readers;

/// Enumeration of possible methods to seek within a byte source.
///
/// It is analogous to the [SeekFrom](std::io::SeekFrom) in the std library but
/// it's here to allow this to work in no-std crates
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum StreamSeek {
    /// Sets the offset to the provided number of bytes.
    Start(u64),

    /// Sets the offset to the size of this object plus the specified number of
    /// bytes.
    ///
    /// It is possible to seek beyond the end of an object, but it's an error to
    /// seek before byte 0.
    End(i64),

    /// Sets the offset to the current position plus the specified number of
    /// bytes.
    ///
    /// It is possible to seek beyond the end of an object, but it's an error to
    /// seek before byte 0.
    Current(i64)
}

impl StreamSeek {
    /// Convert to [SeekFrom](std::io::SeekFrom) from the `std::io` library
    #[cfg(feature = "std")]
    pub(crate) fn to_std_seek(self) -> std::io::SeekFrom {
        match self {
            StreamSeek::Start(pos) => std::io::SeekFrom::Start(pos),
            StreamSeek::End(pos) => std::io::SeekFrom::End(pos),
            StreamSeek::Current(pos) => std::io::SeekFrom::Current(pos)
        }
    }
}

/// Byte order used to interpret multi-byte reads
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ByteEndian {
    /// Least significant byte first
    #[default]
    LE,
    /// Most significant byte first
    BE
}

/// Errors produced by a [`ByteReader`]
pub enum ByteIoError {
    #[cfg(feature = "std")]
    StdIoError(std::io::Error),
    TryFromIntError(core::num::TryFromIntError),
    /// A read ran past the end of the stream
    ///
    /// Holds the number of bytes requested and the number still available
    NotEnoughBytes(usize, usize),
    Generic(&'static str),
    SeekError(&'static str),
    SeekErrorOwned(String)
}

impl ByteIoError {
    /// Return true if this error means the stream ended before a read completed
    pub const fn is_truncation(&self) -> bool {
        matches!(self, ByteIoError::NotEnoughBytes(_, _))
    }
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {err}")
            }
            ByteIoError::TryFromIntError(err) => {
                writeln!(f, "Cannot convert to int {err}")
            }
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
            ByteIoError::SeekError(err) => {
                writeln!(f, "Seek error: {err}")
            }
            ByteIoError::SeekErrorOwned(err) => {
                writeln!(f, "Seek error {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ByteIoError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for ByteIoError {
    fn from(value: std::io::Error) -> Self {
        ByteIoError::StdIoError(value)
    }
}

impl From<core::num::TryFromIntError> for ByteIoError {
    fn from(value: core::num::TryFromIntError) -> Self {
        ByteIoError::TryFromIntError(value)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

/// A positioned reader over a [`ByteSource`]
///
/// Every read either succeeds and advances the position by exactly
/// the width of the value, or fails and leaves the position untouched.
pub struct ByteReader<T: ByteSource> {
    inner: T
}

impl<T: ByteSource> ByteReader<T> {
    pub fn new(source: T) -> ByteReader<T> {
        ByteReader { inner: source }
    }
    /// Destroy this reader returning
    /// the underlying source of the bytes
    /// from which we were decoding
    #[inline(always)]
    pub fn consume(self) -> T {
        self.inner
    }

    /// Move the position `num` bytes forward, returning the new position
    #[inline(always)]
    pub fn skip(&mut self, num: usize) -> Result<u64, ByteIoError> {
        let num = i64::try_from(num)?;
        self.inner.byte_seek(StreamSeek::Current(num))
    }

    #[inline(always)]
    pub fn rewind(&mut self, num: usize) -> Result<u64, ByteIoError> {
        let num = i64::try_from(num)?;
        self.inner.byte_seek(StreamSeek::Current(-num))
    }

    #[inline(always)]
    pub fn seek(&mut self, from: StreamSeek) -> Result<u64, ByteIoError> {
        self.inner.byte_seek(from)
    }

    /// Seek to an absolute byte offset from the start of the stream
    #[inline]
    pub fn set_position(&mut self, position: u64) -> Result<(), ByteIoError> {
        self.seek(StreamSeek::Start(position))?;

        Ok(())
    }

    #[inline(always)]
    pub fn eof(&mut self) -> Result<bool, ByteIoError> {
        self.inner.is_eof()
    }

    #[inline(always)]
    pub fn position(&mut self) -> Result<u64, ByteIoError> {
        self.inner.byte_position()
    }

    /// Total size of the underlying stream in bytes
    #[inline(always)]
    pub fn size(&mut self) -> Result<u64, ByteIoError> {
        self.inner.byte_size()
    }

    /// Number of bytes between the current position and the end of the stream
    pub fn remaining(&mut self) -> Result<u64, ByteIoError> {
        let size = self.size()?;
        let position = self.position()?;
        Ok(size.saturating_sub(position))
    }

    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, ByteIoError> {
        let mut buf = [0];
        self.inner.read_const_bytes(&mut buf)?;
        Ok(buf[0])
    }

    #[inline(always)]
    pub fn get_i8_err(&mut self) -> Result<i8, ByteIoError> {
        Ok(self.get_u8_err()? as i8)
    }

    /// Look at the next `num_bytes` bytes without consuming them
    pub fn peek_bytes_vec(&mut self, num_bytes: usize) -> Result<Vec<u8>, ByteIoError> {
        let mut buffer = vec![0; num_bytes];
        self.inner.peek_exact_bytes(&mut buffer)?;
        Ok(buffer)
    }

    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], ByteIoError> {
        let mut byte_store: [u8; N] = [0; N];
        self.inner.read_const_bytes(&mut byte_store)?;
        Ok(byte_store)
    }

    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        self.inner.read_exact_bytes(buf)
    }

    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.inner.read_bytes(buf)
    }

    /// Read exactly `length` bytes into a new vector
    ///
    /// The stream length is checked before allocating so a corrupt
    /// length field cannot request more memory than the file holds.
    pub fn read_bytes_vec(&mut self, length: usize) -> Result<Vec<u8>, ByteIoError> {
        let remaining = usize::try_from(self.remaining()?).unwrap_or(usize::MAX);

        if length > remaining {
            return Err(ByteIoError::NotEnoughBytes(length, remaining));
        }
        let mut buffer = vec![0; length];
        self.inner.read_exact_bytes(&mut buffer)?;
        Ok(buffer)
    }

    /// Read `length` bytes as UTF-8 text
    ///
    /// Invalid sequences are replaced with [REPLACEMENT_CHARACTER](core::char::REPLACEMENT_CHARACTER)
    pub fn read_string_lossy(&mut self, length: usize) -> Result<String, ByteIoError> {
        let bytes = self.read_bytes_vec(length)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a fixed width, NUL padded text field of `length` bytes
    ///
    /// Everything from the first NUL onwards is dropped and the remainder
    /// is trimmed of surrounding whitespace.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String, ByteIoError> {
        let bytes = self.read_bytes_vec(length)?;
        let end = bytes.iter().position(|x| *x == 0).unwrap_or(bytes.len());

        Ok(String::from_utf8_lossy(&bytes[..end]).trim().into())
    }
}

macro_rules! get_single_type {
    ($inner:tt,$be:tt,$le:tt,$endian:tt,$int_type:tt) => {
        impl<T: ByteSource> ByteReader<T> {
            #[inline(always)]
            fn $inner(&mut self, mode: ByteEndian) -> Result<$int_type, ByteIoError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                self.inner.read_const_bytes(&mut space)?;

                match mode {
                    ByteEndian::BE => Ok($int_type::from_be_bytes(space)),
                    ByteEndian::LE => Ok($int_type::from_le_bytes(space))
                }
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a big endian value")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $be(&mut self) -> Result<$int_type, ByteIoError> {
                self.$inner(ByteEndian::BE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," as a little endian value")]
            #[doc=concat!("Returning an error if the underlying buffer cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $le(&mut self) -> Result<$int_type, ByteIoError> {
                self.$inner(ByteEndian::LE)
            }

            #[doc=concat!("Read ",stringify!($int_type)," in the byte order given by `endian`")]
            #[inline]
            pub fn $endian(&mut self, endian: ByteEndian) -> Result<$int_type, ByteIoError> {
                self.$inner(endian)
            }
        }
    };
}

get_single_type!(get_u16_inner, get_u16_be_err, get_u16_le_err, get_u16_err, u16);
get_single_type!(get_i16_inner, get_i16_be_err, get_i16_le_err, get_i16_err, i16);
get_single_type!(get_u32_inner, get_u32_be_err, get_u32_le_err, get_u32_err, u32);
get_single_type!(get_i32_inner, get_i32_be_err, get_i32_le_err, get_i32_err, i32);
get_single_type!(get_u64_inner, get_u64_be_err, get_u64_le_err, get_u64_err, u64);
get_single_type!(get_i64_inner, get_i64_be_err, get_i64_le_err, get_i64_err, i64);
get_single_type!(get_f32_inner, get_f32_be_err, get_f32_le_err, get_f32_err, f32);
get_single_type!(get_f64_inner, get_f64_be_err, get_f64_le_err, get_f64_err, f64);
