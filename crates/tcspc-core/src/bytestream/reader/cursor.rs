/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bytestream::{ByteIoError, ByteSource, StreamSeek};

/// An in memory byte source
///
/// Wraps anything that can be viewed as a byte slice,
/// e.g `Vec<u8>`, `&[u8]` or `[u8; N]`
pub struct ByteCursor<T: AsRef<[u8]>> {
    stream:   T,
    position: usize
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(buffer: T) -> ByteCursor<T> {
        ByteCursor {
            stream:   buffer,
            position: 0
        }
    }

    /// Return the wrapped buffer
    pub fn into_inner(self) -> T {
        self.stream
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.stream.as_ref().len()
    }
}

impl<T: AsRef<[u8]>> ByteSource for ByteCursor<T> {
    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let bytes = self.stream.as_ref();
        let start = core::cmp::min(self.position, bytes.len());
        let available = bytes.len() - start;

        if buf.len() > available {
            // not all bytes can be read, leave position as is
            return Err(ByteIoError::NotEnoughBytes(buf.len(), available));
        }
        buf.copy_from_slice(&bytes[start..start + buf.len()]);
        self.position = start + buf.len();

        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        let bytes = self.stream.as_ref();
        let start = core::cmp::min(self.position, bytes.len());
        let end = core::cmp::min(start + buf.len(), bytes.len());

        buf[..end - start].copy_from_slice(&bytes[start..end]);
        self.position = end;

        Ok(end - start)
    }

    #[inline(always)]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let position = self.position;
        self.read_exact_bytes(buf)?;
        self.position = position;
        Ok(())
    }

    fn byte_seek(&mut self, from: StreamSeek) -> Result<u64, ByteIoError> {
        let new_position = match from {
            StreamSeek::Start(position) => i64::try_from(position)?,
            StreamSeek::End(position) => i64::try_from(self.len())? + position,
            StreamSeek::Current(position) => i64::try_from(self.position)? + position
        };
        if new_position < 0 {
            return Err(ByteIoError::SeekError("Cannot seek before the start of the stream"));
        }
        self.position = usize::try_from(new_position)?;

        Ok(self.position as u64)
    }

    #[inline(always)]
    fn is_eof(&mut self) -> Result<bool, ByteIoError> {
        Ok(self.position >= self.len())
    }

    #[inline(always)]
    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position as u64)
    }

    #[inline(always)]
    fn byte_size(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.len() as u64)
    }
}
