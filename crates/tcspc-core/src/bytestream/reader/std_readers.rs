/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "std")]

use std::io::{BufReader, Cursor, ErrorKind, Read, Seek, SeekFrom};

use crate::bytestream::reader::{ByteIoError, StreamSeek};
use crate::bytestream::ByteSource;

/// Fill `buf` from `reader`, restoring the position when the stream is too short
fn read_exact_or_restore<R: Read + Seek>(
    reader: &mut R, buf: &mut [u8]
) -> Result<(), ByteIoError> {
    let start = reader.stream_position()?;

    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
            let end = reader.seek(SeekFrom::End(0))?;
            reader.seek(SeekFrom::Start(start))?;
            let available = usize::try_from(end.saturating_sub(start))?;

            Err(ByteIoError::NotEnoughBytes(buf.len(), available))
        }
        Err(err) => Err(ByteIoError::from(err))
    }
}

fn peek_exact<R: Read + Seek>(reader: &mut R, buf: &mut [u8]) -> Result<(), ByteIoError> {
    read_exact_or_restore(reader, buf)?;
    let converted = -i64::try_from(buf.len())?;
    reader.seek(SeekFrom::Current(converted))?;
    Ok(())
}

fn stream_size<R: Seek>(reader: &mut R) -> Result<u64, ByteIoError> {
    let old_pos = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))?;

    // Avoid seeking a third time when we were already at the end of the
    // stream. The branch is usually way cheaper than a seek operation.
    if old_pos != len {
        reader.seek(SeekFrom::Start(old_pos))?;
    }

    Ok(len)
}

impl<T> ByteSource for Cursor<T>
where
    T: AsRef<[u8]>
{
    #[inline(always)]
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        read_exact_or_restore(self, buf)
    }

    #[inline(always)]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.read(buf).map_err(ByteIoError::from)
    }

    #[inline(always)]
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        peek_exact(self, buf)
    }

    #[inline(always)]
    fn byte_seek(&mut self, from: StreamSeek) -> Result<u64, ByteIoError> {
        self.seek(from.to_std_seek()).map_err(ByteIoError::from)
    }

    #[inline(always)]
    fn is_eof(&mut self) -> Result<bool, ByteIoError> {
        Ok(self.position() >= self.get_ref().as_ref().len() as u64)
    }

    #[inline(always)]
    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.position())
    }

    #[inline(always)]
    fn byte_size(&mut self) -> Result<u64, ByteIoError> {
        Ok(self.get_ref().as_ref().len() as u64)
    }
}

impl<T: Read + Seek> ByteSource for BufReader<T> {
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        read_exact_or_restore(self, buf)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        self.read(buf).map_err(ByteIoError::from)
    }

    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        peek_exact(self, buf)
    }

    fn byte_seek(&mut self, from: StreamSeek) -> Result<u64, ByteIoError> {
        self.seek(from.to_std_seek()).map_err(ByteIoError::from)
    }

    fn is_eof(&mut self) -> Result<bool, ByteIoError> {
        use std::io::BufRead;

        self.fill_buf()
            .map(|b| b.is_empty())
            .map_err(ByteIoError::from)
    }

    fn byte_position(&mut self) -> Result<u64, ByteIoError> {
        self.stream_position().map_err(ByteIoError::from)
    }

    fn byte_size(&mut self) -> Result<u64, ByteIoError> {
        stream_size(self)
    }
}
