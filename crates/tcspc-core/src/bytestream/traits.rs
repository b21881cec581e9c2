/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Traits for reading instrument files in tcspc
//!
//! This exposes the trait and implementations for byte sources
//! in the tcspc family of decoders.

use crate::bytestream::reader::{ByteIoError, StreamSeek};

/// The de-facto input trait implemented for byte sources.
///
/// This provides the basic functions needed for heap free I/O
/// in the decoders with easy support for extending it to multiple
/// implementations.
///
/// # Considerations
///
/// If you have an in memory buffer, prefer [`ByteCursor`](crate::bytestream::ByteCursor)
/// over [`Cursor`](std::io::Cursor), it answers size and position queries without
/// going through `std::io::Seek`.
pub trait ByteSource {
    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    ///
    /// ## Arguments
    ///  - `buf`: Buffer to fill with bytes from the underlying reader
    ///  ## Errors
    /// In case of an error, the implementation should not increment the internal position
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Read exact bytes required to fill a fixed size `buf`
    ///
    /// This is the same as [`read_exact_bytes`](Self::read_exact_bytes) but implemented as a separate
    /// method to allow some implementations to optimize it to cost fewer instructions
    fn read_const_bytes<const N: usize>(&mut self, buf: &mut [u8; N]) -> Result<(), ByteIoError> {
        self.read_exact_bytes(buf)
    }

    /// Read bytes into `buf` returning how many bytes were read
    ///
    /// This doesn't guarantee that buf will be filled with bytes for such a guarantee see
    /// [`read_exact_bytes`](Self::read_exact_bytes)
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError>;

    /// Fill `buf` without advancing the read position
    fn peek_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError>;

    /// Seek into a new position from the buffer
    ///
    /// This is similar to the [seek](std::io::Seek::seek) function in the [Seek](std::io::Seek) trait
    /// but implemented to work for no-std environments
    fn byte_seek(&mut self, from: StreamSeek) -> Result<u64, ByteIoError>;

    /// Report whether we are at the end of a stream.
    fn is_eof(&mut self) -> Result<bool, ByteIoError>;

    /// Return the current position of the inner cursor.
    fn byte_position(&mut self) -> Result<u64, ByteIoError>;

    /// Return the total number of bytes in the stream
    ///
    /// ## Warning
    /// For files this may seek to the end and back, use it sparingly
    fn byte_size(&mut self) -> Result<u64, ByteIoError>;
}
