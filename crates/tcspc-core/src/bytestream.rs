/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A positioned, seekable byte reader
//!
//! Decoders read through [`ByteReader`], which wraps anything that
//! implements [`ByteSource`]. In memory buffers use [`ByteCursor`], and with
//! the `std` feature a [`BufReader`](std::io::BufReader) over a file or a
//! [`Cursor`](std::io::Cursor) works too.
//!
//! ```
//! use tcspc_core::bytestream::{ByteCursor, ByteReader};
//!
//! let mut reader = ByteReader::new(ByteCursor::new([0x55_u8, 0x55, 0x01]));
//! assert_eq!(reader.get_u16_le_err().unwrap(), 0x5555);
//! // one byte left, a u16 read fails and the position stays put
//! assert!(reader.get_u16_le_err().is_err());
//! assert_eq!(reader.position().unwrap(), 2);
//! ```
pub use reader::cursor::ByteCursor;
pub use reader::{ByteEndian, ByteIoError, ByteReader, StreamSeek};
pub use traits::ByteSource;

mod reader;
mod traits;
