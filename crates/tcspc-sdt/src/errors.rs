/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use tcspc_core::bytestream::ByteIoError;

/// Errors that can occur during SDT decoding
///
/// A decode either completes or fails with one of these,
/// partially decoded files are never handed out.
#[non_exhaustive]
pub enum SdtDecoderErrors {
    /// The file ended before a block could be read completely
    IoErrors(ByteIoError),
    /// The info block had fewer lines than the nine positional fields,
    /// holds the number of usable lines found
    InfoBlockTooShort(usize),
    /// The header validity marker isn't `0x5555`, only raised in strict mode
    InvalidHeaderMarker(u16),
    /// The stored header checksum doesn't match, only raised in strict mode
    ChecksumMismatch { expected: u16, found: u16 },
    /// A header offset points outside the file.
    ///
    /// Holds the field name, the offset and the file size
    OffsetOutOfBounds(&'static str, i64, u64),
    /// More data blocks than the options allow, holds the limit and the count found
    TooManyDataBlocks(usize, usize),
    /// A data block was requested that isn't in the index,
    /// holds the index requested and the number of blocks
    BlockIndexOutOfRange(usize, usize),
    /// Photon counts were requested from a compressed data block, holds the block index
    CompressedBlock(usize),
    /// Generic message
    Generic(&'static str),
    /// Generic allocated message
    GenericString(String)
}

impl SdtDecoderErrors {
    /// Return true if decoding stopped because the input ended early
    pub const fn is_truncated(&self) -> bool {
        match self {
            SdtDecoderErrors::IoErrors(err) => err.is_truncation(),
            _ => false
        }
    }
}

impl Debug for SdtDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IoErrors(err) => {
                writeln!(f, "I/O error: {:?}", err)
            }
            Self::InfoBlockTooShort(found) => {
                writeln!(
                    f,
                    "Info block too short, expected 9 fields but found {found}"
                )
            }
            Self::InvalidHeaderMarker(marker) => {
                writeln!(
                    f,
                    "Invalid header marker {marker:#06x}, expected {:#06x}",
                    crate::constants::BH_HEADER_VALID
                )
            }
            Self::ChecksumMismatch { expected, found } => {
                writeln!(
                    f,
                    "Header checksum mismatch, expected {expected:#06x} but found {found:#06x}"
                )
            }
            Self::OffsetOutOfBounds(field, offset, size) => {
                writeln!(
                    f,
                    "Offset {field} of {offset} lies outside the file of {size} bytes"
                )
            }
            Self::TooManyDataBlocks(limit, found) => {
                writeln!(
                    f,
                    "Too many data blocks, configured limit is {limit} but header declares {found}"
                )
            }
            Self::BlockIndexOutOfRange(index, count) => {
                writeln!(
                    f,
                    "Data block {index} requested but the file has {count} blocks"
                )
            }
            Self::CompressedBlock(index) => {
                writeln!(
                    f,
                    "Data block {index} is compressed, its counts can only be read as raw bytes"
                )
            }
            Self::Generic(message) => {
                writeln!(f, "{}", message)
            }
            Self::GenericString(message) => {
                writeln!(f, "{}", message)
            }
        }
    }
}

impl Display for SdtDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SdtDecoderErrors {}

impl From<ByteIoError> for SdtDecoderErrors {
    fn from(value: ByteIoError) -> Self {
        SdtDecoderErrors::IoErrors(value)
    }
}

impl From<&'static str> for SdtDecoderErrors {
    fn from(value: &'static str) -> Self {
        SdtDecoderErrors::Generic(value)
    }
}

impl From<String> for SdtDecoderErrors {
    fn from(value: String) -> Self {
        SdtDecoderErrors::GenericString(value)
    }
}
