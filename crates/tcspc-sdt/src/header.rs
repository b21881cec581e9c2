/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed 42 byte file header
//!
//! Every other block of the file is located through the offsets
//! stored here.

use tcspc_core::bytestream::{ByteReader, ByteSource};

use crate::constants::{BH_HEADER_CHKSUM, BH_HEADER_VALID, DATA_BLOCK_COUNT_IN_RESERVED};
use crate::errors::SdtDecoderErrors;

/// Number of 16 bit words covered by the header checksum
const CHECKSUMMED_WORDS: usize = 20;

/// The main header found at offset zero
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FixedHeader {
    /// Software revision and module type
    pub revision:               u16,
    pub info_offs:              i32,
    pub info_length:            u16,
    pub setup_offs:             i32,
    pub setup_length:           u16,
    /// Offset of the first data block header
    pub data_block_offs:        i32,
    /// Number of data blocks, or `0x7fff` when the count is in `reserved1`
    pub no_of_data_blocks:      i16,
    /// Length of the longest data block
    pub data_block_length:      i32,
    pub meas_desc_block_offs:   i32,
    pub no_of_meas_desc_blocks: i16,
    pub meas_desc_block_length: i16,
    /// `0x5555` when the file was written completely
    pub header_valid:           u16,
    pub reserved1:              u32,
    pub reserved2:              u16,
    pub chksum:                 u16
}

impl FixedHeader {
    /// Read the header at the current position of `stream`
    pub fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<FixedHeader, SdtDecoderErrors> {
        Ok(FixedHeader {
            revision:               stream.get_u16_le_err()?,
            info_offs:              stream.get_i32_le_err()?,
            info_length:            stream.get_u16_le_err()?,
            setup_offs:             stream.get_i32_le_err()?,
            setup_length:           stream.get_u16_le_err()?,
            data_block_offs:        stream.get_i32_le_err()?,
            no_of_data_blocks:      stream.get_i16_le_err()?,
            data_block_length:      stream.get_i32_le_err()?,
            meas_desc_block_offs:   stream.get_i32_le_err()?,
            no_of_meas_desc_blocks: stream.get_i16_le_err()?,
            meas_desc_block_length: stream.get_i16_le_err()?,
            header_valid:           stream.get_u16_le_err()?,
            reserved1:              stream.get_u32_le_err()?,
            reserved2:              stream.get_u16_le_err()?,
            chksum:                 stream.get_u16_le_err()?
        })
    }

    /// Number of data blocks in the file
    ///
    /// Files with more than `0x7ffe` blocks store `0x7fff` in
    /// `no_of_data_blocks` and the real count in `reserved1`.
    /// A negative count means there are no blocks.
    pub fn data_block_count(&self) -> usize {
        if self.no_of_data_blocks == DATA_BLOCK_COUNT_IN_RESERVED {
            self.reserved1 as usize
        } else {
            usize::try_from(self.no_of_data_blocks).unwrap_or(0)
        }
    }

    /// Number of measurement description blocks, zero when negative
    pub fn meas_desc_block_count(&self) -> usize {
        usize::try_from(self.no_of_meas_desc_blocks).unwrap_or(0)
    }

    pub const fn is_valid(&self) -> bool {
        self.header_valid == BH_HEADER_VALID
    }

    /// The checksum a writer would have stored for this header
    pub fn computed_checksum(&self) -> u16 {
        let words = self.checksummed_words();

        words
            .iter()
            .fold(BH_HEADER_CHKSUM, |acc, word| acc.wrapping_sub(*word))
    }

    /// First twenty words of the header as they lie on disk
    fn checksummed_words(&self) -> [u16; CHECKSUMMED_WORDS] {
        let mut bytes = [0_u8; CHECKSUMMED_WORDS * 2];
        let mut position = 0;

        let mut put = |chunk: &[u8]| {
            bytes[position..position + chunk.len()].copy_from_slice(chunk);
            position += chunk.len();
        };
        put(&self.revision.to_le_bytes());
        put(&self.info_offs.to_le_bytes());
        put(&self.info_length.to_le_bytes());
        put(&self.setup_offs.to_le_bytes());
        put(&self.setup_length.to_le_bytes());
        put(&self.data_block_offs.to_le_bytes());
        put(&self.no_of_data_blocks.to_le_bytes());
        put(&self.data_block_length.to_le_bytes());
        put(&self.meas_desc_block_offs.to_le_bytes());
        put(&self.no_of_meas_desc_blocks.to_le_bytes());
        put(&self.meas_desc_block_length.to_le_bytes());
        put(&self.header_valid.to_le_bytes());
        put(&self.reserved1.to_le_bytes());
        put(&self.reserved2.to_le_bytes());

        let mut words = [0_u16; CHECKSUMMED_WORDS];
        for (word, pair) in words.iter_mut().zip(bytes.chunks_exact(2)) {
            *word = u16::from_le_bytes([pair[0], pair[1]]);
        }
        words
    }
}
