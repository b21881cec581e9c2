/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use tcspc_core::bytestream::{ByteReader, ByteSource};

use crate::errors::SdtDecoderErrors;

/// Header in front of every data block
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataBlockHeader {
    /// Block number, only valid below `0x7fff`, see `lblock_no`
    pub block_no:           i16,
    /// Absolute file offset of the photon counts
    pub data_offs:          i32,
    /// Absolute file offset of the next block header
    pub next_block_offs:    i32,
    pub block_type:         u16,
    /// Index of the measurement description block this data was taken with
    pub meas_desc_block_no: i16,
    /// Full block number
    pub lblock_no:          u32,
    /// Length of the data in bytes
    pub block_length:       u32,
    /// Stream position right after this header
    pub header_end:         u64
}

impl DataBlockHeader {
    pub fn read<T: ByteSource>(
        stream: &mut ByteReader<T>
    ) -> Result<DataBlockHeader, SdtDecoderErrors> {
        let mut header = DataBlockHeader {
            block_no: stream.get_i16_le_err()?,
            data_offs: stream.get_i32_le_err()?,
            next_block_offs: stream.get_i32_le_err()?,
            block_type: stream.get_u16_le_err()?,
            meas_desc_block_no: stream.get_i16_le_err()?,
            lblock_no: stream.get_u32_le_err()?,
            block_length: stream.get_u32_le_err()?,
            header_end: 0
        };
        header.header_end = stream.position()?;

        Ok(header)
    }

    /// Decoded `block_type`
    pub const fn block_type(&self) -> BlockType {
        BlockType::from_u16(self.block_type)
    }
}

/// Where the data of a block came from
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DataSource {
    /// Normal measurement
    Measurement,
    /// Measurement stopped on an error
    Failed,
    /// Data read back from another file
    FromFile,
    /// Calculated from other blocks
    Calculated,
    /// Simulated
    Simulated,
    /// FIFO mode measurement
    FifoMeasurement,
    Other(u8)
}

/// What a block contains
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockContent {
    Decay,
    Page,
    FcsCurve,
    FidaHistogram,
    FildaHistogram,
    McsCurve,
    ImageDecay,
    McsImage,
    Other(u8)
}

/// Bit fields of a data block type tag
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockType {
    pub source:     DataSource,
    pub content:    BlockContent,
    /// Block data is zip compressed
    pub compressed: bool
}

impl BlockType {
    pub const fn from_u16(tag: u16) -> BlockType {
        let source = match (tag & 0x0f) as u8 {
            0 => DataSource::Measurement,
            1 => DataSource::Failed,
            2 => DataSource::FromFile,
            3 => DataSource::Calculated,
            4 => DataSource::Simulated,
            8 => DataSource::FifoMeasurement,
            other => DataSource::Other(other)
        };
        let content = match ((tag >> 4) & 0x0f) as u8 {
            0 => BlockContent::Decay,
            1 => BlockContent::Page,
            2 => BlockContent::FcsCurve,
            3 => BlockContent::FidaHistogram,
            4 => BlockContent::FildaHistogram,
            5 => BlockContent::McsCurve,
            6 => BlockContent::ImageDecay,
            7 => BlockContent::McsImage,
            other => BlockContent::Other(other)
        };

        BlockType {
            source,
            content,
            compressed: tag & 0x1000 != 0
        }
    }
}
