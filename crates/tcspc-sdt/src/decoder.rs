/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::min;

use tcspc_core::bytestream::{ByteReader, ByteSource};
use tcspc_core::log::{trace, warn};
use tcspc_core::options::DecoderOptions;

use crate::blocks::DataBlockHeader;
use crate::constants::{
    BH_HEADER_NOT_VALID, BH_HEADER_VALID, BIN_PARA_BEGIN, DATA_BLOCK_HEADER_SIZE,
    FIXED_HEADER_SIZE
};
use crate::errors::SdtDecoderErrors;
use crate::extended::ExtendedHeader;
use crate::file::SdtFile;
use crate::geometry::{Geometry, GeometryPatch};
use crate::header::FixedHeader;
use crate::info::InfoBlock;
use crate::measurement::MeasurementDescriptor;
use crate::setup::{find_binary_start, SetupBlock};

/// Offset of `header_valid` inside the fixed header
const HEADER_VALID_OFFSET: usize = 32;

/// Probe some bytes to see if they start an SDT file
///
/// Checks the validity marker of the fixed header and that the
/// info block starts inside `bytes`.
pub fn probe_sdt(bytes: &[u8]) -> bool {
    if bytes.len() < FIXED_HEADER_SIZE {
        return false;
    }
    let marker = u16::from_le_bytes([bytes[HEADER_VALID_OFFSET], bytes[HEADER_VALID_OFFSET + 1]]);
    let info_offs = i32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);

    (marker == BH_HEADER_VALID || marker == BH_HEADER_NOT_VALID)
        && usize::try_from(info_offs).is_ok_and(|x| x >= FIXED_HEADER_SIZE && x <= bytes.len())
}

/// A Becker & Hickl SDT decoder
///
/// Header blocks are decoded in one pass by [`decode_headers`](Self::decode_headers),
/// photon counts are read on demand per data block.
///
/// # Example
/// ```no_run
/// use tcspc_core::bytestream::ByteCursor;
/// use tcspc_sdt::SdtDecoder;
///
/// let data = std::fs::read("cells.sdt").unwrap();
/// let mut decoder = SdtDecoder::new(ByteCursor::new(data));
///
/// let file = decoder.decode().unwrap();
/// println!("{}x{} pixels, {} time bins", file.width(), file.height(), file.time_bins());
///
/// let counts = decoder.read_data_block(0).unwrap();
/// ```
pub struct SdtDecoder<T: ByteSource> {
    stream:  ByteReader<T>,
    options: DecoderOptions,
    file:    Option<SdtFile>
}

impl<T> SdtDecoder<T>
where
    T: ByteSource
{
    /// Create a new decoder with default options
    pub fn new(data: T) -> SdtDecoder<T> {
        SdtDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that respects `options`
    ///
    /// # Arguments
    ///
    /// * `data`: SDT file contents
    /// * `options`: Strict mode and data block limits
    ///
    /// returns: SdtDecoder
    pub fn new_with_options(data: T, options: DecoderOptions) -> SdtDecoder<T> {
        SdtDecoder {
            stream: ByteReader::new(data),
            options,
            file: None
        }
    }

    pub const fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode every header block of the file
    ///
    /// Calling this again after it succeeded does nothing.
    pub fn decode_headers(&mut self) -> Result<(), SdtDecoderErrors> {
        if self.file.is_some() {
            return Ok(());
        }
        let size = self.stream.size()?;

        self.stream.set_position(0)?;
        let header = FixedHeader::read(&mut self.stream)?;

        trace!("SDT revision: {:#x}", header.revision);
        trace!("Info block: {} bytes at {}", header.info_length, header.info_offs);
        trace!("Setup block: {} bytes at {}", header.setup_length, header.setup_offs);
        trace!(
            "Data blocks: {} at {}",
            header.data_block_count(),
            header.data_block_offs
        );
        trace!(
            "Measurement blocks: {} of {} bytes at {}",
            header.no_of_meas_desc_blocks,
            header.meas_desc_block_length,
            header.meas_desc_block_offs
        );

        self.check_header(&header)?;
        self.check_offsets(&header, size)?;

        let info = self.decode_info(&header)?;
        let (setup, extended_header) = self.decode_setup(&header)?;

        let measurement = if header.meas_desc_block_count() > 0 {
            self.stream
                .set_position(offset(header.meas_desc_block_offs))?;
            Some(MeasurementDescriptor::read(
                &mut self.stream,
                header.meas_desc_block_length
            )?)
        } else {
            None
        };
        let data_blocks = self.decode_block_index(&header)?;

        let geometry = resolve_geometry(&header, setup.as_ref(), measurement.as_ref());

        trace!("Width: {}", geometry.width);
        trace!("Height: {}", geometry.height);
        trace!("Time bins: {}", geometry.time_bins);
        trace!("Channels: {}", geometry.channels);
        trace!("Timepoints: {}", geometry.timepoints);

        self.file = Some(SdtFile {
            header,
            extended_header,
            info,
            setup,
            measurement,
            data_blocks,
            geometry
        });

        Ok(())
    }

    /// Decode the file headers, returning the decoded file
    pub fn decode(&mut self) -> Result<SdtFile, SdtDecoderErrors> {
        self.decode_headers()?;

        self.file
            .clone()
            .ok_or(SdtDecoderErrors::Generic("Headers not decoded"))
    }

    /// The decoded file or `None` if headers haven't been decoded
    pub const fn file(&self) -> Option<&SdtFile> {
        self.file.as_ref()
    }

    /// Get the fixed header or `None` if headers haven't been decoded
    pub fn fixed_header(&self) -> Option<&FixedHeader> {
        self.file.as_ref().map(|x| &x.header)
    }

    /// Get the info block or `None` if headers haven't been decoded
    pub fn info(&self) -> Option<&InfoBlock> {
        self.file.as_ref().map(|x| &x.info)
    }

    /// Get the resolved geometry or `None` if headers haven't been decoded
    pub fn geometry(&self) -> Option<Geometry> {
        self.file.as_ref().map(|x| x.geometry)
    }

    /// Get image width and height or `None` if headers haven't been decoded
    ///
    /// # Returns
    /// - `Some((width, height))`
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.geometry().map(|x| {
            (
                usize::try_from(x.width).unwrap_or(0),
                usize::try_from(x.height).unwrap_or(0)
            )
        })
    }

    /// Data block headers or `None` if headers haven't been decoded
    pub fn data_blocks(&self) -> Option<&[DataBlockHeader]> {
        self.file.as_ref().map(|x| x.data_blocks.as_slice())
    }

    /// Read the raw bytes of data block `index`
    ///
    /// Decodes headers first if that hasn't happened yet.
    pub fn read_data_block_bytes(&mut self, index: usize) -> Result<Vec<u8>, SdtDecoderErrors> {
        self.decode_headers()?;

        let blocks = self.data_blocks().unwrap_or_default();
        let block = *blocks
            .get(index)
            .ok_or(SdtDecoderErrors::BlockIndexOutOfRange(index, blocks.len()))?;

        let size = self.stream.size()?;
        check_offset("data_offs", block.data_offs, size)?;

        self.stream.set_position(offset(block.data_offs))?;
        let length = usize::try_from(block.block_length).unwrap_or(usize::MAX);

        Ok(self.stream.read_bytes_vec(length)?)
    }

    /// Read data block `index` as photon counts
    ///
    /// Counts are little endian 16 bit values, a trailing odd byte
    /// is dropped. Compressed blocks are rejected with
    /// [`SdtDecoderErrors::CompressedBlock`], use
    /// [`read_data_block_bytes`](Self::read_data_block_bytes) for those.
    pub fn read_data_block(&mut self, index: usize) -> Result<Vec<u16>, SdtDecoderErrors> {
        self.decode_headers()?;

        let compressed = self
            .data_blocks()
            .and_then(|blocks| blocks.get(index))
            .is_some_and(|block| block.block_type().compressed);

        if compressed {
            return Err(SdtDecoderErrors::CompressedBlock(index));
        }
        let bytes = self.read_data_block_bytes(index)?;

        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    /// Return the underlying source
    pub fn into_inner(self) -> T {
        self.stream.consume()
    }

    fn check_header(&self, header: &FixedHeader) -> Result<(), SdtDecoderErrors> {
        if !header.is_valid() {
            if self.options.get_strict_mode() {
                return Err(SdtDecoderErrors::InvalidHeaderMarker(header.header_valid));
            }
            warn!(
                "Header validity marker is {:#06x}, the file may be incomplete",
                header.header_valid
            );
        }
        let expected = header.computed_checksum();

        if expected != header.chksum {
            if self.options.get_strict_mode() {
                return Err(SdtDecoderErrors::ChecksumMismatch {
                    expected,
                    found: header.chksum
                });
            }
            warn!(
                "Header checksum mismatch, expected {expected:#06x} but found {:#06x}",
                header.chksum
            );
        }
        Ok(())
    }

    fn check_offsets(&self, header: &FixedHeader, size: u64) -> Result<(), SdtDecoderErrors> {
        check_offset("info_offs", header.info_offs, size)?;

        if header.setup_length > 0 {
            check_offset("setup_offs", header.setup_offs, size)?;
        }
        if header.meas_desc_block_count() > 0 {
            check_offset("meas_desc_block_offs", header.meas_desc_block_offs, size)?;
        }
        let blocks = header.data_block_count();

        if blocks > 0 {
            check_offset("data_block_offs", header.data_block_offs, size)?;
        }
        if blocks > self.options.get_max_data_blocks() {
            return Err(SdtDecoderErrors::TooManyDataBlocks(
                self.options.get_max_data_blocks(),
                blocks
            ));
        }
        Ok(())
    }

    fn decode_info(&mut self, header: &FixedHeader) -> Result<InfoBlock, SdtDecoderErrors> {
        self.stream.set_position(offset(header.info_offs))?;
        let text = self
            .stream
            .read_string_lossy(usize::from(header.info_length))?;

        let info = InfoBlock::parse(&text)?;
        trace!("File id: {}", info.id);

        Ok(info)
    }

    /// Decode the setup text and the binary header behind it
    ///
    /// The binary header only exists when the sentinel leaves
    /// part of the declared setup length unread.
    fn decode_setup(
        &mut self, header: &FixedHeader
    ) -> Result<(Option<SetupBlock>, Option<ExtendedHeader>), SdtDecoderErrors> {
        if header.setup_length == 0 {
            return Ok((None, None));
        }
        let start = offset(header.setup_offs);
        let end = start + u64::from(header.setup_length);

        self.stream.set_position(start)?;
        let bytes = self
            .stream
            .read_bytes_vec(usize::from(header.setup_length))?;

        let binary_start = find_binary_start(&bytes);
        let text_end = binary_start.unwrap_or(bytes.len());
        let text = String::from_utf8_lossy(&bytes[..text_end]);

        let setup = SetupBlock::parse(&text);

        let mut extended = None;

        if let Some(index) = binary_start {
            let position = start + (index + BIN_PARA_BEGIN.len()) as u64;

            if position < end {
                self.stream.set_position(position)?;
                extended = Some(ExtendedHeader::read(&mut self.stream)?);
            }
        }
        Ok((Some(setup), extended))
    }

    fn decode_block_index(
        &mut self, header: &FixedHeader
    ) -> Result<Vec<DataBlockHeader>, SdtDecoderErrors> {
        let count = header.data_block_count();

        if count == 0 {
            return Ok(Vec::new());
        }
        self.stream.set_position(offset(header.data_block_offs))?;

        // never reserve more than the stream could hold
        let fits = usize::try_from(self.stream.remaining()?).unwrap_or(usize::MAX)
            / DATA_BLOCK_HEADER_SIZE;
        let mut blocks = Vec::with_capacity(min(count, fits));

        for _ in 0..count {
            blocks.push(DataBlockHeader::read(&mut self.stream)?);
        }
        Ok(blocks)
    }
}

/// Fold the geometry every block contributes
fn resolve_geometry(
    header: &FixedHeader, setup: Option<&SetupBlock>, measurement: Option<&MeasurementDescriptor>
) -> Geometry {
    let mut patches = Vec::with_capacity(3);

    if let Some(setup) = setup {
        patches.push(setup.scan_geometry());
    }
    if let Some(info) = measurement.and_then(|x| x.info.as_ref()) {
        let sp = setup.map(|x| &x.sp);

        patches.push(GeometryPatch::from_measure_info(
            info,
            sp,
            header.meas_desc_block_count()
        ));

        if let Some(extended) = measurement.and_then(|x| x.extended.as_ref()) {
            patches.push(GeometryPatch::from_extended_info(
                info,
                extended,
                header.data_block_count()
            ));
        }
    }
    Geometry::resolve(&patches)
}

/// An offset already checked against the file size
fn offset(value: i32) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn check_offset(field: &'static str, value: i32, size: u64) -> Result<(), SdtDecoderErrors> {
    match u64::try_from(value) {
        Ok(position) if position <= size => Ok(()),
        _ => Err(SdtDecoderErrors::OffsetOutOfBounds(
            field,
            i64::from(value),
            size
        ))
    }
}
