/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Binary setup header trailing the setup text
//!
//! All offsets stored in these records are relative to
//! [`ExtendedHeader::base`], not to the start of the file.

use tcspc_core::bytestream::{ByteReader, ByteSource};
use tcspc_core::log::trace;

use crate::errors::SdtDecoderErrors;

/// Location of an optional sub block, absent when `offs` is zero
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OffsetSize {
    pub offs: u32,
    pub size: u32
}

impl OffsetSize {
    fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<OffsetSize, SdtDecoderErrors> {
        Ok(OffsetSize {
            offs: stream.get_u32_le_err()?,
            size: stream.get_u32_le_err()?
        })
    }

    pub const fn is_present(&self) -> bool {
        self.offs != 0
    }
}

/// Read the record behind `location` when it is present
///
/// Seeks to `base + location.offs` first, the stream is left after
/// the decoded record.
fn read_optional<T, R, F>(
    stream: &mut ByteReader<T>, base: u64, location: OffsetSize, decode: F
) -> Result<Option<R>, SdtDecoderErrors>
where
    T: ByteSource,
    F: FnOnce(&mut ByteReader<T>) -> Result<R, SdtDecoderErrors>
{
    if !location.is_present() {
        return Ok(None);
    }
    stream.set_position(base + u64::from(location.offs))?;
    decode(stream).map(Some)
}

/// Header of the MCS image sub block
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct McsImageHeader {
    pub revision:        u16,
    pub frame_count:     u32,
    pub image_x:         u32,
    pub image_y:         u32,
    pub image_rx:        u32,
    pub image_ry:        u32,
    pub time_resolution: f32,
    pub pixel_time:      f32,
    pub line_time:       f32,
    pub frame_time:      f32,
    pub data_offs:       u32,
    pub data_size:       u32
}

impl McsImageHeader {
    pub fn read<T: ByteSource>(
        stream: &mut ByteReader<T>
    ) -> Result<McsImageHeader, SdtDecoderErrors> {
        Ok(McsImageHeader {
            revision:        stream.get_u16_le_err()?,
            frame_count:     stream.get_u32_le_err()?,
            image_x:         stream.get_u32_le_err()?,
            image_y:         stream.get_u32_le_err()?,
            image_rx:        stream.get_u32_le_err()?,
            image_ry:        stream.get_u32_le_err()?,
            time_resolution: stream.get_f32_le_err()?,
            pixel_time:      stream.get_f32_le_err()?,
            line_time:       stream.get_f32_le_err()?,
            frame_time:      stream.get_f32_le_err()?,
            data_offs:       stream.get_u32_le_err()?,
            data_size:       stream.get_u32_le_err()?
        })
    }
}

/// Second level table of sub block locations
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinHeaderExt {
    pub mcs_img:    OffsetSize,
    pub mom:        OffsetSize,
    pub syspar_ext: OffsetSize,
    pub image:      OffsetSize,
    pub mcs_trace:  OffsetSize,
    pub mcs_fcs:    OffsetSize,
    pub mcs_ida:    OffsetSize,
    pub mcs_lda:    OffsetSize,
    pub sdt_meas:   OffsetSize,
    pub reserve:    OffsetSize,
    /// Decoded when `mcs_img` is present
    pub mcs_image:  Option<McsImageHeader>
}

impl BinHeaderExt {
    fn read<T: ByteSource>(
        stream: &mut ByteReader<T>, base: u64
    ) -> Result<BinHeaderExt, SdtDecoderErrors> {
        let mut ext = BinHeaderExt {
            mcs_img: OffsetSize::read(stream)?,
            mom: OffsetSize::read(stream)?,
            syspar_ext: OffsetSize::read(stream)?,
            image: OffsetSize::read(stream)?,
            mcs_trace: OffsetSize::read(stream)?,
            mcs_fcs: OffsetSize::read(stream)?,
            mcs_ida: OffsetSize::read(stream)?,
            mcs_lda: OffsetSize::read(stream)?,
            sdt_meas: OffsetSize::read(stream)?,
            reserve: OffsetSize::read(stream)?,
            mcs_image: None
        };
        ext.mcs_image = read_optional(stream, base, ext.mcs_img, McsImageHeader::read)?;

        Ok(ext)
    }
}

/// Binary setup header found after `BIN_PARA_BEGIN:\0`
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtendedHeader {
    /// Absolute file position every offset below is relative to
    pub base:        u64,
    pub soft_rev:    u32,
    pub fcs_old:     OffsetSize,
    pub gr1:         OffsetSize,
    pub fcs:         OffsetSize,
    pub fida:        OffsetSize,
    pub filda:       OffsetSize,
    pub gr2:         OffsetSize,
    pub hst:         OffsetSize,
    pub gvd:         OffsetSize,
    pub fit:         OffsetSize,
    pub extdev:      OffsetSize,
    pub bin_hdr_ext: OffsetSize,
    /// Decoded when `bin_hdr_ext` is present
    pub extension:   Option<BinHeaderExt>
}

impl ExtendedHeader {
    /// Read the binary setup header at the current stream position
    pub fn read<T: ByteSource>(
        stream: &mut ByteReader<T>
    ) -> Result<ExtendedHeader, SdtDecoderErrors> {
        // reserved
        stream.skip(4)?;
        let base = stream.position()?;

        let mut header = ExtendedHeader {
            base,
            soft_rev: stream.get_u32_le_err()?,
            fcs_old: OffsetSize::read(stream)?,
            gr1: OffsetSize::read(stream)?,
            fcs: OffsetSize::read(stream)?,
            fida: OffsetSize::read(stream)?,
            filda: OffsetSize::read(stream)?,
            gr2: OffsetSize::read(stream)?,
            hst: OffsetSize::read(stream)?,
            gvd: OffsetSize::read(stream)?,
            fit: OffsetSize::read(stream)?,
            extdev: OffsetSize::read(stream)?,
            bin_hdr_ext: OffsetSize::read(stream)?,
            extension: None
        };
        trace!(
            "Binary setup header at {base}, software revision {}",
            header.soft_rev
        );

        header.extension = read_optional(stream, base, header.bin_hdr_ext, |s| {
            BinHeaderExt::read(s, base)
        })?;

        Ok(header)
    }

    /// The MCS image header, if both levels of the table point to one
    pub fn mcs_image(&self) -> Option<&McsImageHeader> {
        self.extension.as_ref().and_then(|x| x.mcs_image.as_ref())
    }
}
