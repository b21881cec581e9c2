/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use crate::blocks::DataBlockHeader;
use crate::constants::{FileKind, MeasureMode};
use crate::extended::ExtendedHeader;
use crate::geometry::Geometry;
use crate::header::FixedHeader;
use crate::info::InfoBlock;
use crate::measurement::{MeasureInfo, MeasurementDescriptor};
use crate::setup::SetupBlock;

/// A decoded SDT file
///
/// Holds every header block of the file, the photon counts themselves
/// stay on disk and are read through
/// [`SdtDecoder::read_data_block`](crate::SdtDecoder::read_data_block).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SdtFile {
    pub header:          FixedHeader,
    /// Binary setup header, present when the setup text ends in `BIN_PARA_BEGIN:\0`
    pub extended_header: Option<ExtendedHeader>,
    pub info:            InfoBlock,
    /// `None` when the file declares an empty setup block
    pub setup:           Option<SetupBlock>,
    /// First measurement description block, `None` when the file has none
    pub measurement:     Option<MeasurementDescriptor>,
    pub data_blocks:     Vec<DataBlockHeader>,
    pub geometry:        Geometry
}

impl SdtFile {
    pub const fn width(&self) -> i32 {
        self.geometry.width
    }

    pub const fn height(&self) -> i32 {
        self.geometry.height
    }

    /// Number of time bins in a single decay curve
    pub const fn time_bins(&self) -> i32 {
        self.geometry.time_bins
    }

    pub const fn channels(&self) -> i32 {
        self.geometry.channels
    }

    pub const fn timepoints(&self) -> i32 {
        self.geometry.timepoints
    }

    pub fn file_kind(&self) -> FileKind {
        self.info.file_kind()
    }

    pub fn measure_info(&self) -> Option<&MeasureInfo> {
        self.measurement.as_ref().and_then(|x| x.info.as_ref())
    }

    /// Acquisition mode, `None` when the file has no measurement info
    pub fn measure_mode(&self) -> Option<MeasureMode> {
        self.measure_info().map(MeasureInfo::mode)
    }
}
