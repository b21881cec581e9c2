/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

/// Size of the fixed file header at offset 0
pub const FIXED_HEADER_SIZE: usize = 42;

/// `header_valid` value of a file written completely
pub const BH_HEADER_VALID: u16 = 0x5555;
/// `header_valid` value of a file whose writer didn't finish
pub const BH_HEADER_NOT_VALID: u16 = 0x1111;
/// Sum of all 16-bit words of a fixed header, checksum included
pub const BH_HEADER_CHKSUM: u16 = 0x55aa;

/// `no_of_data_blocks` value meaning the real count lives in `reserved1`
pub const DATA_BLOCK_COUNT_IN_RESERVED: i16 = 0x7fff;

/// Marks the end of setup text and the start of the binary setup header
pub const BIN_PARA_BEGIN: &[u8] = b"BIN_PARA_BEGIN:\0";

/// Size of a single data block header
pub const DATA_BLOCK_HEADER_SIZE: usize = 22;

pub const MEASURE_INFO_SIZE: usize = 211;
pub const MEAS_STOP_INFO_SIZE: usize = 60;
pub const MEAS_FCS_INFO_SIZE: usize = 38;
pub const EXTENDED_MEASURE_INFO_SIZE: usize = 26;
pub const MEAS_HIST_INFO_SIZE: usize = 24;

/// Minimum `meas_desc_block_length` for each measurement sub-record,
/// in the order they appear in the block
pub const MEAS_DESC_THRESHOLDS: [usize; 5] = [
    MEASURE_INFO_SIZE,
    MEASURE_INFO_SIZE + MEAS_STOP_INFO_SIZE,
    MEASURE_INFO_SIZE + MEAS_STOP_INFO_SIZE + MEAS_FCS_INFO_SIZE,
    MEASURE_INFO_SIZE + MEAS_STOP_INFO_SIZE + MEAS_FCS_INFO_SIZE + EXTENDED_MEASURE_INFO_SIZE,
    MEASURE_INFO_SIZE
        + MEAS_STOP_INFO_SIZE
        + MEAS_FCS_INFO_SIZE
        + EXTENDED_MEASURE_INFO_SIZE
        + MEAS_HIST_INFO_SIZE
];

/// For .set files (setup only)
pub const SETUP_IDENTIFIER: &str = "SPC Setup Script File";
/// For normal .sdt files (setup + data)
pub const DATA_IDENTIFIER: &str = "SPC Setup & Data File";
/// Written automatically in continuous flow mode (no setup, only data)
pub const FLOW_DATA_IDENTIFIER: &str = "SPC Flow Data File";
/// Written by the `SPC_save_data_to_sdtfile` DLL function (no setup, only data)
pub const DLL_DATA_IDENTIFIER: &str = "SPC DLL Data File";
/// Written in FIFO mode, decay, FCS, FIDA, FILDA and MCS curves per routing channel
pub const FCS_DATA_IDENTIFIER: &str = "SPC FCS Data File";

/// What kind of file the identification line announces
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FileKind {
    SetupOnly,
    SetupAndData,
    FlowData,
    DllData,
    FcsData,
    Unknown
}

impl FileKind {
    pub fn from_identifier(id: &str) -> FileKind {
        let id = id.trim();

        if id.starts_with(SETUP_IDENTIFIER) {
            FileKind::SetupOnly
        } else if id.starts_with(DATA_IDENTIFIER) {
            FileKind::SetupAndData
        } else if id.starts_with(FLOW_DATA_IDENTIFIER) {
            FileKind::FlowData
        } else if id.starts_with(DLL_DATA_IDENTIFIER) {
            FileKind::DllData
        } else if id.starts_with(FCS_DATA_IDENTIFIER) {
            FileKind::FcsData
        } else {
            FileKind::Unknown
        }
    }
}

/// Acquisition modes the dimension resolver treats specially
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MeasureMode {
    /// Single decay curve, no scanning
    SinglePoint,
    /// Single decay curves in oscilloscope mode
    Oscilloscope,
    /// One image channel per data block
    FifoImage,
    Other(i16)
}

impl MeasureMode {
    pub const fn from_int(int: i16) -> MeasureMode {
        match int {
            0 => MeasureMode::SinglePoint,
            1 => MeasureMode::Oscilloscope,
            13 => MeasureMode::FifoImage,
            other => MeasureMode::Other(other)
        }
    }

    /// Whether the mode records one point, forcing a 1x1 image
    pub const fn is_single_point(self) -> bool {
        matches!(self, MeasureMode::SinglePoint | MeasureMode::Oscilloscope)
    }
}
