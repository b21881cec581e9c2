/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Measurement description blocks
//!
//! A block is a chain of records that grew with instrument software
//! releases. Which records a file carries follows from the declared
//! block length alone, see [`present_records`].

use alloc::string::String;

use tcspc_core::bytestream::{ByteReader, ByteSource};
use tcspc_core::log::trace;

use crate::constants::{MeasureMode, MEAS_DESC_THRESHOLDS};
use crate::errors::SdtDecoderErrors;

/// Number of records a block of `length` bytes holds
///
/// Always a prefix of `MeasureInfo, MeasStopInfo, MeasFCSInfo,
/// ExtendedMeasureInfo, MeasHISTInfo`, zero for negative lengths.
pub fn present_records(length: i16) -> usize {
    let Ok(length) = usize::try_from(length) else {
        return 0;
    };
    MEAS_DESC_THRESHOLDS
        .iter()
        .take_while(|threshold| **threshold <= length)
        .count()
}

/// Acquisition settings in effect for a measurement
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasureInfo {
    pub time:                 String,
    pub date:                 String,
    pub mod_ser_no:           String,
    pub meas_mode:            i16,
    pub cfd_ll:               f32,
    pub cfd_lh:               f32,
    pub cfd_zc:               f32,
    pub cfd_hf:               f32,
    pub syn_zc:               f32,
    pub syn_fd:               i16,
    pub syn_fq:               f32,
    pub syn_hf:               f32,
    pub tac_r:                f32,
    pub tac_g:                i16,
    pub tac_of:               f32,
    pub tac_ll:               f32,
    pub tac_lh:               f32,
    /// ADC resolution, the number of time bins per curve
    pub adc_re:               i16,
    pub eal_de:               i16,
    pub ncx:                  i16,
    pub page:                 i16,
    pub col_t:                f32,
    pub rep_t:                f32,
    /// Number of timepoints recorded
    pub stopt:                i16,
    pub overfl:               u8,
    pub use_motor:            i16,
    pub steps:                i16,
    pub offset:               f32,
    pub dither:               i16,
    pub incr:                 i16,
    pub mem_bank:             i16,
    pub mod_type:             String,
    pub syn_th:               f32,
    pub dead_time_comp:       i16,
    pub polarity_l:           i16,
    pub polarity_f:           i16,
    pub polarity_p:           i16,
    pub linediv:              i16,
    pub accumulate:           i16,
    pub flbck_y:              i32,
    pub flbck_x:              i32,
    pub bord_u:               i32,
    pub bord_l:               i32,
    pub pix_time:             f32,
    pub pix_clk:              i16,
    pub trigger:              i16,
    pub scan_x:               i32,
    pub scan_y:               i32,
    pub scan_rx:              i32,
    pub scan_ry:              i32,
    pub fifo_typ:             i16,
    pub epx_div:              i32,
    pub mod_type_code:        u16,
    pub overflow_corr_factor: f32,
    pub adc_zoom:             i32,
    pub cycles:               i32
}

impl MeasureInfo {
    pub fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<MeasureInfo, SdtDecoderErrors> {
        Ok(MeasureInfo {
            time:                 stream.read_fixed_string(9)?,
            date:                 stream.read_fixed_string(11)?,
            mod_ser_no:           stream.read_fixed_string(16)?,
            meas_mode:            stream.get_i16_le_err()?,
            cfd_ll:               stream.get_f32_le_err()?,
            cfd_lh:               stream.get_f32_le_err()?,
            cfd_zc:               stream.get_f32_le_err()?,
            cfd_hf:               stream.get_f32_le_err()?,
            syn_zc:               stream.get_f32_le_err()?,
            syn_fd:               stream.get_i16_le_err()?,
            syn_fq:               stream.get_f32_le_err()?,
            syn_hf:               stream.get_f32_le_err()?,
            tac_r:                stream.get_f32_le_err()?,
            tac_g:                stream.get_i16_le_err()?,
            tac_of:               stream.get_f32_le_err()?,
            tac_ll:               stream.get_f32_le_err()?,
            tac_lh:               stream.get_f32_le_err()?,
            adc_re:               stream.get_i16_le_err()?,
            eal_de:               stream.get_i16_le_err()?,
            ncx:                  stream.get_i16_le_err()?,
            page:                 stream.get_i16_le_err()?,
            col_t:                stream.get_f32_le_err()?,
            rep_t:                stream.get_f32_le_err()?,
            stopt:                stream.get_i16_le_err()?,
            overfl:               stream.get_u8_err()?,
            use_motor:            stream.get_i16_le_err()?,
            steps:                stream.get_i16_le_err()?,
            offset:               stream.get_f32_le_err()?,
            dither:               stream.get_i16_le_err()?,
            incr:                 stream.get_i16_le_err()?,
            mem_bank:             stream.get_i16_le_err()?,
            mod_type:             stream.read_fixed_string(16)?,
            syn_th:               stream.get_f32_le_err()?,
            dead_time_comp:       stream.get_i16_le_err()?,
            polarity_l:           stream.get_i16_le_err()?,
            polarity_f:           stream.get_i16_le_err()?,
            polarity_p:           stream.get_i16_le_err()?,
            linediv:              stream.get_i16_le_err()?,
            accumulate:           stream.get_i16_le_err()?,
            flbck_y:              stream.get_i32_le_err()?,
            flbck_x:              stream.get_i32_le_err()?,
            bord_u:               stream.get_i32_le_err()?,
            bord_l:               stream.get_i32_le_err()?,
            pix_time:             stream.get_f32_le_err()?,
            pix_clk:              stream.get_i16_le_err()?,
            trigger:              stream.get_i16_le_err()?,
            scan_x:               stream.get_i32_le_err()?,
            scan_y:               stream.get_i32_le_err()?,
            scan_rx:              stream.get_i32_le_err()?,
            scan_ry:              stream.get_i32_le_err()?,
            fifo_typ:             stream.get_i16_le_err()?,
            epx_div:              stream.get_i32_le_err()?,
            mod_type_code:        stream.get_u16_le_err()?,
            overflow_corr_factor: stream.get_f32_le_err()?,
            adc_zoom:             stream.get_i32_le_err()?,
            cycles:               stream.get_i32_le_err()?
        })
    }

    pub const fn mode(&self) -> MeasureMode {
        MeasureMode::from_int(self.meas_mode)
    }
}

/// Why and when the measurement stopped
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasStopInfo {
    pub status:        u16,
    pub flags:         u16,
    pub stop_time:     f32,
    pub cur_step:      i32,
    pub cur_cycle:     i32,
    pub cur_page:      i32,
    pub min_sync_rate: f32,
    pub min_cfd_rate:  f32,
    pub min_tac_rate:  f32,
    pub min_adc_rate:  f32,
    pub max_sync_rate: f32,
    pub max_cfd_rate:  f32,
    pub max_tac_rate:  f32,
    pub max_adc_rate:  f32,
    pub reserved1:     i32,
    pub reserved2:     f32
}

impl MeasStopInfo {
    pub fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<MeasStopInfo, SdtDecoderErrors> {
        Ok(MeasStopInfo {
            status:        stream.get_u16_le_err()?,
            flags:         stream.get_u16_le_err()?,
            stop_time:     stream.get_f32_le_err()?,
            cur_step:      stream.get_i32_le_err()?,
            cur_cycle:     stream.get_i32_le_err()?,
            cur_page:      stream.get_i32_le_err()?,
            min_sync_rate: stream.get_f32_le_err()?,
            min_cfd_rate:  stream.get_f32_le_err()?,
            min_tac_rate:  stream.get_f32_le_err()?,
            min_adc_rate:  stream.get_f32_le_err()?,
            max_sync_rate: stream.get_f32_le_err()?,
            max_cfd_rate:  stream.get_f32_le_err()?,
            max_tac_rate:  stream.get_f32_le_err()?,
            max_adc_rate:  stream.get_f32_le_err()?,
            reserved1:     stream.get_i32_le_err()?,
            reserved2:     stream.get_f32_le_err()?
        })
    }
}

/// FCS calculation parameters
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasFCSInfo {
    pub chan:           u16,
    pub fcs_decay_calc: u16,
    /// Macro time resolution in 0.1 ns units
    pub mt_resol:       u32,
    pub cortime:        f32,
    pub calc_photons:   u32,
    pub fcs_points:     i32,
    pub end_time:       f32,
    pub overruns:       u16,
    pub fcs_type:       u16,
    pub cross_chan:     u16,
    pub module:         u16,
    pub cross_mod:      u16,
    pub cross_mt_resol: u32
}

impl MeasFCSInfo {
    pub fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<MeasFCSInfo, SdtDecoderErrors> {
        Ok(MeasFCSInfo {
            chan:           stream.get_u16_le_err()?,
            fcs_decay_calc: stream.get_u16_le_err()?,
            mt_resol:       stream.get_u32_le_err()?,
            cortime:        stream.get_f32_le_err()?,
            calc_photons:   stream.get_u32_le_err()?,
            fcs_points:     stream.get_i32_le_err()?,
            end_time:       stream.get_f32_le_err()?,
            overruns:       stream.get_u16_le_err()?,
            fcs_type:       stream.get_u16_le_err()?,
            cross_chan:     stream.get_u16_le_err()?,
            module:         stream.get_u16_le_err()?,
            cross_mod:      stream.get_u16_le_err()?,
            cross_mt_resol: stream.get_u32_le_err()?
        })
    }
}

/// Image geometry of FIFO image measurements
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtendedMeasureInfo {
    pub image_x:      i32,
    pub image_y:      i32,
    pub image_rx:     i32,
    pub image_ry:     i32,
    pub xy_gain:      i16,
    pub master_clock: i16,
    pub adc_de:       i16,
    pub det_type:     i16,
    pub x_axis:       i16
}

impl ExtendedMeasureInfo {
    pub fn read<T: ByteSource>(
        stream: &mut ByteReader<T>
    ) -> Result<ExtendedMeasureInfo, SdtDecoderErrors> {
        Ok(ExtendedMeasureInfo {
            image_x:      stream.get_i32_le_err()?,
            image_y:      stream.get_i32_le_err()?,
            image_rx:     stream.get_i32_le_err()?,
            image_ry:     stream.get_i32_le_err()?,
            xy_gain:      stream.get_i16_le_err()?,
            master_clock: stream.get_i16_le_err()?,
            adc_de:       stream.get_i16_le_err()?,
            det_type:     stream.get_i16_le_err()?,
            x_axis:       stream.get_i16_le_err()?
        })
    }
}

/// Histogram (FIDA, FILDA, MCS) parameters
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasHISTInfo {
    pub fida_time:    f32,
    pub filda_time:   f32,
    pub fida_points:  i32,
    pub filda_points: i32,
    pub mcs_time:     f32,
    pub mcs_points:   i32
}

impl MeasHISTInfo {
    pub fn read<T: ByteSource>(stream: &mut ByteReader<T>) -> Result<MeasHISTInfo, SdtDecoderErrors> {
        Ok(MeasHISTInfo {
            fida_time:    stream.get_f32_le_err()?,
            filda_time:   stream.get_f32_le_err()?,
            fida_points:  stream.get_i32_le_err()?,
            filda_points: stream.get_i32_le_err()?,
            mcs_time:     stream.get_f32_le_err()?,
            mcs_points:   stream.get_i32_le_err()?
        })
    }
}

/// The records of one measurement description block
///
/// Records a block is too short for are `None`.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeasurementDescriptor {
    pub info:     Option<MeasureInfo>,
    pub stop:     Option<MeasStopInfo>,
    pub fcs:      Option<MeasFCSInfo>,
    pub extended: Option<ExtendedMeasureInfo>,
    pub hist:     Option<MeasHISTInfo>
}

impl MeasurementDescriptor {
    /// Read the records a block of `length` bytes holds,
    /// starting at the current stream position
    pub fn read<T: ByteSource>(
        stream: &mut ByteReader<T>, length: i16
    ) -> Result<MeasurementDescriptor, SdtDecoderErrors> {
        let records = present_records(length);
        let mut descriptor = MeasurementDescriptor::default();

        trace!("Measurement block of {length} bytes holds {records} records");

        if records > 0 {
            descriptor.info = Some(MeasureInfo::read(stream)?);
        }
        if records > 1 {
            descriptor.stop = Some(MeasStopInfo::read(stream)?);
        }
        if records > 2 {
            descriptor.fcs = Some(MeasFCSInfo::read(stream)?);
        }
        if records > 3 {
            descriptor.extended = Some(ExtendedMeasureInfo::read(stream)?);
        }
        if records > 4 {
            descriptor.hist = Some(MeasHISTInfo::read(stream)?);
        }
        Ok(descriptor)
    }

    /// Number of records present
    pub fn record_count(&self) -> usize {
        [
            self.info.is_some(),
            self.stop.is_some(),
            self.fcs.is_some(),
            self.extended.is_some(),
            self.hist.is_some()
        ]
        .iter()
        .filter(|x| **x)
        .count()
    }
}
