/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image geometry resolution
//!
//! Width, height, time bins, channels and timepoints come from
//! several blocks of the file that may disagree. Each block
//! contributes a [`GeometryPatch`], patches are applied in file
//! order and a later patch wins for every field it sets.

use crate::constants::MeasureMode;
use crate::measurement::{ExtendedMeasureInfo, MeasureInfo};
use crate::setup::SystemParameters;

/// Product of the strictly positive values, or 1 when there are none
///
/// ```
/// use tcspc_sdt::non_zero_product;
///
/// assert_eq!(non_zero_product(&[0, -5]), 1);
/// assert_eq!(non_zero_product(&[4, 0, 2]), 8);
/// ```
pub fn non_zero_product(values: &[i32]) -> i32 {
    values
        .iter()
        .filter(|x| **x > 0)
        .fold(1_i32, |acc, x| acc.saturating_mul(*x))
}

/// Resolved dimensions of the photon count data
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Geometry {
    pub width:      i32,
    pub height:     i32,
    pub time_bins:  i32,
    pub channels:   i32,
    pub timepoints: i32
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry {
            width:      1,
            height:     1,
            time_bins:  1,
            channels:   1,
            timepoints: 1
        }
    }
}

impl Geometry {
    pub fn apply(&mut self, patch: &GeometryPatch) {
        let overrides = [
            (&mut self.width, patch.width),
            (&mut self.height, patch.height),
            (&mut self.time_bins, patch.time_bins),
            (&mut self.channels, patch.channels),
            (&mut self.timepoints, patch.timepoints)
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    /// Fold `patches` left to right over the default geometry
    pub fn resolve<'a, I>(patches: I) -> Geometry
    where
        I: IntoIterator<Item = &'a GeometryPatch>
    {
        let mut geometry = Geometry::default();

        for patch in patches {
            geometry.apply(patch);
        }
        geometry
    }
}

/// Fields a single block contributes to the geometry, `None` leaves a field alone
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GeometryPatch {
    pub width:      Option<i32>,
    pub height:     Option<i32>,
    pub time_bins:  Option<i32>,
    pub channels:   Option<i32>,
    pub timepoints: Option<i32>
}

pub(crate) fn positive(value: i32) -> Option<i32> {
    (value > 0).then_some(value)
}

impl GeometryPatch {
    /// Contribution of the first measurement descriptor
    ///
    /// `stopt` always sets the timepoints, scan fields only when
    /// positive. Single point modes collapse the image to 1x1, FIFO
    /// image mode takes the image size from the setup and one channel
    /// per descriptor block. Without a setup block FIFO image mode keeps
    /// the scan size.
    pub fn from_measure_info(
        info: &MeasureInfo, sp: Option<&SystemParameters>, meas_desc_blocks: usize
    ) -> GeometryPatch {
        let mut patch = GeometryPatch {
            width: positive(info.scan_x),
            height: positive(info.scan_y),
            time_bins: positive(i32::from(info.adc_re)),
            timepoints: Some(i32::from(info.stopt)),
            ..Default::default()
        };
        if info.scan_rx > 0 || info.scan_ry > 0 {
            patch.channels = Some(non_zero_product(&[info.scan_rx, info.scan_ry]));
        }

        match info.mode() {
            mode if mode.is_single_point() => {
                patch.width = Some(1);
                patch.height = Some(1);
            }
            MeasureMode::FifoImage => {
                if let Some(sp) = sp {
                    patch.width = Some(sp.img_x);
                    patch.height = Some(sp.img_y);
                }
                patch.channels = Some(i32::try_from(meas_desc_blocks).unwrap_or(i32::MAX));
            }
            _ => ()
        }
        patch
    }

    /// Final FIFO image correction from the extended measurement info
    ///
    /// Returns an empty patch unless the file is in FIFO image mode.
    pub fn from_extended_info(
        info: &MeasureInfo, extended: &ExtendedMeasureInfo, data_blocks: usize
    ) -> GeometryPatch {
        if info.mode() != MeasureMode::FifoImage {
            return GeometryPatch::default();
        }
        let blocks = i32::try_from(data_blocks).unwrap_or(i32::MAX);

        GeometryPatch {
            width: positive(extended.image_x),
            height: positive(extended.image_y),
            channels: Some(non_zero_product(&[info.scan_rx, info.scan_ry]).saturating_mul(blocks)),
            ..Default::default()
        }
    }
}
