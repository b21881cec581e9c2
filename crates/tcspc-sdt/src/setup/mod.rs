/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Setup block decoding
//!
//! The setup block is text holding the instrument configuration,
//! optionally followed by a binary header after `BIN_PARA_BEGIN:\0`.

use alloc::vec::Vec;

use tcspc_core::log::{debug, trace};

use crate::constants::BIN_PARA_BEGIN;
use crate::geometry::{non_zero_product, positive, GeometryPatch};
pub use crate::setup::records::{
    Assign, DisplayParameters, PrintSettings, SetupValue, SystemParameters
};
use crate::setup::tokens::{key_value, trace_row, Sections, TRACE_ROWS, TRACE_VALUES};
pub use crate::setup::tokens::WindowInterval;

mod records;
mod tokens;

/// Position of the binary header sentinel inside raw setup bytes
///
/// A sentinel at index zero doesn't count, the text part would be empty.
pub fn find_binary_start(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(BIN_PARA_BEGIN.len())
        .position(|window| window == BIN_PARA_BEGIN)
        .filter(|index| *index > 0)
}

/// Decoded setup text
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetupBlock {
    pub pr:    PrintSettings,
    pub sp:    SystemParameters,
    pub di:    DisplayParameters,
    /// Trace rows `TR_1..=TR_16`, `None` for rows the file doesn't set
    pub tr:    [Option<[i32; TRACE_VALUES]>; TRACE_ROWS],
    pub wi:    Vec<WindowInterval>,
    /// Geometry contributed by `SP_SCAN_*` tokens in the order they appeared
    #[cfg_attr(feature = "serde", serde(skip))]
    scan_geometry: GeometryPatch
}

impl SetupBlock {
    /// Parse setup text, the binary part must already be cut off
    ///
    /// Unknown keys and values that don't parse are skipped.
    pub fn parse(text: &str) -> SetupBlock {
        let sections = Sections::partition(text);
        let mut setup = SetupBlock::default();

        for line in &sections.pr {
            store_keyed(line, "PR_", |k, v| setup.pr.set(k, v));
        }
        for line in &sections.sp {
            if let Some(key) = store_keyed(line, "SP_", |k, v| setup.sp.set(k, v)) {
                setup.scan_geometry.apply_scan_token(key, &setup.sp);
            }
        }
        for line in &sections.di {
            store_keyed(line, "DI_", |k, v| setup.di.set(k, v));
        }
        for line in &sections.tr {
            match trace_row(line) {
                Some((row, values)) => setup.tr[row] = Some(values),
                None => debug!("Skipping trace token {line:?}")
            }
        }
        for line in &sections.wi {
            match WindowInterval::parse(line) {
                Some(wi) => setup.wi.push(wi),
                None => debug!("Skipping window interval token {line:?}")
            }
        }
        trace!(
            "Setup: {} PR, {} SP, {} DI, {} TR, {} WI tokens",
            sections.pr.len(),
            sections.sp.len(),
            sections.di.len(),
            sections.tr.len(),
            sections.wi.len()
        );

        setup
    }

    /// Geometry implied by the scan settings
    pub fn scan_geometry(&self) -> GeometryPatch {
        self.scan_geometry
    }
}

/// Run `store` for a keyed token, returning the stored key without its prefix
fn store_keyed<'a, F>(line: &'a str, prefix: &str, store: F) -> Option<&'a str>
where
    F: FnOnce(&str, &str) -> Assign
{
    let Some((full_key, value)) = key_value(line) else {
        debug!("Skipping malformed setup token {line:?}");
        return None;
    };
    let key = full_key.strip_prefix(prefix).unwrap_or(full_key);

    match store(key, value) {
        Assign::Stored => Some(key),
        Assign::UnknownKey => {
            debug!("Ignoring unknown setup key {full_key}");
            None
        }
        Assign::BadValue => {
            debug!("Ignoring value {value:?} for setup key {full_key}");
            None
        }
    }
}

impl GeometryPatch {
    /// Fold one stored `SP` scan token into the patch
    ///
    /// `SCAN_X`/`SCAN_Y` replace width and height as they appear,
    /// `SCAN_RX`/`SCAN_RY` multiply into the channel count. A positive
    /// `ADC_RE` gives the time bins.
    fn apply_scan_token(&mut self, key: &str, sp: &SystemParameters) {
        match key {
            "SCAN_X" => self.width = Some(sp.scan_x),
            "SCAN_Y" => self.height = Some(sp.scan_y),
            "ADC_RE" => self.time_bins = positive(sp.adc_re).or(self.time_bins),
            "SCAN_RX" => {
                self.channels = Some(non_zero_product(&[self.channels.unwrap_or(0), sp.scan_rx]));
            }
            "SCAN_RY" => {
                self.channels = Some(non_zero_product(&[self.channels.unwrap_or(0), sp.scan_ry]));
            }
            _ => ()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::setup::{find_binary_start, SetupBlock};

    const SETUP: &str = "*SETUP\r
  #PR [PR_DEVICE_NAME,S,PDF printer]\r
  #PR [PR_WIDTH,I,1200]\r
  #SP [SP_MODE,I,9]\r
  #SP [SP_SCAN_X,I,128]\r
  #SP [SP_SCAN_Y,I,128]\r
  #SP [SP_SCAN_RX,I,16]\r
  #SP [SP_SCAN_RY,I,1]\r
  #SP [SP_ADC_RE,I,256]\r
  #SP [SP_FUTURE_KEY,I,42]\r
  #SP [SP_IMG_X,I,wide]\r
  #DI [DI_ZOOM,F,2.5]\r
  #TR [TR_3,1,2,3,4,5,6,7,8]\r
  #WI #2 *NO *0 [0,255]\r
*END\r
";

    #[test]
    fn parses_all_sections() {
        let setup = SetupBlock::parse(SETUP);

        assert_eq!(setup.pr.device_name, "PDF printer");
        assert_eq!(setup.pr.width, 1200);
        assert_eq!(setup.sp.mode, 9);
        assert_eq!(setup.sp.adc_re, 256);
        // bad value leaves the default
        assert_eq!(setup.sp.img_x, 0);
        assert_eq!(setup.di.zoom, 2.5);
        assert_eq!(setup.tr[2], Some([1, 2, 3, 4, 5, 6, 7, 8]));
        assert!(setup.tr[0].is_none());

        assert_eq!(setup.wi.len(), 1);
        let wi = setup.wi[0];
        assert_eq!(
            (wi.channel, wi.enabled, wi.sub_index, wi.range_from, wi.range_to),
            (2, false, 0, 0.0, 255.0)
        );
    }

    #[test]
    fn scan_tokens_build_geometry() {
        let patch = SetupBlock::parse(SETUP).scan_geometry();

        assert_eq!(patch.width, Some(128));
        assert_eq!(patch.height, Some(128));
        assert_eq!(patch.channels, Some(16));
        assert_eq!(patch.time_bins, Some(256));
        assert_eq!(patch.timepoints, None);
    }

    #[test]
    fn adc_resolution_needs_a_positive_value() {
        let patch = SetupBlock::parse("  #SP [SP_ADC_RE,I,0]\n").scan_geometry();
        assert_eq!(patch.time_bins, None);

        let patch = SetupBlock::parse("  #SP [SP_ADC_RE,I,1024]\n  #SP [SP_ADC_RE,I,-1]\n")
            .scan_geometry();
        assert_eq!(patch.time_bins, Some(1024));
    }

    #[test]
    fn scan_x_applies_even_when_zero() {
        let patch = SetupBlock::parse("  #SP [SP_SCAN_X,I,0]\n  #SP [SP_SCAN_RY,I,0]\n")
            .scan_geometry();

        assert_eq!(patch.width, Some(0));
        assert_eq!(patch.channels, Some(1));
    }

    #[test]
    fn sentinel_splits_text_from_binary() {
        let mut bytes = b"*SETUP\n*END\n".to_vec();
        let text_end = bytes.len();
        bytes.extend_from_slice(b"BIN_PARA_BEGIN:\0");
        bytes.extend_from_slice(&[1, 2, 3]);

        assert_eq!(find_binary_start(&bytes), Some(text_end));
        assert_eq!(find_binary_start(b"BIN_PARA_BEGIN:\0rest"), None);
        assert_eq!(find_binary_start(b"*SETUP only"), None);
    }
}
