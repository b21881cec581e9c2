/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::fs::read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use xxhash_rust::xxh3::xxh3_128;

pub mod fixture;
mod sdt;

/// Measurement fields a scenario sets, everything else is written as zero
#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct JsonMeasurement {
    pub meas_mode: i16,
    pub adc_re:    i16,
    pub stopt:     i16,
    pub scan_x:    i32,
    pub scan_y:    i32,
    pub scan_rx:   i32,
    pub scan_ry:   i32,
    pub image_x:   i32,
    pub image_y:   i32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct JsonGeometry {
    pub width:      i32,
    pub height:     i32,
    pub time_bins:  i32,
    pub channels:   i32,
    pub timepoints: i32
}

#[derive(Clone, Deserialize, Debug)]
pub struct TestEntry {
    pub name:                   String,
    pub revision:               u16,
    pub info_length:            Option<u16>,
    pub setup:                  Vec<String>,
    pub setup_length:           Option<u16>,
    pub meas_desc_blocks:       i16,
    pub meas_desc_block_length: i16,
    #[serde(default)]
    pub measurement:            JsonMeasurement,
    /// Payload size of every data block in bytes
    pub data_blocks:            Vec<usize>,
    /// Number of measurement records expected
    pub records:                usize,
    pub expected:               JsonGeometry,
    pub comment:                Option<String>
}

pub fn scenario_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sdt.json")
}

pub fn read_scenarios() -> Vec<TestEntry> {
    let json_file = read(scenario_path()).unwrap();

    serde_json::from_slice(&json_file).unwrap()
}

fn hash(contents: &[u8]) -> u128 {
    xxh3_128(contents)
}
