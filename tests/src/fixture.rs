/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Writer for synthetic SDT files
//!
//! Lays a file out as
//! `header | info | setup | measurement blocks | block headers | payloads`.

use crate::{JsonMeasurement, TestEntry};

const HEADER_SIZE: usize = 42;
const BLOCK_HEADER_SIZE: usize = 22;
const MEASURE_INFO_SIZE: usize = 211;
const FULL_MEASUREMENT_SIZE: usize = 359;
/// Offset of the extended measurement info inside a measurement block
const EXTENDED_INFO_OFFSET: usize = 309;

pub const SENTINEL: &[u8] = b"BIN_PARA_BEGIN:\0";

#[derive(Clone, Debug)]
pub struct SdtFixture {
    pub name:                   String,
    pub revision:               u16,
    pub info_length:            Option<u16>,
    pub setup_lines:            Vec<String>,
    /// Bytes written after the setup sentinel, no sentinel when `None`
    pub setup_binary:           Option<Vec<u8>>,
    pub setup_length:           Option<u16>,
    pub meas_desc_blocks:       i16,
    pub meas_desc_block_length: i16,
    pub measurement:            JsonMeasurement,
    pub payloads:               Vec<Vec<u8>>,
    /// Type tag written into every data block header
    pub block_type:             u16,
    pub header_valid:           u16,
    pub corrupt_checksum:       bool
}

impl Default for SdtFixture {
    fn default() -> Self {
        SdtFixture {
            name:                   "fixture".into(),
            revision:               655,
            info_length:            None,
            setup_lines:            Vec::new(),
            setup_binary:           None,
            setup_length:           None,
            meas_desc_blocks:       1,
            meas_desc_block_length: 512,
            measurement:            JsonMeasurement::default(),
            payloads:               Vec::new(),
            // measurement data, image decay content
            block_type:             0x0060,
            header_valid:           0x5555,
            corrupt_checksum:       false
        }
    }
}

/// Deterministic payload of `length` bytes
pub fn payload(seed: usize, length: usize) -> Vec<u8> {
    (0..length)
        .map(|i| ((i * 31 + seed * 7) % 251) as u8)
        .collect()
}

impl SdtFixture {
    pub fn from_entry(entry: &TestEntry) -> SdtFixture {
        SdtFixture {
            name: entry.name.clone(),
            revision: entry.revision,
            info_length: entry.info_length,
            setup_lines: entry.setup.clone(),
            setup_length: entry.setup_length,
            meas_desc_blocks: entry.meas_desc_blocks,
            meas_desc_block_length: entry.meas_desc_block_length,
            measurement: entry.measurement,
            payloads: entry
                .data_blocks
                .iter()
                .enumerate()
                .map(|(i, length)| payload(i, *length))
                .collect(),
            ..Default::default()
        }
    }

    pub fn info_text(&self) -> Vec<u8> {
        let mut text = format!(
            "*IDENTIFICATION\r\n  ID        : SPC Setup & Data File\r\n  Title     : {}\r\n  Version   : 1  781 M\r\n  Revision  : {}\r\n  Date      : 10:19:2026\r\n  Time      : 12:04:33\r\n  Author    : Unknown\r\n  Company   : Unknown\r\n  Contents  : synthetic\r\n*END\r\n\r\n",
            self.name, self.revision
        )
        .into_bytes();
        pad(&mut text, self.info_length);
        text
    }

    pub fn setup_bytes(&self) -> Vec<u8> {
        let mut bytes = b"*SETUP\r\n".to_vec();

        for line in &self.setup_lines {
            bytes.extend_from_slice(line.as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        bytes.extend_from_slice(b"*END\r\n\r\n");

        if let Some(binary) = &self.setup_binary {
            bytes.extend_from_slice(SENTINEL);
            bytes.extend_from_slice(binary);
        }
        pad(&mut bytes, self.setup_length);
        bytes
    }

    /// One measurement block, cut to the declared length
    pub fn measurement_block(&self) -> Vec<u8> {
        let m = &self.measurement;
        let mut block = vec![0_u8; FULL_MEASUREMENT_SIZE.max(self.block_length())];

        block[0..8].copy_from_slice(b"12:04:33");
        block[9..19].copy_from_slice(b"10-19-2026");
        block[20..28].copy_from_slice(b"A1234567");
        put(&mut block, 36, &m.meas_mode.to_le_bytes());
        put(&mut block, 86, &m.adc_re.to_le_bytes());
        put(&mut block, 102, &m.stopt.to_le_bytes());
        put(&mut block, 119, b"SPC-150");
        put(&mut block, 175, &m.scan_x.to_le_bytes());
        put(&mut block, 179, &m.scan_y.to_le_bytes());
        put(&mut block, 183, &m.scan_rx.to_le_bytes());
        put(&mut block, 187, &m.scan_ry.to_le_bytes());
        // stop info status
        put(&mut block, MEASURE_INFO_SIZE, &3_u16.to_le_bytes());
        put(&mut block, EXTENDED_INFO_OFFSET, &m.image_x.to_le_bytes());
        put(&mut block, EXTENDED_INFO_OFFSET + 4, &m.image_y.to_le_bytes());

        block.truncate(self.block_length());
        block
    }

    fn block_length(&self) -> usize {
        usize::try_from(self.meas_desc_block_length).unwrap_or(0)
    }

    /// Serialize the whole file
    pub fn build(&self) -> Vec<u8> {
        let info = self.info_text();
        let setup = self.setup_bytes();
        let block_count = usize::try_from(self.meas_desc_blocks).unwrap_or(0);

        let info_offs = HEADER_SIZE;
        let setup_offs = info_offs + info.len();
        let meas_offs = setup_offs + setup.len();
        let data_block_offs = meas_offs + block_count * self.block_length();
        let mut payload_offs = data_block_offs + self.payloads.len() * BLOCK_HEADER_SIZE;

        let mut file = vec![0_u8; HEADER_SIZE];
        file.extend_from_slice(&info);
        file.extend_from_slice(&setup);

        for _ in 0..block_count {
            file.extend_from_slice(&self.measurement_block());
        }
        for (i, data) in self.payloads.iter().enumerate() {
            let next = if i + 1 < self.payloads.len() {
                data_block_offs + (i + 1) * BLOCK_HEADER_SIZE
            } else {
                0
            };
            file.extend_from_slice(&(i as i16).to_le_bytes());
            file.extend_from_slice(&(payload_offs as i32).to_le_bytes());
            file.extend_from_slice(&(next as i32).to_le_bytes());
            file.extend_from_slice(&self.block_type.to_le_bytes());
            file.extend_from_slice(&0_i16.to_le_bytes());
            file.extend_from_slice(&(i as u32).to_le_bytes());
            file.extend_from_slice(&(data.len() as u32).to_le_bytes());
            payload_offs += data.len();
        }
        for data in &self.payloads {
            file.extend_from_slice(data);
        }

        let longest = self.payloads.iter().map(Vec::len).max().unwrap_or(0);

        let mut header = Vec::with_capacity(HEADER_SIZE);
        header.extend_from_slice(&self.revision.to_le_bytes());
        header.extend_from_slice(&(info_offs as i32).to_le_bytes());
        header.extend_from_slice(&(info.len() as u16).to_le_bytes());
        header.extend_from_slice(&(setup_offs as i32).to_le_bytes());
        header.extend_from_slice(&(setup.len() as u16).to_le_bytes());
        header.extend_from_slice(&(data_block_offs as i32).to_le_bytes());
        header.extend_from_slice(&(self.payloads.len() as i16).to_le_bytes());
        header.extend_from_slice(&(longest as i32).to_le_bytes());
        header.extend_from_slice(&(meas_offs as i32).to_le_bytes());
        header.extend_from_slice(&self.meas_desc_blocks.to_le_bytes());
        header.extend_from_slice(&self.meas_desc_block_length.to_le_bytes());
        header.extend_from_slice(&self.header_valid.to_le_bytes());
        header.extend_from_slice(&0_u32.to_le_bytes());
        header.extend_from_slice(&0_u16.to_le_bytes());

        let sum = header
            .chunks_exact(2)
            .map(|x| u16::from_le_bytes([x[0], x[1]]))
            .fold(0_u16, |acc, x| acc.wrapping_add(x));
        let mut checksum = 0x55aa_u16.wrapping_sub(sum);
        if self.corrupt_checksum {
            checksum ^= 0xffff;
        }
        header.extend_from_slice(&checksum.to_le_bytes());

        file[..HEADER_SIZE].copy_from_slice(&header);
        file
    }
}

/// Binary setup header with a `bin_hdr_ext` table pointing at an MCS image header
///
/// Offsets are relative to the position right after the 4 reserved bytes.
pub fn binary_setup_with_mcs_image(image_x: u32, image_y: u32) -> Vec<u8> {
    let main_size = 4 + 11 * 8;
    let ext_size = 10 * 8;

    let mut data = vec![0_u8; 4];
    data.extend_from_slice(&900_u32.to_le_bytes());
    // ten absent sub blocks
    data.extend_from_slice(&[0; 10 * 8]);
    data.extend_from_slice(&(main_size as u32).to_le_bytes());
    data.extend_from_slice(&(ext_size as u32).to_le_bytes());

    data.extend_from_slice(&((main_size + ext_size) as u32).to_le_bytes());
    data.extend_from_slice(&46_u32.to_le_bytes());
    data.extend_from_slice(&[0; 9 * 8]);

    data.extend_from_slice(&1_u16.to_le_bytes());
    for value in [1_u32, image_x, image_y, 1, 1] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    for value in [0.25_f32, 10.0, 2560.0, 655_360.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&0_u32.to_le_bytes());
    data.extend_from_slice(&0_u32.to_le_bytes());
    data
}

fn put(buffer: &mut [u8], position: usize, bytes: &[u8]) {
    buffer[position..position + bytes.len()].copy_from_slice(bytes);
}

fn pad(buffer: &mut Vec<u8>, length: Option<u16>) {
    if let Some(length) = length {
        let length = usize::from(length);
        assert!(buffer.len() <= length, "content longer than declared length");
        buffer.resize(length, b'\n');
    }
}
