/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A Becker & Hickl SPC-Image SDT decoder
//!
//! SDT files hold time-correlated single photon counting data
//! together with the instrument setup used to record it.
//! This crate decodes the header blocks of a file and resolves the
//! image geometry (width, height, time bins, channels, timepoints)
//! from them, photon counts are read per data block on demand.
//!
//! # Features
//! - `std`: Readers over `std::io` types and [`decode_file`]
//! - `log`: Route decoder messages to the `log` crate
//! - `serde`: Derive `serde::Serialize` for decoded records
//!
//! # Example
//! ```no_run
//! use tcspc_core::bytestream::ByteCursor;
//! use tcspc_sdt::errors::SdtDecoderErrors;
//! use tcspc_sdt::SdtDecoder;
//!
//! fn main() -> Result<(), SdtDecoderErrors> {
//!     let data = std::fs::read("cells.sdt").unwrap();
//!     let mut decoder = SdtDecoder::new(ByteCursor::new(data));
//!
//!     let file = decoder.decode()?;
//!     println!("{:?}", file.geometry);
//!
//!     for block in 0..file.data_blocks.len() {
//!         let counts = decoder.read_data_block(block)?;
//!         println!("block {block}: {} counts", counts.len());
//!     }
//!     Ok(())
//! }
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
pub extern crate tcspc_core;

pub use crate::decoder::{probe_sdt, SdtDecoder};
pub use crate::file::SdtFile;
pub use crate::geometry::{non_zero_product, Geometry, GeometryPatch};

pub mod blocks;
pub mod constants;
mod decoder;
pub mod errors;
pub mod extended;
mod file;
mod geometry;
pub mod header;
pub mod info;
pub mod measurement;
pub mod setup;

/// Decode the SDT file at `path`
///
/// The file is closed before this returns, on success and on error.
#[cfg(feature = "std")]
pub fn decode_file<P: AsRef<std::path::Path>>(path: P) -> Result<SdtFile, errors::SdtDecoderErrors> {
    let file = std::fs::File::open(path).map_err(tcspc_core::bytestream::ByteIoError::from)?;

    SdtDecoder::new(std::io::BufReader::new(file)).decode()
}
