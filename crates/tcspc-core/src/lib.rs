/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by all tcspc decoders
//!
//! This crate provides a set of core routines shared
//! by the instrument file decoders under the `tcspc` umbrella
//!
//! It currently contains
//!
//! - A bytestream reader with endian aware reads, seeks and
//!   fixed width text extraction
//! - Decoder options shared by all decoders
//! - A logging shim that forwards to the `log` crate when enabled
//!
//! This library is `#[no_std]` with `alloc` needed for defining `Vec`
//! and `String`, which decoded records are made of.
//!
//! # Features
//!  - `std`: Enables readers over [`std::io::BufReader`] and [`std::io::Cursor`]
//!
//!  - `log`: Routes the logging macros in [`log`] to the `log` crate,
//!    without it they compile to nothing.
//!
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bytestream;
#[cfg(not(feature = "log"))]
pub mod log;
#[cfg(feature = "log")]
pub use log;
pub mod options;
