/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global decoder options
//!
//! This module exposes a struct for which all implemented
//! decoders get shared options for decoding
//!
//! All supported options are put into one `DecoderOptions` to allow for global configurations
//! options i.e the same `DecoderOptions` can be reused for all other decoders

/// Decoder options
///
/// Not all options are respected by all decoders,
/// each option lists the decoders that respect it
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecoderOptions {
    /// Treat some warnings as errors
    ///
    /// Some files carry recoverable inconsistencies, e.g. a header
    /// validity marker or checksum that doesn't match. When set to false
    /// these are logged via the log crate and decoding goes on.
    ///
    /// When set to true, this will return an `Result<Err>` on such files.
    ///
    /// - Default value: false
    /// - Respected by: `sdt`
    strict_mode:     bool,
    /// Maximum number of data blocks a decoder will index
    ///
    /// The block count comes straight from the file header, a
    /// bound keeps a corrupt count from driving huge allocations.
    ///
    /// - Default value: 1 << 20
    /// - Respected by: `sdt`
    max_data_blocks: usize
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            strict_mode:     false,
            max_data_blocks: 1 << 20
        }
    }
}

/// Initializers
impl DecoderOptions {
    /// Create options that reject recoverable inconsistencies
    /// instead of logging them
    pub fn new_strict() -> DecoderOptions {
        DecoderOptions::default().set_strict_mode(true)
    }

    /// Create options that log recoverable inconsistencies and keep going
    ///
    /// This is the same as `default`
    pub fn new_lenient() -> DecoderOptions {
        DecoderOptions::default()
    }
}

impl DecoderOptions {
    /// Return true whether the decoder should be in strict mode
    /// and reject recoverable errors
    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Get the maximum number of data blocks a decoder will index
    pub const fn get_max_data_blocks(&self) -> usize {
        self.max_data_blocks
    }

    /// Set whether the decoder should reject recoverable errors
    ///
    /// # Arguments
    ///
    /// * `yes`: True to turn warnings into errors
    ///
    /// returns: DecoderOptions
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    /// Set the maximum number of data blocks the decoder will index
    pub fn set_max_data_blocks(mut self, blocks: usize) -> Self {
        self.max_data_blocks = blocks;
        self
    }
}
