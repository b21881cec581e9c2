/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::FileKind;
use crate::errors::SdtDecoderErrors;

/// Number of positional fields in the info block
const INFO_FIELDS: usize = 9;

/// Free text file description
///
/// Stored on disk as
/// ```text
/// *IDENTIFICATION
///   ID        : SPC Setup & Data File
///   Title     : ...
///   ...
/// *END
/// ```
/// The framing lines are dropped and only the value after the first
/// colon of each remaining line is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoBlock {
    pub id:       String,
    pub title:    String,
    pub version:  String,
    pub revision: String,
    pub date:     String,
    pub time:     String,
    pub author:   String,
    pub company:  String,
    pub contents: String
}

impl InfoBlock {
    /// Parse the text of an info block
    pub fn parse(text: &str) -> Result<InfoBlock, SdtDecoderErrors> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .collect();

        // first and last lines frame the block
        let body = match lines.len() {
            0..=2 => &[][..],
            n => &lines[1..n - 1]
        };
        if body.len() < INFO_FIELDS {
            return Err(SdtDecoderErrors::InfoBlockTooShort(body.len()));
        }

        let mut values = body.iter().map(|line| field_value(line));
        // length checked above
        let mut next = || values.next().unwrap_or_default();

        Ok(InfoBlock {
            id:       next(),
            title:    next(),
            version:  next(),
            revision: next(),
            date:     next(),
            time:     next(),
            author:   next(),
            company:  next(),
            contents: next()
        })
    }

    /// Classify the file from its identification line
    pub fn file_kind(&self) -> FileKind {
        FileKind::from_identifier(&self.id)
    }
}

/// The trimmed text after the first colon, empty when there is none
fn field_value(line: &str) -> String {
    match line.split_once(':') {
        Some((_, value)) => value.trim().into(),
        None => String::new()
    }
}
