/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Line level grammar of the setup text
//!
//! ```text
//!   #SP [SP_SCAN_X,I,256]
//!   #TR [TR_1,0,1,2,3,4,5,6,7]
//!   #WI #2 *NO *0 [0,255]
//! ```

use alloc::vec::Vec;

/// Width of `"  #SP ["`, skipped before the key of a keyed token
const TOKEN_PREFIX_LENGTH: usize = 7;

/// Number of trace rows a file may carry
pub const TRACE_ROWS: usize = 16;

/// Values in a single trace row
pub const TRACE_VALUES: usize = 8;

/// Setup text lines grouped by their section tag, in file order
#[derive(Debug, Default)]
pub struct Sections<'a> {
    pub pr: Vec<&'a str>,
    pub sp: Vec<&'a str>,
    pub di: Vec<&'a str>,
    pub tr: Vec<&'a str>,
    pub wi: Vec<&'a str>
}

impl<'a> Sections<'a> {
    /// Partition setup text by line prefix
    ///
    /// Lines tagged `PR`, `SP`, `DI` or `TR` go to their own group,
    /// every other `"  #"` line goes to the window interval group.
    /// Lines without a tag carry no settings and are dropped.
    pub fn partition(text: &'a str) -> Sections<'a> {
        let mut sections = Sections::default();

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.starts_with("  #PR") {
                sections.pr.push(line);
            } else if line.starts_with("  #SP") {
                sections.sp.push(line);
            } else if line.starts_with("  #DI") {
                sections.di.push(line);
            } else if line.starts_with("  #TR") {
                sections.tr.push(line);
            } else if line.starts_with("  #") {
                sections.wi.push(line);
            }
        }
        sections
    }
}

/// Split a keyed token into its full key and its value
///
/// The key runs from the fixed prefix to the first comma, the value
/// from the last comma to the closing bracket. A value containing a
/// comma therefore only keeps its last part, which is what
/// instrument software expects.
pub fn key_value(line: &str) -> Option<(&str, &str)> {
    let body = line.get(TOKEN_PREFIX_LENGTH..)?;
    let first_comma = body.find(',')?;
    let last_comma = body.rfind(',')?;

    let key = &body[..first_comma];
    let value = body[last_comma + 1..].trim_end();
    let value = value.strip_suffix(']').unwrap_or(value);

    Some((key, value))
}

/// Parse a `[TR_N,v0,...,v7]` token into a zero based row index and its values
pub fn trace_row(line: &str) -> Option<(usize, [i32; TRACE_VALUES])> {
    let body = line.get(TOKEN_PREFIX_LENGTH..)?.trim_end();
    let body = body.strip_suffix(']').unwrap_or(body);

    let (key, values) = body.split_once(',')?;
    let row = key.trim().strip_prefix("TR_")?.parse::<usize>().ok()?;

    if !(1..=TRACE_ROWS).contains(&row) {
        return None;
    }
    let mut parsed = [0_i32; TRACE_VALUES];
    let mut count = 0;

    for value in values.split(',') {
        *parsed.get_mut(count)? = value.trim().parse().ok()?;
        count += 1;
    }
    if count != TRACE_VALUES {
        return None;
    }
    Some((row - 1, parsed))
}

/// One `#WI` entry
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowInterval {
    /// Number after the leading `#`
    pub channel:    i32,
    /// `*YES` or `*NO`
    pub enabled:    bool,
    /// Number after the second `*`
    pub sub_index:  i32,
    /// Range start, first value inside the brackets
    pub range_from: f32,
    /// Range end, second value inside the brackets
    pub range_to:   f32
}

impl WindowInterval {
    /// Parse `#WI #a *YES|*NO *c [dx,dy]`
    pub fn parse(line: &str) -> Option<WindowInterval> {
        let line = line.trim();
        let line = line.strip_prefix("#WI").unwrap_or(line);

        let bracket = line.find('[')?;
        let mut words = line[..bracket].split_whitespace();

        let channel = words.next()?.strip_prefix('#')?.parse().ok()?;
        let enabled = match words.next()? {
            "*YES" => true,
            "*NO" => false,
            _ => return None
        };
        let sub_index = words.next()?.strip_prefix('*')?.parse().ok()?;

        if words.next().is_some() {
            return None;
        }
        let range = line[bracket + 1..].trim_end();
        let range = range.strip_suffix(']')?;
        let (from, to) = range.split_once(',')?;

        Some(WindowInterval {
            channel,
            enabled,
            sub_index,
            range_from: from.trim().parse().ok()?,
            range_to: to.trim().parse().ok()?
        })
    }
}
