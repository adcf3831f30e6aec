// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extracts code point sets from the plain-text UCD files.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::apperr::{Error, Result};
use crate::props::CODEPOINT_MAX;
use crate::source::Source;

pub const DERIVED_CORE_PROPERTIES: &str = "DerivedCoreProperties.txt";

/// Collects all code points listed for the property `name` in `DerivedCoreProperties.txt`.
///
/// Lines look like one of:
/// ```text
/// 0041..005A    ; XID_Start # L&  [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
/// 00AA          ; XID_Start # Lo       FEMININE ORDINAL INDICATOR
/// ```
/// Some properties carry a third field (`InCB; Linker`), which is ignored.
pub fn derived_core_properties(source: &dyn Source, name: &str) -> Result<BTreeSet<u32>> {
    let lines = source.lines(DERIVED_CORE_PROPERTIES)?;
    let mut out = BTreeSet::new();

    for (i, line) in lines.iter().enumerate() {
        let Some((range, property)) = parse_line(line, i + 1)? else {
            continue;
        };
        if property == name {
            out.extend(range);
        }
    }

    tracing::info!(property = name, count = out.len(), "extracted {}", DERIVED_CORE_PROPERTIES);
    Ok(out)
}

/// The file name and version from the first line, e.g. `DerivedCoreProperties-16.0.0.txt`.
pub fn derived_core_properties_version(source: &dyn Source) -> Result<Option<String>> {
    let lines = source.lines(DERIVED_CORE_PROPERTIES)?;
    Ok(lines
        .first()
        .and_then(|line| line.strip_prefix('#'))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty()))
}

fn parse_line(line: &str, lineno: usize) -> Result<Option<(RangeInclusive<u32>, &str)>> {
    let data = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }

    let mut fields = data.split(';').map(str::trim);
    let range = fields.next().unwrap_or_default();
    let property = fields
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::parse(DERIVED_CORE_PROPERTIES, lineno, "missing property name"))?;

    Ok(Some((parse_range(range, lineno)?, property)))
}

fn parse_range(s: &str, lineno: usize) -> Result<RangeInclusive<u32>> {
    let hex = |s: &str| {
        u32::from_str_radix(s, 16).map_err(|err| {
            Error::parse(DERIVED_CORE_PROPERTIES, lineno, format!("invalid code point {s:?}: {err}"))
        })
    };

    let (first, last) = match s.split_once("..") {
        Some((first, last)) => (hex(first)?, hex(last)?),
        None => {
            let cp = hex(s)?;
            (cp, cp)
        }
    };

    if first > last {
        return Err(Error::parse(
            DERIVED_CORE_PROPERTIES,
            lineno,
            format!("reversed range {first:04X}..{last:04X}"),
        ));
    }
    if last > CODEPOINT_MAX {
        return Err(Error::parse(
            DERIVED_CORE_PROPERTIES,
            lineno,
            format!("code point {last:04X} out of range"),
        ));
    }
    Ok(first..=last)
}
