// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extracts code point sets from the UCD in XML form (`ucd.nounihan.grouped.xml`).
//!
//! Download it at: <https://www.unicode.org/Public/UCD/latest/ucdxml/ucd.nounihan.grouped.zip>

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::apperr::{Error, Result};
use crate::props::{CODEPOINT_MAX, Property};

const NS: &str = "http://www.unicode.org/ns/2003/ucd/1.0";
const NAME: &str = "ucdxml";

pub struct UcdXml {
    pub description: String,
    pub sets: Vec<(Property, BTreeSet<u32>)>,
}

/// Collects the code points that have each of `properties` set to `Y`.
///
/// Attributes of a `<group>` apply to all of its children unless they override them.
pub fn extract(doc: &roxmltree::Document, properties: &[Property]) -> Result<UcdXml> {
    let root = doc.root_element();
    let description = root
        .children()
        .find(|n| n.has_tag_name((NS, "description")))
        .ok_or(Error::MissingElement("description"))?;
    let repertoire = root
        .children()
        .find(|n| n.has_tag_name((NS, "repertoire")))
        .ok_or(Error::MissingElement("repertoire"))?;
    let description = description.text().unwrap_or_default().to_string();

    let mut sets: Vec<(Property, BTreeSet<u32>)> =
        properties.iter().map(|&p| (p, BTreeSet::new())).collect();

    for group in repertoire.children().filter(|n| n.is_element()) {
        // Ungrouped files list <char> elements directly in the repertoire.
        let inherited = group.has_tag_name((NS, "group")).then_some(group);
        let chars: Vec<roxmltree::Node> = match inherited {
            Some(group) => group.children().filter(|n| n.is_element()).collect(),
            None => vec![group],
        };

        for char in chars {
            let range = extract_range(doc, &char)?;

            for (property, set) in &mut sets {
                let attr = property.xml_attribute();
                let value = char
                    .attribute(attr)
                    .or_else(|| inherited.and_then(|g| g.attribute(attr)))
                    .unwrap_or("N");
                match value {
                    "Y" => set.extend(range.clone()),
                    "N" => {}
                    _ => {
                        return Err(Error::parse(
                            NAME,
                            line_of(doc, &char),
                            format!("unrecognized {attr} {value:?}"),
                        ));
                    }
                }
            }
        }
    }

    for (property, set) in &sets {
        tracing::info!(%property, count = set.len(), "extracted {}", NAME);
    }
    Ok(UcdXml { description, sets })
}

fn extract_range(doc: &roxmltree::Document, node: &roxmltree::Node) -> Result<RangeInclusive<u32>> {
    let line = line_of(doc, node);
    let hex = |s: &str| {
        u32::from_str_radix(s, 16)
            .map_err(|err| Error::parse(NAME, line, format!("invalid code point {s:?}: {err}")))
    };

    let (first, last) = match node.attribute("cp") {
        Some(val) => {
            let cp = hex(val)?;
            (cp, cp)
        }
        None => match (node.attribute("first-cp"), node.attribute("last-cp")) {
            (Some(first), Some(last)) => (hex(first)?, hex(last)?),
            _ => return Err(Error::parse(NAME, line, "missing code point attribute")),
        },
    };

    if first > last || last > CODEPOINT_MAX {
        return Err(Error::parse(NAME, line, format!("invalid range {first:04X}..{last:04X}")));
    }
    Ok(first..=last)
}

fn line_of(doc: &roxmltree::Document, node: &roxmltree::Node) -> usize {
    doc.text_pos_at(node.range().start).row as usize
}
