// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{io, result};

use crate::props::Props;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A code point outside of `0..=0x10FFFF` was handed to the builder or the compressor.
    #[error("invalid code point {0:#X}")]
    InvalidCodePoint(u32),

    /// The compressed stages don't reproduce the input mapping.
    #[error("trie sanity check failed for U+{codepoint:04X}: expected {expected}, got {actual}")]
    Mismatch { codepoint: u32, expected: Props, actual: Props },

    #[error("failed to read {name}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}:{line}: {message}")]
    Parse { name: String, line: usize, message: String },

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error("missing ucd {0}")]
    MissingElement(&'static str),
}

impl Error {
    pub(crate) fn parse(name: &str, line: usize, message: impl Into<String>) -> Self {
        Error::Parse { name: name.to_string(), line, message: message.into() }
    }
}
