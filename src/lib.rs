// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compiles Unicode character properties into a compact 3-stage lookup table.

pub mod apperr;
pub mod output;
pub mod props;
pub mod run;
pub mod source;
pub mod table;
pub mod trie;
pub mod ucd;
pub mod ucdxml;
