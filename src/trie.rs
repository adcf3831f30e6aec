// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The 3-stage lookup table.
//!
//! ```text
//! stage3[stage2[stage1[cp / BLOCK_SIZE] + cp % BLOCK_SIZE]]
//! ```
//!
//! stage3 holds each distinct [`Props`] once. stage2 is a concatenation of
//! `BLOCK_SIZE`-long blocks of stage3 indices, each distinct block stored once.
//! stage1 holds, for each block of code points, the offset of its block in stage2.
//!
//! Indices are handed out in first-seen order while walking the code points
//! in ascending order, so the same input always yields the same arrays.

use std::collections::HashMap;
use std::mem;

use rayon::prelude::*;

use crate::apperr::{Error, Result};
use crate::props::{CODEPOINT_COUNT, CODEPOINT_MAX, Props};

pub const BLOCK_SIZE: usize = 128;
pub const STAGE1_LEN: usize = CODEPOINT_COUNT.div_ceil(BLOCK_SIZE);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stages {
    stage1: Vec<u32>,
    stage2: Vec<u32>,
    stage3: Vec<Props>,
    default_index: u32,
    // Number of code points the tables were built from, before padding.
    len: usize,
}

impl Stages {
    /// Compresses a dense mapping indexed by code point.
    ///
    /// A slice shorter than [`CODEPOINT_COUNT`] is fine: the missing tail is the default record.
    /// A longer one implies code points beyond U+10FFFF and is rejected.
    pub fn build(values: &[Props]) -> Result<Self> {
        if values.len() > CODEPOINT_COUNT {
            return Err(Error::InvalidCodePoint(CODEPOINT_COUNT as u32));
        }
        Ok(Self::compress(CODEPOINT_COUNT, |cp| values.get(cp).copied().unwrap_or_default()))
    }

    /// Compresses a sparse mapping. Code points without an entry are the default record.
    pub fn build_sparse(map: &HashMap<u32, Props>) -> Result<Self> {
        if let Some(&cp) = map.keys().find(|&&cp| cp > CODEPOINT_MAX) {
            return Err(Error::InvalidCodePoint(cp));
        }
        Ok(Self::compress(CODEPOINT_COUNT, |cp| {
            map.get(&(cp as u32)).copied().unwrap_or_default()
        }))
    }

    fn compress(len: usize, lookup: impl Fn(usize) -> Props) -> Self {
        let mut stage1 = Vec::with_capacity(len.div_ceil(BLOCK_SIZE));
        let mut stage2 = Vec::new();
        let mut stage3 = Vec::new();
        let mut stage2_map: HashMap<Vec<u32>, u32> = HashMap::new();
        let mut stage3_map: HashMap<Props, u32> = HashMap::new();

        let mut intern = |stage3: &mut Vec<Props>, props: Props| -> u32 {
            *stage3_map.entry(props).or_insert_with(|| {
                stage3.push(props);
                (stage3.len() - 1) as u32
            })
        };

        let mut push_block = |stage1: &mut Vec<u32>, stage2: &mut Vec<u32>, block: &[u32]| {
            debug_assert_eq!(block.len(), BLOCK_SIZE);
            let offset = match stage2_map.get(block) {
                Some(&offset) => offset,
                None => {
                    let offset = stage2.len() as u32;
                    stage2.extend_from_slice(block);
                    stage2_map.insert(block.to_vec(), offset);
                    offset
                }
            };
            stage1.push(offset);
        };

        let mut block = Vec::with_capacity(BLOCK_SIZE);

        for cp in 0..len {
            block.push(intern(&mut stage3, lookup(cp)));

            if block.len() == BLOCK_SIZE {
                push_block(&mut stage1, &mut stage2, &block);
                block.clear();
            }
        }

        // The default record must exist even if no code point uses it, as it's used for padding.
        let default_index = intern(&mut stage3, Props::default());

        if !block.is_empty() {
            block.resize(BLOCK_SIZE, default_index);
            push_block(&mut stage1, &mut stage2, &block);
        }

        let stages = Self { stage1, stage2, stage3, default_index, len };
        tracing::info!(
            stage1 = stages.stage1.len(),
            stage2 = stages.stage2.len(),
            stage3 = stages.stage3.len(),
            blocks = stages.stage2.len() / BLOCK_SIZE,
            bytes = stages.total_size(),
            "compressed property table"
        );
        stages
    }

    pub fn stage1(&self) -> &[u32] {
        &self.stage1
    }

    pub fn stage2(&self) -> &[u32] {
        &self.stage2
    }

    pub fn stage3(&self) -> &[Props] {
        &self.stage3
    }

    /// The stage3 index of `Props::default()`. Not necessarily 0.
    pub fn default_index(&self) -> u32 {
        self.default_index
    }

    pub fn lookup(&self, cp: u32) -> Result<Props> {
        if cp > CODEPOINT_MAX || cp as usize >= self.stage1.len() * BLOCK_SIZE {
            return Err(Error::InvalidCodePoint(cp));
        }
        Ok(self.get(cp as usize))
    }

    fn get(&self, cp: usize) -> Props {
        let block = self.stage1[cp / BLOCK_SIZE] as usize;
        let index = self.stage2[block + cp % BLOCK_SIZE] as usize;
        self.stage3[index]
    }

    /// Checks that every code point resolves to its record in `expected`
    /// (or the default record beyond its end). Reports the lowest mismatch.
    pub fn verify(&self, expected: &[Props]) -> Result<()> {
        if expected.len() > self.len {
            return Err(Error::InvalidCodePoint(self.len as u32));
        }

        let expected_at = |cp: usize| expected.get(cp).copied().unwrap_or_default();
        let mismatch =
            (0..self.len).into_par_iter().find_first(|&cp| self.get(cp) != expected_at(cp));

        match mismatch {
            Some(cp) => Err(Error::Mismatch {
                codepoint: cp as u32,
                expected: expected_at(cp),
                actual: self.get(cp),
            }),
            None => Ok(()),
        }
    }

    /// The unsigned integer width stage1 is emitted as.
    pub fn stage1_bits(&self) -> usize {
        bits(&self.stage1)
    }

    /// The unsigned integer width stage2 is emitted as.
    pub fn stage2_bits(&self) -> usize {
        bits(&self.stage2)
    }

    /// The size in bytes of all 3 stages as emitted.
    pub fn total_size(&self) -> usize {
        self.stage1.len() * self.stage1_bits() / 8
            + self.stage2.len() * self.stage2_bits() / 8
            + self.stage3.len() * mem::size_of::<Props>()
    }
}

fn bits(values: &[u32]) -> usize {
    match values.iter().max().copied().unwrap_or(0) {
        0..0x100 => 8,
        0x100..0x10000 => 16,
        _ => 32,
    }
}
