// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builds the uncompressed code point -> record mapping that the trie is made from.

use crate::apperr::{Error, Result};
use crate::props::{CODEPOINT_COUNT, Property, Props};

/// A dense, total mapping from every code point to its [`Props`].
pub struct PropertyTable {
    values: Vec<Props>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self { values: vec![Props::default(); CODEPOINT_COUNT] }
    }

    /// Builds a table by applying each named set in order.
    pub fn from_sets<I, S>(sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Property, S)>,
        S: IntoIterator<Item = u32>,
    {
        let mut table = Self::new();
        for (property, codepoints) in sets {
            table.apply(property, codepoints)?;
        }
        Ok(table)
    }

    /// Flags `property` on every given code point. Other fields are left alone,
    /// so applying the same property twice is the same as applying it once.
    pub fn apply<I>(&mut self, property: Property, codepoints: I) -> Result<()>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut count = 0usize;
        for cp in codepoints {
            let value = self.values.get_mut(cp as usize).ok_or(Error::InvalidCodePoint(cp))?;
            value.set(property, true);
            count += 1;
        }
        tracing::debug!(%property, count, "applied property");
        Ok(())
    }

    pub fn get(&self, cp: u32) -> Result<Props> {
        self.values.get(cp as usize).copied().ok_or(Error::InvalidCodePoint(cp))
    }

    pub fn values(&self) -> &[Props] {
        &self.values
    }

    /// The number of code points that have `property` set.
    pub fn count(&self, property: Property) -> usize {
        self.values.iter().filter(|p| p.get(property)).count()
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let table = PropertyTable::new();
        assert_eq!(table.values().len(), CODEPOINT_COUNT);
        assert!(table.values().iter().all(Props::is_default));
    }

    #[test]
    fn test_apply() {
        let table = PropertyTable::from_sets([
            (Property::XidStart, vec![0x41, 0x42]),
            (Property::XidContinue, vec![0x30, 0x41]),
        ])
        .unwrap();

        assert_eq!(table.get(0x41).unwrap(), Props { xid_start: true, xid_continue: true });
        assert_eq!(table.get(0x42).unwrap(), Props { xid_start: true, xid_continue: false });
        assert_eq!(table.get(0x30).unwrap(), Props { xid_start: false, xid_continue: true });
        assert!(table.get(0x10FFFF).unwrap().is_default());
        assert_eq!(table.count(Property::XidStart), 2);
        assert_eq!(table.count(Property::XidContinue), 2);
    }

    #[test]
    fn test_order_independent() {
        let a = PropertyTable::from_sets([
            (Property::XidStart, vec![1, 2, 3]),
            (Property::XidContinue, vec![2, 3, 4]),
        ])
        .unwrap();
        let b = PropertyTable::from_sets([
            (Property::XidContinue, vec![4, 3, 2]),
            (Property::XidStart, vec![3, 2, 1, 1]),
        ])
        .unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_invalid_codepoint() {
        let mut table = PropertyTable::new();
        let err = table.apply(Property::XidStart, [0x110000]).unwrap_err();
        assert!(matches!(err, Error::InvalidCodePoint(0x110000)));
        assert!(matches!(table.get(u32::MAX), Err(Error::InvalidCodePoint(u32::MAX))));
    }
}
