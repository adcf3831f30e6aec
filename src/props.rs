// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The per-code-point record stored in stage3 and the named fields it's made of.

use std::fmt;

/// The number of code points in `0..=0x10FFFF`, surrogates included.
pub const CODEPOINT_COUNT: usize = 0x110000;
pub const CODEPOINT_MAX: u32 = 0x10FFFF;

/// A property record. Two records are the same entry in stage3 iff all fields are equal.
///
/// `Props::default()` is the record of every code point that no data source mentions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Props {
    pub xid_start: bool,
    pub xid_continue: bool,
}

impl Props {
    pub fn get(&self, property: Property) -> bool {
        match property {
            Property::XidStart => self.xid_start,
            Property::XidContinue => self.xid_continue,
        }
    }

    pub fn set(&mut self, property: Property, value: bool) {
        match property {
            Property::XidStart => self.xid_start = value,
            Property::XidContinue => self.xid_continue = value,
        }
    }

    pub fn with(mut self, property: Property, value: bool) -> Self {
        self.set(property, value);
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, property) in Property::ALL.into_iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", property.field(), self.get(property))?;
        }
        f.write_str("}")
    }
}

// NOTE: The order of these items must match the field order of `Props`,
// because the serializers emit fields in `Property::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    XidStart,
    XidContinue,
}

impl Property {
    pub const ALL: [Property; 2] = [Property::XidStart, Property::XidContinue];

    /// The name used in `DerivedCoreProperties.txt`.
    pub fn name(self) -> &'static str {
        match self {
            Property::XidStart => "XID_Start",
            Property::XidContinue => "XID_Continue",
        }
    }

    /// The attribute name used in `ucd.*.xml`.
    pub fn xml_attribute(self) -> &'static str {
        match self {
            Property::XidStart => "XIDS",
            Property::XidContinue => "XIDC",
        }
    }

    /// The field name of `Props`, which is also used by the generated code.
    pub fn field(self) -> &'static str {
        match self {
            Property::XidStart => "xid_start",
            Property::XidContinue => "xid_continue",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
