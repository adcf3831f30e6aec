// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Renders [`Stages`] as C++ or Rust source.

use std::fmt::Write as _;

use indoc::writedoc;

use crate::props::{Property, Props};
use crate::trie::{BLOCK_SIZE, Stages};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Cpp,
    Rust,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        }
    }

    /// The file names used when each stage goes into its own file.
    pub fn file_names(self) -> [&'static str; 3] {
        match self {
            Language::Cpp => ["stage1.txt", "stage2.txt", "stage3.txt"],
            Language::Rust => ["stage1.rs", "stage2.rs", "stage3.rs"],
        }
    }
}

pub struct Output<'a> {
    pub lang: Language,
    /// Where the data came from, e.g. `DerivedCoreProperties-16.0.0.txt`.
    pub description: &'a str,
    pub stages: &'a Stages,
}

impl Output<'_> {
    /// Each stage as a standalone array definition, in stage order.
    pub fn stages(&self) -> [String; 3] {
        match self.lang {
            Language::Cpp => [
                cpp_indices("stage1", self.stages.stage1_bits(), self.stages.stage1(), 16),
                cpp_indices("stage2", self.stages.stage2_bits(), self.stages.stage2(), 32),
                cpp_props(self.stages.stage3()),
            ],
            Language::Rust => [
                rust_indices("STAGE1", self.stages.stage1_bits(), self.stages.stage1(), 16),
                rust_indices("STAGE2", self.stages.stage2_bits(), self.stages.stage2(), 32),
                rust_props(self.stages.stage3()),
            ],
        }
    }

    /// All stages plus a lookup function, as a single document.
    pub fn document(&self) -> String {
        let mut buf = String::new();

        _ = writeln!(
            buf,
            "// BEGIN: Generated by xid-table-gen from {}, with --lang={}, {} bytes",
            self.description,
            self.lang.name(),
            self.stages.total_size(),
        );

        match self.lang {
            Language::Cpp => {
                buf.push_str("#include <array>\n#include <cstdint>\n");
                buf.push_str(&cpp_record());
            }
            Language::Rust => buf.push_str(&rust_record()),
        }

        for stage in self.stages() {
            buf.push_str(&stage);
        }

        let shift = BLOCK_SIZE.trailing_zeros();
        let mask = BLOCK_SIZE - 1;

        match self.lang {
            Language::Cpp => {
                _ = writedoc!(
                    buf,
                    "
                    inline auto props_lookup(const char32_t cp) -> props
                    {{
                        return stage3[stage2[stage1[cp >> {0}] + (cp & {1})]];
                    }}
                    ",
                    shift,
                    mask,
                );
            }
            Language::Rust => {
                _ = writedoc!(
                    buf,
                    "
                    #[inline(always)]
                    pub fn props_lookup(cp: char) -> Props {{
                        let cp = cp as usize;
                        let s = STAGE1[cp >> {0}] as usize;
                        let s = STAGE2[s + (cp & {1})] as usize;
                        STAGE3[s]
                    }}
                    ",
                    shift,
                    mask,
                );
            }
        }

        buf.push_str("// END: Generated by xid-table-gen\n");
        buf
    }
}

fn cpp_indices(name: &str, bits: usize, values: &[u32], width: usize) -> String {
    let mut buf = String::new();
    _ = write!(buf, "constexpr const std::array<uint{bits}_t, {}> {name}\n{{", values.len());
    push_values(&mut buf, bits, values, width);
    buf.push_str("\n};\n");
    buf
}

fn rust_indices(name: &str, bits: usize, values: &[u32], width: usize) -> String {
    let mut buf = String::new();
    _ = write!(buf, "#[rustfmt::skip]\npub const {name}: [u{bits}; {}] = [", values.len());
    push_values(&mut buf, bits, values, width);
    buf.push_str("\n];\n");
    buf
}

fn push_values(buf: &mut String, bits: usize, values: &[u32], width: usize) {
    for (j, &value) in values.iter().enumerate() {
        if j % width == 0 {
            buf.push_str("\n   ");
        }
        _ = write!(buf, " 0x{:01$x},", value, bits / 4);
    }
}

fn cpp_record() -> String {
    let mut buf = String::from("struct props\n{\n");
    for property in Property::ALL {
        _ = writeln!(buf, "    bool {};", property.field());
    }
    buf.push_str("};\n");
    buf
}

fn rust_record() -> String {
    let mut buf = String::from("#[derive(Clone, Copy, PartialEq, Eq)]\npub struct Props {\n");
    for property in Property::ALL {
        _ = writeln!(buf, "    pub {}: bool,", property.field());
    }
    buf.push_str("}\n");
    buf
}

fn cpp_props(values: &[Props]) -> String {
    let mut buf = String::new();
    _ = writeln!(buf, "constexpr const std::array<props, {}> stage3\n{{", values.len());
    for value in values {
        buf.push_str("    props {");
        for (i, property) in Property::ALL.into_iter().enumerate() {
            if i != 0 {
                buf.push_str(", ");
            }
            _ = write!(buf, "{}", value.get(property));
        }
        buf.push_str("},\n");
    }
    buf.push_str("};\n");
    buf
}

fn rust_props(values: &[Props]) -> String {
    let mut buf = String::new();
    _ = writeln!(buf, "pub const STAGE3: [Props; {}] = [", values.len());
    for value in values {
        buf.push_str("    Props {");
        for (i, property) in Property::ALL.into_iter().enumerate() {
            if i != 0 {
                buf.push(',');
            }
            _ = write!(buf, " {}: {}", property.field(), value.get(property));
        }
        buf.push_str(" },\n");
    }
    buf.push_str("];\n");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::CODEPOINT_COUNT;

    fn stages() -> Stages {
        let mut values = vec![Props::default(); CODEPOINT_COUNT];
        values[0x41] = Props { xid_start: true, xid_continue: true };
        values[0x30] = Props { xid_start: false, xid_continue: true };
        Stages::build(&values).unwrap()
    }

    #[test]
    fn test_cpp() {
        let stages = stages();
        let out = Output { lang: Language::Cpp, description: "test", stages: &stages };
        let [s1, s2, s3] = out.stages();

        assert!(s1.starts_with("constexpr const std::array<uint8_t, 8704> stage1\n{\n    0x00, 0x80, 0x80,"));
        assert!(s1.ends_with("\n};\n"));
        assert_eq!(s1.matches("0x").count(), 8704);

        assert!(s2.starts_with("constexpr const std::array<uint8_t, 256> stage2\n{"));
        assert_eq!(s2.matches("0x").count(), 256);

        assert_eq!(
            s3,
            "constexpr const std::array<props, 3> stage3\n{\n    props {false, false},\n    props {false, true},\n    props {true, true},\n};\n"
        );

        let doc = out.document();
        assert!(doc.starts_with("// BEGIN: Generated by xid-table-gen from test, with --lang=cpp, "));
        assert!(doc.contains("return stage3[stage2[stage1[cp >> 7] + (cp & 127)]];"));
        assert!(doc.ends_with("// END: Generated by xid-table-gen\n"));
    }

    #[test]
    fn test_rust() {
        let stages = stages();
        let out = Output { lang: Language::Rust, description: "test", stages: &stages };
        let [s1, s2, s3] = out.stages();

        assert!(s1.starts_with("#[rustfmt::skip]\npub const STAGE1: [u8; 8704] = [\n    0x00, 0x80,"));
        assert!(s2.starts_with("#[rustfmt::skip]\npub const STAGE2: [u8; 256] = ["));
        assert_eq!(
            s3,
            "pub const STAGE3: [Props; 3] = [\n    Props { xid_start: false, xid_continue: false },\n    Props { xid_start: false, xid_continue: true },\n    Props { xid_start: true, xid_continue: true },\n];\n"
        );

        let doc = out.document();
        assert!(doc.contains("let s = STAGE2[s + (cp & 127)] as usize;"));
    }

    #[test]
    fn test_document_defines_record() {
        let stages = stages();

        let doc = Output { lang: Language::Rust, description: "test", stages: &stages }.document();
        let record = doc
            .find(
                "#[derive(Clone, Copy, PartialEq, Eq)]\npub struct Props {\n    pub xid_start: bool,\n    pub xid_continue: bool,\n}\n",
            )
            .expect("missing Props definition");
        assert!(record < doc.find("pub const STAGE3").unwrap());
        assert_eq!(doc.matches("pub struct Props").count(), 1);

        let doc = Output { lang: Language::Cpp, description: "test", stages: &stages }.document();
        assert!(doc.contains("#include <array>\n#include <cstdint>\n"));
        let record = doc
            .find("struct props\n{\n    bool xid_start;\n    bool xid_continue;\n};\n")
            .expect("missing props definition");
        assert!(record < doc.find("std::array<props, 3> stage3").unwrap());
        assert!(record < doc.find("inline auto props_lookup").unwrap());
    }

    #[test]
    fn test_stage_files_leave_record_to_includer() {
        let stages = stages();
        for lang in [Language::Cpp, Language::Rust] {
            let out = Output { lang, description: "test", stages: &stages };
            for stage in out.stages() {
                assert!(!stage.contains("struct props") && !stage.contains("struct Props"));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = stages();
        let b = stages();
        let a = Output { lang: Language::Rust, description: "x", stages: &a }.document();
        let b = Output { lang: Language::Rust, description: "x", stages: &b }.document();
        assert_eq!(a, b);
    }
}
