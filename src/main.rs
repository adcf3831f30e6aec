// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::Write as IoWrite;
use std::path::PathBuf;

use anyhow::bail;
use tracing_subscriber::EnvFilter;
use xid_table_gen::output::{Language, Output};
use xid_table_gen::props::Property;
use xid_table_gen::run::{load, write_stages};
use xid_table_gen::trie::Stages;

const HELP: &str = "\
Usage: xid-table-gen [options...] <input>
  -h, --help            Prints help information
  --lang=<cpp|rust>     Output language (default: cpp)
  --out-dir=<dir>       Write stage1, stage2 and stage3 into separate files in <dir>
                        instead of printing a single document to stdout

<input> is one of:
  * a UCD directory containing DerivedCoreProperties.txt
  * a DerivedCoreProperties.txt file
  * ucd.nounihan.grouped.xml

Download the UCD at:
  https://www.unicode.org/Public/UCD/latest/ucd/UCD.zip
  https://www.unicode.org/Public/UCD/latest/ucdxml/ucd.nounihan.grouped.zip

Set RUST_LOG=info (or debug) for progress on stderr.
";

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(());
    }

    let arg_lang = args
        .opt_value_from_fn("--lang", |arg| match arg {
            "cpp" | "c++" => Ok(Language::Cpp),
            "rust" => Ok(Language::Rust),
            l => bail!("invalid language: \"{}\"", l),
        })?
        .unwrap_or_default();
    let arg_out_dir = args
        .opt_value_from_os_str("--out-dir", |s| -> Result<PathBuf, &'static str> { Ok(s.into()) })?;
    let arg_input = args.free_from_os_str(|s| -> Result<PathBuf, &'static str> { Ok(s.into()) })?;
    let arg_remaining = args.finish();
    if !arg_remaining.is_empty() {
        bail!("unrecognized arguments: {:?}", arg_remaining);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let (description, table) = load(&arg_input)?;
    for property in Property::ALL {
        tracing::info!(%property, count = table.count(property), "built property table");
    }

    let stages = Stages::build(table.values())?;

    // Run a quick sanity check to ensure that the trie works as expected.
    stages.verify(table.values())?;

    let out = Output { lang: arg_lang, description: &description, stages: &stages };

    match arg_out_dir {
        Some(dir) => write_stages(&dir, arg_lang, out.stages())?,
        None => std::io::stdout().write_all(out.document().as_bytes())?,
    }
    Ok(())
}
