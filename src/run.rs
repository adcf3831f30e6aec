// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reading the input and writing the generated tables.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, bail};

use crate::output::Language;
use crate::props::Property;
use crate::source::DirSource;
use crate::table::PropertyTable;
use crate::{ucd, ucdxml};

/// Reads the input in whichever form it was given and returns its description and the table.
///
/// `input` is a UCD directory, a `DerivedCoreProperties.txt` file or a `ucd.*.xml` file.
pub fn load(input: &Path) -> anyhow::Result<(String, PropertyTable)> {
    if input.extension().is_some_and(|ext| ext == "xml") {
        let text = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let doc = roxmltree::Document::parse(&text)?;
        let ucd = ucdxml::extract(&doc, &Property::ALL)?;
        let table = PropertyTable::from_sets(ucd.sets)?;
        return Ok((ucd.description, table));
    }

    let source = if input.is_dir() {
        DirSource::new(input)
    } else {
        let name = input.file_name().and_then(|n| n.to_str());
        if name != Some(ucd::DERIVED_CORE_PROPERTIES) {
            bail!("expected a directory, {} or an .xml file", ucd::DERIVED_CORE_PROPERTIES);
        }
        DirSource::new(input.parent().unwrap_or(Path::new(".")))
    };

    let mut sets = Vec::new();
    for property in Property::ALL {
        sets.push((property, ucd::derived_core_properties(&source, property.name())?));
    }
    let table = PropertyTable::from_sets(sets)?;

    let description = ucd::derived_core_properties_version(&source)?
        .unwrap_or_else(|| ucd::DERIVED_CORE_PROPERTIES.to_string());
    Ok((description, table))
}

/// Writes each stage into its own file in `dir`.
///
/// All files are written into a staging directory inside `dir` first and then moved into
/// place. Files they replace are kept in the staging directory until all three were moved,
/// so if any step fails, `dir` is left with the stage files it had before (or none).
pub fn write_stages(dir: &Path, lang: Language, stages: [String; 3]) -> anyhow::Result<()> {
    commit_stages(dir, lang, stages, |from, to| fs::rename(from, to))
}

fn commit_stages(
    dir: &Path,
    lang: Language,
    stages: [String; 3],
    mut rename: impl FnMut(&Path, &Path) -> io::Result<()>,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let names = lang.file_names();
    for name in names {
        let path = dir.join(name);
        if fs::symlink_metadata(&path).is_ok_and(|m| !m.is_file()) {
            bail!("{} exists and is not a file", path.display());
        }
    }

    // Dropping it removes the staging directory along with anything still in it.
    let staging = tempfile::Builder::new()
        .prefix(".xid-table-gen-")
        .tempdir_in(dir)
        .with_context(|| format!("failed to create a staging directory in {}", dir.display()))?;

    for (name, contents) in names.into_iter().zip(stages) {
        let path = staging.path().join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let backup = |name: &str| staging.path().join(format!("{name}.old"));
    let mut committed: Vec<&str> = Vec::new();

    for name in names {
        let target = dir.join(name);
        let result = (|| -> io::Result<()> {
            if target.exists() {
                rename(&target, &backup(name))?;
            }
            rename(&staging.path().join(name), &target)
        })();

        if let Err(err) = result {
            // Undo in reverse, including the half-done current file.
            committed.push(name);
            for &name in committed.iter().rev() {
                let target = dir.join(name);
                let backup = backup(name);
                if backup.exists() {
                    _ = fs::rename(&backup, &target);
                } else if !staging.path().join(name).exists() {
                    _ = fs::remove_file(&target);
                }
            }
            return Err(err).with_context(|| format!("failed to write {}", target.display()));
        }

        committed.push(name);
    }

    for name in names {
        tracing::info!(path = %dir.join(name).display(), "wrote stage");
    }
    Ok(())
}
