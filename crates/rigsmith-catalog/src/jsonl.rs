//! Catalog dumps in JSONL: one component per line.
//!
//! A dump is either mixed (one `catalog.jsonl`) or filed per category
//! (`<dir>/gpu.jsonl`, `<dir>/psu.jsonl`, ...). Writers emit one
//! `# <category> (<count>)` section per category in canonical order with
//! entries sorted by ID, so two dumps of the same catalog are byte-identical.
//! Readers skip blank lines and `#` comments, and reject duplicate IDs.

use crate::category::Category;
use crate::component::Component;
use crate::error::CatalogError;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a mixed dump from a reader.
pub fn read_components(reader: impl BufRead) -> Result<Vec<Component>, CatalogError> {
    read_filed(reader, None)
}

/// Write a sectioned dump to a writer.
pub fn write_components(
    writer: &mut impl Write,
    components: &[Component],
) -> Result<(), CatalogError> {
    for (category, entries) in sections(components) {
        writeln!(writer, "# {category} ({})", entries.len()).map_err(write_error)?;
        for component in entries {
            let line = serde_json::to_string(component)
                .map_err(|e| CatalogError::Serialize(format!("{}: {e}", component.id)))?;
            writeln!(writer, "{line}").map_err(write_error)?;
        }
    }
    Ok(())
}

/// Read a mixed dump from disk.
pub fn read_components_from_path(path: impl AsRef<Path>) -> Result<Vec<Component>, CatalogError> {
    let text = read_dump_text(path.as_ref())?;
    read_components(text.as_bytes())
}

/// Read a per-category dump; every entry must be a `category`.
pub fn read_category_from_path(
    path: impl AsRef<Path>,
    category: Category,
) -> Result<Vec<Component>, CatalogError> {
    let text = read_dump_text(path.as_ref())?;
    read_filed(text.as_bytes(), Some(category))
}

/// Write a sectioned dump to disk. The file is replaced atomically.
pub fn write_components_to_path(
    path: impl AsRef<Path>,
    components: &[Component],
) -> Result<(), CatalogError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut buffer = Vec::new();
    write_components(&mut buffer, components)?;

    let staging = staging_path(path);
    let result = fs::write(&staging, &buffer)
        .and_then(|()| File::open(&staging)?.sync_all())
        .and_then(|()| fs::rename(&staging, path));
    if let Err(error) = result {
        let _ = fs::remove_file(&staging);
        return Err(io_error(path, error));
    }
    Ok(())
}

/// Path of the per-category dump for `category` under `dir`.
pub fn category_file(dir: &Path, category: Category) -> PathBuf {
    dir.join(format!("{}.jsonl", category.as_str()))
}

/// Read every `<category>.jsonl` under `dir`. A missing file is an empty
/// category. IDs must be unique across files.
pub fn read_catalog_dir(dir: impl AsRef<Path>) -> Result<Vec<Component>, CatalogError> {
    let dir = dir.as_ref();
    let mut filed_under: BTreeMap<String, Category> = BTreeMap::new();
    let mut components = Vec::new();

    for category in Category::ALL {
        let path = category_file(dir, category);
        if !path.is_file() {
            continue;
        }
        let entries = read_category_from_path(&path, category)?;
        debug!(%category, count = entries.len(), path = %path.display(), "read category dump");
        for component in entries {
            if let Some(first) = filed_under.insert(component.id.clone(), category) {
                return Err(CatalogError::Corrupt(format!(
                    "{}: component {} is also filed under {first}",
                    path.display(),
                    component.id
                )));
            }
            components.push(component);
        }
    }
    Ok(components)
}

/// Write one `<category>.jsonl` per non-empty category under `dir`.
pub fn write_catalog_dir(dir: impl AsRef<Path>, components: &[Component]) -> Result<(), CatalogError> {
    let dir = dir.as_ref();
    for (category, entries) in sections(components) {
        let owned: Vec<Component> = entries.into_iter().cloned().collect();
        write_components_to_path(category_file(dir, category), &owned)?;
    }
    Ok(())
}

fn read_filed(
    reader: impl BufRead,
    filed_as: Option<Category>,
) -> Result<Vec<Component>, CatalogError> {
    let mut first_seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut components = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| CatalogError::Io {
            line: line_no,
            message: e.to_string(),
        })?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }

        let component = parse_entry(line_no, entry)?;
        if let Some(expected) = filed_as
            && component.category != expected
        {
            return Err(CatalogError::Misfiled {
                line: line_no,
                id: component.id,
                expected,
                found: component.category,
            });
        }
        if let Some(&first_line) = first_seen.get(&component.id) {
            return Err(CatalogError::DuplicateId {
                line: line_no,
                first_line,
                id: component.id,
            });
        }
        first_seen.insert(component.id.clone(), line_no);
        components.push(component);
    }
    Ok(components)
}

fn parse_entry(line: usize, entry: &str) -> Result<Component, CatalogError> {
    let component: Component = serde_json::from_str(entry).map_err(|e| CatalogError::Parse {
        line,
        message: e.to_string(),
    })?;
    component
        .validate()
        .map_err(|message| CatalogError::InvalidComponent {
            line,
            id: component.id.clone(),
            category: component.category,
            message,
        })?;
    Ok(component)
}

/// Components grouped by category, each group sorted by ID.
fn sections(components: &[Component]) -> BTreeMap<Category, Vec<&Component>> {
    let mut sections: BTreeMap<Category, Vec<&Component>> = BTreeMap::new();
    for component in components {
        sections.entry(component.category).or_default().push(component);
    }
    for entries in sections.values_mut() {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
    }
    sections
}

/// Dump text, rejecting NUL and non-UTF-8 bytes with the offending line.
fn read_dump_text(path: &Path) -> Result<String, CatalogError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(CatalogError::Corrupt(format!(
            "{}: NUL byte on line {}",
            path.display(),
            line_of(&bytes, offset)
        )));
    }
    String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        CatalogError::Corrupt(format!(
            "{}: invalid UTF-8 on line {}",
            path.display(),
            line_of(e.as_bytes(), offset)
        ))
    })
}

fn line_of(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog.jsonl".to_string());
    path.with_file_name(format!(".{name}.{}.partial", std::process::id()))
}

fn io_error(path: &Path, error: std::io::Error) -> CatalogError {
    CatalogError::Io {
        line: 0,
        message: format!("{}: {error}", path.display()),
    }
}

fn write_error(error: std::io::Error) -> CatalogError {
    CatalogError::Io {
        line: 0,
        message: error.to_string(),
    }
}
