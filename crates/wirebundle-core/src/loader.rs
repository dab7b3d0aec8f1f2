use crate::description::{AssemblyDescription, PartDescription};
use crate::error::{Error, Result};
use crate::wire::WireRegistry;
use crate::wire_set::WireSet;
use std::path::{Path, PathBuf};

pub const ASSEMBLIES_DIR: &str = "assemblies";
pub const PART_DESCRIPTIONS_DIR: &str = "part_descriptions";
pub const PARTS_DIR: &str = "parts";

/// A part description resolved against an asset directory.
#[derive(Debug, Clone)]
pub struct PartRecord {
    /// Description path as referenced by the assembly (e.g. `battery.json5`).
    pub id: String,
    pub drawing_path: PathBuf,
    pub wire_sets: Vec<WireSet>,
}

/// Reads descriptions from an asset directory laid out as
/// `assemblies/*.json5`, `part_descriptions/*.json5` and `parts/*.svg`.
#[derive(Debug, Clone)]
pub struct DescriptionLoader {
    root: PathBuf,
}

impl DescriptionLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assemblies_dir(&self) -> PathBuf {
        self.root.join(ASSEMBLIES_DIR)
    }

    /// All `*.json5` files in the assemblies directory, sorted by file name.
    pub fn list_assemblies(&self) -> Result<Vec<PathBuf>> {
        let dir = self.assemblies_dir();
        let entries = std::fs::read_dir(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "json5") {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }

    /// `assembly` is either a path that exists as given or a name inside `assemblies/`.
    pub fn load_assembly(&self, assembly: &str) -> Result<AssemblyDescription> {
        let direct = PathBuf::from(assembly);
        let path = if direct.is_file() {
            direct
        } else {
            self.assemblies_dir().join(assembly)
        };
        let text = read(&path)?;
        AssemblyDescription::from_json5(&text, &path)
    }

    pub fn load_part(&self, part: &str, registry: &WireRegistry) -> Result<PartRecord> {
        let path = self.root.join(PART_DESCRIPTIONS_DIR).join(part);
        let text = read(&path)?;
        let description = PartDescription::from_json5(&text, &path)?;
        let wire_sets = description.wire_sets(registry, part)?;
        tracing::debug!(part, wire_sets = wire_sets.len(), "loaded part description");
        Ok(PartRecord {
            id: part.to_string(),
            drawing_path: self.root.join(PARTS_DIR).join(&description.file),
            wire_sets,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
