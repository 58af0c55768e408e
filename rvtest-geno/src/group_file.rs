//! Group file parser: which markers are collapsed together.
//!
//! Paired lines per gene, with an optional annotation line:
//! ```text
//! GENE1 var 1:1:A:C 1:2:A:C 1:3:A:C
//! GENE1 anno lof lof missense
//! GENE2 var 1:51:A:C 1:52:A:C
//! ```
//!
//! The older one-line form `GENE3 1:60:A:C 1:61:A:C` is also accepted.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

/// A named set of markers collapsed into one burden score.
#[derive(Debug, Clone)]
pub struct VariantGroup {
    /// Gene or region name.
    pub name: String,
    /// Marker IDs in this group.
    pub variant_ids: Vec<String>,
    /// Per-marker annotation, empty when none was given.
    pub annotations: Vec<String>,
}

impl VariantGroup {
    /// Positions of markers whose annotation includes `anno`
    /// (annotations may be `;`-separated lists such as `lof;missense`).
    pub fn indices_for_annotation(&self, anno: &str) -> Vec<usize> {
        self.annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.split(';').any(|part| part == anno))
            .map(|(i, _)| i)
            .collect()
    }

    /// Marker IDs, optionally restricted to one annotation.
    pub fn variants_with_annotation(&self, anno: Option<&str>) -> Vec<&str> {
        match anno {
            None => self.variant_ids.iter().map(String::as_str).collect(),
            Some(a) => self
                .indices_for_annotation(a)
                .into_iter()
                .map(|i| self.variant_ids[i].as_str())
                .collect(),
        }
    }
}

/// All groups from a group file, in file order.
#[derive(Debug, Clone)]
pub struct GroupFile {
    pub groups: Vec<VariantGroup>,
}

impl GroupFile {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read group file: {}", path.display()))?;
        Ok(Self::parse_str(&contents))
    }

    fn parse_str(contents: &str) -> Self {
        let mut groups: Vec<VariantGroup> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                continue;
            }

            let idx = *position.entry(fields[0].to_string()).or_insert_with(|| {
                groups.push(VariantGroup {
                    name: fields[0].to_string(),
                    variant_ids: Vec::new(),
                    annotations: Vec::new(),
                });
                groups.len() - 1
            });
            let group = &mut groups[idx];
            let rest = |from: usize| -> Vec<String> {
                fields[from..].iter().map(|s| s.to_string()).collect()
            };

            match fields[1] {
                "var" => group.variant_ids = rest(2),
                "anno" => group.annotations = rest(2),
                "weight" => {}
                _ if group.variant_ids.is_empty() => group.variant_ids = rest(1),
                other => warn!("Group {}: ignoring line of type '{}'", group.name, other),
            }
        }

        groups.retain(|g| !g.variant_ids.is_empty());
        for g in &mut groups {
            if g.annotations.len() != g.variant_ids.len() {
                if !g.annotations.is_empty() {
                    warn!(
                        "Group {}: {} annotations for {} markers",
                        g.name,
                        g.annotations.len(),
                        g.variant_ids.len()
                    );
                }
                g.annotations.resize(g.variant_ids.len(), String::new());
            }
        }
        GroupFile { groups }
    }
}
