// file: src/exporter/json.rs
// description: json export of documentation pages and their outlines

use crate::error::{ExplorerError, Result};
use crate::models::{DocumentationPage, SectionNode};
use crate::parser::OutlineBuilder;
use crate::utils::Validator;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedPage<'a> {
    #[serde(flatten)]
    pub page: &'a DocumentationPage,
    pub content_hash: String,
    pub outline: &'a [SectionNode],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_pages: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| ExplorerError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export_page(
        &self,
        page: &DocumentationPage,
        outline: &[SectionNode],
        pretty: bool,
    ) -> Result<PathBuf> {
        let file_name = format!("{}.json", file_stem(page));
        self.write_page(page, outline, &file_name, pretty)
    }

    /// Writes every page plus `manifest.json`. Pages whose names collide get
    /// a numeric suffix.
    pub fn export_all(
        &self,
        pages: &[DocumentationPage],
        builder: &OutlineBuilder,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        let mut used = HashSet::new();
        let mut files = Vec::with_capacity(pages.len());

        for page in pages {
            let stem = file_stem(page);
            let mut file_name = format!("{}.json", stem);
            let mut n = 2;
            while !used.insert(file_name.clone()) {
                file_name = format!("{}-{}.json", stem, n);
                n += 1;
            }

            let title = (!page.title.is_empty()).then_some(page.title.as_str());
            let outline = builder.build(&page.markdown, title);
            self.write_page(page, &outline, &file_name, pretty)?;
            files.push(file_name);
        }

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_pages: files.len(),
            files,
        };
        self.write_json("manifest.json", &manifest, pretty)?;

        info!("Export complete: {} pages exported", manifest.total_pages);
        Ok(manifest)
    }

    fn write_page(
        &self,
        page: &DocumentationPage,
        outline: &[SectionNode],
        file_name: &str,
        pretty: bool,
    ) -> Result<PathBuf> {
        let exported = ExportedPage {
            page,
            content_hash: page.content_hash(),
            outline,
        };
        self.write_json(file_name, &exported, pretty)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T, pretty: bool) -> Result<PathBuf> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_dir.join(file_name);
        fs::write(&path, json).map_err(|source| ExplorerError::FileOperation {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn file_stem(page: &DocumentationPage) -> String {
    if !page.title.trim().is_empty() {
        Validator::sanitize_file_stem(&page.title)
    } else {
        Validator::sanitize_file_stem(&page.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path().join("nested/out")).unwrap();
        assert!(exporter.output_dir().is_dir());
    }

    #[test]
    fn test_export_page_contents() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();
        let page = DocumentationPage::new("7", "https://docs/x", "# Users\n## List", "Users", "/users");
        let outline = OutlineBuilder::new().build(&page.markdown, Some("Users"));

        let path = exporter.export_page(&page, &outline, false).unwrap();
        assert_eq!(path.file_name().unwrap(), "users.json");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["outline"][0]["id"], "list");
        assert_eq!(value["content_hash"], page.content_hash());
    }

    #[test]
    fn test_export_all_writes_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path()).unwrap();
        let pages = vec![
            DocumentationPage::new("1", "", "# Users", "Users", ""),
            DocumentationPage::new("2", "", "# Users", "Users", ""),
            DocumentationPage::new("abc", "", "text", "", ""),
        ];

        let manifest = exporter
            .export_all(&pages, &OutlineBuilder::new(), true)
            .unwrap();

        assert_eq!(manifest.total_pages, 3);
        assert_eq!(manifest.files, vec!["users.json", "users-2.json", "abc.json"]);
        assert!(dir.path().join("manifest.json").is_file());
        assert!(dir.path().join("users-2.json").is_file());
    }
}
