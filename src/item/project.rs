use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::Result;
use crate::item::{sort_items, FsEntryItem, ItemKind, TreeItem};

/// One folder of a project, with its filtering patterns.
///
/// Folder patterns are matched against the full subfolder path with a
/// trailing `/`; file patterns against the bare file name. Empty include
/// lists admit everything.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProjectFolder {
    pub path: PathBuf,
    /// Display name; defaults to the last path component.
    pub name: Option<String>,
    pub folder_include_patterns: Vec<String>,
    pub folder_exclude_patterns: Vec<String>,
    pub file_include_patterns: Vec<String>,
    pub file_exclude_patterns: Vec<String>,
}

impl ProjectFolder {
    /// The name to display for this folder.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.path.to_string_lossy().to_string())
        })
    }
}

/// A project definition: a named set of folders, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Project {
    pub name: Option<String>,
    pub folders: Vec<ProjectFolder>,
}

impl Project {
    /// Load a project definition from a TOML file. A missing `name` defaults
    /// to the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut project: Project = toml::from_str(&raw)?;
        if project.name.is_none() {
            project.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }
        Ok(project)
    }
}

/// The project row: its children are one [`ProjectFolderItem`] per folder.
pub struct ProjectItem {
    project: Project,
}

impl ProjectItem {
    pub fn new(project: Project) -> Self {
        Self { project }
    }
}

impl TreeItem for ProjectItem {
    fn display_text(&self) -> String {
        self.project.name.clone().unwrap_or_else(|| "project".into())
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Project
    }

    fn has_children(&self) -> bool {
        true
    }

    fn children(&mut self) -> Vec<Box<dyn TreeItem>> {
        let mut items: Vec<Box<dyn TreeItem>> = self
            .project
            .folders
            .iter()
            .map(|folder| {
                Box::new(ProjectFolderItem::new(
                    folder.path.clone(),
                    folder.display_name(),
                    folder.clone(),
                )) as Box<dyn TreeItem>
            })
            .collect();
        sort_items(&mut items);
        items
    }

    fn on_selected(&mut self) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A directory inside a project folder: a filtered directory listing.
///
/// Subdirectories that pass the folder patterns recurse as
/// `ProjectFolderItem`; files that pass the file patterns appear as plain
/// [`FsEntryItem`] leaves.
pub struct ProjectFolderItem {
    path: PathBuf,
    name: String,
    folder: ProjectFolder,
    folder_include: Option<GlobSet>,
    folder_exclude: Option<GlobSet>,
    file_include: Option<GlobSet>,
    file_exclude: Option<GlobSet>,
}

impl ProjectFolderItem {
    pub fn new(path: PathBuf, name: String, folder: ProjectFolder) -> Self {
        let folder_include = build_globset(&folder.folder_include_patterns);
        let folder_exclude = build_globset(&folder.folder_exclude_patterns);
        let file_include = build_globset(&folder.file_include_patterns);
        let file_exclude = build_globset(&folder.file_exclude_patterns);
        Self {
            path,
            name,
            folder,
            folder_include,
            folder_exclude,
            file_include,
            file_exclude,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_included(candidate: &str, include: &Option<GlobSet>, exclude: &Option<GlobSet>) -> bool {
        if let Some(include) = include {
            if !include.is_match(candidate) {
                return false;
            }
        }
        if let Some(exclude) = exclude {
            if exclude.is_match(candidate) {
                return false;
            }
        }
        true
    }
}

impl TreeItem for ProjectFolderItem {
    fn display_text(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn has_children(&self) -> bool {
        true
    }

    fn children(&mut self) -> Vec<Box<dyn TreeItem>> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to list project folder");
                return Vec::new();
            }
        };

        let mut items: Vec<Box<dyn TreeItem>> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                let candidate = format!("{}/", path.display());
                if !Self::is_included(&candidate, &self.folder_include, &self.folder_exclude) {
                    continue;
                }
                items.push(Box::new(ProjectFolderItem::new(
                    path,
                    name,
                    self.folder.clone(),
                )));
            } else {
                if !Self::is_included(&name, &self.file_include, &self.file_exclude) {
                    continue;
                }
                items.push(Box::new(FsEntryItem::from_parts(path, name, false)));
            }
        }

        sort_items(&mut items);
        items
    }

    fn on_selected(&mut self) {
        tracing::debug!(path = %self.path.display(), "selected");
    }

    fn on_expansion_changed(&mut self, expanded: bool) {
        tracing::trace!(name = %self.name, expanded, "expansion changed");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Compile a pattern list into a globset. Invalid patterns are logged and
/// skipped; an empty list yields `None` (no constraint).
fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => {
                tracing::warn!(%pattern, %err, "ignoring invalid glob pattern");
            }
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::warn!(%err, "failed to build glob set");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{NullSink, TreeIndex};
    use crate::item::HeaderItem;
    use std::fs::File;
    use tempfile::TempDir;

    fn folder_for(path: &Path) -> ProjectFolder {
        ProjectFolder {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn project_loads_from_toml() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("demo.toml");
        fs::write(
            &file,
            r#"
name = "demo"

[[folders]]
path = "/tmp/first"
file_exclude_patterns = ["*.o"]

[[folders]]
path = "/tmp/second"
name = "renamed"
"#,
        )
        .unwrap();

        let project = Project::load(&file).unwrap();
        assert_eq!(project.name.as_deref(), Some("demo"));
        assert_eq!(project.folders.len(), 2);
        assert_eq!(project.folders[0].file_exclude_patterns, vec!["*.o"]);
        assert_eq!(project.folders[1].display_name(), "renamed");
    }

    #[test]
    fn project_name_defaults_to_file_stem() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("unnamed.toml");
        fs::write(&file, "[[folders]]\npath = \"/tmp/x\"\n").unwrap();
        let project = Project::load(&file).unwrap();
        assert_eq!(project.name.as_deref(), Some("unnamed"));
    }

    #[test]
    fn project_load_rejects_bad_toml() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.toml");
        fs::write(&file, "not [valid toml").unwrap();
        assert!(Project::load(&file).is_err());
    }

    #[test]
    fn file_patterns_filter_listing() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("keep.rs")).unwrap();
        File::create(dir.path().join("drop.tmp")).unwrap();

        let folder = ProjectFolder {
            file_exclude_patterns: vec!["*.tmp".into()],
            ..folder_for(dir.path())
        };
        let mut item = ProjectFolderItem::new(dir.path().to_path_buf(), "t".into(), folder);
        let names: Vec<String> = item.children().iter().map(|c| c.display_text()).collect();
        assert_eq!(names, vec!["keep.rs"]);
    }

    #[test]
    fn file_include_patterns_admit_only_matches() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.rs")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();

        let folder = ProjectFolder {
            file_include_patterns: vec!["*.rs".into()],
            ..folder_for(dir.path())
        };
        let mut item = ProjectFolderItem::new(dir.path().to_path_buf(), "t".into(), folder);
        let names: Vec<String> = item.children().iter().map(|c| c.display_text()).collect();
        assert_eq!(names, vec!["a.rs"]);
    }

    #[test]
    fn folder_patterns_filter_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();

        let folder = ProjectFolder {
            folder_exclude_patterns: vec!["*target/".into()],
            ..folder_for(dir.path())
        };
        let mut item = ProjectFolderItem::new(dir.path().to_path_buf(), "t".into(), folder);
        let names: Vec<String> = item.children().iter().map(|c| c.display_text()).collect();
        assert_eq!(names, vec!["src"]);
    }

    #[test]
    fn subdirectories_inherit_patterns() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        File::create(sub.join("x.tmp")).unwrap();
        File::create(sub.join("x.rs")).unwrap();

        let folder = ProjectFolder {
            file_exclude_patterns: vec!["*.tmp".into()],
            ..folder_for(dir.path())
        };
        let mut item = ProjectFolderItem::new(dir.path().to_path_buf(), "t".into(), folder);
        let mut children = item.children();
        assert_eq!(children.len(), 1);
        let names: Vec<String> = children[0]
            .children()
            .iter()
            .map(|c| c.display_text())
            .collect();
        assert_eq!(names, vec!["x.rs"]);
    }

    #[test]
    fn invalid_glob_patterns_are_skipped() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        let folder = ProjectFolder {
            file_exclude_patterns: vec!["[unclosed".into()],
            ..folder_for(dir.path())
        };
        let mut item = ProjectFolderItem::new(dir.path().to_path_buf(), "t".into(), folder);
        assert_eq!(item.children().len(), 1);
    }

    // Header + project forest: expanding the project row inserts one row per
    // folder immediately after it.
    #[test]
    fn header_and_project_forest() {
        let project = Project {
            name: Some("demo".into()),
            folders: vec![
                ProjectFolder {
                    path: "/tmp/alpha".into(),
                    ..Default::default()
                },
                ProjectFolder {
                    path: "/tmp/beta".into(),
                    ..Default::default()
                },
            ],
        };

        let roots: Vec<Box<dyn TreeItem>> = vec![
            Box::new(HeaderItem::new("files")),
            Box::new(ProjectItem::new(project)),
        ];
        let mut index = TreeIndex::new(roots, Box::new(NullSink));
        assert_eq!(index.row_count(), 2);

        index.expand(1);
        assert_eq!(index.row_count(), 4);
        assert_eq!(index.row_at(2).item.display_text(), "alpha");
        assert_eq!(index.row_at(3).item.display_text(), "beta");
        assert_eq!(index.row_at(2).indent, 1);
    }
}
