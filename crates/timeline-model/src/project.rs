//! Project bundle on disk.
//!
//! A project is a directory holding source media under `sources/`, the
//! clip list and build settings in `meta/project.json`, and rendered plans
//! under `exports/`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clip::ClipDescriptor;
use crate::settings::BuildConfig;

/// Current schema version written by [`Project::new`].
pub const PROJECT_VERSION: &str = "1.0";

/// Top-level project file (`meta/project.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier.
    pub id: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    /// Ordered clip list.
    #[serde(default)]
    pub clips: Vec<ClipDescriptor>,

    /// Transition, composition and music settings.
    #[serde(default)]
    pub settings: BuildConfig,
}

impl Project {
    /// Create an empty project with the given settings.
    pub fn new(name: impl Into<String>, settings: BuildConfig) -> Self {
        let now = chrono::Utc::now();
        Self {
            version: PROJECT_VERSION.to_string(),
            name: name.into(),
            id: project_id(now),
            created_at: now.to_rfc3339(),
            modified_at: now.to_rfc3339(),
            clips: vec![],
            settings,
        }
    }

    /// Refresh `modified_at`.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }
}

/// A project together with the directory it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project metadata, clips and settings.
    pub project: Project,
}

impl LoadedProject {
    /// Path of the project file inside a bundle.
    pub fn project_file(root: &Path) -> PathBuf {
        root.join("meta").join("project.json")
    }

    /// Load a project from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        let project_path = Self::project_file(&root);

        let project_json =
            std::fs::read_to_string(&project_path).map_err(|e| ProjectError::IoError {
                path: project_path.clone(),
                source: e,
            })?;

        let project: Project =
            serde_json::from_str(&project_json).map_err(|e| ProjectError::ParseError {
                path: project_path,
                source: e,
            })?;

        if project.version != PROJECT_VERSION {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "unsupported project version {} (expected {PROJECT_VERSION})",
                    project.version
                ),
            });
        }

        Ok(Self { root, project })
    }

    /// Write `meta/project.json`.
    pub fn save(&self) -> Result<(), ProjectError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        let project_path = meta_dir.join("project.json");
        let project_json =
            serde_json::to_string_pretty(&self.project).map_err(|e| ProjectError::ParseError {
                path: project_path.clone(),
                source: e,
            })?;
        std::fs::write(&project_path, project_json).map_err(|e| ProjectError::IoError {
            path: project_path,
            source: e,
        })
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        settings: BuildConfig,
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        for subdir in &["sources", "meta", "exports"] {
            std::fs::create_dir_all(root.join(subdir)).map_err(|e| ProjectError::IoError {
                path: root.join(subdir),
                source: e,
            })?;
        }

        let loaded = Self {
            root,
            project: Project::new(name, settings),
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Directory that exported render plans are written to.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    /// Validate that all referenced source files exist.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        for clip in &self.project.clips {
            match &clip.source_path {
                Some(path) if !self.root.join(path).exists() => {
                    errors.push(format!("Clip {} source missing: {path}", clip.id));
                }
                Some(_) => {}
                None => errors.push(format!("Clip {} has no source path", clip.id)),
            }
        }

        if let Some(path) = self
            .project
            .settings
            .music
            .as_ref()
            .and_then(|m| m.source_path.as_ref())
        {
            if !self.root.join(path).exists() {
                errors.push(format!("Music source missing: {path}"));
            }
        }

        errors
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

/// Time-derived identifier in UUID v4 layout.
fn project_id(now: chrono::DateTime<chrono::Utc>) -> String {
    let seed = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u128
        ^ (std::process::id() as u128) << 64;
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFF_FFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3F) | 0x80) as u16,
        (seed >> 66) & 0xFFFF_FFFF_FFFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::MusicBed;
    use crate::time::{TimePoint, TimeRange};
    use crate::transition::TransitionConfig;

    #[test]
    fn test_project_creation() {
        let project = Project::new("Holiday Cut", BuildConfig::default());
        assert_eq!(project.name, "Holiday Cut");
        assert_eq!(project.version, PROJECT_VERSION);
        assert!(project.clips.is_empty());
        assert_eq!(project.id.len(), 36);
        assert_eq!(&project.id[14..15], "4");
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new(
            "Test",
            BuildConfig::with_transition(TransitionConfig::fade(TimePoint::from_secs(2))),
        );
        project.clips.push(
            ClipDescriptor::new("a", TimeRange::from_secs(0, 10)).with_source_path("sources/a.mov"),
        );
        let json = serde_json::to_string_pretty(&project).unwrap();
        let parsed: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, project);
    }

    #[test]
    fn test_loaded_project_create_and_load() {
        let dir = std::env::temp_dir().join("segue_test_project");
        let _ = std::fs::remove_dir_all(&dir);

        let created = LoadedProject::create(&dir, "Integration Test", BuildConfig::default()).unwrap();
        assert_eq!(created.project.name, "Integration Test");
        assert!(dir.join("sources").is_dir());
        assert!(created.exports_dir().is_dir());

        let loaded = LoadedProject::load(&dir).unwrap();
        assert_eq!(loaded.project, created.project);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = std::env::temp_dir().join("segue_test_project_version");
        let _ = std::fs::remove_dir_all(&dir);

        let mut created = LoadedProject::create(&dir, "Old", BuildConfig::default()).unwrap();
        created.project.version = "0.1".to_string();
        created.save().unwrap();

        let err = LoadedProject::load(&dir).unwrap_err();
        assert!(matches!(err, ProjectError::ValidationError { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_sources_reports_missing() {
        let dir = std::env::temp_dir().join("segue_test_validate");
        let _ = std::fs::remove_dir_all(&dir);

        let mut loaded = LoadedProject::create(&dir, "Validate Test", BuildConfig::default()).unwrap();
        std::fs::write(dir.join("sources/present.mov"), b"").unwrap();
        loaded.project.clips = vec![
            ClipDescriptor::new("present", TimeRange::from_secs(0, 5))
                .with_source_path("sources/present.mov"),
            ClipDescriptor::new("gone", TimeRange::from_secs(0, 5))
                .with_source_path("sources/gone.mov"),
        ];
        loaded.project.settings.music =
            Some(MusicBed::new(TimePoint::from_secs(30)).with_source_path("sources/song.m4a"));

        let errors = loaded.validate_sources();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("Clip gone source missing")));
        assert!(errors.iter().any(|e| e.contains("Music source missing")));

        std::fs::remove_dir_all(&dir).ok();
    }
}
