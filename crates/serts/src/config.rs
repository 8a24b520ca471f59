//! Configuration for serts.
//!
//! Loads config from:
//! 1. Global: ~/.config/serts/config.toml
//! 2. Per-project: .serts/config.toml (overrides global)
//!
//! Command-line flags override both.
//!
//! Example config.toml:
//! ```toml
//! [output]
//! dir = "frontend/src/lib/types/serializers"
//! index_file = "index.ts"
//! header = "Auto-generated. Do not edit manually."
//!
//! [typescript]
//! optional = "always"
//! unknown = "any"
//!
//! [naming]
//! strip_suffix = "Serializer"
//! ```

use anyhow::Context;
use serde::Deserialize;
use serts_typegen::{OptionalStyle, TypeScriptOptions, UnknownStyle};
use std::path::{Path, PathBuf};

/// Where and how files are written.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output root directory.
    pub dir: Option<PathBuf>,
    /// Index file path, relative to the output root.
    pub index_file: Option<String>,
    /// Extension of generated files.
    pub extension: Option<String>,
    /// Banner comment. An empty string disables it.
    pub header: Option<String>,
}

/// Shape of the generated declarations.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TypeScriptConfig {
    pub export: Option<bool>,
    pub readonly: Option<bool>,
    pub optional: Option<OptionalStyle>,
    pub unknown: Option<UnknownStyle>,
    pub type_imports: Option<bool>,
}

/// Schema name normalization.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NamingConfig {
    /// Suffix removed from schema names, e.g. `Serializer`.
    pub strip_suffix: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SertsConfig {
    pub output: OutputConfig,
    pub typescript: TypeScriptConfig,
    pub naming: NamingConfig,
}

impl SertsConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/serts/config.toml, then merges the
    /// per-project config from .serts/config.toml. An explicit `path` replaces
    /// the per-project file.
    pub fn load(root: &Path, path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path)? {
                tracing::debug!(path = %global_path.display(), "loaded global config");
                config = config.merge(global);
            }
        }

        let project_path = match path {
            Some(p) => p.to_path_buf(),
            None => root.join(".serts").join("config.toml"),
        };
        match Self::load_file(&project_path)? {
            Some(project) => {
                tracing::debug!(path = %project_path.display(), "loaded project config");
                config = config.merge(project);
            }
            None if path.is_some() => {
                anyhow::bail!("config file {} not found", project_path.display());
            }
            None => {}
        }

        Ok(config)
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("serts").join("config.toml"))
    }

    /// Load config from a file path. A missing file is not an error.
    fn load_file(path: &Path) -> anyhow::Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output: OutputConfig {
                dir: other.output.dir.or(self.output.dir),
                index_file: other.output.index_file.or(self.output.index_file),
                extension: other.output.extension.or(self.output.extension),
                header: other.output.header.or(self.output.header),
            },
            typescript: TypeScriptConfig {
                export: other.typescript.export.or(self.typescript.export),
                readonly: other.typescript.readonly.or(self.typescript.readonly),
                optional: other.typescript.optional.or(self.typescript.optional),
                unknown: other.typescript.unknown.or(self.typescript.unknown),
                type_imports: other.typescript.type_imports.or(self.typescript.type_imports),
            },
            naming: NamingConfig {
                strip_suffix: other.naming.strip_suffix.or(self.naming.strip_suffix),
            },
        }
    }

    /// Emitter options, falling back to the engine defaults.
    pub fn typescript_options(&self) -> TypeScriptOptions {
        let defaults = TypeScriptOptions::default();
        TypeScriptOptions {
            export: self.typescript.export.unwrap_or(defaults.export),
            readonly: self.typescript.readonly.unwrap_or(defaults.readonly),
            optional: self.typescript.optional.unwrap_or(defaults.optional),
            unknown: self.typescript.unknown.unwrap_or(defaults.unknown),
            type_imports: self.typescript.type_imports.unwrap_or(defaults.type_imports),
            extension: self.output.extension.clone().unwrap_or(defaults.extension),
            index_file: self.output.index_file.clone().unwrap_or(defaults.index_file),
            header: match &self.output.header {
                Some(h) if h.is_empty() => None,
                Some(h) => Some(h.clone()),
                None => defaults.header,
            },
        }
    }
}
