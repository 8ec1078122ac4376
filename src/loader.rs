//! Module loading fallback (pipeline steps 4 and 5)
//!
//! The container treats module loading as an external collaborator behind the
//! `ModuleLoader` trait: step 4 hands it an autoload-joined filesystem path,
//! step 5 hands it the raw namespace as a generic specifier. Loaded values are
//! returned to the caller as-is, without factory semantics.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use crate::errors::LoadError;
use crate::registry::SharedValue;

pub trait ModuleLoader: Send + Sync {
    /// Resolve a specifier to its exported value.
    ///
    /// `LoadError::NotFound` keeps the pipeline falling through; `Failed`
    /// aborts the resolution (a present-but-broken module must not be masked).
    fn load(&self, specifier: &str) -> Result<SharedValue, LoadError>;
}

/// In-memory loader: specifier → preloaded value.
///
/// The default loader of a fresh container; also what tests and embedders use
/// to stand in for a real module system.
#[derive(Default)]
pub struct StaticModuleLoader {
    modules: DashMap<String, SharedValue>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide(&self, specifier: impl Into<String>, value: SharedValue) {
        self.modules.insert(specifier.into(), value);
    }

    /// Convenience wrapper that boxes the value for you.
    pub fn provide_value<T: Send + Sync + 'static>(&self, specifier: impl Into<String>, value: T) {
        self.provide(specifier, Arc::new(value));
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load(&self, specifier: &str) -> Result<SharedValue, LoadError> {
        self.modules
            .get(specifier)
            .map(|entry| entry.clone())
            .ok_or(LoadError::NotFound)
    }
}

/// Filesystem loader.
///
/// `.toml` files are parsed into `toml::Value`, `.json` into
/// `serde_json::Value`, everything else is exported as the file contents
/// (`String`). Specifiers without an extension can probe a configured
/// extension list, require-style.
#[derive(Default)]
pub struct FsModuleLoader {
    extensions: Vec<String>,
}

impl FsModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn candidate(&self, specifier: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(specifier);
        if direct.is_file() {
            return Some(direct);
        }
        if direct.extension().is_none() {
            for extension in &self.extensions {
                let probed = direct.with_extension(extension);
                if probed.is_file() {
                    return Some(probed);
                }
            }
        }
        None
    }
}

impl ModuleLoader for FsModuleLoader {
    fn load(&self, specifier: &str) -> Result<SharedValue, LoadError> {
        let path = self.candidate(specifier).ok_or(LoadError::NotFound)?;
        let text = std::fs::read_to_string(&path)
            .map_err(|source| LoadError::Failed(Box::new(source)))?;

        match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => {
                let value: toml::Value = toml::from_str(&text)
                    .map_err(|source| LoadError::Failed(Box::new(source)))?;
                Ok(Arc::new(value))
            }
            Some("json") => {
                let value: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|source| LoadError::Failed(Box::new(source)))?;
                Ok(Arc::new(value))
            }
            _ => Ok(Arc::new(text)),
        }
    }
}
