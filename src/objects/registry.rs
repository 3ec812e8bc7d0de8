//! Registry of named objects discovered on disk.
//!
//! Files are only indexed when a directory is scanned; each object parses
//! its definition the first time it is enabled.

use ahash::AHashMap;
use std::path::Path;

use super::bo3::Bo3Object;
use super::loader::{DefinitionLoader, TomlDefinitionLoader};
use super::CustomObject;
use crate::core::error::{ObjectError, Result};

/// Objects indexed by lowercase name
pub struct ObjectRegistry {
    objects: AHashMap<String, Bo3Object>,
    loader: Box<dyn DefinitionLoader + Send + Sync>,
}

impl ObjectRegistry {
    /// Registry reading TOML object files
    pub fn new() -> Self {
        Self::with_loader(Box::new(TomlDefinitionLoader::new()))
    }

    pub fn with_loader(loader: Box<dyn DefinitionLoader + Send + Sync>) -> Self {
        Self {
            objects: AHashMap::new(),
            loader,
        }
    }

    /// Register an object, replacing any object of the same name
    pub fn register(&mut self, object: Bo3Object) -> String {
        let key = object.name().to_lowercase();
        self.objects.insert(key.clone(), object);
        key
    }

    /// Index one object file under its file stem
    pub fn add_file(&mut self, path: &Path) -> Result<String> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ObjectError::ObjectNotFound(path.display().to_string()))?;
        Ok(self.register(Bo3Object::new(name, path)))
    }

    /// Index all .toml files from a directory recursively
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.load_directory_recursive(path, &mut names)?;
        names.sort();
        Ok(names)
    }

    fn load_directory_recursive(&mut self, path: &Path, names: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();

            if entry_path.is_dir() {
                self.load_directory_recursive(&entry_path, names)?;
            } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
                names.push(self.add_file(&entry_path)?);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Bo3Object> {
        self.objects.get(&name.to_lowercase())
    }

    /// Enable an object on first use and return it.
    ///
    /// The first failed load reports the config error; later calls report
    /// the object as not loaded.
    pub fn enable(&mut self, name: &str) -> Result<&Bo3Object> {
        let object = self
            .objects
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| ObjectError::ObjectNotFound(name.to_string()))?;
        object.load(self.loader.as_ref())?;
        Ok(object)
    }

    /// Enable every object. Returns how many loaded successfully.
    pub fn enable_all(&mut self) -> usize {
        let loader = self.loader.as_ref();
        self.objects
            .values_mut()
            .map(|object| object.on_enable(loader))
            .filter(|&enabled| enabled)
            .count()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
