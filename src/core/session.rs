use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use crate::{
    core::dictionary::{DictionaryTree, codec},
    error::CodecError,
};

/// Dictionary cache for one workspace.
///
/// Trees are loaded lazily on first access and kept until the session is
/// closed or the entry is reloaded. Load failures degrade to an empty tree and
/// are kept as warnings; such a file is never written back until reloaded.
#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    cache: IndexMap<PathBuf, DictionaryTree>,
    /// Existing files whose load failed.
    unloaded: IndexSet<PathBuf>,
    warnings: Vec<CodecError>,
}

impl Session {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        log::debug!("session opened at {}", root.display());
        Self {
            root,
            cache: IndexMap::new(),
            unloaded: IndexSet::new(),
            warnings: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a dictionary path relative to the workspace root.
    pub fn resolve_path(&self, file: impl AsRef<Path>) -> PathBuf {
        let file = file.as_ref();
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        }
    }

    fn ensure_loaded(&mut self, file: impl AsRef<Path>) -> PathBuf {
        let path = self.resolve_path(file);
        if !self.cache.contains_key(&path) {
            let tree = match codec::try_load(&path) {
                Ok(tree) => tree,
                Err(err) => {
                    log::warn!("dictionary unusable, treating as empty: {}", err);
                    self.warnings.push(err);
                    self.unloaded.insert(path.clone());
                    DictionaryTree::new()
                }
            };
            self.cache.insert(path.clone(), tree);
        }
        path
    }

    /// Cached tree for `file`, loading it on first access.
    pub fn dictionary(&mut self, file: impl AsRef<Path>) -> &DictionaryTree {
        let path = self.ensure_loaded(file);
        &self.cache[&path]
    }

    pub fn dictionary_mut(&mut self, file: impl AsRef<Path>) -> &mut DictionaryTree {
        let path = self.ensure_loaded(file);
        &mut self.cache[&path]
    }

    /// Trees for several files, in the given order.
    pub fn dictionaries<P: AsRef<Path>>(&mut self, files: &[P]) -> Vec<&DictionaryTree> {
        let paths: Vec<PathBuf> = files.iter().map(|f| self.ensure_loaded(f)).collect();
        paths.iter().map(|path| &self.cache[path]).collect()
    }

    /// Write the cached tree for `file` back to disk.
    ///
    /// Fails with [`CodecError::Unloaded`] for a file that exists but could not
    /// be loaded; the file on disk is left as it is.
    pub fn persist(&mut self, file: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = self.ensure_loaded(file);
        if self.unloaded.contains(&path) {
            return Err(CodecError::Unloaded { path });
        }
        codec::save(&path, &self.cache[&path])?;
        log::debug!("dictionary saved: {}", path.display());
        Ok(())
    }

    /// Drop the cached tree so the next access reads the file again.
    pub fn reload(&mut self, file: impl AsRef<Path>) {
        let path = self.resolve_path(file);
        self.cache.shift_remove(&path);
        self.unloaded.shift_remove(&path);
    }

    /// Paths currently cached, in load order.
    pub fn cached_paths(&self) -> impl Iterator<Item = &Path> {
        self.cache.keys().map(PathBuf::as_path)
    }

    pub fn warnings(&self) -> &[CodecError] {
        &self.warnings
    }

    /// Release the cache, returning any load warnings collected.
    pub fn close(self) -> Vec<CodecError> {
        log::debug!("session closed at {} ({} cached)", self.root.display(), self.cache.len());
        self.warnings
    }
}
