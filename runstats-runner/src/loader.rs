// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential loading of input files.
//!
//! A [`ModuleLoader`] turns a path into some loaded value. Loading is attempted synchronously
//! first; a loader that can only produce the value asynchronously (for example, because the input
//! is a stream) returns [`LoadError::RequiresAsync`] from [`ModuleLoader::load_sync`], and the
//! asynchronous path is awaited instead.

use crate::errors::LoadError;
use camino::Utf8Path;
use std::future::Future;
use tracing::debug;

/// Loads files into values of type [`Self::Module`](ModuleLoader::Module).
pub trait ModuleLoader {
    /// The value produced by loading a file.
    type Module;

    /// Loads `path` synchronously.
    ///
    /// Returns [`LoadError::RequiresAsync`] if `path` must be loaded through
    /// [`load_async`](Self::load_async) instead.
    fn load_sync(&self, path: &Utf8Path) -> Result<Self::Module, LoadError>;

    /// Loads `path` asynchronously.
    fn load_async(&self, path: &Utf8Path)
    -> impl Future<Output = Result<Self::Module, LoadError>>;
}

/// Loads a single file, falling back to the asynchronous path if required.
pub async fn load_file<L: ModuleLoader + ?Sized>(
    loader: &L,
    path: &Utf8Path,
) -> Result<L::Module, LoadError> {
    match loader.load_sync(path) {
        Err(LoadError::RequiresAsync { .. }) => {
            debug!(%path, "falling back to asynchronous load");
            loader.load_async(path).await
        }
        other => other,
    }
}

/// Loads `files` one at a time, in order.
///
/// For each file, `pre_load` is called with its path, then the file is loaded with
/// [`load_file`], then `post_load` is called with its path and the loaded value. A file is only
/// started once the previous one has been fully processed.
///
/// # Errors
///
/// The first load error stops the sequence and is returned. `post_load` is not called for the file
/// that failed, and no later file is started.
pub async fn load_files<L, I, P>(
    files: I,
    loader: &L,
    mut pre_load: impl FnMut(&Utf8Path),
    mut post_load: impl FnMut(&Utf8Path, L::Module),
) -> Result<(), LoadError>
where
    L: ModuleLoader + ?Sized,
    I: IntoIterator<Item = P>,
    P: AsRef<Utf8Path>,
{
    for file in files {
        let file = file.as_ref();
        pre_load(file);
        let module = load_file(loader, file).await?;
        post_load(file, module);
    }
    Ok(())
}
