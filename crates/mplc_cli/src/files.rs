//! Finding the source files to parse

use eyre::eyre;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// The extension of MPL source files
pub const SOURCE_EXTENSION: &str = "mpl";

/// A source file to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// How the file is named in reports
    pub name: String,
}

/// Expands `paths` into source files.
///
/// Files are taken as given. Directories are searched recursively for `.mpl` files, which are
/// named relative to the directory and sorted. A path is only visited once.
pub fn source_files<P: AsRef<Path>>(paths: &[P]) -> eyre::Result<Vec<SourceFile>> {
    let mut visited = HashSet::new();
    let mut files = vec![];
    for root in paths {
        let root = root.as_ref();
        if root.is_file() {
            if visited.insert(root.to_path_buf()) {
                files.push(SourceFile {
                    path: root.to_path_buf(),
                    name: root.display().to_string(),
                });
            }
        } else if root.is_dir() {
            let mut found = walk(root, &mut visited)?;
            found.sort();
            files.extend(found.into_iter().map(|path| {
                let name = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .display()
                    .to_string();
                SourceFile { path, name }
            }));
        } else {
            return Err(eyre!("{} does not exist", root.display()));
        }
    }
    Ok(files)
}

fn walk(dir: &Path, visited: &mut HashSet<PathBuf>) -> eyre::Result<Vec<PathBuf>> {
    let mut stack = vec![dir.to_path_buf()];
    let mut files = vec![];
    while let Some(path) = stack.pop() {
        if !visited.insert(path.clone()) {
            continue;
        }
        if path.is_dir() {
            for entry in fs::read_dir(&path)? {
                stack.push(entry?.path());
            }
        } else if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            trace!("found source file {}", path.display());
            files.push(path);
        }
    }
    Ok(files)
}
