//! Zip archive extraction.
//!
//! Every entry is checked against the destination root before anything is
//! written. An archive with a single escaping entry is rejected as a whole.

mod naming;

pub use naming::{archive_stem, next_target_dir};

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::Error;

/// Directory the launcher will work in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub directory: PathBuf,
    /// True when `directory` was produced by extracting an archive.
    pub extracted: bool,
}

/// Whether `path` names a zip archive (by extension, case-insensitive).
pub fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Turn a `run` source into an existing directory, extracting archives next to
/// themselves.
pub fn resolve_source(source: &Path) -> Result<ResolvedTarget, Error> {
    if is_zip(source) {
        let base_dir = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let directory = std::path::absolute(extract(source, base_dir)?)?;
        return Ok(ResolvedTarget {
            directory,
            extracted: true,
        });
    }

    if !source.is_dir() {
        return Err(Error::DirectoryNotFound(source.to_path_buf()));
    }
    Ok(ResolvedTarget {
        directory: source.to_path_buf(),
        extracted: false,
    })
}

/// One validated archive entry.
struct PlannedEntry {
    index: usize,
    path: PathBuf,
    is_dir: bool,
    mode: Option<u32>,
}

/// Extract `archive` into a fresh directory under `base_dir` and return it.
///
/// On an I/O error the partially written directory is left in place.
pub fn extract(archive: &Path, base_dir: &Path) -> Result<PathBuf, Error> {
    let invalid = |reason: String| Error::InvalidArchive {
        path: archive.to_path_buf(),
        reason,
    };

    if !archive.is_file() {
        return Err(invalid("not a file".to_string()));
    }
    let file = File::open(archive).map_err(|e| invalid(e.to_string()))?;
    let mut zip = ZipArchive::new(file).map_err(|e| invalid(e.to_string()))?;

    let stem = archive_stem(archive).ok_or_else(|| invalid("no usable file name".to_string()))?;
    let target = next_target_dir(base_dir, &stem)?;

    let plan = plan_entries(&mut zip, archive, &target)?;

    fs::create_dir_all(&target)?;
    info!(
        archive = %archive.display(),
        target = %target.display(),
        entries = plan.len(),
        "Extracting archive"
    );

    for entry in &plan {
        if entry.is_dir {
            fs::create_dir_all(&entry.path)?;
            continue;
        }

        if let Some(parent) = entry.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut reader = zip.by_index(entry.index)?;
        let mut out = open_output(&entry.path, entry.mode)?;
        io::copy(&mut reader, &mut out)?;
        apply_mode(&entry.path, entry.mode)?;
        debug!(path = %entry.path.display(), "Extracted file");
    }

    Ok(target)
}

fn plan_entries(
    zip: &mut ZipArchive<File>,
    archive: &Path,
    target: &Path,
) -> Result<Vec<PlannedEntry>, Error> {
    let mut plan = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index(index)?;
        let name = entry.name().to_string();
        let path =
            safe_join(target, &name).ok_or_else(|| Error::UnsafeArchiveEntry(name.clone()))?;

        // A name that collapses to the root (`./`) is the target itself.
        if path == target {
            if entry.is_dir() {
                continue;
            }
            return Err(Error::InvalidArchive {
                path: archive.to_path_buf(),
                reason: format!("file entry {:?} names the extraction root", name),
            });
        }

        plan.push(PlannedEntry {
            index,
            path,
            is_dir: entry.is_dir(),
            mode: entry.unix_mode(),
        });
    }
    Ok(plan)
}

/// Join an archive entry name onto `root`, or `None` if it would land outside.
///
/// The check is purely lexical: `..` may only cancel components the name itself
/// introduced, and absolute or drive-prefixed names are refused. A name that
/// collapses to nothing (`""`, `./`, `a/..`) yields `root` itself.
pub fn safe_join(root: &Path, name: &str) -> Option<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return None;
    }

    let mut parts: Vec<&str> = Vec::new();
    for (i, part) in normalized.split('/').enumerate() {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            _ if i == 0 && has_drive_prefix(part) => return None,
            _ => {
                // Anything still parsed as more than a plain name is suspect.
                let mut components = Path::new(part).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => parts.push(part),
                    _ => return None,
                }
            }
        }
    }

    Some(parts.iter().fold(root.to_path_buf(), |path, part| path.join(part)))
}

fn has_drive_prefix(part: &str) -> bool {
    let bytes = part.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(unix)]
fn open_output(path: &Path, mode: Option<u32>) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if let Some(mode) = mode {
        options.mode(mode & 0o777);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_output(path: &Path, _mode: Option<u32>) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Re-apply the declared mode; `open` only honours it for new files.
#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    match mode {
        Some(mode) => fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}

/// If `dir` holds exactly one directory and nothing else, move that
/// directory's contents up into `dir`. Returns whether anything moved.
pub fn collapse_single_root(dir: &Path) -> Result<bool, Error> {
    let entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    let [only] = entries.as_slice() else {
        return Ok(false);
    };
    if !only.file_type()?.is_dir() {
        return Ok(false);
    }

    // Rename first so a child sharing the wrapper's name cannot collide.
    let staging = dir.join(format!(".{}.unwrap", only.file_name().to_string_lossy()));
    fs::rename(only.path(), &staging)?;

    for child in fs::read_dir(&staging)? {
        let child = child?;
        fs::rename(child.path(), dir.join(child.file_name()))?;
    }
    fs::remove_dir(&staging)?;

    debug!(dir = %dir.display(), "Collapsed single top-level directory");
    Ok(true)
}
