//! Target directory naming for extracted archives.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Directory name for an archive: its file name without the `.zip` extension.
pub fn archive_stem(archive: &Path) -> Option<String> {
    let name = archive.file_name()?.to_str()?;
    let stem = match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".zip") => {
            &name[..cut]
        }
        _ => name,
    };
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Pick a fresh directory under `base_dir` for `stem`.
///
/// Uses `stem` when nothing named `stem` or `stem-N` exists. Otherwise returns
/// `stem-(max N + 1)`, so numbering keeps increasing even if earlier
/// directories were removed.
pub fn next_target_dir(base_dir: &Path, stem: &str) -> Result<PathBuf, Error> {
    let plain = base_dir.join(stem);
    let max_suffix = max_numbered_sibling(base_dir, stem)?;

    match max_suffix {
        Some(n) => Ok(base_dir.join(format!("{}-{}", stem, n + 1))),
        None if plain.exists() => Ok(base_dir.join(format!("{}-1", stem))),
        None => Ok(plain),
    }
}

fn max_numbered_sibling(base_dir: &Path, stem: &str) -> Result<Option<u64>, Error> {
    if !base_dir.exists() {
        return Ok(None);
    }

    let prefix = format!("{}-", stem);
    let mut highest = None;
    for entry in fs::read_dir(base_dir)? {
        let name = entry?.file_name();
        let Some(n) = name.to_str().and_then(|name| numbered_suffix(name, &prefix)) else {
            continue;
        };
        highest = highest.max(Some(n));
    }
    Ok(highest)
}

fn numbered_suffix(name: &str, prefix: &str) -> Option<u64> {
    let digits = name.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}
