//! Filesystem primitive adapters.
//!
//! These are thin facades over `std::fs`: per spec.md §1 they are
//! deliberately not the interesting part of this crate. Every primitive
//! reports failure as `false`/`None` rather than propagating an `io::Error`
//! — the interpreter (see [`crate::interpreter`]) is the only caller, and it
//! always turns a failure into an in-band register value, never an abort.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use rand::Rng;
use twox_hash::XxHash64;

use std::hash::Hasher;

/// Create a file or directory at `path`. `ty` must be `"file"` or `"dir"`;
/// anything else is a failure.
pub fn create(path: &str, ty: &str) -> bool {
    match ty {
        "dir" => fs::create_dir(path).is_ok(),
        "file" => fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .is_ok(),
        _ => false,
    }
}

/// Delete a file, or recursively delete a directory.
pub fn delete(path: &str) -> bool {
    let path = Path::new(path);
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).is_ok(),
        Ok(_) => fs::remove_file(path).is_ok(),
        Err(_) => false,
    }
}

/// Copy a file, or recursively copy a directory, to `dst`.
pub fn copy(src: &str, dst: &str) -> bool {
    copy_path(Path::new(src), Path::new(dst))
}

fn copy_path(src: &Path, dst: &Path) -> bool {
    let Ok(meta) = fs::symlink_metadata(src) else {
        return false;
    };
    if meta.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst).is_ok()
    }
}

fn copy_dir(src: &Path, dst: &Path) -> bool {
    if fs::create_dir_all(dst).is_err() {
        return false;
    }
    let Ok(entries) = fs::read_dir(src) else {
        return false;
    };
    for entry in entries {
        let Ok(entry) = entry else {
            return false;
        };
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if !copy_path(&from, &to) {
            return false;
        }
    }
    true
}

/// Rename `src` to `dst`; on a cross-device rename failure, fall back to
/// copy-then-delete.
pub fn mv(src: &str, dst: &str) -> bool {
    if fs::rename(src, dst).is_ok() {
        return true;
    }
    copy(src, dst) && delete(src)
}

/// Write `content` to `path` in the mode named by `mode` (`"w"` truncates,
/// `"a"` appends; anything else is a failure).
pub fn write(path: &str, content: &str, mode: &str) -> bool {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true);
    match mode {
        "w" => {
            opts.truncate(true);
        }
        "a" => {
            opts.append(true);
        }
        _ => return false,
    }
    opts.open(path)
        .and_then(|mut f| f.write_all(content.as_bytes()))
        .is_ok()
}

/// Read a file's contents as UTF-8, or `None` on any failure (missing file,
/// I/O error, invalid UTF-8).
pub fn read(path: &str) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Extract a plain (uncompressed) POSIX tar archive at `tar_path` into the
/// directory `dest`, which must already exist.
pub fn unpack(tar_path: &str, dest: &str) -> bool {
    let Ok(file) = fs::File::open(tar_path) else {
        return false;
    };
    tar::Archive::new(file).unpack(dest).is_ok()
}

/// A 16-hex-digit digest of a file's contents, or `None` if it can't be
/// read.
pub fn hash(path: &str) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Some(format!("{:016x}", hasher.finish()))
}

/// List a directory's entries, excluding `.`/`..`, newline-separated, sorted
/// for determinism. Empty string for an empty (or missing) directory.
pub fn list(path: &str) -> Option<String> {
    let entries = fs::read_dir(path).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Some(names.join("\n"))
}

/// Join `base` and `name` with exactly one `/`, regardless of whether
/// `base` already ends in one.
pub fn path_join(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

/// Starting at `root`, take up to `depth` steps, at each choosing uniformly
/// among the current directory's subdirectories and descending into it.
/// Stops early if a directory has no subdirectories. Returns the final
/// path reached (possibly `root` itself, if it has no subdirectories or
/// `depth == 0`).
pub fn random_walk(root: &str, depth: i64, rng: &mut impl Rng) -> String {
    let mut current = root.to_string();
    let steps = depth.max(0) as usize;
    for _ in 0..steps {
        let Some(listing) = list(&current) else {
            break;
        };
        let subdirs: Vec<&str> = listing
            .lines()
            .filter(|name| {
                fs::metadata(path_join(&current, name))
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            })
            .collect();
        if subdirs.is_empty() {
            break;
        }
        let pick = subdirs[rng.gen_range(0..subdirs.len())];
        current = path_join(&current, pick);
    }
    current
}

/// Recursively verify every path that exists under `a` also exists under
/// `b` at the same relative location. Symmetry is not required: `b` may
/// contain extra entries.
pub fn dir_contains(a: &str, b: &str) -> bool {
    let a_root = Path::new(a);
    let b_root = Path::new(b);
    if !a_root.exists() {
        return false;
    }
    for entry in walkdir::WalkDir::new(a_root).into_iter().filter_map(|e| e.ok()) {
        let Ok(relative) = entry.path().strip_prefix(a_root) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        if !b_root.join(relative).exists() {
            return false;
        }
    }
    true
}
