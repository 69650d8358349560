//! Snapshot builder: an ephemeral mirror of a project directory.
//!
//! The snapshot lives inside the project directory so that sibling files
//! can be hard-linked rather than copied. The target file is the only one
//! written from scratch, using the caller's in-memory buffer. The directory
//! is removed when the `Snapshot` is dropped or closed.

use crate::error::SnapshotError;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// List basenames of regular files in `dir` with extension `extension`, sorted.
///
/// Symlinked siblings count when they resolve to a regular file.
pub fn list_siblings(dir: &Path, extension: &str) -> Result<Vec<OsString>, SnapshotError> {
    let list_err = |source| SnapshotError::List {
        source,
        path: dir.to_path_buf(),
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name();
        if Path::new(&name).extension() != Some(OsStr::new(extension)) {
            continue;
        }
        if fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// An ephemeral directory holding one run's view of the project.
#[derive(Debug)]
pub struct Snapshot {
    dir: TempDir,
}

impl Snapshot {
    /// Materialize `siblings` of `project_dir` into a fresh directory.
    ///
    /// Every sibling is hard-linked, except the one sharing `target`'s
    /// basename, which receives `content`. On error the partially built
    /// directory is removed before returning.
    pub fn build(
        project_dir: &Path,
        siblings: &[OsString],
        target: &Path,
        content: &[u8],
        prefix: &str,
    ) -> Result<Snapshot, SnapshotError> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(project_dir)
            .map_err(|source| SnapshotError::Create {
                source,
                path: project_dir.to_path_buf(),
            })?;
        let target_name = target.file_name();
        for name in siblings {
            let dst = dir.path().join(name);
            if target_name == Some(name.as_os_str()) {
                fs::write(&dst, content).map_err(|source| SnapshotError::Write {
                    source,
                    path: dst.clone(),
                })?;
            } else {
                link_or_copy(&project_dir.join(name), &dst)?;
            }
        }
        debug!(
            snapshot = %dir.path().display(),
            files = siblings.len(),
            "snapshot built"
        );
        Ok(Snapshot { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the snapshot now, reporting any cleanup failure.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

fn link_or_copy(src: &Path, dst: &Path) -> Result<(), SnapshotError> {
    let link_err = |source| SnapshotError::Link {
        source,
        from: PathBuf::from(src),
    };
    // hard_link does not follow symlinks; link the file they point at.
    let src = fs::canonicalize(src).map_err(link_err)?;
    match fs::hard_link(&src, dst) {
        Ok(()) => Ok(()),
        Err(err) if links_unsupported(&err) => {
            debug!(file = %src.display(), error = %err, "hard link refused, copying");
            fs::copy(&src, dst).map(|_| ()).map_err(link_err)
        }
        Err(err) => Err(link_err(err)),
    }
}

/// Whether the platform refuses hard links here (other volume, filesystem
/// without link support, link count exhausted).
fn links_unsupported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported || err.raw_os_error().is_some_and(refused_link_code)
}

#[cfg(unix)]
fn refused_link_code(code: i32) -> bool {
    const EPERM: i32 = 1;
    const EXDEV: i32 = 18;
    const EMLINK: i32 = 31;
    matches!(code, EPERM | EXDEV | EMLINK)
}

#[cfg(windows)]
fn refused_link_code(code: i32) -> bool {
    const ERROR_INVALID_FUNCTION: i32 = 1;
    const ERROR_NOT_SAME_DEVICE: i32 = 17;
    matches!(code, ERROR_INVALID_FUNCTION | ERROR_NOT_SAME_DEVICE)
}

#[cfg(not(any(unix, windows)))]
fn refused_link_code(_code: i32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn project() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.go"), "package main // on disk\n").unwrap();
        fs::write(dir.path().join("util.go"), "package main\nfunc u() {}\n").unwrap();
        fs::write(dir.path().join("README.md"), "docs").unwrap();
        fs::create_dir(dir.path().join("vendor.go")).unwrap();
        dir
    }

    fn os_names(names: &[&str]) -> Vec<OsString> {
        names.iter().map(OsString::from).collect()
    }

    fn entries(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn lists_matching_regular_files_only() {
        let dir = project();
        fs::write(dir.path().join("z_test.go"), "package main").unwrap();
        let names = list_siblings(dir.path(), "go").unwrap();
        assert_eq!(names, os_names(&["main.go", "util.go", "z_test.go"]));
    }

    #[test]
    fn listing_a_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone");
        let err = list_siblings(&gone, "go").unwrap_err();
        assert!(matches!(err, SnapshotError::List { .. }));
    }

    #[test]
    fn snapshot_mirrors_siblings_with_buffer_substituted() {
        let dir = project();
        let siblings = list_siblings(dir.path(), "go").unwrap();
        let target = dir.path().join("main.go");
        let snap = Snapshot::build(
            dir.path(),
            &siblings,
            &target,
            b"package main // live\n",
            ".lintsnap-",
        )
        .unwrap();

        let name = snap.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".lintsnap-"));
        assert_eq!(snap.path().parent(), Some(dir.path()));
        let expected: BTreeSet<String> = siblings
            .iter()
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(entries(snap.path()), expected);
        assert_eq!(
            fs::read(snap.path().join("main.go")).unwrap(),
            b"package main // live\n"
        );
        // The real file is untouched.
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "package main // on disk\n"
        );
        assert_eq!(
            fs::read_to_string(snap.path().join("util.go")).unwrap(),
            "package main\nfunc u() {}\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn siblings_share_data_with_originals() {
        use std::os::unix::fs::MetadataExt;
        let dir = project();
        let siblings = list_siblings(dir.path(), "go").unwrap();
        let snap = Snapshot::build(
            dir.path(),
            &siblings,
            &dir.path().join("main.go"),
            b"x",
            ".lintsnap-",
        )
        .unwrap();
        let orig = fs::metadata(dir.path().join("util.go")).unwrap();
        let linked = fs::metadata(snap.path().join("util.go")).unwrap();
        assert_eq!(orig.ino(), linked.ino());
        let written = fs::metadata(snap.path().join("main.go")).unwrap();
        let real = fs::metadata(dir.path().join("main.go")).unwrap();
        assert_ne!(written.ino(), real.ino());
    }

    #[test]
    fn snapshot_is_removed_on_drop_and_close() {
        let dir = project();
        let siblings = list_siblings(dir.path(), "go").unwrap();
        let target = dir.path().join("main.go");
        let snap = Snapshot::build(dir.path(), &siblings, &target, b"", ".s-").unwrap();
        let path = snap.path().to_path_buf();
        drop(snap);
        assert!(!path.exists());

        let snap = Snapshot::build(dir.path(), &siblings, &target, b"", ".s-").unwrap();
        let path = snap.path().to_path_buf();
        snap.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn failed_build_leaves_nothing_behind() {
        let dir = project();
        let siblings = os_names(&["main.go", "missing.go"]);
        let err = Snapshot::build(
            dir.path(),
            &siblings,
            &dir.path().join("main.go"),
            b"",
            ".lintsnap-",
        )
        .unwrap_err();
        assert!(matches!(err, SnapshotError::Link { .. }));
        let leftovers: Vec<_> = entries(dir.path())
            .into_iter()
            .filter(|n| n.starts_with(".lintsnap-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn binary_buffer_is_written_verbatim() {
        let dir = project();
        let siblings = list_siblings(dir.path(), "go").unwrap();
        let bytes = vec![0u8, 159, 146, 150, b'\n'];
        let snap = Snapshot::build(
            dir.path(),
            &siblings,
            &dir.path().join("main.go"),
            &bytes,
            ".lintsnap-",
        )
        .unwrap();
        assert_eq!(fs::read(snap.path().join("main.go")).unwrap(), bytes);
    }
    #[cfg(unix)]
    #[test]
    fn non_utf8_directory_is_mirrored() {
        use std::os::unix::ffi::OsStrExt;
        let base = tempdir().unwrap();
        let dir = base.path().join(OsStr::from_bytes(b"pk\xffg"));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("main.go"), "package main\n").unwrap();
        fs::write(dir.join("util.go"), "package main\n").unwrap();

        let siblings = list_siblings(&dir, "go").unwrap();
        assert_eq!(siblings, os_names(&["main.go", "util.go"]));
        let snap = Snapshot::build(&dir, &siblings, &dir.join("main.go"), b"live", ".lintsnap-")
            .unwrap();
        assert_eq!(fs::read(snap.path().join("main.go")).unwrap(), b"live");
        assert!(snap.path().join("util.go").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sibling_resolves_to_its_target() {
        let base = tempdir().unwrap();
        let pkg = base.path().join("pkg");
        let shared = base.path().join("shared");
        fs::create_dir(&pkg).unwrap();
        fs::create_dir(&shared).unwrap();
        fs::write(shared.join("gen.go"), "package main // generated\n").unwrap();
        std::os::unix::fs::symlink("../shared/gen.go", pkg.join("gen.go")).unwrap();
        fs::write(pkg.join("main.go"), "package main\n").unwrap();
        // A dangling link is not a sibling.
        std::os::unix::fs::symlink("../shared/gone.go", pkg.join("gone.go")).unwrap();

        let siblings = list_siblings(&pkg, "go").unwrap();
        assert_eq!(siblings, os_names(&["gen.go", "main.go"]));
        let snap = Snapshot::build(&pkg, &siblings, &pkg.join("main.go"), b"", ".lintsnap-")
            .unwrap();
        assert_eq!(
            fs::read_to_string(snap.path().join("gen.go")).unwrap(),
            "package main // generated\n"
        );
        assert!(!fs::symlink_metadata(snap.path().join("gen.go"))
            .unwrap()
            .file_type()
            .is_symlink());
    }
}
