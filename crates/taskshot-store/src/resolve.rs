use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute path without requiring it to exist.
///
/// Each prefix that exists on disk is canonicalized, so symlinks and `..`
/// are followed the way the kernel would follow them. Components past the
/// last existing prefix are normalized lexically, including those below a
/// regular file. Any other error while canonicalizing is returned.
pub fn resolve_lenient(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match std::fs::canonicalize(&resolved) {
                    Ok(canonical) => resolved = canonical,
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                        ) => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }
    Ok(resolved)
}

/// Whether `candidate` is `root` or lies beneath it, compared component by
/// component. `/x/1` does not contain `/x/10/f.png`.
pub fn is_within(candidate: &Path, root: &Path) -> bool {
    candidate.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_path_is_canonicalized() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("t1")).unwrap();
        let resolved = resolve_lenient(&tmp.path().join("t1").join(".").join("..").join("t1"))
            .unwrap();
        assert_eq!(resolved, tmp.path().canonicalize().unwrap().join("t1"));
    }

    #[test]
    fn missing_tail_is_normalized_lexically() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let resolved = resolve_lenient(&tmp.path().join("missing").join("..").join("x.png"))
            .unwrap();
        assert_eq!(resolved, root.join("x.png"));
    }

    #[test]
    fn parent_segments_escape_lexically() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let task_dir = tmp.path().join("t1");
        std::fs::create_dir(&task_dir).unwrap();

        let resolved = resolve_lenient(&task_dir.join("../../etc/passwd")).unwrap();
        assert!(!is_within(&resolved, &root.join("t1")));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let resolved = resolve_lenient(Path::new("does-not-exist/a.png")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("does-not-exist/a.png"));
    }

    #[test]
    fn sibling_prefix_is_not_contained() {
        assert!(!is_within(Path::new("/x/10/f.png"), Path::new("/x/1")));
        assert!(is_within(Path::new("/x/1/f.png"), Path::new("/x/1")));
        assert!(is_within(Path::new("/x/1"), Path::new("/x/1")));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let task_dir = root.join("t1");
        let outside = root.join("outside");
        std::fs::create_dir(&task_dir).unwrap();
        std::fs::create_dir(&outside).unwrap();
        std::fs::write(outside.join("secret.png"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.join("secret.png"), task_dir.join("link.png")).unwrap();

        let resolved = resolve_lenient(&task_dir.join("link.png")).unwrap();
        assert_eq!(resolved, outside.join("secret.png"));
        assert!(!is_within(&resolved, &task_dir));
    }

    #[test]
    fn components_below_a_file_are_normalized_lexically() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        std::fs::write(root.join("a.png"), b"x").unwrap();

        let resolved = resolve_lenient(&root.join("a.png").join("x.png")).unwrap();
        assert_eq!(resolved, root.join("a.png").join("x.png"));
    }

    #[test]
    fn nul_byte_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(resolve_lenient(&tmp.path().join("bad\0name.png")).is_err());
    }
}
