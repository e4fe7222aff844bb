use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::warn;
use uuid::Uuid;

pub fn ensure_upload_root(upload_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(upload_dir)?;
    Ok(upload_dir.to_path_buf())
}

/// Fresh `<upload_dir>/<uuid>` directory for one batch request
pub fn create_request_dir(upload_dir: &Path) -> std::io::Result<(Uuid, PathBuf)> {
    let id = Uuid::new_v4();
    let request_dir = upload_dir.join(id.to_string());
    ensure_dir(&request_dir)?;
    Ok((id, request_dir))
}

/// Keep only the final path component of a client supplied file name
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let candidate = name.rsplit(['/', '\\']).next()?.trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        return None;
    }
    Some(candidate.to_string())
}

/// Path of a produced file, or `None` when `id` or `file_name` could escape the upload root
pub fn resolve_request_file(upload_dir: &Path, id: &str, file_name: &str) -> Option<PathBuf> {
    let id = Uuid::parse_str(id).ok()?;
    let name = sanitize_file_name(file_name)?;
    if name != file_name {
        return None;
    }
    Some(upload_dir.join(id.to_string()).join(name))
}

/// Remove request directories last modified at least `max_age` ago.
/// Only `<uuid>` directories are touched; anything else under the root is left alone.
pub fn prune_expired_requests(upload_dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    if !upload_dir.is_dir() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in fs::read_dir(upload_dir)? {
        let entry = entry?;
        let is_request_dir = entry.file_type()?.is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| Uuid::parse_str(name).is_ok());
        if !is_request_dir {
            continue;
        }

        // clock skew: a modification time in the future counts as brand new
        let age = entry
            .metadata()?
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or(Duration::ZERO);
        if age < max_age {
            continue;
        }

        match fs::remove_dir_all(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Could not prune request dir")
            }
        }
    }
    Ok(removed)
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("reviews.csv").as_deref(), Some("reviews.csv"));
        assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_file_name("C:\\Users\\me\\data.xlsx").as_deref(), Some("data.xlsx"));
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/"), None);
    }

    #[test]
    fn test_resolve_request_file_rejects_traversal() {
        let root = Path::new("/srv/uploads");
        let id = Uuid::new_v4().to_string();

        assert_eq!(
            resolve_request_file(root, &id, "out_sentiment.csv"),
            Some(root.join(&id).join("out_sentiment.csv"))
        );
        assert_eq!(resolve_request_file(root, "not-a-uuid", "out.csv"), None);
        assert_eq!(resolve_request_file(root, &id, "../secret.csv"), None);
    }

    #[test]
    fn test_create_request_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (id, path) = create_request_dir(dir.path()).unwrap();
        assert!(path.is_dir());
        assert!(path.ends_with(id.to_string()));
    }

    #[test]
    fn test_prune_removes_only_expired_request_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let (_, old_request) = create_request_dir(dir.path()).unwrap();
        fs::write(old_request.join("out_sentiment.csv"), "a\n").unwrap();
        let keep = dir.path().join("not-a-request");
        fs::create_dir(&keep).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        // nothing is old enough yet
        assert_eq!(prune_expired_requests(dir.path(), Duration::from_secs(3600)).unwrap(), 0);
        assert!(old_request.is_dir());

        assert_eq!(prune_expired_requests(dir.path(), Duration::ZERO).unwrap(), 1);
        assert!(!old_request.exists());
        assert!(keep.is_dir());
        assert!(dir.path().join("notes.txt").is_file());
    }

    #[test]
    fn test_prune_missing_root_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        assert_eq!(prune_expired_requests(&missing, Duration::ZERO).unwrap(), 0);
    }
}
