use std::path::{Path, PathBuf};

/// Returns the first of `base.ext`, `base_1.ext`, `base_2.ext`, ... in `dir`
/// that does not exist yet.
pub fn next_free_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    let candidate = |name: &str| dir.join(format!("{name}.{extension}"));

    let mut path = candidate(base);
    let mut suffix = 1u32;
    while path.exists() {
        path = candidate(&format!("{base}_{suffix}"));
        suffix += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn uses_base_name_when_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = next_free_path(dir.path(), "videoTmp", "mp4");
        assert_eq!(path, dir.path().join("videoTmp.mp4"));
    }

    #[test]
    fn suffixes_increase_while_files_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let path = next_free_path(dir.path(), "videoTmp", "mp4");
            assert!(!path.exists());
            fs::write(&path, b"").unwrap();
            seen.push(path.file_name().unwrap().to_string_lossy().into_owned());
        }
        assert_eq!(
            seen,
            ["videoTmp.mp4", "videoTmp_1.mp4", "videoTmp_2.mp4", "videoTmp_3.mp4"]
        );
    }

    #[test]
    fn fills_the_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("videoTmp.mp4"), b"").unwrap();
        fs::write(dir.path().join("videoTmp_2.mp4"), b"").unwrap();
        let path = next_free_path(dir.path(), "videoTmp", "mp4");
        assert_eq!(path, dir.path().join("videoTmp_1.mp4"));
    }
}
