use fetchtv_core::sanitize_filename;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `<save>/<show>/<item>.<extension>` with both names sanitized
pub fn target_path(save: &Path, show_title: &str, item_title: &str, extension: &str) -> PathBuf {
    let file_name = format!("{}.{}", sanitize_filename(item_title), extension);
    save.join(sanitize_filename(show_title)).join(file_name)
}

/// Sibling marker of `target` holding an unfinished transfer
pub fn lock_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path() {
        let path = target_path(Path::new("/tmp/fetch"), "2 Broke Girls", "S4 E12", "mpeg");
        assert_eq!(path, PathBuf::from("/tmp/fetch/2_Broke_Girls/S4_E12.mpeg"));

        let path = target_path(Path::new("/tmp/fetch"), "What? Now: <Live>", "A/B", "mpeg");
        assert_eq!(path, PathBuf::from("/tmp/fetch/What_Now_Live/AB.mpeg"));
    }

    #[test]
    fn test_lock_path() {
        let target = PathBuf::from("/tmp/fetch/Show/S1_E1.mpeg");
        assert_eq!(
            lock_path(&target, ".lock"),
            PathBuf::from("/tmp/fetch/Show/S1_E1.mpeg.lock")
        );
    }
}
