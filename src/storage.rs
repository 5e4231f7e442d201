// SPDX-License-Identifier: MPL-2.0

//! Storage target for captured photos
//!
//! Photos land in `<XDG pictures dir>/<album>` and are named after the capture
//! time, `yyyy-MM-dd-HH-mm-ss-SSS.jpg`.

use crate::backends::capture::OutputTarget;
use crate::constants::storage;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info};

/// The user's pictures directory (`~/Pictures` when XDG dirs are unset)
pub fn default_pictures_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(storage::COLLECTION)
    })
}

/// Hands out unique output targets inside one album
#[derive(Debug, Clone)]
pub struct MediaStore {
    pictures_dir: PathBuf,
    album: String,
    /// Last base name handed out and the highest suffix used for it
    last_issued: Option<(String, u32)>,
}

impl MediaStore {
    pub fn new(pictures_dir: PathBuf, album: impl Into<String>) -> Self {
        Self {
            pictures_dir,
            album: album.into(),
            last_issued: None,
        }
    }

    /// Store rooted in the user's pictures directory
    pub fn for_album(album: impl Into<String>) -> Self {
        Self::new(default_pictures_dir(), album)
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    /// Absolute album directory
    pub fn album_dir(&self) -> PathBuf {
        self.pictures_dir.join(&self.album)
    }

    /// Album path relative to the shared media collection root
    pub fn relative_path(&self) -> String {
        format!("{}/{}", storage::COLLECTION, self.album)
    }

    /// Create the album directory if needed
    pub fn ensure_album(&self) -> std::io::Result<PathBuf> {
        let dir = self.album_dir();
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "Photo album ready");
        Ok(dir)
    }

    /// Reserve a target named after the current time
    pub fn next_target(&mut self) -> OutputTarget {
        self.target_at(Local::now())
    }

    /// Reserve a target named after `time`
    ///
    /// Reservations within the same millisecond get increasing numeric
    /// suffixes, and a name already on disk is skipped.
    pub fn target_at(&mut self, time: DateTime<Local>) -> OutputTarget {
        let base = time.format(storage::NAME_FORMAT).to_string();
        let album_dir = self.album_dir();

        let mut suffix = match &self.last_issued {
            Some((last_base, last_suffix)) if *last_base == base => last_suffix + 1,
            _ => 0,
        };
        let mut stem = stem_for(&base, suffix);
        while album_dir
            .join(format!("{}.{}", stem, storage::EXTENSION))
            .exists()
        {
            suffix += 1;
            stem = stem_for(&base, suffix);
        }

        if suffix > 0 {
            debug!(name = %stem, "Photo name collision resolved");
        }

        self.last_issued = Some((base, suffix));
        OutputTarget {
            path: album_dir.join(format!("{}.{}", stem, storage::EXTENSION)),
            display_name: stem,
            mime_type: storage::MIME_TYPE,
            relative_path: self.relative_path(),
        }
    }
}

fn stem_for(base: &str, suffix: u32) -> String {
    if suffix == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_target_naming() {
        let mut store = MediaStore::new(PathBuf::from("/tmp/pics"), "CameraApp");
        let target = store.target_at(fixed_time());

        assert_eq!(target.display_name, "2024-03-09-14-05-07-042");
        assert_eq!(target.mime_type, "image/jpeg");
        assert_eq!(target.relative_path, "Pictures/CameraApp");
        assert_eq!(
            target.path,
            PathBuf::from("/tmp/pics/CameraApp/2024-03-09-14-05-07-042.jpg")
        );
    }

    #[test]
    fn test_same_millisecond_gets_suffix() {
        let mut store = MediaStore::new(PathBuf::from("/tmp/pics"), "CameraApp");
        let first = store.target_at(fixed_time());
        let second = store.target_at(fixed_time());

        assert_ne!(first.path, second.path);
        assert_eq!(second.display_name, "2024-03-09-14-05-07-042-1");
    }

    #[test]
    fn test_burst_in_one_millisecond_stays_unique() {
        let mut store = MediaStore::new(PathBuf::from("/nonexistent/pics"), "CameraApp");
        let names: Vec<String> = (0..4)
            .map(|_| store.target_at(fixed_time()).display_name)
            .collect();

        assert_eq!(
            names,
            vec![
                "2024-03-09-14-05-07-042",
                "2024-03-09-14-05-07-042-1",
                "2024-03-09-14-05-07-042-2",
                "2024-03-09-14-05-07-042-3",
            ]
        );
    }

    #[test]
    fn test_new_millisecond_starts_without_suffix() {
        let mut store = MediaStore::new(PathBuf::from("/nonexistent/pics"), "CameraApp");
        store.target_at(fixed_time());
        store.target_at(fixed_time());
        let later = store.target_at(fixed_time() + chrono::Duration::milliseconds(1));

        assert_eq!(later.display_name, "2024-03-09-14-05-07-043");
    }

    #[test]
    fn test_existing_file_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let store_root = dir.path().to_path_buf();
        let mut store = MediaStore::new(store_root, "Album");
        store.ensure_album().unwrap();
        std::fs::write(store.album_dir().join("2024-03-09-14-05-07-042.jpg"), b"x").unwrap();

        let target = store.target_at(fixed_time());
        assert_eq!(target.display_name, "2024-03-09-14-05-07-042-1");
    }
}
