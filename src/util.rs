// wifi7-report: Analysis and Plotting of ns-3 WiFi 7 Parameter Sweep Results
// Copyright (C) 2024-2025 The wifi7-report developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Utility module collection of functions
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ReportError;

pub fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

/// Create the image directory if needed and remove stale `*.png` files from
/// previous runs, so a sweep with fewer configurations does not leave
/// outdated charts behind.
pub fn prepare_img_dir(dir: impl AsRef<Path>) -> Result<(), ReportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let pattern = format!("{}/*.png", dir.display());
    for entry in glob::glob(&pattern).expect("glob pattern is valid").flatten() {
        log::debug!("Removing stale chart {entry:?}");
        fs::remove_file(entry)?;
    }
    Ok(())
}

pub trait PathBufExt: Sized {
    fn then(self, p: impl AsRef<Path>) -> PathBuf;
}

impl PathBufExt for PathBuf {
    fn then(mut self, p: impl AsRef<Path>) -> PathBuf {
        self.push(p);
        self
    }
}

impl PathBufExt for &Path {
    fn then(self, p: impl AsRef<Path>) -> PathBuf {
        let mut path = self.to_path_buf();
        path.push(p);
        path
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prepare_img_dir_clears_old_charts() {
        let dir = tempfile::tempdir().unwrap();
        let img_dir = dir.path().join("images");
        fs::create_dir_all(&img_dir).unwrap();
        fs::write(img_dir.join("old.png"), b"stale").unwrap();
        fs::write(img_dir.join("notes.txt"), b"kept").unwrap();

        prepare_img_dir(&img_dir).unwrap();

        assert!(!img_dir.join("old.png").exists());
        assert!(img_dir.join("notes.txt").exists());
    }

    #[test]
    fn path_buf_ext() {
        let path = Path::new("/data").then("summary.csv");
        assert_eq!(path, PathBuf::from("/data/summary.csv"));
    }
}
