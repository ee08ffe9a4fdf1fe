use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use hmac::{Hmac, Mac};
use log::warn;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNING_KEY: &[u8] = b"klondike-rs options v1";
const HMAC_SIZE: usize = 32;

/// How many cards one click on the stock turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    #[default]
    One,
    Three,
}

impl DrawMode {
    pub fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }
}

/// Game options. Persisted between sessions; never includes game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub draw_mode: DrawMode,
    /// How many times the talon may be turned back into the stock.
    /// `None` means unlimited.
    pub recycle_limit: Option<u32>,
    /// Whether a won game can still be stepped back with undo.
    pub undo_after_win: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            draw_mode: DrawMode::One,
            recycle_limit: None,
            undo_after_win: true,
        }
    }
}

impl Config {
    /// Load the options from the default location. A missing, corrupted or
    /// tampered file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring options file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save the options to the default location.
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::file_path() else {
            bail!("no home directory to store options in");
        };
        self.save_to(&path)
    }

    /// Read and verify a signed options file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .with_context(|| format!("reading {}", path.display()))?;

        if data.len() < HMAC_SIZE {
            bail!("file is too short to carry a signature");
        }

        let (payload, signature) = data.split_at(data.len() - HMAC_SIZE);
        let mut mac = HmacSha256::new_from_slice(SIGNING_KEY).context("initialising HMAC")?;
        mac.update(payload);
        mac.verify_slice(signature)
            .map_err(|_| anyhow::anyhow!("signature mismatch"))?;

        bincode::deserialize(payload).context("decoding options")
    }

    /// Write the options atomically: temp file, fsync, rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }

        let mut data = bincode::serialize(self).context("encoding options")?;
        let mut mac = HmacSha256::new_from_slice(SIGNING_KEY).context("initialising HMAC")?;
        mac.update(&data);
        data.extend_from_slice(&mac.finalize().into_bytes());

        let mut temp_path = path.to_path_buf();
        temp_path.set_extension("tmp");

        let written = File::create(&temp_path)
            .and_then(|mut f| f.write_all(&data).and_then(|_| f.sync_all()));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("writing {}", temp_path.display()));
        }

        fs::rename(&temp_path, path)
            .with_context(|| format!("replacing {}", path.display()))
    }

    /// Path of the options file (`options.dat`).
    pub fn file_path() -> Option<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "klondike", "klondike-rs")?;
        Some(proj_dirs.config_dir().join("options.dat"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A per-test directory under the system temp dir, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(test: &str) -> Self {
            ScratchDir(
                std::env::temp_dir()
                    .join(format!("klondike-rs-test-{}-{}", std::process::id(), test)),
            )
        }

        fn file(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn draw_mode_counts() {
        assert_eq!(DrawMode::One.count(), 1);
        assert_eq!(DrawMode::Three.count(), 3);
        assert_eq!(Config::default().draw_mode, DrawMode::One);
    }

    #[test]
    fn options_survive_a_save_and_load() {
        let dir = ScratchDir::new("roundtrip");
        let path = dir.file("options.dat");
        let config = Config {
            draw_mode: DrawMode::Three,
            recycle_limit: Some(2),
            undo_after_win: false,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn tampered_file_is_rejected() {
        let dir = ScratchDir::new("tampered");
        let path = dir.file("options.dat");
        Config::default().save_to(&path).unwrap();

        let mut data = fs::read(&path).unwrap();
        data[0] ^= 0xff;
        fs::write(&path, &data).unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, b"short").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = ScratchDir::new("missing");
        assert!(Config::load_from(&dir.file("options.dat")).is_err());
    }

    #[test]
    fn scratch_dirs_are_cleaned_up() {
        let dir = ScratchDir::new("cleanup");
        let root = dir.0.clone();
        Config::default().save_to(&dir.file("options.dat")).unwrap();
        assert!(root.is_dir());
        drop(dir);
        assert!(!root.exists());
    }
}
