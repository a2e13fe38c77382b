use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// Everything hover-ddns knows between runs, mirrored in a JSON file. The
/// `ip` field is the address that was last applied successfully; comparing
/// against it is what makes repeated runs cheap no-ops.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub username: Box<str>,
    pub password: Box<str>,
    pub domain: Box<str>,
    pub ip: Box<str>,
}

/// Where the config lives. The driver only ever talks to this trait, so
/// tests can hand it a store backed by a scratch directory.
pub trait ConfigStore {
    /// Ok(None) when no config exists yet.
    fn load(&self) -> Result<Option<Config>, Error>;

    /// Writes a fresh config with empty fields and returns it.
    fn create_default(&self) -> Result<Config, Error>;

    fn save(&self, config: &Config) -> Result<(), Error>;
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.config/hover.json`.
    pub fn default_path() -> Result<PathBuf, Error> {
        let dirs = BaseDirs::new()
            .ok_or_else(|| Error::Persistence("no home directory for this user".into()))?;

        Ok(dirs.home_dir().join(".config").join("hover.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, config: &Config) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Persistence(e.to_string().into()))?;

        let written = (|| {
            if let Some(parent) = self.path.parent() {
                create_config_dir(parent)?;
            }
            write_private(&self.path, json.as_bytes())
        })();

        written.map_err(|e| Error::Persistence(e.to_string().into()))
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Option<Config>, Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Persistence(e.to_string().into())),
        };

        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::Persistence(e.to_string().into()))?;

        Ok(Some(config))
    }

    fn create_default(&self) -> Result<Config, Error> {
        let config = Config::default();
        self.write(&config)?;

        log::info!(
            "created a blank config at {} - fill in your credentials and domain",
            self.path.display()
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<(), Error> {
        self.write(config)
    }
}

/// Creates the directory holding the config if it is not there yet. A fresh
/// directory is private to the user; an existing one is left as it is.
fn create_config_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(target_family = "unix")]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir)
}

// The file holds a password, keep it out of reach of other users.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(target_family = "unix")]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)?.write_all(contents)
}
