use std::{env, io, path::PathBuf};

use anyhow::Result;

const APP_DIR_NAME: &str = "chron";

/// Directory holding the preferences file, the active-log slot and the
/// tracing output. On Windows this is `%APPDATA%\chron`; elsewhere
/// `$XDG_STATE_HOME/chron` with a `$HOME/.local/state` fallback.
pub fn application_dir() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let base =
                PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
            base.join(APP_DIR_NAME)
        }
        #[cfg(not(windows))]
        {
            let base = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| PathBuf::from(home).join(".local/state"))
                })
                .expect("Couldn't find neither XDG_STATE_HOME nor HOME");
            base.join(APP_DIR_NAME)
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
