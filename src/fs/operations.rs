use std::path::{Path, PathBuf};

use tokio::{
    fs::File,
    io::{self, AsyncWriteExt},
};

/// Replaces the contents of `path` with `bytes` by writing a sibling
/// temporary file and renaming it over the target. A reader never
/// observes a half-written file: after a failure the target holds either
/// its previous contents or the full new contents.
pub async fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), io::Error> {
    let tmp = sibling_tmp_path(path);
    let mut file = File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::fs::operations::{replace_file, sibling_tmp_path};

    #[tokio::test]
    async fn test_replace_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");

        replace_file(&path, b"[1,2,3]").await?;

        assert_eq!(tokio::fs::read(&path).await?, b"[1,2,3]");
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_overwrites_whole_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");

        replace_file(&path, b"a long first version of the file").await?;
        replace_file(&path, b"short").await?;

        assert_eq!(tokio::fs::read(&path).await?, b"short");
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_leaves_no_tmp_sibling() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.json");

        replace_file(&path, b"{}").await?;

        assert!(!sibling_tmp_path(&path).exists());
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
