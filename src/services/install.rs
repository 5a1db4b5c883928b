//! Client installation into the Minecraft `versions` directory.

use crate::error::LauncherError;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Message shown after a successful install
pub const INSTALL_SUCCESS_MESSAGE: &str = "Client installed successfully!";

/// Directory the client files ship in: `<exe dir>/<client_name>`.
pub fn client_source_dir(client_name: &str) -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the launcher executable")?;
    let exe = Utf8PathBuf::try_from(exe)
        .map_err(|e| LauncherError::NonUtf8Path(e.into_path_buf().display().to_string()))?;
    let exe_dir = exe
        .parent()
        .context("Launcher executable has no parent directory")?;
    Ok(exe_dir.join(client_name))
}

/// `<mc_dir>/versions/<client_name>`
pub fn client_target_dir(mc_dir: &Utf8Path, client_name: &str) -> Utf8PathBuf {
    mc_dir.join("versions").join(client_name)
}

/// Copy the client files into the Minecraft directory.
///
/// Existing files are overwritten and missing directories created, so
/// installing twice is harmless.
///
/// # Arguments
///
/// * `source_dir` - Directory holding the client files
/// * `mc_dir` - Minecraft directory as typed in the launcher form
/// * `client_name` - Version directory name under `versions/`
///
/// # Returns
///
/// Number of files copied
pub fn install_client(
    source_dir: &Utf8Path,
    mc_dir: &str,
    client_name: &str,
) -> std::result::Result<usize, LauncherError> {
    let mc_dir = mc_dir.trim();
    if mc_dir.is_empty() {
        return Err(LauncherError::MissingMinecraftDir);
    }

    if !source_dir.is_dir() {
        tracing::warn!("Client files not found: {}", source_dir);
        return Err(LauncherError::ClientFilesMissing(source_dir.to_path_buf()));
    }

    let target_dir = client_target_dir(Utf8Path::new(mc_dir), client_name);
    tracing::info!("Installing client from {} to {}", source_dir, target_dir);

    let copied = copy_dir_all(source_dir, &target_dir).map_err(LauncherError::InstallFailed)?;

    tracing::info!("Installed {} client files into {}", copied, target_dir);
    Ok(copied)
}

fn copy_dir_all(source: &Utf8Path, target: &Utf8Path) -> Result<usize> {
    fs::create_dir_all(target).with_context(|| format!("Failed to create {}", target))?;

    let mut copied = 0;
    for entry in source
        .read_dir_utf8()
        .with_context(|| format!("Failed to read {}", source))?
    {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", source))?;
        let from = entry.path();
        let to = target.join(entry.file_name());

        if entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", from))?
            .is_dir()
        {
            copied += copy_dir_all(from, &to)?;
        } else {
            fs::copy(from, &to).with_context(|| format!("Failed to copy {} to {}", from, to))?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_install_copies_tree_and_overwrites() {
        let (_guard, root) = utf8_temp_dir();
        let source = root.join("pycheat");
        fs::create_dir_all(source.join("natives")).unwrap();
        fs::write(source.join("pycheat.json"), "{}").unwrap();
        fs::write(source.join("pycheat.jar"), "jar").unwrap();
        fs::write(source.join("natives/lwjgl.so"), "so").unwrap();

        let mc_dir = root.join(".minecraft");
        let target = client_target_dir(&mc_dir, "pycheat");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("pycheat.jar"), "old").unwrap();

        let copied = install_client(&source, mc_dir.as_str(), "pycheat").unwrap();

        assert_eq!(copied, 3);
        assert_eq!(fs::read_to_string(target.join("pycheat.jar")).unwrap(), "jar");
        assert!(target.join("natives/lwjgl.so").is_file());
    }

    #[test]
    fn test_install_requires_minecraft_dir() {
        let (_guard, root) = utf8_temp_dir();
        let err = install_client(&root, "  ", "pycheat").unwrap_err();
        assert!(matches!(err, LauncherError::MissingMinecraftDir));
    }

    #[test]
    fn test_install_reports_missing_client() {
        let (_guard, root) = utf8_temp_dir();
        let err = install_client(&root.join("missing"), root.as_str(), "pycheat").unwrap_err();
        assert!(matches!(err, LauncherError::ClientFilesMissing(_)));
        assert!(!root.join("versions").exists());
    }
}
