//! OS launch actions: browser, default player, file manager.
//!
//! The resolver only depends on the `Launcher` trait so it can be driven
//! without spawning processes.

use std::io;
use std::path::Path;
use std::process::Command;

pub trait Launcher {
    /// Opens `url` in the default web browser.
    fn open_url(&self, url: &str) -> io::Result<()>;

    /// Opens a local file with its default application (the media player for videos).
    fn open_file(&self, path: &Path) -> io::Result<()>;

    /// Shows `path` in the OS file manager, selected where the platform supports it.
    fn reveal(&self, path: &Path) -> io::Result<()>;

    /// Opens a directory in the OS file manager.
    fn open_dir(&self, dir: &Path) -> io::Result<()>;
}

/// Launcher backed by the real desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> io::Result<()> {
        tracing::debug!(url, "opening in browser");
        webbrowser::open(url)
    }

    fn open_file(&self, path: &Path) -> io::Result<()> {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file does not exist: {}", path.display()),
            ));
        }
        tracing::debug!(path = %path.display(), "opening with default player");
        open::that(path)
    }

    fn reveal(&self, path: &Path) -> io::Result<()> {
        reveal_command(path)?.spawn().map(|_| ())
    }

    fn open_dir(&self, dir: &Path) -> io::Result<()> {
        open::that(dir)
    }
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> io::Result<Command> {
    let mut cmd = Command::new("explorer");
    cmd.arg("/select,").arg(path);
    Ok(cmd)
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> io::Result<Command> {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    Ok(cmd)
}

// xdg-open cannot select a file, so open its directory instead.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(path: &Path) -> io::Result<Command> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no parent directory: {}", path.display()),
        )
    })?;
    let mut cmd = Command::new("xdg-open");
    cmd.arg(dir);
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_file_rejects_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemLauncher
            .open_file(&dir.path().join("missing.mp4"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn reveal_opens_parent_directory() {
        let cmd = reveal_command(Path::new("/tmp/cache/a.mp4")).unwrap();
        assert_eq!(cmd.get_program(), "xdg-open");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, [std::ffi::OsStr::new("/tmp/cache")]);
    }
}
