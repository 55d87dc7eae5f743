use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

// -------- file ops with backoff (AV scanners, sync clients and network shares hold files briefly) --------

const FILE_TRIES: usize = 16;
const FILE_DELAY_MS: u64 = 50;

/// Transient errors worth another try: sharing/lock violations and busy devices.
fn is_retriable_io_error(e: &io::Error) -> bool {
    if matches!(e.kind(), io::ErrorKind::PermissionDenied | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) {
        return true;
    }
    //   32 = sharing violation, 33 = lock violation, 21 = device not ready (Windows)
    matches!(e.raw_os_error(), Some(32) | Some(33) | Some(21))
}

/// Run `op` up to `tries` times, sleeping `delay_ms * attempt` between transient failures.
fn io_with_backoff<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let tries = tries.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < tries && is_retriable_io_error(&e) => {
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Create (truncate) a file, creating parent directories first.
pub fn create_with_backoff(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    io_with_backoff(FILE_TRIES, FILE_DELAY_MS, || File::create(path)).with_context(|| format!("create {}", path.display()))
}

pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let f = io_with_backoff(FILE_TRIES, FILE_DELAY_MS, || File::open(path)).with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(f))
}

/// Removing a missing file succeeds.
pub fn remove_with_backoff(path: &Path) -> Result<()> {
    io_with_backoff(FILE_TRIES, FILE_DELAY_MS, || match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    })
    .with_context(|| format!("remove {}", path.display()))
}

/// Temp sibling used while an artifact is being written.
pub fn tmp_path_for(dest: &Path) -> PathBuf {
    let name = dest.file_name().and_then(|s| s.to_str()).unwrap_or("artifact");
    dest.with_file_name(format!(".{}.tmp", name))
}

/// Promote `tmp` to `dest`. Falls back to copy+remove when rename keeps failing.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    if io_with_backoff(FILE_TRIES, FILE_DELAY_MS, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    remove_with_backoff(dest)?;
    io_with_backoff(FILE_TRIES, FILE_DELAY_MS, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    remove_with_backoff(tmp)
}

/// Create the temp sibling of `dest`, hand it to `write`, then promote it.
pub fn write_atomic<F>(dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let tmp = tmp_path_for(dest);
    let mut f = create_with_backoff(&tmp)?;
    let res = write(&mut f).and_then(|_| f.sync_all().context("sync artifact"));
    drop(f);
    if let Err(e) = res {
        let _ = remove_with_backoff(&tmp);
        return Err(e.context(format!("write {}", dest.display())));
    }
    replace_file_atomic_backoff(&tmp, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("out.txt");
        write_atomic(&dest, |f| {
            f.write_all(b"hello")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
        assert!(!tmp_path_for(&dest).exists());
    }

    #[test]
    fn write_atomic_keeps_old_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        fs::write(&dest, "old").unwrap();
        let res = write_atomic(&dest, |_| Err(anyhow::anyhow!("boom")));
        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");
        assert!(!tmp_path_for(&dest).exists());
    }

    #[test]
    fn removing_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_with_backoff(&dir.path().join("nope")).is_ok());
    }
}
