use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Write-then-rename file output, so a failed run never leaves a half-written layer behind.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    pub fn create(target: &Path, force: bool) -> Result<Self> {
        if target == Path::new("-") {
            bail!("stdout is not supported; provide a real file path.");
        }
        let parent = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
        if !force && target.exists() {
            bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
        }
        let tmp = NamedTempFile::new_in(parent).context("create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    pub fn finish(self) -> Result<()> {
        let Self { target, tmp } = self;
        tmp.as_file().sync_all().ok(); // best-effort
        tmp.persist(&target)
            .with_context(|| format!("rename to {}", target.display()))?;
        if let Some(dir) = target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }
    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Atomically write `contents` to `target`.
pub fn write_file(target: &Path, contents: &str, force: bool) -> Result<()> {
    let mut sink = PendingWrite::create(target, force)?;
    sink.write_all(contents.as_bytes())
        .with_context(|| format!("write {}", target.display()))?;
    sink.finish()
}

/// `<dir>/<layer>.geojson`
pub fn layer_path(dir: &Path, layer: &str) -> PathBuf {
    dir.join(format!("{layer}.geojson"))
}

/// Every `*.geojson` file in `dir`, keyed by file stem, in name order.
pub fn read_layer_files(dir: &Path) -> Result<Vec<(String, String)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("read dir {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("read dir {}", dir.display()))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("geojson") { continue }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        files.push((stem.to_string(), contents));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
