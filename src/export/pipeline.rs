//! Static export: render every route to disk and copy public assets.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::settings::ExportSettings;
use crate::error::{Error, Result};
use crate::ui::{Rendering, Site};

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub out_dir: PathBuf,
    /// Written files, relative to `out_dir`, sorted.
    pub files: Vec<PathBuf>,
}

/// Build the static bundle for `site` into `settings.out_dir`.
///
/// The output directory is recreated from scratch so stale files never
/// survive a rebuild.
pub fn export(settings: &ExportSettings, site: &Site) -> Result<ExportReport> {
    settings.validate()?;

    let dynamic: Vec<String> = site
        .routes()
        .iter()
        .filter_map(|r| match r.page.rendering() {
            Rendering::Static => None,
            Rendering::Dynamic { reason } => Some(format!("{} ({reason})", r.path)),
        })
        .collect();
    if !dynamic.is_empty() {
        return Err(Error::Export(format!(
            "routes need a server runtime: {}",
            dynamic.join(", ")
        )));
    }

    let out_dir = &settings.out_dir;
    check_out_dir(out_dir, &settings.public_dir)?;

    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;

    let mut files = BTreeSet::new();

    for route in site.routes() {
        let rel = PathBuf::from(route.file_name());
        write_file(out_dir, &rel, route.page.render().as_bytes())?;
        debug!(name: "export.route", path = %route.path, file = %rel.display(), "Rendered route");
        files.insert(rel);
    }

    if settings.public_dir.is_dir() {
        for rel in copy_public(&settings.public_dir, out_dir, &files)? {
            files.insert(rel);
        }
    }

    let files: Vec<PathBuf> = files.into_iter().collect();
    info!(
        name: "export.completed",
        out_dir = %out_dir.display(),
        file_count = files.len(),
        "Static export completed"
    );

    Ok(ExportReport {
        out_dir: out_dir.clone(),
        files,
    })
}

/// Absolute, normalized form of `path`, which need not exist yet.
///
/// `.` and `..` are resolved lexically, then the longest existing ancestor
/// is canonicalized so symlinks and relative spellings compare equal.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.as_path();
    let mut rest = Vec::new();
    while !existing.exists() {
        let (Some(name), Some(parent)) = (existing.file_name(), existing.parent()) else {
            break;
        };
        rest.push(name.to_os_string());
        existing = parent;
    }

    let mut resolved = existing.canonicalize()?;
    for part in rest.iter().rev() {
        resolved.push(part);
    }
    Ok(resolved)
}

/// Refuse output directories whose removal would take source files with it.
fn check_out_dir(out_dir: &Path, public_dir: &Path) -> Result<()> {
    let refuse = || {
        Err(Error::Export(format!(
            "refusing to use {} as the output directory",
            out_dir.display()
        )))
    };

    if out_dir.as_os_str().is_empty() {
        return refuse();
    }

    let out = resolve(out_dir)?;
    let public = resolve(public_dir)?;
    let cwd = std::env::current_dir()?.canonicalize()?;

    if out.parent().is_none() || public.starts_with(&out) || cwd.starts_with(&out) {
        return refuse();
    }
    Ok(())
}

fn write_file(out_dir: &Path, rel: &Path, contents: &[u8]) -> Result<()> {
    let dest = out_dir.join(rel);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, contents)?;
    Ok(())
}

/// Copy the public tree in file-name order, refusing to shadow rendered routes.
fn copy_public(public_dir: &Path, out_dir: &Path, rendered: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for entry in WalkDir::new(public_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(public_dir)
            .map_err(|e| Error::Export(e.to_string()))?
            .to_path_buf();

        if rendered.contains(&rel) {
            return Err(Error::Export(format!(
                "public file {} conflicts with a rendered route",
                rel.display()
            )));
        }

        let contents = fs::read(entry.path())?;
        write_file(out_dir, &rel, &contents)?;
        copied.push(rel);
    }

    Ok(copied)
}
