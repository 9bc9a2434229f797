//! Site generation.
//!
//! Walks the source directory, renders every `*.html` shell into one file
//! per reachable view state, and copies every other file verbatim.
//!
//! ## Page Kinds
//!
//! A shell's kind is decided by the mounts it carries:
//!
//! | Kind | Detected by | Data document |
//! |------|-------------|---------------|
//! | gardening | `plants-grid` or `category-filter` | `data.plants` |
//! | photography | `albums-container` | `data.photos` |
//! | plain | neither | none |
//!
//! Every kind gets the shared chrome and the page script. Data documents are
//! resolved relative to the shell's own directory.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── gardening.html                # filter = all
//! ├── gardening-category-1.html     # one per category
//! ├── gardening-plant-1.html        # one per plant, modal open
//! ├── photography.html
//! ├── photography-photo-1.html      # one per photo, lightbox open
//! ├── plants-data.json              # assets copied verbatim
//! └── images/...
//! ```

use crate::chrome;
use crate::config::{self, ConfigError, SiteConfig};
use crate::gardening;
use crate::loader::{Loaded, load_for_page};
use crate::page::{RenderedPage, script_markup};
use crate::photography;
use crate::shell::Shell;
use crate::types::{PhotosDocument, PlantsDocument};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Every mount id a shell may carry, in document-reading order.
pub const MOUNT_IDS: &[&str] = &[
    "kt-nav",
    "kt-mobile-nav",
    "kt-footer",
    gardening::FILTER_MOUNT,
    gardening::GRID_MOUNT,
    gardening::MODAL_BODY_MOUNT,
    photography::ALBUMS_MOUNT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Gardening,
    Photography,
    Plain,
}

impl PageKind {
    /// Kinds are exclusive. A shell carrying both gardening and album
    /// mounts is rendered as a gardening page and the album mount is left
    /// as written.
    pub fn detect(shell: &Shell) -> Self {
        if shell.has_mount(gardening::GRID_MOUNT) || shell.has_mount(gardening::FILTER_MOUNT) {
            PageKind::Gardening
        } else if shell.has_mount(photography::ALBUMS_MOUNT) {
            PageKind::Photography
        } else {
            PageKind::Plain
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageKind::Gardening => "gardening",
            PageKind::Photography => "photography",
            PageKind::Plain => "plain",
        })
    }
}

/// Outcome of a shell's data load.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStatus {
    NotNeeded,
    /// Loaded; carries a short record summary.
    Ready(String),
    Failed(String),
}

impl DataStatus {
    fn from_loaded<T>(loaded: &Loaded<T>, summarize: impl Fn(&T) -> String) -> Self {
        match loaded {
            Loaded::Ready(doc) => DataStatus::Ready(summarize(doc)),
            Loaded::Failed(e) => DataStatus::Failed(e.to_string()),
        }
    }
}

/// One shell and the files rendered from it.
#[derive(Debug, Clone)]
pub struct ShellReport {
    /// Shell path relative to the source root, `/`-separated.
    pub source: String,
    pub kind: PageKind,
    pub data: DataStatus,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub shells: Vec<ShellReport>,
    /// Copied asset paths relative to the source root.
    pub assets: Vec<String>,
}

impl BuildReport {
    pub fn page_count(&self) -> usize {
        self.shells.iter().map(|s| s.files.len()).sum()
    }
}

/// One shell as seen by `check`.
#[derive(Debug, Clone)]
pub struct ShellCheck {
    pub source: String,
    pub kind: PageKind,
    pub mounts: Vec<&'static str>,
    pub data: DataStatus,
}

fn plants_summary(doc: &PlantsDocument) -> String {
    format!(
        "{} categories, {} plants",
        doc.categories.len(),
        doc.plants.len()
    )
}

fn photos_summary(doc: &PhotosDocument) -> String {
    let photos: usize = doc.albums.iter().map(|a| a.photos.len()).sum();
    format!("{} albums, {} photos", doc.albums.len(), photos)
}

fn is_shell(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

fn relative(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Render one shell. `location` is the page's site path, `dir` the
/// directory its data documents live in.
pub fn render_shell(
    html: &str,
    location: &str,
    dir: &Path,
    stem: &str,
    config: &SiteConfig,
) -> (PageKind, DataStatus, Vec<RenderedPage>) {
    let mut shell = Shell::new(html);
    chrome::inject(&mut shell, config, location);
    let kind = PageKind::detect(&shell);
    let timeout = config.data.load_timeout();

    match kind {
        PageKind::Gardening => {
            let loaded = load_for_page::<PlantsDocument>(&dir.join(&config.data.plants), timeout);
            let status = DataStatus::from_loaded(&loaded, plants_summary);
            (kind, status, gardening::render_pages(&shell, loaded, config, stem))
        }
        PageKind::Photography => {
            let loaded = load_for_page::<PhotosDocument>(&dir.join(&config.data.photos), timeout);
            let status = DataStatus::from_loaded(&loaded, photos_summary);
            (kind, status, photography::render_pages(&shell, loaded, config, stem))
        }
        PageKind::Plain => {
            shell.append_to_body(script_markup(None, &config.display));
            let page = RenderedPage {
                file_name: format!("{stem}.html"),
                html: shell.into_string(),
            };
            (kind, DataStatus::NotNeeded, vec![page])
        }
    }
}

/// Build the site from `source` into `output`.
pub fn generate(source: &Path, output: &Path) -> Result<BuildReport, GenerateError> {
    let config = config::load_config(source)?;
    fs::create_dir_all(output)?;
    let mut report = BuildReport::default();

    let walker = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != output);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = relative(path, source);
        if rel == "config.toml" {
            continue;
        }
        let dest = output.join(path.strip_prefix(source).unwrap_or(path));
        let dest_dir = dest.parent().unwrap_or(output);
        fs::create_dir_all(dest_dir)?;

        if !is_shell(path) {
            fs::copy(path, &dest)?;
            debug!(asset = %rel, "copied");
            report.assets.push(rel);
            continue;
        }

        let html = fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = path.parent().unwrap_or(source);
        let (kind, data, pages) = render_shell(&html, &format!("/{rel}"), dir, &stem, &config);

        let mut files = Vec::with_capacity(pages.len());
        for page in pages {
            fs::write(dest_dir.join(&page.file_name), page.html)?;
            files.push(page.file_name);
        }
        info!(shell = %rel, %kind, files = files.len(), "rendered shell");
        report.shells.push(ShellReport {
            source: rel,
            kind,
            data,
            files,
        });
    }

    Ok(report)
}

/// Validate a source directory without writing anything.
///
/// Config errors are fatal; data load failures are reported per shell.
pub fn check(source: &Path) -> Result<Vec<ShellCheck>, GenerateError> {
    let config = config::load_config(source)?;
    let timeout = config.data.load_timeout();
    let mut checks = Vec::new();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_shell(path) {
            continue;
        }
        let shell = Shell::new(fs::read_to_string(path)?);
        let dir = path.parent().unwrap_or(source);
        let kind = PageKind::detect(&shell);
        let data = match kind {
            PageKind::Gardening => DataStatus::from_loaded(
                &load_for_page::<PlantsDocument>(&dir.join(&config.data.plants), timeout),
                plants_summary,
            ),
            PageKind::Photography => DataStatus::from_loaded(
                &load_for_page::<PhotosDocument>(&dir.join(&config.data.photos), timeout),
                photos_summary,
            ),
            PageKind::Plain => DataStatus::NotNeeded,
        };
        checks.push(ShellCheck {
            source: relative(path, source),
            kind,
            mounts: MOUNT_IDS
                .iter()
                .copied()
                .filter(|id| shell.has_mount(id))
                .collect(),
            data,
        });
    }

    Ok(checks)
}
