//! Font resolution as an ordered fallback chain.
//!
//! A chain is a list of [`FontSource`] strategies. [`resolve_font`] tries them in order and
//! returns the first font that loads; every failed strategy is logged and skipped.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Family names tried, in order, by [`FontSource::DefaultFamily`].
pub const DEFAULT_FAMILIES: [&str; 2] = ["Arial", "DejaVu Sans"];

/// One font resolution strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// A font file on disk (`.ttf`, `.otf` or `.ttc`).
    Path(PathBuf),
    /// The default family from installed and bundled fonts.
    DefaultFamily,
    /// Whatever face the font database lists first.
    AnyInstalled,
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "font file '{}'", p.display()),
            Self::DefaultFamily => f.write_str("default font family"),
            Self::AnyInstalled => f.write_str("first installed font"),
        }
    }
}

/// Build the standard chain: requested path (if any), default family, any installed face.
pub fn default_chain(requested: Option<&Path>) -> Vec<FontSource> {
    let mut chain = Vec::with_capacity(3);
    if let Some(p) = requested {
        chain.push(FontSource::Path(p.to_path_buf()));
    }
    chain.push(FontSource::DefaultFamily);
    chain.push(FontSource::AnyInstalled);
    chain
}

/// A loaded font face: raw bytes plus the face index inside them.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Font file bytes.
    pub data: Arc<Vec<u8>>,
    /// Face index within `data` (non-zero only for collections).
    pub index: u32,
    /// Primary family name reported by the face.
    pub family: String,
    /// Strategy that produced this font.
    pub source: FontSource,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .field("source", &self.source)
            .finish()
    }
}

/// Lazily populated font database backing the non-path strategies.
#[derive(Default)]
pub struct FontResolver {
    system: Option<fontdb::Database>,
    bundled_dirs: Vec<PathBuf>,
}

impl FontResolver {
    /// Create a resolver with no bundled font directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also load every font found directly inside `dir` for the database strategies.
    pub fn with_bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundled_dirs.push(dir.into());
        self
    }

    /// Directories searched for bundled fonts.
    pub fn bundled_dirs(&self) -> &[PathBuf] {
        &self.bundled_dirs
    }

    /// Try a single strategy.
    pub fn load(&mut self, source: &FontSource) -> CaptionResult<ResolvedFont> {
        match source {
            FontSource::Path(path) => load_font_path(path),
            FontSource::DefaultFamily => {
                let db = self.database();
                let families: Vec<fontdb::Family<'_>> = DEFAULT_FAMILIES
                    .iter()
                    .map(|name| fontdb::Family::Name(*name))
                    .chain(std::iter::once(fontdb::Family::SansSerif))
                    .collect();
                let query = fontdb::Query {
                    families: &families,
                    weight: fontdb::Weight::NORMAL,
                    stretch: fontdb::Stretch::Normal,
                    style: fontdb::Style::Normal,
                };
                let id = db.query(&query).ok_or_else(|| {
                    CaptionError::font_unavailable(format!(
                        "none of {DEFAULT_FAMILIES:?} or a sans-serif face is installed"
                    ))
                })?;
                face_from_db(db, id, FontSource::DefaultFamily)
            }
            FontSource::AnyInstalled => {
                let db = self.database();
                let id = db
                    .faces()
                    .next()
                    .map(|f| f.id)
                    .ok_or_else(|| CaptionError::font_unavailable("no fonts are installed"))?;
                face_from_db(db, id, FontSource::AnyInstalled)
            }
        }
    }

    fn database(&mut self) -> &fontdb::Database {
        let bundled_dirs = &self.bundled_dirs;
        self.system.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            for dir in bundled_dirs {
                load_fonts_from_dir(&mut db, dir);
            }
            tracing::debug!(faces = db.len(), "loaded font database");
            db
        })
    }
}

/// Try each strategy in `chain` and return the first font that loads.
pub fn resolve_font(resolver: &mut FontResolver, chain: &[FontSource]) -> Option<ResolvedFont> {
    chain.iter().find_map(|source| match resolver.load(source) {
        Ok(font) => {
            tracing::debug!(%source, family = %font.family, "resolved font");
            Some(font)
        }
        Err(e) => {
            tracing::warn!(%source, "could not load font, trying next fallback: {e}");
            None
        }
    })
}

fn load_font_path(path: &Path) -> CaptionResult<ResolvedFont> {
    if !path.is_file() {
        return Err(CaptionError::font_unavailable(format!(
            "'{}' does not exist",
            path.display()
        )));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;

    let mut db = fontdb::Database::new();
    db.load_font_data(bytes);
    let id = db.faces().next().map(|f| f.id).ok_or_else(|| {
        CaptionError::font_unavailable(format!("'{}' contains no usable font face", path.display()))
    })?;
    face_from_db(&db, id, FontSource::Path(path.to_path_buf()))
}

fn face_from_db(
    db: &fontdb::Database,
    id: fontdb::ID,
    source: FontSource,
) -> CaptionResult<ResolvedFont> {
    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unknown".to_string());
    let (data, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| {
            CaptionError::font_unavailable(format!("font data for family '{family}' is unreadable"))
        })?;
    Ok(ResolvedFont {
        data: Arc::new(data),
        index,
        family,
        source,
    })
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!("skipping bundled font '{}': {e}", path.display());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
