use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{DaybreakError, DaybreakResult};

/// Raw font data picked by a [`FontResolver`].
#[derive(Clone)]
pub struct ResolvedFont {
    /// Font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file, `0` for single-face files.
    pub index: u32,
    /// Human-readable origin (file path or host family name).
    pub source: String,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("source", &self.source)
            .finish()
    }
}

/// Capability that supplies the font used for the card text.
///
/// Implementations decide where fonts come from. The shaper calls
/// [`FontResolver::resolve`] first and only falls back to
/// [`FontResolver::fallback`] if the resolved bytes cannot be shaped.
pub trait FontResolver {
    /// Preferred font.
    fn resolve(&self) -> DaybreakResult<ResolvedFont>;

    /// Last-resort font, independent of any configured path.
    fn fallback(&self) -> DaybreakResult<ResolvedFont>;
}

/// Well-known font locations for the current platform, in preference order.
pub fn platform_font_candidates() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "windows") {
        &["C:/Windows/Fonts/arialbd.ttf", "C:/Windows/Fonts/arial.ttf"]
    } else if cfg!(target_os = "macos") {
        &[
            "/Library/Fonts/Arial Unicode.ttf",
            "/System/Library/Fonts/NewYork.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        ]
    };
    paths.iter().map(PathBuf::from).collect()
}

/// Fallback chain: explicit path, platform candidates, then the host font database.
#[derive(Clone, Debug)]
pub struct FontChain {
    explicit: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    host_fonts: bool,
}

impl Default for FontChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FontChain {
    /// Chain over the platform candidates with host font lookup enabled.
    pub fn new() -> Self {
        Self {
            explicit: None,
            candidates: platform_font_candidates(),
            host_fonts: true,
        }
    }

    /// Put `path` in front of every other source.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Replace the platform candidate list.
    pub fn with_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Disable the host font database as the final link.
    pub fn without_host_fonts(mut self) -> Self {
        self.host_fonts = false;
        self
    }

    /// File sources in the order they are tried.
    pub fn file_sources(&self) -> impl Iterator<Item = &Path> {
        self.explicit
            .iter()
            .chain(self.candidates.iter())
            .map(PathBuf::as_path)
    }
}

impl FontResolver for FontChain {
    fn resolve(&self) -> DaybreakResult<ResolvedFont> {
        for path in self.file_sources() {
            match read_font_file(path) {
                Ok(font) => {
                    tracing::debug!(source = %font.source, "resolved font file");
                    return Ok(font);
                }
                Err(err) => {
                    tracing::debug!(path = %path.display(), error = %err, "font source skipped");
                }
            }
        }
        self.fallback()
    }

    fn fallback(&self) -> DaybreakResult<ResolvedFont> {
        if !self.host_fonts {
            return Err(DaybreakError::layout("no usable font source in chain"));
        }
        host_font()
    }
}

fn read_font_file(path: &Path) -> DaybreakResult<ResolvedFont> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
    if bytes.is_empty() {
        return Err(DaybreakError::layout(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }
    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        index: 0,
        source: path.display().to_string(),
    })
}

fn host_font() -> DaybreakResult<ResolvedFont> {
    use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

    let mut db = Database::new();
    db.load_system_fonts();

    let families = [Family::SansSerif, Family::Serif, Family::Monospace];
    let query = Query {
        families: &families,
        weight: Weight::BOLD,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| DaybreakError::layout("host font database has no faces"))?;

    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| DaybreakError::layout("host font face data is unavailable"))?;

    let source = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "host font".to_string());

    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        index,
        source: format!("host:{source}"),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
