use crate::{
    foundation::core::Rgba8,
    foundation::error::{DaybreakError, DaybreakResult},
    text::fonts::{FontResolver, ResolvedFont},
};

/// Measured size of a single shaped line.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: f64,
    /// Line box height in pixels.
    pub height: f64,
}

/// Font metrics source used by the layout engine.
pub trait TextMeasure {
    /// Measure `text` as a single unwrapped line at `size_px`.
    fn measure(&mut self, text: &str, size_px: f32) -> DaybreakResult<TextExtent>;
}

/// Parley-backed shaper holding one registered font.
///
/// Measurement and rasterization go through the same shaper, so the widths the
/// layout engine sees are the widths that get drawn.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
    face: FaceAttrs,
    index: u32,
    source: String,
}

/// Attributes that make parley pick one face out of a registered family.
#[derive(Clone, Copy, Debug)]
struct FaceAttrs {
    width: parley::style::FontWidth,
    style: parley::style::FontStyle,
    weight: parley::style::FontWeight,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("family_name", &self.family_name)
            .field("index", &self.index)
            .field("source", &self.source)
            .finish()
    }
}

impl TextShaper {
    /// Register `font` with a fresh Parley context.
    ///
    /// Shaping is pinned to the face at `font.index`; an index the data does
    /// not contain is a layout error.
    pub fn from_font(font: &ResolvedFont) -> DaybreakResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        if families.is_empty() {
            return Err(DaybreakError::layout(format!(
                "no font families registered from '{}'",
                font.source
            )));
        }
        let (family_id, info) = families
            .iter()
            .find_map(|(id, faces)| {
                faces
                    .iter()
                    .find(|info| info.index() == font.index)
                    .map(|info| (*id, info))
            })
            .ok_or_else(|| {
                DaybreakError::layout(format!(
                    "'{}' has no face at index {}",
                    font.source, font.index
                ))
            })?;
        let face = FaceAttrs {
            width: info.width(),
            style: info.style(),
            weight: info.weight(),
        };
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| DaybreakError::layout("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            face,
            index: font.index,
            source: font.source.clone(),
        })
    }

    /// Resolve a font through `resolver`, retrying once with its fallback.
    pub fn from_resolver(resolver: &dyn FontResolver) -> DaybreakResult<Self> {
        match resolver.resolve().and_then(|font| Self::from_font(&font)) {
            Ok(shaper) => Ok(shaper),
            Err(err) => {
                tracing::warn!(error = %err, "preferred font unusable, trying fallback font");
                resolver
                    .fallback()
                    .and_then(|font| Self::from_font(&font))
                    .map_err(|e| DaybreakError::layout(format!("fallback font unusable: {e}")))
            }
        }
    }

    /// Family name Parley detected in the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Where the font came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Face index inside the font data.
    pub fn face_index(&self) -> u32 {
        self.index
    }

    /// Shape `text` as one unwrapped line.
    pub fn shape(&mut self, text: &str, size_px: f32) -> DaybreakResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(DaybreakError::layout("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWidth(self.face.width));
        builder.push_default(parley::style::StyleProperty::FontStyle(self.face.style));
        builder.push_default(parley::style::StyleProperty::FontWeight(self.face.weight));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextShaper {
    fn measure(&mut self, text: &str, size_px: f32) -> DaybreakResult<TextExtent> {
        let layout = self.shape(text, size_px)?;
        Ok(TextExtent {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
