use kurbo::Point;

use crate::{
    foundation::core::CanvasSize,
    foundation::error::DaybreakResult,
    text::shaper::{TextExtent, TextMeasure},
};

/// Vertical gap in pixels after every quote line (including the last one, before the author).
pub const LINE_GAP_PX: f64 = 5.0;

/// Prefix put in front of the author name.
pub const AUTHOR_PREFIX: &str = "- ";

const TITLE_TOP_FRAC: f64 = 0.10;
const BLOCK_BOTTOM_FRAC: f64 = 0.05;
const MAX_LINE_WIDTH_FRAC: f64 = 0.80;

/// Which of the three card fonts a draw uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Greeting at the top of the card.
    Title,
    /// Word-wrapped quote body.
    Quote,
    /// Attribution line under the quote.
    Attribution,
}

/// Pixel sizes of the three card fonts, derived from canvas height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FontSizes {
    /// Title size (8% of height).
    pub title: f32,
    /// Quote size (5% of height).
    pub quote: f32,
    /// Attribution size (3% of height).
    pub attribution: f32,
}

impl FontSizes {
    /// Sizes for `canvas`: whole pixels, never below 1.
    pub fn for_canvas(canvas: CanvasSize) -> Self {
        let h = canvas.height_f64();
        let size = |frac: f64| (h * frac).floor().max(1.0) as f32;
        Self {
            title: size(0.08),
            quote: size(0.05),
            attribution: size(0.03),
        }
    }

    /// Size for `role`.
    pub fn for_role(&self, role: FontRole) -> f32 {
        match role {
            FontRole::Title => self.title,
            FontRole::Quote => self.quote,
            FontRole::Attribution => self.attribution,
        }
    }
}

/// The three strings placed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardText<'a> {
    /// Greeting at the top.
    pub title: &'a str,
    /// Quote body, wrapped.
    pub quote: &'a str,
    /// Author, rendered with [`AUTHOR_PREFIX`].
    pub author: &'a str,
}

/// One positioned text draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextDraw {
    /// Exact string to draw.
    pub text: String,
    /// Top-left corner of the line box in canvas pixels.
    pub origin: Point,
    /// Font used for this line.
    pub role: FontRole,
    /// Font size in pixels.
    pub size_px: f32,
    /// Measured size of `text` at `size_px`.
    pub extent: TextExtent,
}

/// Ordered draw list: title, quote lines top to bottom, author.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutPlan {
    /// Canvas the plan was computed for.
    pub canvas: CanvasSize,
    /// Font sizes used.
    pub sizes: FontSizes,
    /// Draws in paint order.
    pub draws: Vec<TextDraw>,
}

impl LayoutPlan {
    /// Draws for `role`, in paint order.
    pub fn draws_for(&self, role: FontRole) -> impl Iterator<Item = &TextDraw> {
        self.draws.iter().filter(move |d| d.role == role)
    }

    /// Bottom edge of the quote+author block (last draw's line box).
    pub fn block_bottom(&self) -> Option<f64> {
        self.draws
            .iter()
            .rev()
            .find(|d| d.role == FontRole::Attribution)
            .map(|d| d.origin.y + d.extent.height)
    }
}

/// Greedy word wrap.
///
/// A word joins the current line while the joined line measures strictly less
/// than `max_width`. A word that does not fit starts a new line, so a single
/// overlong word ends up alone on its line, unsplit.
pub fn wrap_words<F>(text: &str, max_width: f64, mut width_of: F) -> DaybreakResult<Vec<String>>
where
    F: FnMut(&str) -> DaybreakResult<f64>,
{
    let mut lines = Vec::<String>::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if width_of(&candidate)? < max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

/// Lay out the card text on a canvas of `canvas` size.
///
/// Title is centered at 10% from the top. Quote lines and the author line form
/// a block whose bottom sits at 95% of the height; every line is centered on
/// its own measured width.
#[tracing::instrument(skip(text, measure), fields(width = canvas.width, height = canvas.height))]
pub fn compute_layout(
    canvas: CanvasSize,
    text: &CardText<'_>,
    measure: &mut dyn TextMeasure,
) -> DaybreakResult<LayoutPlan> {
    let sizes = FontSizes::for_canvas(canvas);
    let w = canvas.width_f64();
    let h = canvas.height_f64();
    let centered_x = |extent: TextExtent| (w - extent.width) / 2.0;

    let mut draws = Vec::<TextDraw>::new();

    let title_extent = measure.measure(text.title, sizes.title)?;
    draws.push(TextDraw {
        text: text.title.to_string(),
        origin: Point::new(centered_x(title_extent), h * TITLE_TOP_FRAC),
        role: FontRole::Title,
        size_px: sizes.title,
        extent: title_extent,
    });

    let lines = wrap_words(text.quote, w * MAX_LINE_WIDTH_FRAC, |line| {
        measure.measure(line, sizes.quote).map(|e| e.width)
    })?;
    let mut line_extents = Vec::<TextExtent>::with_capacity(lines.len());
    for line in &lines {
        line_extents.push(measure.measure(line, sizes.quote)?);
    }

    let author_line = format!("{AUTHOR_PREFIX}{}", text.author);
    let author_extent = measure.measure(&author_line, sizes.attribution)?;

    let block_height = line_extents.iter().map(|e| e.height).sum::<f64>()
        + author_extent.height
        + lines.len() as f64 * LINE_GAP_PX;
    let mut y = h - block_height - h * BLOCK_BOTTOM_FRAC;

    for (line, extent) in lines.into_iter().zip(line_extents) {
        draws.push(TextDraw {
            text: line,
            origin: Point::new(centered_x(extent), y),
            role: FontRole::Quote,
            size_px: sizes.quote,
            extent,
        });
        y += extent.height + LINE_GAP_PX;
    }

    draws.push(TextDraw {
        text: author_line,
        origin: Point::new(centered_x(author_extent), y),
        role: FontRole::Attribution,
        size_px: sizes.attribution,
        extent: author_extent,
    });

    Ok(LayoutPlan {
        canvas,
        sizes,
        draws,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/plan.rs"]
mod tests;
