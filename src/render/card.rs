use crate::{
    assets::decode::Canvas,
    foundation::core::{CanvasSize, Rgba8},
    foundation::error::{DaybreakError, DaybreakResult},
    layout::plan::{CardText, LayoutPlan, compute_layout},
    render::compose::compose,
    text::{fonts::FontResolver, shaper::TextShaper},
};

/// Turns a background canvas and card text into the finished card.
pub trait CardRenderer {
    /// Render `text` over a copy of `canvas`.
    fn render(&self, canvas: &Canvas, text: &CardText<'_>) -> DaybreakResult<Canvas>;
}

/// Default renderer: font resolution, layout, then the CPU compositor.
pub struct TextCard {
    fonts: Box<dyn FontResolver>,
    color: Rgba8,
}

impl TextCard {
    /// Renderer drawing white text with fonts from `fonts`.
    pub fn new(fonts: impl FontResolver + 'static) -> Self {
        Self {
            fonts: Box::new(fonts),
            color: Rgba8::WHITE,
        }
    }

    /// Use `color` for every line.
    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    /// Resolve fonts and compute the plan without drawing.
    pub fn plan(
        &self,
        canvas: CanvasSize,
        text: &CardText<'_>,
    ) -> DaybreakResult<(LayoutPlan, TextShaper)> {
        let mut shaper = TextShaper::from_resolver(self.fonts.as_ref())?;
        tracing::debug!(family = shaper.family_name(), source = shaper.source(), "font ready");
        let plan = compute_layout(canvas, text, &mut shaper)?;
        Ok((plan, shaper))
    }
}

impl CardRenderer for TextCard {
    fn render(&self, canvas: &Canvas, text: &CardText<'_>) -> DaybreakResult<Canvas> {
        let size = CanvasSize::new(canvas.width(), canvas.height());
        if size.is_empty() {
            return Err(DaybreakError::composition("canvas has zero size"));
        }
        let (plan, mut shaper) = self.plan(size, text)?;
        compose(canvas, &plan, &mut shaper, self.color)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/card.rs"]
mod tests;
