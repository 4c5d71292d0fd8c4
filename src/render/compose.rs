use std::sync::Arc;

use crate::{
    assets::decode::{Canvas, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::core::Rgba8,
    foundation::error::{DaybreakError, DaybreakResult},
    layout::plan::{LayoutPlan, TextDraw},
    text::shaper::TextShaper,
};

/// Paint every draw of `plan` onto a copy of `canvas` in a single solid color.
///
/// The input canvas is never modified. The canvas size is validated before any
/// drawing happens, so a failed call never yields a partially drawn image.
#[tracing::instrument(skip_all, fields(width = canvas.width(), height = canvas.height(), draws = plan.draws.len()))]
pub fn compose(
    canvas: &Canvas,
    plan: &LayoutPlan,
    shaper: &mut TextShaper,
    color: Rgba8,
) -> DaybreakResult<Canvas> {
    let (w, h) = surface_size(canvas)?;
    let (width, height) = canvas.dimensions();

    let mut shaped = Vec::with_capacity(plan.draws.len());
    for draw in &plan.draws {
        shaped.push((draw, shaper.shape(&draw.text, draw.size_px)?));
    }

    let background = canvas_to_pixmap(canvas, w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(background)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(w),
        f64::from(h),
    ));

    for (draw, layout) in &shaped {
        draw_line(&mut ctx, draw, layout, color);
    }

    let mut out = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut out);

    let mut data = out.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    Canvas::from_raw(width, height, data)
        .ok_or_else(|| DaybreakError::composition("rendered buffer size mismatch"))
}

fn surface_size(canvas: &Canvas) -> DaybreakResult<(u16, u16)> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(DaybreakError::composition("canvas has zero size"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| DaybreakError::composition("canvas width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DaybreakError::composition("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    draw: &TextDraw,
    layout: &parley::Layout<Rgba8>,
    color: Rgba8,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        draw.origin.x,
        draw.origin.y,
    )));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            // Glyph ids are only valid for the face parley shaped the run with.
            ctx.glyph_run(run.run().font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn canvas_to_pixmap(canvas: &Canvas, w: u16, h: u16) -> vello_cpu::Pixmap {
    let mut rgba = canvas.as_raw().clone();
    premultiply_rgba8_in_place(&mut rgba);

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    for px in rgba.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
