use std::collections::HashMap;

use crate::{
    assets::texture::Texture,
    compile::plan::{DrawOp, DropShadow, ImageOp, ScenePlan, TextOp},
    foundation::core::{Affine, Canvas, Rgba8, Vec2},
    foundation::error::{VnframeError, VnframeResult},
    foundation::math::mul_div255_u8,
    render::backend::{FrameRGBA, RenderBackend},
    text::metrics::FontBook,
};

/// Options for [`CpuBackend`].
#[derive(Clone, Debug, Default)]
pub struct CpuBackendOpts {
    /// If set, the canvas is cleared to this straight RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Raster backend powered by `vello_cpu`.
///
/// Converted textures are cached by texture id for the life of the backend.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    image_cache: HashMap<u64, vello_cpu::Image>,
    shadow_cache: HashMap<(u64, Rgba8), vello_cpu::Image>,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl CpuBackend {
    /// Create a backend.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self {
            opts,
            image_cache: HashMap::new(),
            shadow_cache: HashMap::new(),
        }
    }

    fn image_paint_for(&mut self, tex: &Texture) -> VnframeResult<vello_cpu::Image> {
        if let Some(img) = self.image_cache.get(&tex.id()) {
            return Ok(img.clone());
        }
        let pixmap = premul_bytes_to_pixmap(tex.data(), tex.width(), tex.height())?;
        let paint = pixmap_paint(pixmap);
        self.image_cache.insert(tex.id(), paint.clone());
        Ok(paint)
    }

    fn shadow_paint_for(
        &mut self,
        tex: &Texture,
        color: Rgba8,
    ) -> VnframeResult<vello_cpu::Image> {
        let key = (tex.id(), color);
        if let Some(img) = self.shadow_cache.get(&key) {
            return Ok(img.clone());
        }
        // Shadow coverage is the source alpha scaled by the shadow alpha.
        let [r, g, b, a] = color.to_premul();
        let mut tinted = Vec::with_capacity(tex.data().len());
        for px in tex.data().chunks_exact(4) {
            let cov = u16::from(px[3]);
            tinted.extend_from_slice(&[
                mul_div255_u8(u16::from(r), cov),
                mul_div255_u8(u16::from(g), cov),
                mul_div255_u8(u16::from(b), cov),
                mul_div255_u8(u16::from(a), cov),
            ]);
        }
        let pixmap = premul_bytes_to_pixmap(&tinted, tex.width(), tex.height())?;
        let paint = pixmap_paint(pixmap);
        self.shadow_cache.insert(key, paint.clone());
        Ok(paint)
    }

    fn draw_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &ImageOp,
    ) -> VnframeResult<()> {
        if !op.is_finite() {
            tracing::debug!(texture = op.texture.id(), "skipping image with non-finite geometry");
            return Ok(());
        }
        let opacity = op.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }
        let (w, h) = (f64::from(op.texture.width()), f64::from(op.texture.height()));
        let full = op.image_transform();

        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        if let Some(DropShadow { color, offset }) = op.shadow {
            let shadow = self.shadow_paint_for(&op.texture, color)?;
            ctx.set_transform(affine_to_cpu(Affine::translate(offset) * full));
            ctx.set_paint(shadow);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        }
        let paint = self.image_paint_for(&op.texture)?;
        ctx.set_transform(affine_to_cpu(full));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &ScenePlan, fonts: &mut FontBook) -> VnframeResult<FrameRGBA> {
        let (width, height) = canvas_u16(plan.canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        // `render_to_pixmap` overwrites the target, so the clear is the first fill.
        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(Rgba8::rgba(r, g, b, a)));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                plan.canvas.w(),
                plan.canvas.h(),
            ));
        }
        for op in &plan.ops {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                DrawOp::Image(img) => self.draw_image(&mut ctx, img)?,
                DrawOp::FillRect { rect, color } => {
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        rect.x0, rect.y0, rect.x1, rect.y1,
                    ));
                }
                DrawOp::Text(t) => draw_text(&mut ctx, t, fonts)?,
            }
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn scale_to_fit(&mut self, frame: &FrameRGBA, target: Canvas) -> VnframeResult<FrameRGBA> {
        if !frame.premultiplied {
            return Err(VnframeError::render(
                "preview scaling expects a premultiplied frame",
            ));
        }
        let (width, height) = canvas_u16(target)?;
        let src = premul_bytes_to_pixmap(&frame.data, frame.width, frame.height)?;
        let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
        let s = (target.w() / fw).min(target.h() / fh);
        let offset = Vec2::new((target.w() - fw * s) / 2.0, (target.h() - fh * s) / 2.0);

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(affine_to_cpu(
            Affine::translate(offset) * Affine::scale(s),
        ));
        ctx.set_paint(pixmap_paint(src));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: target.width,
            height: target.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    t: &TextOp,
    fonts: &mut FontBook,
) -> VnframeResult<()> {
    if t.text.is_empty() {
        return Ok(());
    }
    let finite = t.origin.x.is_finite()
        && t.origin.y.is_finite()
        && t.transform.as_coeffs().iter().all(|c| c.is_finite());
    if !finite {
        tracing::debug!(text = %t.text, "skipping text with non-finite geometry");
        return Ok(());
    }
    let Some(shaped) = fonts.shape(&t.family, t.size_px, &t.text)? else {
        tracing::warn!(family = %t.family, "font family not registered; text skipped");
        return Ok(());
    };

    // Glyph positions are relative to the layout top; shift so the first baseline sits on origin.
    let placement = t.transform
        * Affine::translate(Vec2::new(
            t.origin.x,
            t.origin.y - f64::from(shaped.baseline),
        ));
    ctx.set_transform(affine_to_cpu(placement));

    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font_size = run.run().font_size();
            let glyphs = || {
                run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
            };

            if let Some(stroke) = t.stroke {
                ctx.set_paint(color_to_cpu(stroke.color));
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(stroke.width)
                        .with_miter_limit(stroke.miter_limit),
                );
                ctx.glyph_run(&shaped.font)
                    .font_size(font_size)
                    .stroke_glyphs(glyphs());
            }
            ctx.set_paint(color_to_cpu(t.color));
            ctx.glyph_run(&shaped.font)
                .font_size(font_size)
                .fill_glyphs(glyphs());
        }
    }
    Ok(())
}

fn canvas_u16(canvas: Canvas) -> VnframeResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| VnframeError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| VnframeError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> VnframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VnframeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VnframeError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(VnframeError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
