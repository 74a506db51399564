//! Pixel-space drawing surface on top of a plotters drawing area.
//!
//! All coordinates are in pixels from the top-left corner of the canvas.
//! Scales do the data-to-pixel mapping; this layer only draws.

use super::scale::AxisScale;
use super::{draw_err, RenderError};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

pub const FONT_FAMILY: &str = "sans-serif";
/// Font sizes in pixels.
pub const TICK_FONT_SIZE: f64 = 10.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;
/// plotters divides font sizes by this factor when writing SVG.
const FONT_SCALE: f64 = 1.24;
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Text placement relative to its anchor point.
#[derive(Clone, Copy)]
pub struct Label {
    pub size: f64,
    pub h: HPos,
    pub v: VPos,
    pub rotated: bool,
}

impl Label {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            h: HPos::Left,
            v: VPos::Center,
            rotated: false,
        }
    }

    pub fn centered(size: f64) -> Self {
        Self {
            h: HPos::Center,
            ..Self::new(size)
        }
    }

    pub fn anchor(mut self, h: HPos, v: VPos) -> Self {
        self.h = h;
        self.v = v;
        self
    }

    /// Read bottom-to-top, as for a vertical axis title.
    pub fn rotated(mut self) -> Self {
        self.rotated = true;
        self
    }
}

pub struct Canvas<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
}

impl<'a, DB: DrawingBackend> Canvas<'a, DB> {
    pub fn new(area: &'a DrawingArea<DB, Shift>) -> Self {
        Self { area }
    }

    pub fn fill(&self, color: &RGBColor) -> Result<(), RenderError> {
        self.area.fill(color).map_err(draw_err)
    }

    pub fn line(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        color: &RGBColor,
    ) -> Result<(), RenderError> {
        self.polyline(&[from, to], color, 1)
    }

    pub fn polyline(
        &self,
        points: &[(f64, f64)],
        color: &RGBColor,
        width: u32,
    ) -> Result<(), RenderError> {
        let path: Vec<(i32, i32)> = points.iter().map(|&p| px(p)).collect();
        self.area
            .draw(&PathElement::new(path, color.stroke_width(width)))
            .map_err(draw_err)
    }

    /// Axis-aligned rectangle from its top-left corner. Either style may be
    /// omitted.
    pub fn rect(
        &self,
        top_left: (f64, f64),
        size: (f64, f64),
        fill: Option<&RGBColor>,
        stroke: Option<&RGBColor>,
    ) -> Result<(), RenderError> {
        let corners = [
            px(top_left),
            px((top_left.0 + size.0, top_left.1 + size.1)),
        ];
        if let Some(fill) = fill {
            self.area
                .draw(&Rectangle::new(corners, fill.filled()))
                .map_err(draw_err)?;
        }
        if let Some(stroke) = stroke {
            self.area
                .draw(&Rectangle::new(corners, stroke.stroke_width(1)))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    pub fn text(&self, text: &str, at: (f64, f64), label: Label) -> Result<(), RenderError> {
        let mut font = (FONT_FAMILY, label.size * FONT_SCALE).into_font();
        if label.rotated {
            font = font.transform(FontTransform::Rotate270);
        }
        let style = font.color(&BLACK).pos(Pos::new(label.h, label.v));
        self.area
            .draw(&Text::new(text.to_string(), px(at), style))
            .map_err(draw_err)
    }

    /// Vertical axis at `x` with ticks and labels on the left.
    pub fn axis_left(&self, scale: &impl AxisScale, x: f64) -> Result<(), RenderError> {
        let (r0, r1) = scale.range();
        self.polyline(
            &[(x - TICK_SIZE, r0), (x, r0), (x, r1), (x - TICK_SIZE, r1)],
            &BLACK,
            1,
        )?;

        let label = Label::new(TICK_FONT_SIZE).anchor(HPos::Right, VPos::Center);
        for (y, text) in scale.tick_marks() {
            self.line((x - TICK_SIZE, y), (x, y), &BLACK)?;
            self.text(&text, (x - TICK_SIZE - TICK_PADDING, y), label)?;
        }
        Ok(())
    }

    /// Horizontal axis at `y` with ticks and labels below. When labels would
    /// collide only every n-th one is written.
    pub fn axis_bottom(&self, scale: &impl AxisScale, y: f64) -> Result<(), RenderError> {
        let (r0, r1) = scale.range();
        self.polyline(
            &[(r0, y + TICK_SIZE), (r0, y), (r1, y), (r1, y + TICK_SIZE)],
            &BLACK,
            1,
        )?;

        let ticks = scale.tick_marks();
        let every = label_stride(&ticks, TICK_FONT_SIZE);
        let label = Label::centered(TICK_FONT_SIZE).anchor(HPos::Center, VPos::Top);
        for (i, (x, text)) in ticks.iter().enumerate() {
            self.line((*x, y), (*x, y + TICK_SIZE), &BLACK)?;
            if i % every == 0 {
                self.text(text, (*x, y + TICK_SIZE + TICK_PADDING), label)?;
            }
        }
        Ok(())
    }
}

/// Rough rendered width of `text` at `size`, without loading a font.
pub fn estimate_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

/// Smallest stride such that the labels it keeps do not overlap.
fn label_stride(ticks: &[(f64, String)], size: f64) -> usize {
    if ticks.len() < 2 {
        return 1;
    }
    let spacing = (ticks[1].0 - ticks[0].0).abs();
    let widest = ticks
        .iter()
        .map(|(_, text)| estimate_text_width(text, size))
        .fold(0.0, f64::max);
    if spacing <= 0.0 {
        return ticks.len();
    }
    ((widest + TICK_PADDING) / spacing).ceil().max(1.0) as usize
}

fn px(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}
