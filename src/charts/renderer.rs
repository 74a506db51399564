//! Static Chart Renderer
//! Draws the three charts onto a fixed 600x400 canvas.
//!
//! Layout shared by every chart:
//! 1. Light background fill
//! 2. Left value axis and bottom category axis inside the margins
//! 3. Axis titles along the bottom and left edges
//! 4. Chart glyphs (boxes, bars or a curve)

use super::canvas::{Canvas, Label, LABEL_FONT_SIZE, TICK_FONT_SIZE};
use super::curve::{natural_curve, SEGMENT_SAMPLES};
use super::scale::{BandScale, LinearScale, OrdinalScale};
use super::{draw_err, ChartData, ChartFormat, ChartKind, RenderError};
use crate::stats::{AverageLikes, DailyAverage, PlatformSummary};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CANVAS_SIZE: (u32, u32) = (600, 400);

// Colors
const BACKGROUND: RGBColor = RGBColor(0xf9, 0xf7, 0xf2);
const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);

/// Bar fill per post type, cycled when there are more types than colors.
const POST_TYPE_PALETTE: [RGBColor; 3] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
];

/// Box plot value axis is padded by this many likes on both ends.
const BOX_DOMAIN_PAD: f64 = 5.0;
const LEGEND_OFFSET: f64 = 150.0;
const LEGEND_SWATCH: f64 = 15.0;
const LEGEND_ROW: f64 = 20.0;
const LINE_WIDTH: u32 = 2;

#[derive(Debug, Clone, Copy)]
struct Margin {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

const BOX_MARGIN: Margin = Margin {
    top: 30.0,
    right: 30.0,
    bottom: 45.0,
    left: 55.0,
};
const BAR_MARGIN: Margin = Margin {
    top: 50.0,
    right: 30.0,
    bottom: 45.0,
    left: 55.0,
};
const LINE_MARGIN: Margin = Margin {
    top: 30.0,
    right: 30.0,
    bottom: 50.0,
    left: 55.0,
};

/// Plot frame: canvas size minus margins.
#[derive(Debug, Clone, Copy)]
struct Frame {
    width: f64,
    height: f64,
    margin: Margin,
}

impl Frame {
    fn new(margin: Margin) -> Self {
        Self {
            width: CANVAS_SIZE.0 as f64,
            height: CANVAS_SIZE.1 as f64,
            margin,
        }
    }

    fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Inverted so larger values sit higher.
    fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin.bottom, self.margin.top)
    }

    fn baseline(&self) -> f64 {
        self.height - self.margin.bottom
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to an SVG document.
    pub fn render_svg(chart: &ChartData) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, CANVAS_SIZE).into_drawing_area();
            Self::draw_chart(&root, chart)?;
            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Render a chart into an RGB bitmap. Text needs a system sans-serif font.
    pub fn render_png(chart: &ChartData) -> Result<RgbImage, RenderError> {
        let (width, height) = CANVAS_SIZE;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, CANVAS_SIZE).into_drawing_area();
            Self::draw_chart(&root, chart)?;
            root.present().map_err(draw_err)?;
        }
        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Draw("bitmap buffer has the wrong size".to_string()))
    }

    /// Render a chart and write it to `<output_dir>/<id>.<ext>`.
    pub fn write_chart(
        chart: &ChartData,
        format: ChartFormat,
        output_dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        let path = output_dir.join(format!("{}.{}", chart.kind().id(), format.extension()));
        match format {
            ChartFormat::Svg => fs::write(&path, Self::render_svg(chart)?)?,
            ChartFormat::Png => Self::render_png(chart)?.save(&path)?,
        }
        debug!(chart = %chart.kind(), path = %path.display(), "chart written");
        Ok(path)
    }

    fn draw_chart<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), RenderError> {
        if chart.is_empty() {
            return Err(RenderError::EmptyData(chart.kind()));
        }

        let canvas = Canvas::new(area);
        canvas.fill(&BACKGROUND)?;

        match chart {
            ChartData::BoxPlot(summaries) => Self::draw_boxplot(&canvas, summaries),
            ChartData::BarPlot(averages) => Self::draw_barplot(&canvas, averages),
            ChartData::LinePlot(series) => Self::draw_lineplot(&canvas, series),
        }
    }

    fn draw_boxplot<DB: DrawingBackend>(
        canvas: &Canvas<'_, DB>,
        summaries: &[PlatformSummary],
    ) -> Result<(), RenderError> {
        let frame = Frame::new(BOX_MARGIN);

        let x = BandScale::new(
            summaries.iter().map(|s| s.platform.as_str()),
            frame.x_range(),
            0.1,
        );
        let lowest = summaries
            .iter()
            .map(|s| s.summary.min)
            .fold(f64::INFINITY, f64::min);
        let highest = summaries
            .iter()
            .map(|s| s.summary.max)
            .fold(f64::NEG_INFINITY, f64::max);
        let y = LinearScale::new(
            (lowest - BOX_DOMAIN_PAD, highest + BOX_DOMAIN_PAD),
            frame.y_range(),
        );

        Self::draw_axes(canvas, &frame, &x, &y, "Platform", "Likes")?;

        let box_width = x.bandwidth();
        for s in summaries {
            let Some(left) = x.position(&s.platform) else {
                continue;
            };
            let right = left + box_width;
            let center = left + box_width / 2.0;
            let q = &s.summary;

            // Whisker spans the full range; caps mark min and max.
            canvas.line((center, y.apply(q.min)), (center, y.apply(q.max)), &BLACK)?;
            canvas.line((left, y.apply(q.min)), (right, y.apply(q.min)), &BLACK)?;
            canvas.line((left, y.apply(q.max)), (right, y.apply(q.max)), &BLACK)?;

            let top = y.apply(q.q3);
            canvas.rect(
                (left, top),
                (box_width, y.apply(q.q1) - top),
                Some(&LIGHT_GRAY),
                Some(&BLACK),
            )?;

            canvas.line((left, y.apply(q.median)), (right, y.apply(q.median)), &BLACK)?;
        }

        Ok(())
    }

    fn draw_barplot<DB: DrawingBackend>(
        canvas: &Canvas<'_, DB>,
        averages: &[AverageLikes],
    ) -> Result<(), RenderError> {
        let frame = Frame::new(BAR_MARGIN);

        let platforms = BandScale::new(
            averages.iter().map(|a| a.platform.as_str()),
            frame.x_range(),
            0.1,
        );
        let post_types = BandScale::new(
            averages.iter().map(|a| a.post_type.as_str()),
            (0.0, platforms.bandwidth()),
            0.05,
        );
        let highest = averages.iter().map(|a| a.avg_likes).fold(0.0, f64::max);
        let y = LinearScale::new((0.0, highest), frame.y_range());
        let colors = OrdinalScale::new(
            post_types.domain().iter().cloned(),
            POST_TYPE_PALETTE.to_vec(),
        );

        Self::draw_axes(canvas, &frame, &platforms, &y, "Platform", "Average Likes")?;

        for record in averages {
            let (Some(group_left), Some(offset), Some(color)) = (
                platforms.position(&record.platform),
                post_types.position(&record.post_type),
                colors.get(&record.post_type),
            ) else {
                continue;
            };
            let top = y.apply(record.avg_likes);
            canvas.rect(
                (group_left + offset, top),
                (post_types.bandwidth(), frame.baseline() - top),
                Some(color),
                None,
            )?;
        }

        // Legend
        let origin = (frame.width - LEGEND_OFFSET, frame.margin.top);
        let label = Label::new(LABEL_FONT_SIZE).anchor(HPos::Left, VPos::Center);
        for (i, post_type) in post_types.domain().iter().enumerate() {
            let Some(color) = colors.get(post_type) else {
                continue;
            };
            let row_top = origin.1 + i as f64 * LEGEND_ROW;
            canvas.rect(
                (origin.0, row_top),
                (LEGEND_SWATCH, LEGEND_SWATCH),
                Some(color),
                None,
            )?;
            canvas.text(
                post_type,
                (origin.0 + LEGEND_ROW, row_top + LEGEND_SWATCH / 2.0),
                label,
            )?;
        }

        Ok(())
    }

    fn draw_lineplot<DB: DrawingBackend>(
        canvas: &Canvas<'_, DB>,
        series: &[DailyAverage],
    ) -> Result<(), RenderError> {
        let frame = Frame::new(LINE_MARGIN);

        let x = BandScale::new(series.iter().map(|d| d.label.as_str()), frame.x_range(), 0.1);
        let highest = series.iter().map(|d| d.avg_likes).fold(0.0, f64::max);
        let y = LinearScale::new((0.0, highest), frame.y_range());

        Self::draw_axes(canvas, &frame, &x, &y, "Date", "Average Likes")?;

        let points: Vec<(f64, f64)> = series
            .iter()
            .filter_map(|d| Some((x.center(&d.label)?, y.apply(d.avg_likes))))
            .collect();
        canvas.polyline(&natural_curve(&points, SEGMENT_SAMPLES), &STEEL_BLUE, LINE_WIDTH)
    }

    fn draw_axes<DB: DrawingBackend>(
        canvas: &Canvas<'_, DB>,
        frame: &Frame,
        x: &BandScale,
        y: &LinearScale,
        x_title: &str,
        y_title: &str,
    ) -> Result<(), RenderError> {
        canvas.axis_left(y, frame.margin.left)?;
        canvas.axis_bottom(x, frame.baseline())?;

        canvas.text(
            x_title,
            (frame.width / 2.0, frame.height - 4.0),
            Label::centered(LABEL_FONT_SIZE).anchor(HPos::Center, VPos::Bottom),
        )?;
        canvas.text(
            y_title,
            (TICK_FONT_SIZE + 4.0, frame.height / 2.0),
            Label::centered(LABEL_FONT_SIZE).rotated(),
        )?;
        Ok(())
    }
}
