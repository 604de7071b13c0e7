//! Manual chart renderer.
//!
//! Every pixel position is computed here: [`LinearScale`] and [`BandScale`]
//! map data to logical pixels, and the result is recorded as a list of
//! [`DrawOp`]s on a [`Canvas`] that the UI replays with its own painter.

use log::debug;
use plotters::style::{Color, RGBAColor};
use std::collections::HashMap;

use super::chart::{
    backing_size, category_tooltip, extent, nice_domain, point_tooltip, ring_segment,
    slice_tooltip, Chart, ChartData, ChartError, ChartKind, ChartRenderer, ChartTarget, HitArea,
    HitRegion, Mark, RendererKind, Series, Surface, SurfaceContent, ValueAxis, ValueFormat,
};
use super::styles::{ChartStyle, ChartTheme};
use crate::types::XyPoint;

pub const NO_DATA_MESSAGE: &str = "No data available";

const Y_TICKS: usize = 5;
const MAX_X_LABELS: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One recorded drawing primitive, in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill(RGBAColor),
    Line {
        from: Point,
        to: Point,
        color: RGBAColor,
        width: f64,
    },
    Path {
        points: Vec<Point>,
        color: RGBAColor,
        width: f64,
    },
    Rect {
        min: Point,
        max: Point,
        color: RGBAColor,
    },
    Circle {
        center: Point,
        radius: f64,
        color: RGBAColor,
    },
    /// Always convex
    Polygon {
        points: Vec<Point>,
        color: RGBAColor,
    },
    Text {
        at: Point,
        text: String,
        size: f64,
        color: RGBAColor,
        align: TextAlign,
    },
}

/// A recorded drawing with its backing size and device pixel ratio.
///
/// Drawing calls take logical coordinates; the ratio is applied as a uniform
/// scale before an operation is recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    scale: f64,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            width: logical_width,
            height: logical_height,
            scale: 1.0,
            ops: Vec::new(),
        }
    }

    /// Resize the backing store to `logical × ratio` and reset the transform.
    /// Discards everything drawn so far.
    pub fn rescale(&mut self, logical_width: u32, logical_height: u32, pixel_ratio: f64) {
        let (width, height) =
            backing_size(logical_width, logical_height, pixel_ratio);
        self.width = width;
        self.height = height;
        self.scale = pixel_ratio;
        self.ops.clear();
    }

    pub fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.scale, y * self.scale)
    }

    pub fn fill(&mut self, color: RGBAColor) {
        self.ops.push(DrawOp::Fill(color));
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: RGBAColor, width: f64) {
        let op = DrawOp::Line {
            from: self.point(from.0, from.1),
            to: self.point(to.0, to.1),
            color,
            width: width * self.scale,
        };
        self.ops.push(op);
    }

    pub fn path(&mut self, points: &[(f64, f64)], color: RGBAColor, width: f64) {
        let points = points.iter().map(|&(x, y)| self.point(x, y)).collect();
        self.ops.push(DrawOp::Path {
            points,
            color,
            width: width * self.scale,
        });
    }

    pub fn rect(&mut self, min: (f64, f64), max: (f64, f64), color: RGBAColor) {
        let op = DrawOp::Rect {
            min: self.point(min.0.min(max.0), min.1.min(max.1)),
            max: self.point(min.0.max(max.0), min.1.max(max.1)),
            color,
        };
        self.ops.push(op);
    }

    pub fn circle(&mut self, center: (f64, f64), radius: f64, color: RGBAColor) {
        let op = DrawOp::Circle {
            center: self.point(center.0, center.1),
            radius: radius * self.scale,
            color,
        };
        self.ops.push(op);
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], color: RGBAColor) {
        let points = points.iter().map(|&(x, y)| self.point(x, y)).collect();
        self.ops.push(DrawOp::Polygon { points, color });
    }

    pub fn text(
        &mut self,
        at: (f64, f64),
        text: impl Into<String>,
        size: f64,
        color: RGBAColor,
        align: TextAlign,
    ) {
        let op = DrawOp::Text {
            at: self.point(at.0, at.1),
            text: text.into(),
            size: size * self.scale,
            color,
            align,
        };
        self.ops.push(op);
    }
}

/// Maps a continuous value domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() <= f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// `count + 1` evenly spaced values from the start to the end of the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(1);
        let (d0, d1) = self.domain;
        let step = (d1 - d0) / count as f64;
        (0..=count).map(|i| d0 + step * i as f64).collect()
    }
}

/// Maps `count` categories onto equal bands of a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    count: usize,
    range: (f64, f64),
    /// Fraction of each band left empty, split evenly on both sides
    padding: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        Self {
            count,
            range,
            padding: padding.clamp(0.0, 0.9),
        }
    }

    pub fn step(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.count as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the padded band of category `index`.
    pub fn start(&self, index: usize) -> f64 {
        self.range.0 + self.step() * index as f64 + self.step() * self.padding / 2.0
    }

    pub fn center(&self, index: usize) -> f64 {
        self.range.0 + self.step() * (index as f64 + 0.5)
    }

    /// Category whose full (unpadded) band contains pixel `x`.
    pub fn index_at(&self, x: f64) -> Option<usize> {
        let step = self.step();
        if step <= 0.0 || x < self.range.0 || x >= self.range.1 {
            return None;
        }
        let index = ((x - self.range.0) / step) as usize;
        (index < self.count).then_some(index)
    }
}

/// Rectangle of the plotting area, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl PlotArea {
    fn layout(width: f64, height: f64, chart: &Chart, style: &ChartStyle) -> Self {
        let title_band = style.title_size + style.margin;
        let x_band = style.font_size * 2.0 + if chart.x_title.is_some() { style.font_size * 1.5 } else { 0.0 };
        let right_band = if chart.has_secondary_axis() {
            style.label_area_size
        } else {
            style.margin
        };
        Self {
            left: style.margin + style.label_area_size,
            top: style.margin + title_band,
            right: (width - right_band).max(style.margin + style.label_area_size + 1.0),
            bottom: (height - style.margin - x_band).max(style.margin + title_band + 1.0),
        }
    }
}

/// Draws charts by computing geometry by hand.
pub struct CanvasRenderer {
    theme: ChartTheme,
    style: ChartStyle,
    hits: HashMap<ChartTarget, Vec<HitRegion>>,
}

impl CanvasRenderer {
    pub fn new(theme: ChartTheme) -> Self {
        Self {
            theme,
            style: ChartStyle::default(),
            hits: HashMap::new(),
        }
    }

    /// Draw `chart` into a fresh canvas of the given logical size.
    pub fn draw(
        &self,
        chart: &Chart,
        width: u32,
        height: u32,
        pixel_ratio: f64,
    ) -> (Canvas, Vec<HitRegion>) {
        let mut canvas = Canvas::new(width, height);
        canvas.rescale(width, height, pixel_ratio);
        canvas.fill(self.theme.background_color);

        let (w, h) = (width as f64, height as f64);
        if chart.is_empty() {
            canvas.text(
                (w / 2.0, h / 2.0),
                NO_DATA_MESSAGE,
                self.style.title_size,
                self.theme.muted_color,
                TextAlign::Center,
            );
            return (canvas, Vec::new());
        }

        canvas.text(
            (w / 2.0, self.style.margin),
            chart.title.as_str(),
            self.style.title_size,
            self.theme.text_color,
            TextAlign::Center,
        );

        let hits = match (&chart.data, chart.kind) {
            (ChartData::Points(points), _) => self.draw_scatter(&mut canvas, chart, points, w, h),
            (ChartData::Categories(series), ChartKind::Doughnut) => {
                self.draw_doughnut(&mut canvas, &series[0], w, h)
            }
            (ChartData::Categories(series), _) => {
                self.draw_categories(&mut canvas, chart, series, w, h)
            }
        };
        (canvas, hits)
    }

    fn draw_value_axis(
        &self,
        canvas: &mut Canvas,
        area: &PlotArea,
        scale: &LinearScale,
        format: ValueFormat,
        axis: ValueAxis,
    ) {
        for tick in scale.ticks(Y_TICKS) {
            let y = scale.map(tick);
            if axis == ValueAxis::Primary {
                canvas.line((area.left, y), (area.right, y), self.theme.grid_color, 1.0);
            }
            let (x, align) = match axis {
                ValueAxis::Primary => (area.left - 6.0, TextAlign::Right),
                ValueAxis::Secondary => (area.right + 6.0, TextAlign::Left),
            };
            canvas.text(
                (x, y),
                format.tick(tick),
                self.style.font_size,
                self.theme.muted_color,
                align,
            );
        }
        let x = match axis {
            ValueAxis::Primary => area.left,
            ValueAxis::Secondary => area.right,
        };
        canvas.line((x, area.top), (x, area.bottom), self.theme.axis_color, 1.0);
    }

    fn draw_axis_titles(&self, canvas: &mut Canvas, chart: &Chart, area: &PlotArea) {
        if let Some(title) = &chart.x_title {
            canvas.text(
                ((area.left + area.right) / 2.0, area.bottom + self.style.font_size * 2.5),
                title.as_str(),
                self.style.font_size,
                self.theme.text_color,
                TextAlign::Center,
            );
        }
        if let Some(title) = &chart.y_title {
            canvas.text(
                (self.style.margin, area.top - self.style.font_size),
                title.as_str(),
                self.style.font_size,
                self.theme.text_color,
                TextAlign::Left,
            );
        }
        if let Some(title) = &chart.y2_title {
            canvas.text(
                (area.right + self.style.label_area_size - self.style.margin, area.top - self.style.font_size),
                title.as_str(),
                self.style.font_size,
                self.theme.text_color,
                TextAlign::Right,
            );
        }
    }

    fn draw_categories(
        &self,
        canvas: &mut Canvas,
        chart: &Chart,
        series: &[Series],
        w: f64,
        h: f64,
    ) -> Vec<HitRegion> {
        let area = PlotArea::layout(w, h, chart, &self.style);
        let labels = chart.labels();
        let bands = BandScale::new(labels.len(), (area.left, area.right), 0.2);

        let scale_for = |axis: ValueAxis| {
            let (lo, hi) = chart.value_extent(axis).unwrap_or((0.0, 0.0));
            LinearScale::new(nice_domain(lo, hi), (area.bottom, area.top))
        };
        let primary = scale_for(ValueAxis::Primary);
        let secondary = scale_for(ValueAxis::Secondary);
        let format_for = |axis: ValueAxis| {
            series
                .iter()
                .find(|s| s.axis == axis)
                .map_or(ValueFormat::Count, |s| s.format)
        };

        self.draw_value_axis(canvas, &area, &primary, format_for(ValueAxis::Primary), ValueAxis::Primary);
        if chart.has_secondary_axis() {
            self.draw_value_axis(canvas, &area, &secondary, format_for(ValueAxis::Secondary), ValueAxis::Secondary);
        }
        canvas.line((area.left, area.bottom), (area.right, area.bottom), self.theme.axis_color, 1.0);

        let label_step = labels.len().div_ceil(MAX_X_LABELS).max(1);
        for (i, label) in labels.iter().enumerate().step_by(label_step) {
            canvas.text(
                (bands.center(i), area.bottom + self.style.font_size),
                *label,
                self.style.font_size,
                self.theme.muted_color,
                TextAlign::Center,
            );
        }
        self.draw_axis_titles(canvas, chart, &area);

        let bar_series: Vec<usize> = series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.mark == Mark::Bar)
            .map(|(i, _)| i)
            .collect();
        let bar_width = bands.bandwidth() / bar_series.len().max(1) as f64;

        // Bars first so lines stay visible on top of them.
        for (slot, &index) in bar_series.iter().enumerate() {
            let s = &series[index];
            let scale = if s.axis == ValueAxis::Secondary { &secondary } else { &primary };
            let color = self.theme.series_color(index);
            for (i, point) in s.points.iter().enumerate() {
                let x0 = bands.start(i) + bar_width * slot as f64;
                canvas.rect((x0, scale.map(0.0)), (x0 + bar_width, scale.map(point.value)), color.mix(0.8));
            }
        }

        for (index, s) in series.iter().enumerate().filter(|(_, s)| s.mark == Mark::Line) {
            let scale = if s.axis == ValueAxis::Secondary { &secondary } else { &primary };
            let color = self.theme.series_color(index);
            let points: Vec<(f64, f64)> = s
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| (bands.center(i), scale.map(p.value)))
                .collect();
            canvas.path(&points, color, self.style.line_width);
            for &point in &points {
                canvas.circle(point, self.style.marker_radius, color);
            }
        }

        if series.len() > 1 {
            self.draw_legend(canvas, series.iter().map(|s| s.name.as_str()), area.right - 120.0, area.top);
        }

        (0..labels.len())
            .map(|i| {
                let x0 = area.left + bands.step() * i as f64;
                HitRegion {
                    area: HitArea::Rect {
                        min: (x0, area.top),
                        max: (x0 + bands.step(), area.bottom),
                    },
                    lines: category_tooltip(chart, i),
                }
            })
            .collect()
    }

    fn draw_scatter(
        &self,
        canvas: &mut Canvas,
        chart: &Chart,
        points: &[XyPoint],
        w: f64,
        h: f64,
    ) -> Vec<HitRegion> {
        let area = PlotArea::layout(w, h, chart, &self.style);
        let (x_lo, x_hi) = extent(points.iter().map(|p| p.x)).unwrap_or((0.0, 1.0));
        let (y_lo, y_hi) = extent(points.iter().map(|p| p.y)).unwrap_or((0.0, 1.0));
        let x_scale = LinearScale::new(nice_domain(x_lo, x_hi), (area.left, area.right));
        let y_scale = LinearScale::new(nice_domain(y_lo, y_hi), (area.bottom, area.top));

        self.draw_value_axis(canvas, &area, &y_scale, ValueFormat::Currency, ValueAxis::Primary);
        canvas.line((area.left, area.bottom), (area.right, area.bottom), self.theme.axis_color, 1.0);
        for tick in x_scale.ticks(Y_TICKS) {
            canvas.text(
                (x_scale.map(tick), area.bottom + self.style.font_size),
                format!("{:.0}", tick),
                self.style.font_size,
                self.theme.muted_color,
                TextAlign::Center,
            );
        }
        self.draw_axis_titles(canvas, chart, &area);

        let color = self.theme.series_color(0).mix(0.6);
        let radius = self.style.marker_radius;
        points
            .iter()
            .map(|p| {
                let center = (x_scale.map(p.x), y_scale.map(p.y));
                canvas.circle(center, radius, color);
                HitRegion {
                    area: HitArea::Rect {
                        min: (center.0 - radius, center.1 - radius),
                        max: (center.0 + radius, center.1 + radius),
                    },
                    lines: point_tooltip(p),
                }
            })
            .collect()
    }

    fn draw_doughnut(&self, canvas: &mut Canvas, series: &Series, w: f64, h: f64) -> Vec<HitRegion> {
        let top = self.style.margin * 2.0 + self.style.title_size;
        let legend_width = (w * 0.3).min(160.0);
        let center = ((w - legend_width) / 2.0, (h + top) / 2.0);
        let outer = ((w - legend_width).min(h - top) / 2.0 - self.style.margin).max(4.0);
        let inner = outer * 0.6;

        let total: f64 = series.values().filter(|v| *v > 0.0).sum();
        let mut angle = -std::f64::consts::FRAC_PI_2;
        let mut hits = Vec::new();
        for (i, point) in series.points.iter().enumerate() {
            if point.value <= 0.0 {
                continue;
            }
            let sweep = point.value / total * std::f64::consts::TAU;
            let color = self.theme.series_color(i);
            for quad in ring_segment(center, inner, outer, angle, angle + sweep) {
                canvas.polygon(&quad, color);
            }
            hits.push(HitRegion {
                area: HitArea::Ring {
                    center,
                    inner,
                    outer,
                    start: angle,
                    end: angle + sweep,
                },
                lines: vec![slice_tooltip(series, i, total)],
            });
            angle += sweep;
        }

        self.draw_legend(
            canvas,
            series.points.iter().map(|p| p.label.as_str()),
            w - legend_width,
            top,
        );
        hits
    }

    fn draw_legend<'a>(&self, canvas: &mut Canvas, names: impl Iterator<Item = &'a str>, x: f64, y: f64) {
        let row = self.style.font_size * 1.6;
        for (i, name) in names.enumerate() {
            let y = y + row * i as f64;
            let swatch = self.style.font_size * 0.8;
            canvas.rect((x, y - swatch / 2.0), (x + swatch, y + swatch / 2.0), self.theme.series_color(i));
            canvas.text(
                (x + swatch + 6.0, y),
                name,
                self.style.font_size,
                self.theme.text_color,
                TextAlign::Left,
            );
        }
    }
}

impl ChartRenderer for CanvasRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Canvas
    }

    fn render(
        &mut self,
        target: ChartTarget,
        surface: &mut Surface,
        chart: &Chart,
    ) -> Result<(), ChartError> {
        let (width, height) = surface.logical_size();
        let (canvas, hits) = self.draw(chart, width, height, surface.pixel_ratio());
        debug!(
            "Drew {} ({} ops) on {}",
            chart.title,
            canvas.ops().len(),
            target.id()
        );
        surface.present(SurfaceContent::Canvas(canvas));
        self.hits.insert(target, hits);
        Ok(())
    }

    fn set_theme(&mut self, theme: ChartTheme) {
        self.theme = theme;
    }

    fn tooltip(&self, target: ChartTarget, x: f64, y: f64) -> Option<Vec<String>> {
        self.hits
            .get(&target)?
            .iter()
            .find(|hit| hit.area.contains(x, y))
            .map(|hit| hit.lines.clone())
    }

    fn release(&mut self, target: ChartTarget) {
        self.hits.remove(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeriesPoint;
    use pretty_assertions::assert_eq;

    fn renderer() -> CanvasRenderer {
        CanvasRenderer::new(ChartTheme::dark())
    }

    fn hourly(values: &[f64]) -> Chart {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(format!("{:02}:00", i), *v))
            .collect();
        Chart::categories(
            "Trip Volume",
            ChartKind::Line,
            vec![Series::new("Trips", points, Mark::Line).with_unit("trips")],
        )
    }

    fn texts(canvas: &Canvas) -> Vec<&str> {
        canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_linear_scale_maps_and_ticks() {
        let scale = LinearScale::new((0.0, 100.0), (300.0, 100.0));
        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(100.0), 100.0);
        assert_eq!(scale.map(50.0), 200.0);
        assert_eq!(scale.ticks(4), vec![0.0, 25.0, 50.0, 75.0, 100.0]);

        let flat = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(flat.map(5.0), 5.0);
    }

    #[test]
    fn test_band_scale() {
        let bands = BandScale::new(4, (0.0, 400.0), 0.2);
        assert_eq!(bands.step(), 100.0);
        assert_eq!(bands.bandwidth(), 80.0);
        assert_eq!(bands.start(1), 110.0);
        assert_eq!(bands.center(3), 350.0);
        assert_eq!(bands.index_at(399.0), Some(3));
        assert_eq!(bands.index_at(400.0), None);
        assert_eq!(BandScale::new(0, (0.0, 10.0), 0.1).index_at(5.0), None);
    }

    #[test]
    fn test_empty_input_draws_only_placeholder() {
        let (canvas, hits) = renderer().draw(&hourly(&[]), 400, 300, 1.0);
        assert!(hits.is_empty());
        assert_eq!(canvas.ops().len(), 2);
        assert!(matches!(canvas.ops()[0], DrawOp::Fill(_)));
        match &canvas.ops()[1] {
            DrawOp::Text { at, text, align, .. } => {
                assert_eq!(text, NO_DATA_MESSAGE);
                assert_eq!(*at, Point::new(200.0, 150.0));
                assert_eq!(*align, TextAlign::Center);
            }
            other => panic!("expected placeholder text, got {:?}", other),
        }
    }

    #[test]
    fn test_pixel_ratio_scales_backing_store_and_ops() {
        let (canvas, _) = renderer().draw(&hourly(&[]), 400, 300, 2.0);
        assert_eq!(canvas.backing_size(), (800, 600));
        assert_eq!(canvas.scale(), 2.0);
        match &canvas.ops()[1] {
            DrawOp::Text { at, size, .. } => {
                assert_eq!(*at, Point::new(400.0, 300.0));
                assert_eq!(*size, ChartStyle::default().title_size * 2.0);
            }
            other => panic!("expected placeholder text, got {:?}", other),
        }
    }

    #[test]
    fn test_line_chart_draws_path_and_markers() {
        let mut values = vec![0.0; 24];
        values[8] = 2.0;
        values[23] = 1.0;
        let (canvas, hits) = renderer().draw(&hourly(&values), 600, 300, 1.0);

        let paths: Vec<&DrawOp> = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Path { .. }))
            .collect();
        assert_eq!(paths.len(), 1);
        if let DrawOp::Path { points, .. } = paths[0] {
            assert_eq!(points.len(), 24);
            // Higher values sit higher on screen.
            assert!(points[8].y < points[23].y);
            assert!(points[23].y < points[0].y);
        }
        let markers = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count();
        assert_eq!(markers, 24);
        assert_eq!(hits.len(), 24);
        assert!(texts(&canvas).contains(&"Trip Volume"));
        assert!(!texts(&canvas).contains(&NO_DATA_MESSAGE));
    }

    #[test]
    fn test_grouped_bars_share_each_band() {
        let points = |values: [f64; 2]| {
            vec![SeriesPoint::new("A", values[0]), SeriesPoint::new("B", values[1])]
        };
        let chart = Chart::categories(
            "Vendors",
            ChartKind::Bar,
            vec![
                Series::new("Trips", points([10.0, 20.0]), Mark::Bar),
                Series::new("Revenue", points([5.0, 8.0]), Mark::Bar),
            ],
        );
        let (canvas, _) = renderer().draw(&chart, 400, 300, 1.0);
        let bars: Vec<(f64, f64)> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { min, max, .. } if max.y - min.y > 12.0 => Some((min.x, max.x)),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 4);
        // The second series' bar starts where the first one's ends.
        assert!((bars[0].1 - bars[2].0).abs() < 1e-9);
    }

    #[test]
    fn test_doughnut_tooltips_show_share() {
        let chart = Chart::categories(
            "Zones by Borough",
            ChartKind::Doughnut,
            vec![Series::new(
                "Zones",
                vec![SeriesPoint::new("Queens", 3.0), SeriesPoint::new("Bronx", 1.0)],
                Mark::Bar,
            )
            .with_unit("zones")],
        );
        let mut renderer = renderer();
        let mut surface = Surface::new(400, 300, 1.0);
        renderer
            .render(ChartTarget::BoroughShare, &mut surface, &chart)
            .unwrap();
        assert!(matches!(surface.content(), SurfaceContent::Canvas(_)));

        let hits = &renderer.hits[&ChartTarget::BoroughShare];
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].lines, vec!["Queens: 3 zones (75.0%)".to_string()]);
        assert_eq!(hits[1].lines, vec!["Bronx: 1 zones (25.0%)".to_string()]);

        renderer.release(ChartTarget::BoroughShare);
        assert!(renderer.tooltip(ChartTarget::BoroughShare, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_category_tooltip_lookup() {
        let mut values = vec![0.0; 24];
        values[8] = 1234.0;
        let mut renderer = renderer();
        let mut surface = Surface::new(600, 300, 1.0);
        renderer
            .render(ChartTarget::TripVolume, &mut surface, &hourly(&values))
            .unwrap();

        let hit = renderer.hits[&ChartTarget::TripVolume][8].clone();
        let (x, y) = match hit.area {
            HitArea::Rect { min, max } => ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0),
            _ => unreachable!(),
        };
        assert_eq!(
            renderer.tooltip(ChartTarget::TripVolume, x, y),
            Some(vec!["08:00".to_string(), "1,234 trips".to_string()])
        );
        assert_eq!(renderer.tooltip(ChartTarget::TripVolume, -5.0, -5.0), None);
    }
}
