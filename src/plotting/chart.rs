use image::RgbImage;
use log::debug;
use plotters::drawing::DrawingAreaErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::canvas::Canvas;
use super::styles::ChartTheme;
use crate::types::{SeriesPoint, XyPoint};
use crate::utils::format::{
    format_compact, format_compact_currency, format_count, format_currency, format_percentage,
};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChartError {
    #[error("chart backend error: {0}")]
    Backend(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Backend(err.to_string())
    }
}

/// Which strategy draws charts. Chosen once at startup from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Declarative specs drawn with plotters into a bitmap
    #[default]
    Library,
    /// Hand-computed geometry recorded as canvas draw operations
    Canvas,
}

/// Named places in the dashboard that display a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartTarget {
    TripVolume,
    VendorPerformance,
    DistanceFare,
    BoroughShare,
    RevenueAnalysis,
}

impl ChartTarget {
    pub const ALL: [ChartTarget; 5] = [
        ChartTarget::TripVolume,
        ChartTarget::VendorPerformance,
        ChartTarget::DistanceFare,
        ChartTarget::BoroughShare,
        ChartTarget::RevenueAnalysis,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChartTarget::TripVolume => "trip-volume-chart",
            ChartTarget::VendorPerformance => "vendor-performance-chart",
            ChartTarget::DistanceFare => "distance-fare-scatter",
            ChartTarget::BoroughShare => "borough-distribution-chart",
            ChartTarget::RevenueAnalysis => "revenue-analysis-chart",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Doughnut,
    /// Bars and lines over one category axis, with an optional second value axis
    Combo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Bar,
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueAxis {
    Primary,
    Secondary,
}

/// How the values of a series are printed on axes and in tooltips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueFormat {
    Count,
    Currency,
    /// Compact `$12.5K` ticks, full currency in tooltips
    CompactCurrency,
    Decimal,
}

impl ValueFormat {
    pub fn tick(self, value: f64) -> String {
        match self {
            ValueFormat::Count | ValueFormat::Decimal => format_compact(value),
            ValueFormat::Currency if value.abs() < 1_000.0 => format!("${:.0}", value),
            ValueFormat::Currency | ValueFormat::CompactCurrency => {
                format_compact_currency(value)
            }
        }
    }

    pub fn value(self, value: f64) -> String {
        match self {
            ValueFormat::Count => format_count(value.max(0.0).round() as u64),
            ValueFormat::Currency | ValueFormat::CompactCurrency => format_currency(value),
            ValueFormat::Decimal => format!("{:.2}", value),
        }
    }
}

/// A named sequence of labelled values.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
    pub mark: Mark,
    pub axis: ValueAxis,
    pub format: ValueFormat,
    /// Noun used in tooltips, e.g. `"trips"`
    pub unit: Option<String>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<SeriesPoint>, mark: Mark) -> Self {
        Self {
            name: name.into(),
            points,
            mark,
            axis: ValueAxis::Primary,
            format: ValueFormat::Count,
            unit: None,
        }
    }

    pub fn on_axis(mut self, axis: ValueAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn formatted(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Tooltip text for one value: `"1,234 trips"` or `"Revenue: $12.00"`.
    pub fn describe(&self, value: f64) -> String {
        let text = self.format.value(value);
        match &self.unit {
            Some(unit) => format!("{} {}", text, unit),
            None => format!("{}: {}", self.name, text),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartData {
    /// Series sharing one category axis; labels come from the first series
    Categories(Vec<Series>),
    Points(Vec<XyPoint>),
}

/// Renderer-independent description of one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub data: ChartData,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub y2_title: Option<String>,
}

impl Chart {
    pub fn categories(title: impl Into<String>, kind: ChartKind, series: Vec<Series>) -> Self {
        Self {
            title: title.into(),
            kind,
            data: ChartData::Categories(series),
            x_title: None,
            y_title: None,
            y2_title: None,
        }
    }

    pub fn scatter(title: impl Into<String>, points: Vec<XyPoint>) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Scatter,
            data: ChartData::Points(points),
            x_title: None,
            y_title: None,
            y2_title: None,
        }
    }

    pub fn with_axis_titles(
        mut self,
        x: Option<&str>,
        y: Option<&str>,
        y2: Option<&str>,
    ) -> Self {
        self.x_title = x.map(str::to_string);
        self.y_title = y.map(str::to_string);
        self.y2_title = y2.map(str::to_string);
        self
    }

    /// `true` when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Categories(series) => {
                let no_points = series.iter().all(|s| s.points.is_empty());
                let doughnut_without_total = self.kind == ChartKind::Doughnut
                    && series
                        .first()
                        .map_or(true, |s| s.values().all(|v| v <= 0.0));
                no_points || doughnut_without_total
            }
            ChartData::Points(points) => points.is_empty(),
        }
    }

    pub fn series(&self) -> &[Series] {
        match &self.data {
            ChartData::Categories(series) => series,
            ChartData::Points(_) => &[],
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series()
            .first()
            .map(|s| s.points.iter().map(|p| p.label.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn has_secondary_axis(&self) -> bool {
        self.series().iter().any(|s| s.axis == ValueAxis::Secondary)
    }

    /// `(min, max)` of all values plotted against `axis`, if any.
    pub fn value_extent(&self, axis: ValueAxis) -> Option<(f64, f64)> {
        extent(
            self.series()
                .iter()
                .filter(|s| s.axis == axis)
                .flat_map(|s| s.values()),
        )
    }
}

pub(crate) fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Round `[min, max]` out to a zero-based domain with a readable upper bound.
pub fn nice_domain(min: f64, max: f64) -> (f64, f64) {
    let lo = min.min(0.0);
    let hi = max.max(0.0);
    if hi - lo <= f64::EPSILON {
        return (lo, lo + 1.0);
    }
    let lo = if lo < 0.0 { -nice_ceiling(-lo * 1.1) } else { 0.0 };
    let hi = if hi > 0.0 { nice_ceiling(hi * 1.1) } else { 0.0 };
    (lo, hi)
}

/// Smallest of 1, 2, 2.5, 5, 10 × 10^k that is ≥ `value`.
fn nice_ceiling(value: f64) -> f64 {
    let magnitude = 10f64.powf(value.log10().floor());
    let fraction = value / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|step| fraction <= *step + 1e-9)
        .unwrap_or(10.0);
    nice * magnitude
}

/// Tooltip lines for category `index`: the label, then one line per series.
pub fn category_tooltip(chart: &Chart, index: usize) -> Vec<String> {
    let series = chart.series();
    let Some(label) = series.first().and_then(|s| s.points.get(index)) else {
        return Vec::new();
    };
    std::iter::once(label.label.clone())
        .chain(
            series
                .iter()
                .filter_map(|s| s.points.get(index).map(|p| s.describe(p.value))),
        )
        .collect()
}

pub fn point_tooltip(point: &XyPoint) -> Vec<String> {
    vec![
        format!("Distance: {:.2} mi", point.x),
        format!("Fare: {}", format_currency(point.y)),
    ]
}

/// `"Queens: 3 zones (75.0%)"`
pub fn slice_tooltip(series: &Series, index: usize, total: f64) -> String {
    let Some(point) = series.points.get(index) else {
        return String::new();
    };
    let share = if total > 0.0 { point.value / total * 100.0 } else { 0.0 };
    let value = series.format.value(point.value);
    match &series.unit {
        Some(unit) => format!("{}: {} {} ({})", point.label, value, unit, format_percentage(share, 1)),
        None => format!("{}: {} ({})", point.label, value, format_percentage(share, 1)),
    }
}

/// Split the ring between `inner` and `outer` radius from angle `start` to
/// `end` (radians, clockwise on screen) into convex quads.
pub fn ring_segment(
    center: (f64, f64),
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
) -> Vec<[(f64, f64); 4]> {
    let steps = ((end - start).abs() / (std::f64::consts::PI / 36.0)).ceil().max(1.0) as usize;
    let at = |radius: f64, angle: f64| {
        (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
    };
    (0..steps)
        .map(|i| {
            let a0 = start + (end - start) * i as f64 / steps as f64;
            let a1 = start + (end - start) * (i + 1) as f64 / steps as f64;
            [at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)]
        })
        .collect()
}

/// Region of a drawn chart that reacts to the pointer, in logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum HitArea {
    Rect {
        min: (f64, f64),
        max: (f64, f64),
    },
    Ring {
        center: (f64, f64),
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
    },
}

impl HitArea {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            HitArea::Rect { min, max } => x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1,
            HitArea::Ring {
                center,
                inner,
                outer,
                start,
                end,
            } => {
                let (dx, dy) = (x - center.0, y - center.1);
                let radius = dx.hypot(dy);
                if radius < inner || radius > outer {
                    return false;
                }
                // Normalise the pointer angle into [start, start + 2π).
                let mut angle = dy.atan2(dx);
                while angle < start {
                    angle += std::f64::consts::TAU;
                }
                while angle >= start + std::f64::consts::TAU {
                    angle -= std::f64::consts::TAU;
                }
                angle <= end
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
    pub area: HitArea,
    pub lines: Vec<String>,
}

/// A chart strategy: turns a [`Chart`] into pixels on a [`Surface`].
pub trait ChartRenderer: Send {
    fn kind(&self) -> RendererKind;

    /// Draw `chart` on `surface`, replacing whatever the target showed before.
    fn render(
        &mut self,
        target: ChartTarget,
        surface: &mut Surface,
        chart: &Chart,
    ) -> Result<(), ChartError>;

    /// Tooltip lines for a pointer at logical position `(x, y)` on `target`.
    fn tooltip(&self, _target: ChartTarget, _x: f64, _y: f64) -> Option<Vec<String>> {
        None
    }

    /// Switch colors for subsequent renders.
    fn set_theme(&mut self, theme: ChartTheme);

    /// Forget any state bound to `target`.
    fn release(&mut self, _target: ChartTarget) {}
}

/// What a surface currently shows.
#[derive(Clone, Debug, Default)]
pub enum SurfaceContent {
    #[default]
    Blank,
    Bitmap(RgbImage),
    Canvas(Canvas),
}

/// A drawable region with a logical size and a device pixel ratio.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    content: SurfaceContent,
    revision: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: sanitize_ratio(pixel_ratio),
            content: SurfaceContent::Blank,
            revision: 0,
        }
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Size of the backing store in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        backing_size(self.width, self.height, self.pixel_ratio)
    }

    /// Update size and ratio. Returns `true` if anything changed.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> bool {
        let (width, height, pixel_ratio) = (width.max(1), height.max(1), sanitize_ratio(pixel_ratio));
        let changed = (width, height) != (self.width, self.height)
            || (pixel_ratio - self.pixel_ratio).abs() > f64::EPSILON;
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        changed
    }

    pub fn content(&self) -> &SurfaceContent {
        &self.content
    }

    /// Incremented every time new content is presented.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn present(&mut self, content: SurfaceContent) {
        self.content = content;
        self.revision += 1;
    }
}

pub(crate) fn backing_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    (
        ((width as f64) * pixel_ratio).round().max(1.0) as u32,
        ((height as f64) * pixel_ratio).round().max(1.0) as u32,
    )
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Registry of the surfaces currently laid out on screen.
#[derive(Default)]
pub struct Surfaces {
    surfaces: HashMap<ChartTarget, Surface>,
}

impl Surfaces {
    /// Register or resize the surface for `target`.
    ///
    /// Returns `true` when the surface is new or changed size, meaning its
    /// chart must be drawn again.
    pub fn attach(&mut self, target: ChartTarget, width: u32, height: u32, pixel_ratio: f64) -> bool {
        match self.surfaces.get_mut(&target) {
            Some(surface) => surface.resize(width, height, pixel_ratio),
            None => {
                self.surfaces
                    .insert(target, Surface::new(width, height, pixel_ratio));
                true
            }
        }
    }

    pub fn detach(&mut self, target: ChartTarget) -> Option<Surface> {
        self.surfaces.remove(&target)
    }

    pub fn get(&self, target: ChartTarget) -> Option<&Surface> {
        self.surfaces.get(&target)
    }

    /// Draw `chart` on `target` with `renderer`.
    ///
    /// A missing target is not an error: nothing is drawn and `Ok(false)` is
    /// returned.
    pub fn draw(
        &mut self,
        renderer: &mut dyn ChartRenderer,
        target: ChartTarget,
        chart: &Chart,
    ) -> Result<bool, ChartError> {
        let Some(surface) = self.surfaces.get_mut(&target) else {
            debug!("Render target {} missing, skipping draw", target.id());
            return Ok(false);
        };
        renderer.render(target, surface, chart)?;
        Ok(true)
    }
}
