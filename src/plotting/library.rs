//! Library-bound chart renderer.
//!
//! A [`Chart`] is first compiled into a declarative [`ChartSpec`] (datasets,
//! colors, axes, tooltip callback) which is then drawn with plotters into an
//! RGB bitmap. Each target keeps exactly one live chart.

use image::RgbImage;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::canvas::NO_DATA_MESSAGE;
use super::chart::{
    category_tooltip, extent, nice_domain, point_tooltip, ring_segment, slice_tooltip, Chart,
    ChartData, ChartError, ChartKind, ChartRenderer, ChartTarget, HitArea, Mark, RendererKind,
    Surface, SurfaceContent, ValueAxis, ValueFormat,
};
use super::styles::{ChartStyle, ChartTheme};
use crate::types::XyPoint;

const MAX_X_LABELS: usize = 12;
const Y_LABELS: usize = 6;
/// Share of a category band covered by its bars
const BAR_GROUP_WIDTH: f64 = 0.8;

/// What the pointer is over when a tooltip is requested: a category, a
/// scatter point or a doughnut slice, by position in the spec's data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TooltipContext {
    pub index: usize,
}

pub type TooltipFn = Box<dyn Fn(&TooltipContext) -> Vec<String> + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSpec {
    pub label: String,
    pub data: Vec<f64>,
    pub mark: Mark,
    pub axis: ValueAxis,
    pub color: RGBAColor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    pub title: Option<String>,
    pub domain: (f64, f64),
    pub format: ValueFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxesSpec {
    pub x: AxisSpec,
    pub y: AxisSpec,
    /// Present only for dual-axis charts
    pub y2: Option<AxisSpec>,
}

/// Declarative chart configuration handed to the plotting library.
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetSpec>,
    pub points: Vec<XyPoint>,
    pub axes: AxesSpec,
    pub tooltip: TooltipFn,
    empty: bool,
}

impl ChartSpec {
    /// Translate a chart into its declarative form using `theme`'s palette.
    pub fn compile(chart: &Chart, theme: &ChartTheme) -> Self {
        let labels: Vec<String> = chart.labels().into_iter().map(str::to_string).collect();
        let datasets: Vec<DatasetSpec> = chart
            .series()
            .iter()
            .enumerate()
            .map(|(i, series)| DatasetSpec {
                label: series.name.clone(),
                data: series.values().collect(),
                mark: series.mark,
                axis: series.axis,
                color: theme.series_color(i),
            })
            .collect();

        let axis_format = |axis: ValueAxis| {
            chart
                .series()
                .iter()
                .find(|s| s.axis == axis)
                .map_or(ValueFormat::Count, |s| s.format)
        };
        let value_axis = |axis: ValueAxis, title: &Option<String>| {
            let (lo, hi) = chart.value_extent(axis).unwrap_or((0.0, 0.0));
            AxisSpec {
                title: title.clone(),
                domain: nice_domain(lo, hi),
                format: axis_format(axis),
            }
        };

        let (points, axes, tooltip): (Vec<XyPoint>, AxesSpec, TooltipFn) = match &chart.data {
            ChartData::Points(points) => {
                let (x_lo, x_hi) = extent(points.iter().map(|p| p.x)).unwrap_or((0.0, 0.0));
                let (y_lo, y_hi) = extent(points.iter().map(|p| p.y)).unwrap_or((0.0, 0.0));
                let owned = points.clone();
                let tooltip: TooltipFn = Box::new(move |ctx: &TooltipContext| {
                    owned.get(ctx.index).map(point_tooltip).unwrap_or_default()
                });
                (
                    points.clone(),
                    AxesSpec {
                        x: AxisSpec {
                            title: chart.x_title.clone(),
                            domain: nice_domain(x_lo, x_hi),
                            format: ValueFormat::Decimal,
                        },
                        y: AxisSpec {
                            title: chart.y_title.clone(),
                            domain: nice_domain(y_lo, y_hi),
                            format: ValueFormat::Currency,
                        },
                        y2: None,
                    },
                    tooltip,
                )
            }
            ChartData::Categories(series) => {
                let tooltip: TooltipFn = if chart.kind == ChartKind::Doughnut {
                    let first = series.first().cloned();
                    let total: f64 = first
                        .as_ref()
                        .map(|s| s.values().filter(|v| *v > 0.0).sum())
                        .unwrap_or(0.0);
                    Box::new(move |ctx: &TooltipContext| {
                        first
                            .as_ref()
                            .map(|s| vec![slice_tooltip(s, ctx.index, total)])
                            .unwrap_or_default()
                    })
                } else {
                    let chart = chart.clone();
                    Box::new(move |ctx: &TooltipContext| category_tooltip(&chart, ctx.index))
                };
                let n = labels.len() as f64;
                (
                    Vec::new(),
                    AxesSpec {
                        x: AxisSpec {
                            title: chart.x_title.clone(),
                            domain: (-0.5, n - 0.5),
                            format: ValueFormat::Count,
                        },
                        y: value_axis(ValueAxis::Primary, &chart.y_title),
                        y2: chart
                            .has_secondary_axis()
                            .then(|| value_axis(ValueAxis::Secondary, &chart.y2_title)),
                    },
                    tooltip,
                )
            }
        };

        Self {
            kind: chart.kind,
            title: chart.title.clone(),
            labels,
            datasets,
            points,
            axes,
            tooltip,
            empty: chart.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

struct LiveChart {
    spec: ChartSpec,
    /// Pointer regions in logical pixels, with the data index they describe
    hits: Vec<(HitArea, usize)>,
}

/// Draws charts through plotters' bitmap backend.
pub struct LibraryRenderer {
    theme: ChartTheme,
    style: ChartStyle,
    live: HashMap<ChartTarget, LiveChart>,
}

impl LibraryRenderer {
    pub fn new(theme: ChartTheme) -> Self {
        Self {
            theme,
            style: ChartStyle::default(),
            live: HashMap::new(),
        }
    }

    /// Number of targets that currently have a chart bound to them.
    pub fn live_charts(&self) -> usize {
        self.live.len()
    }

    /// Title of the chart bound to `target`, if any.
    pub fn live_title(&self, target: ChartTarget) -> Option<&str> {
        self.live.get(&target).map(|live| live.spec.title.as_str())
    }
}

impl ChartRenderer for LibraryRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Library
    }

    fn render(
        &mut self,
        target: ChartTarget,
        surface: &mut Surface,
        chart: &Chart,
    ) -> Result<(), ChartError> {
        let fresh = LiveChart {
            spec: ChartSpec::compile(chart, &self.theme),
            hits: Vec::new(),
        };
        let live = match self.live.entry(target) {
            Entry::Occupied(mut entry) => {
                debug!(
                    "Destroying chart '{}' on {}",
                    entry.get().spec.title,
                    target.id()
                );
                entry.insert(fresh);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(fresh),
        };

        let (width, height) = surface.backing_size();
        let ratio = surface.pixel_ratio();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let painter = Painter {
                theme: &self.theme,
                style: &self.style,
                ratio,
            };
            live.hits = painter.draw(&root, &live.spec)?;
            root.present()?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Backend("bitmap buffer size mismatch".to_string()))?;
        surface.present(SurfaceContent::Bitmap(image));
        debug!("Drew {} on {}", live.spec.title, target.id());
        Ok(())
    }

    fn set_theme(&mut self, theme: ChartTheme) {
        self.theme = theme;
    }

    fn tooltip(&self, target: ChartTarget, x: f64, y: f64) -> Option<Vec<String>> {
        let live = self.live.get(&target)?;
        let (_, index) = live.hits.iter().find(|(area, _)| area.contains(x, y))?;
        let lines = (live.spec.tooltip)(&TooltipContext { index: *index });
        (!lines.is_empty()).then_some(lines)
    }

    fn release(&mut self, target: ChartTarget) {
        if let Some(live) = self.live.remove(&target) {
            debug!("Destroying chart '{}' on {}", live.spec.title, target.id());
        }
    }
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Hits = Vec<(HitArea, usize)>;

/// Draws one spec at a given device pixel ratio.
struct Painter<'t> {
    theme: &'t ChartTheme,
    style: &'t ChartStyle,
    ratio: f64,
}

impl Painter<'_> {
    fn px(&self, logical: f64) -> u32 {
        (logical * self.ratio).round().max(1.0) as u32
    }

    fn font(&self, size: f64, color: &RGBAColor) -> TextStyle<'static> {
        ("sans-serif", size * self.ratio).into_font().color(color)
    }

    fn logical(&self, (x, y): (i32, i32)) -> (f64, f64) {
        (x as f64 / self.ratio, y as f64 / self.ratio)
    }

    fn draw(&self, root: &Root<'_>, spec: &ChartSpec) -> Result<Hits, ChartError> {
        root.fill(&self.theme.background_color)?;
        if spec.is_empty() {
            let (w, h) = root.dim_in_pixel();
            let style = self
                .font(self.style.title_size, &self.theme.muted_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(NO_DATA_MESSAGE, (w as i32 / 2, h as i32 / 2), style))?;
            return Ok(Vec::new());
        }
        match spec.kind {
            ChartKind::Doughnut => self.draw_doughnut(root, spec),
            ChartKind::Scatter => self.draw_scatter(root, spec),
            ChartKind::Line | ChartKind::Bar | ChartKind::Combo => self.draw_categories(root, spec),
        }
    }

    fn draw_categories(&self, root: &Root<'_>, spec: &ChartSpec) -> Result<Hits, ChartError> {
        let n = spec.labels.len();
        let x_range = spec.axes.x.domain.0..spec.axes.x.domain.1;
        let (y_lo, y_hi) = spec.axes.y.domain;
        let (y2_lo, y2_hi) = spec.axes.y2.as_ref().map_or((y_lo, y_hi), |axis| axis.domain);
        let label_area = self.px(self.style.label_area_size);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, self.font(self.style.title_size, &self.theme.text_color))
            .margin(self.px(self.style.margin))
            .x_label_area_size(label_area)
            .y_label_area_size(label_area)
            .right_y_label_area_size(if spec.axes.y2.is_some() { label_area } else { 0 })
            .build_cartesian_2d(x_range.clone(), y_lo..y_hi)?
            .set_secondary_coord(x_range, y2_lo..y2_hi);

        let label_font = self.font(self.style.font_size, &self.theme.muted_color);
        let labels = &spec.labels;
        let x_formatter = |x: &f64| category_label(labels, *x);
        let y_format = spec.axes.y.format;
        let y_formatter = move |y: &f64| y_format.tick(*y);

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .label_style(label_font.clone())
            .x_labels(n.min(MAX_X_LABELS))
            .y_labels(Y_LABELS)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter);
        if let Some(title) = &spec.axes.x.title {
            mesh.x_desc(title.as_str());
        }
        if let Some(title) = &spec.axes.y.title {
            mesh.y_desc(title.as_str());
        }
        mesh.draw()?;

        if let Some(axis) = &spec.axes.y2 {
            let y2_format = axis.format;
            let y2_formatter = move |y: &f64| y2_format.tick(*y);
            let mut secondary = chart.configure_secondary_axes();
            secondary
                .axis_style(self.theme.axis_color)
                .label_style(label_font.clone())
                .y_labels(Y_LABELS)
                .y_label_formatter(&y2_formatter);
            if let Some(title) = &axis.title {
                secondary.y_desc(title.as_str());
            }
            secondary.draw()?;
        }

        let bar_count = spec.datasets.iter().filter(|d| d.mark == Mark::Bar).count();
        let bar_width = BAR_GROUP_WIDTH / bar_count.max(1) as f64;
        let bars = spec.datasets.iter().filter(|d| d.mark == Mark::Bar);
        for (slot, dataset) in bars.enumerate() {
            let color = dataset.color;
            let rects = dataset.data.iter().enumerate().map(move |(i, value)| {
                let x0 = i as f64 - BAR_GROUP_WIDTH / 2.0 + bar_width * slot as f64;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, *value)], color.mix(0.8).filled())
            });
            let anno = match dataset.axis {
                ValueAxis::Primary => chart.draw_series(rects)?,
                ValueAxis::Secondary => chart.draw_secondary_series(rects)?,
            };
            anno.label(dataset.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        let stroke = self.px(self.style.line_width);
        let radius = self.px(self.style.marker_radius);
        for dataset in spec.datasets.iter().filter(|d| d.mark == Mark::Line) {
            let color = dataset.color;
            let points: Vec<(f64, f64)> = dataset
                .data
                .iter()
                .enumerate()
                .map(|(i, value)| (i as f64, *value))
                .collect();
            let line = LineSeries::new(points.clone(), color.stroke_width(stroke));
            let markers = points
                .into_iter()
                .map(move |point| Circle::new(point, radius, color.filled()));
            let anno = match dataset.axis {
                ValueAxis::Primary => {
                    chart.draw_series(markers)?;
                    chart.draw_series(line)?
                }
                ValueAxis::Secondary => {
                    chart.draw_secondary_series(markers)?;
                    chart.draw_secondary_series(line)?
                }
            };
            anno.label(dataset.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(stroke))
            });
        }

        if spec.datasets.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(self.theme.background_color.mix(0.85))
                .border_style(self.theme.axis_color)
                .label_font(self.font(self.style.font_size, &self.theme.text_color))
                .draw()?;
        }

        Ok((0..n)
            .map(|i| {
                let min = self.logical(chart.backend_coord(&(i as f64 - 0.5, y_hi)));
                let max = self.logical(chart.backend_coord(&(i as f64 + 0.5, y_lo)));
                (HitArea::Rect { min, max }, i)
            })
            .collect())
    }

    fn draw_scatter(&self, root: &Root<'_>, spec: &ChartSpec) -> Result<Hits, ChartError> {
        let (x_lo, x_hi) = spec.axes.x.domain;
        let (y_lo, y_hi) = spec.axes.y.domain;
        let label_area = self.px(self.style.label_area_size);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, self.font(self.style.title_size, &self.theme.text_color))
            .margin(self.px(self.style.margin))
            .set_all_label_area_size(label_area)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        let x_format = spec.axes.x.format;
        let y_format = spec.axes.y.format;
        let x_formatter = move |x: &f64| x_format.tick(*x);
        let y_formatter = move |y: &f64| y_format.tick(*y);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .label_style(self.font(self.style.font_size, &self.theme.muted_color))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter);
        if let Some(title) = &spec.axes.x.title {
            mesh.x_desc(title.as_str());
        }
        if let Some(title) = &spec.axes.y.title {
            mesh.y_desc(title.as_str());
        }
        mesh.draw()?;

        let color = self.theme.series_color(0);
        let radius = self.px(self.style.marker_radius);
        chart.draw_series(
            spec.points
                .iter()
                .map(|p| Circle::new((p.x, p.y), radius, color.mix(0.6).filled())),
        )?;

        let reach = self.style.marker_radius;
        Ok(spec
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let (x, y) = self.logical(chart.backend_coord(&(p.x, p.y)));
                let area = HitArea::Rect {
                    min: (x - reach, y - reach),
                    max: (x + reach, y + reach),
                };
                (area, i)
            })
            .collect())
    }

    fn draw_doughnut(&self, root: &Root<'_>, spec: &ChartSpec) -> Result<Hits, ChartError> {
        let (w, h) = root.dim_in_pixel();
        let (w, h) = (w as f64 / self.ratio, h as f64 / self.ratio);
        let margin = self.style.margin;

        let title_style = self
            .font(self.style.title_size, &self.theme.text_color)
            .pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(
            spec.title.as_str(),
            self.device((w / 2.0, margin)),
            title_style,
        ))?;

        let top = margin * 2.0 + self.style.title_size;
        let legend_width = (w * 0.3).min(160.0);
        let center = ((w - legend_width) / 2.0, (h + top) / 2.0);
        let outer = ((w - legend_width).min(h - top) / 2.0 - margin).max(4.0);
        let inner = outer * 0.6;

        let Some(dataset) = spec.datasets.first() else {
            return Ok(Vec::new());
        };
        let total: f64 = dataset.data.iter().filter(|v| **v > 0.0).sum();
        let mut angle = -std::f64::consts::FRAC_PI_2;
        let mut hits = Vec::new();
        for (i, value) in dataset.data.iter().enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let sweep = value / total * std::f64::consts::TAU;
            let color = self.theme.series_color(i);
            for quad in ring_segment(center, inner, outer, angle, angle + sweep) {
                let corners: Vec<(i32, i32)> = quad.iter().map(|p| self.device(*p)).collect();
                root.draw(&Polygon::new(corners, color.filled()))?;
            }
            hits.push((
                HitArea::Ring {
                    center,
                    inner,
                    outer,
                    start: angle,
                    end: angle + sweep,
                },
                i,
            ));
            angle += sweep;
        }

        let row = self.style.font_size * 1.6;
        let swatch = self.style.font_size * 0.8;
        let legend_style = self
            .font(self.style.font_size, &self.theme.text_color)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (i, label) in spec.labels.iter().enumerate() {
            let (x, y) = (w - legend_width, top + row * i as f64);
            root.draw(&Rectangle::new(
                [
                    self.device((x, y - swatch / 2.0)),
                    self.device((x + swatch, y + swatch / 2.0)),
                ],
                self.theme.series_color(i).filled(),
            ))?;
            root.draw(&Text::new(
                label.as_str(),
                self.device((x + swatch + 6.0, y)),
                legend_style.clone(),
            ))?;
        }
        Ok(hits)
    }

    fn device(&self, (x, y): (f64, f64)) -> (i32, i32) {
        ((x * self.ratio).round() as i32, (y * self.ratio).round() as i32)
    }
}

/// Label of the category at integer position `x`; blank between categories.
fn category_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::chart::Series;
    use crate::types::SeriesPoint;
    use pretty_assertions::assert_eq;

    fn revenue_chart() -> Chart {
        let points = |values: [f64; 3]| {
            ["HV0002", "HV0003", "HV0005"]
                .iter()
                .zip(values)
                .map(|(label, value)| SeriesPoint::new(*label, value))
                .collect::<Vec<_>>()
        };
        Chart::categories(
            "Revenue Analysis",
            ChartKind::Combo,
            vec![
                Series::new("Total Revenue", points([12_000.0, 48_500.0, 30_250.0]), Mark::Bar)
                    .formatted(ValueFormat::CompactCurrency),
                Series::new("Avg Fare", points([18.5, 22.0, 19.75]), Mark::Line)
                    .on_axis(ValueAxis::Secondary)
                    .formatted(ValueFormat::Currency),
            ],
        )
        .with_axis_titles(None, Some("Revenue"), Some("Average Fare"))
    }

    #[test]
    fn test_compile_dual_axis_spec() {
        let theme = ChartTheme::dark();
        let spec = ChartSpec::compile(&revenue_chart(), &theme);

        assert_eq!(spec.kind, ChartKind::Combo);
        assert_eq!(spec.labels, vec!["HV0002", "HV0003", "HV0005"]);
        assert_eq!(spec.datasets.len(), 2);
        assert_eq!(spec.datasets[0].color, theme.series_color(0));
        assert_eq!(spec.datasets[1].color, theme.series_color(1));
        assert_eq!(spec.datasets[1].axis, ValueAxis::Secondary);

        assert_eq!(spec.axes.x.domain, (-0.5, 2.5));
        assert_eq!(spec.axes.y.domain, (0.0, 100_000.0));
        assert_eq!(spec.axes.y.format, ValueFormat::CompactCurrency);
        let y2 = spec.axes.y2.as_ref().unwrap();
        assert_eq!(y2.domain, (0.0, 25.0));
        assert_eq!(y2.title.as_deref(), Some("Average Fare"));
        assert!(!spec.is_empty());
    }

    #[test]
    fn test_tooltip_callbacks() {
        let theme = ChartTheme::dark();
        let spec = ChartSpec::compile(&revenue_chart(), &theme);
        assert_eq!(
            (spec.tooltip)(&TooltipContext { index: 1 }),
            vec!["HV0003", "Total Revenue: $48,500.00", "Avg Fare: $22.00"]
        );

        let doughnut = Chart::categories(
            "Zones by Borough",
            ChartKind::Doughnut,
            vec![Series::new(
                "Zones",
                vec![
                    SeriesPoint::new("Manhattan", 69.0),
                    SeriesPoint::new("Brooklyn", 61.0),
                    SeriesPoint::new("EWR", 1.0),
                    SeriesPoint::new("Unknown", 0.0),
                ],
                Mark::Bar,
            )
            .with_unit("zones")],
        );
        let spec = ChartSpec::compile(&doughnut, &theme);
        assert_eq!(
            (spec.tooltip)(&TooltipContext { index: 0 }),
            vec!["Manhattan: 69 zones (52.7%)"]
        );

        let scatter = Chart::scatter("Distance vs Fare", vec![XyPoint { x: 2.5, y: 14.2 }]);
        let spec = ChartSpec::compile(&scatter, &theme);
        assert_eq!(
            (spec.tooltip)(&TooltipContext { index: 0 }),
            vec!["Distance: 2.50 mi", "Fare: $14.20"]
        );
        assert!((spec.tooltip)(&TooltipContext { index: 3 }).is_empty());
        assert_eq!(spec.axes.y.format, ValueFormat::Currency);
    }

    #[test]
    fn test_one_live_chart_per_target() {
        let mut renderer = LibraryRenderer::new(ChartTheme::dark());
        let mut surface = Surface::new(320, 240, 1.0);
        let first = Chart::categories("First", ChartKind::Line, vec![]);
        let second = revenue_chart();

        // Text rendering depends on system fonts; the binding must not.
        let _ = renderer.render(ChartTarget::RevenueAnalysis, &mut surface, &first);
        let _ = renderer.render(ChartTarget::RevenueAnalysis, &mut surface, &second);
        assert_eq!(renderer.live_charts(), 1);
        assert_eq!(
            renderer.live_title(ChartTarget::RevenueAnalysis),
            Some("Revenue Analysis")
        );

        let _ = renderer.render(ChartTarget::TripVolume, &mut surface, &first);
        assert_eq!(renderer.live_charts(), 2);

        renderer.release(ChartTarget::RevenueAnalysis);
        assert_eq!(renderer.live_charts(), 1);
        assert!(renderer.tooltip(ChartTarget::RevenueAnalysis, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_category_labels_only_on_integers() {
        let labels = vec!["00:00".to_string(), "01:00".to_string()];
        assert_eq!(category_label(&labels, 1.0), "01:00");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }
}
