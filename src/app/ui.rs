use chrono::NaiveDate;
use egui::{
    Align2, Color32, ComboBox, Context, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke,
    TextureHandle, TextureOptions, Ui,
};
use plotters::style::RGBAColor;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::controller::{Dashboard, Panel};
use super::state::{Loadable, Section, ToastKind};
use super::view_model::{
    AlgorithmCard, LocationCard, MetricTile, TripRow, VendorCard, VendorRankRow,
};
use crate::api::{SortDirection, SortField};
use crate::config::Theme;
use crate::plotting::canvas::{Canvas, DrawOp, Point, TextAlign};
use crate::plotting::{ChartTarget, SurfaceContent};

const CHART_HEIGHT: f32 = 320.0;
const TRIP_PAGE_SIZES: [usize; 3] = [10, 25, 50];
const LOCATION_PAGE_SIZES: [usize; 3] = [12, 24, 48];
/// Entries offered by the location filter.
const LOCATION_OPTIONS: usize = 50;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The eframe application: the controller plus what only the UI needs.
pub struct DashboardApp {
    dashboard: Dashboard,
    textures: HashMap<ChartTarget, (u64, TextureHandle)>,
    start_input: String,
    end_input: String,
    date_error: Option<String>,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            textures: HashMap::new(),
            start_input: String::new(),
            end_input: String::new(),
            date_error: None,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.dashboard.poll();
        self.dashboard.toasts_mut().prune(Instant::now());

        ctx.set_visuals(match self.dashboard.state().theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        draw_ui(self, ctx);

        if self.dashboard.is_busy() || !self.dashboard.toasts().items().is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Draw the whole window.
pub fn draw_ui(app: &mut DashboardApp, ctx: &Context) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Urban Mobility Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_label = match app.dashboard.state().theme {
                    Theme::Dark => "Light mode",
                    Theme::Light => "Dark mode",
                };
                if ui.button(theme_label).clicked() {
                    app.dashboard.toggle_theme();
                }
                if ui.button("Refresh").clicked() {
                    app.dashboard.refresh();
                }
                if app.dashboard.is_busy() {
                    ui.spinner();
                }
            });
        });
    });

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Sections");
        ui.separator();
        for section in Section::ALL {
            let active = app.dashboard.state().section == section;
            if ui.selectable_label(active, section.title()).clicked() {
                app.dashboard.switch_section(section);
            }
        }
        ui.separator();
        draw_filters(app, ui);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if !app.dashboard.is_revealed() {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            let section = app.dashboard.state().section;
            ui.heading(section.title());
            ui.separator();
            match section {
                Section::Dashboard => draw_dashboard(app, ui),
                Section::Trips => draw_trips(&mut app.dashboard, ui),
                Section::Vendors => draw_vendors(&mut app.dashboard, ui),
                Section::Locations => draw_locations(&mut app.dashboard, ui),
                Section::Insights => draw_insights(&mut app.dashboard, ui),
                Section::Analytics => draw_analytics(app, ui),
            }
        });
    });

    draw_toasts(app, ctx);
}

fn draw_filters(app: &mut DashboardApp, ui: &mut Ui) {
    ui.heading("Filters");

    let vendors: Vec<(String, String)> = app
        .dashboard
        .vendors()
        .ready()
        .map(|vendors| {
            VendorCard::cards(vendors)
                .into_iter()
                .map(|card| (card.vendor_id, card.name))
                .collect()
        })
        .unwrap_or_default();
    let mut vendor = app.dashboard.state().filters.vendor.clone();
    let vendor_text = vendor
        .as_deref()
        .map(|id| app.dashboard.vendor_directory().name_for(id).to_string())
        .unwrap_or_else(|| "All Vendors".to_string());
    ui.label("Vendor:");
    ComboBox::new("vendor_filter", "")
        .selected_text(vendor_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut vendor, None, "All Vendors");
            for (id, name) in &vendors {
                ui.selectable_value(&mut vendor, Some(id.clone()), name);
            }
        });
    app.dashboard.set_vendor(vendor);

    let locations: Vec<(i64, String)> = app
        .dashboard
        .locations()
        .ready()
        .map(|locations| {
            locations
                .iter()
                .take(LOCATION_OPTIONS)
                .map(|l| (l.location_id, LocationCard::option_label(l)))
                .collect()
        })
        .unwrap_or_default();
    let mut location = app.dashboard.state().filters.location;
    let location_text = match location {
        Some(id) => locations
            .iter()
            .find(|(option, _)| *option == id)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| id.to_string()),
        None => "All Locations".to_string(),
    };
    ui.label("Location:");
    ComboBox::new("location_filter", "")
        .selected_text(location_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut location, None, "All Locations");
            for (id, label) in &locations {
                ui.selectable_value(&mut location, Some(*id), label);
            }
        });
    app.dashboard.set_location(location);

    ui.label("Search:");
    let mut search = app.dashboard.search_input().to_string();
    if ui.text_edit_singleline(&mut search).changed() {
        app.dashboard.set_search_input(search);
    }

    ui.label("Start date (YYYY-MM-DD):");
    if ui.text_edit_singleline(&mut app.start_input).lost_focus() {
        match parse_date(&app.start_input) {
            Ok(date) => {
                app.date_error = None;
                app.dashboard.set_start_date(date);
            }
            Err(message) => app.date_error = Some(message),
        }
    }
    ui.label("End date (YYYY-MM-DD):");
    if ui.text_edit_singleline(&mut app.end_input).lost_focus() {
        match parse_date(&app.end_input) {
            Ok(date) => {
                app.date_error = None;
                app.dashboard.set_end_date(date);
            }
            Err(message) => app.date_error = Some(message),
        }
    }
    if let Some(message) = &app.date_error {
        ui.colored_label(Color32::LIGHT_RED, message);
    }

    ui.separator();
    let clearable = app.dashboard.state().has_active_filters();
    if ui
        .add_enabled(clearable, egui::Button::new("Clear filters"))
        .clicked()
    {
        app.start_input.clear();
        app.end_input.clear();
        app.date_error = None;
        app.dashboard.clear_all_filters();
    }
}

fn parse_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", input))
}

/// Owned snapshot of a panel so the UI can act on the controller while
/// drawing it.
enum PanelView<T> {
    Loading,
    Failed(String),
    Ready(T),
}

fn view<T, U>(loadable: &Loadable<T>, f: impl FnOnce(&T) -> U) -> PanelView<U> {
    match loadable {
        Loadable::Idle | Loadable::Loading => PanelView::Loading,
        Loadable::Failed(message) => PanelView::Failed(message.clone()),
        Loadable::Ready(value) => PanelView::Ready(f(value)),
    }
}

/// Inline error card. Returns `true` when Retry was clicked.
fn error_card(ui: &mut Ui, title: &str, message: &str) -> bool {
    let mut retry = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(RichText::new(title).strong().color(Color32::LIGHT_RED));
        ui.label(message);
        retry = ui.button("Retry").clicked();
    });
    retry
}

fn draw_panel<T>(
    dashboard: &mut Dashboard,
    ui: &mut Ui,
    panel: Panel,
    title: &str,
    snapshot: PanelView<T>,
    draw: impl FnOnce(&mut Dashboard, &mut Ui, T),
) {
    match snapshot {
        PanelView::Loading => {
            ui.spinner();
        }
        PanelView::Failed(message) => {
            if error_card(ui, title, &message) {
                dashboard.retry(panel);
            }
        }
        PanelView::Ready(value) => draw(dashboard, ui, value),
    }
}

fn draw_tiles(ui: &mut Ui, tiles: &[MetricTile]) {
    ui.horizontal_wrapped(|ui| {
        for tile in tiles {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(140.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(tile.label).small());
                    ui.label(RichText::new(&tile.value).heading());
                });
            });
        }
    });
}

fn draw_dashboard(app: &mut DashboardApp, ui: &mut Ui) {
    let tiles = view(app.dashboard.metrics(), |m| {
        MetricTile::dashboard(&m.overview, &m.summary)
    });
    draw_panel(
        &mut app.dashboard,
        ui,
        Panel::Metrics,
        "Failed to load metrics",
        tiles,
        |_, ui, tiles| draw_tiles(ui, &tiles),
    );
    ui.add_space(12.0);
    draw_chart(app, ui, ChartTarget::TripVolume);
    ui.add_space(12.0);
    draw_chart(app, ui, ChartTarget::VendorPerformance);
}

fn draw_trips(dashboard: &mut Dashboard, ui: &mut Ui) {
    let rows = view(dashboard.trips(), |trips| TripRow::rows(trips));
    draw_panel(
        dashboard,
        ui,
        Panel::Trips,
        "Failed to load trips",
        rows,
        |dashboard, ui, rows| {
            if rows.is_empty() {
                ui.label("No trips found. Try adjusting your filters or search criteria.");
            } else {
                draw_trip_table(dashboard, ui, &rows);
            }
        },
    );

    ui.separator();
    ui.horizontal(|ui| {
        let page = dashboard.state().trips_page.clone();
        if ui
            .add_enabled(page.has_previous(), egui::Button::new("Previous"))
            .clicked()
        {
            dashboard.change_page(-1);
        }
        ui.label(format!("Page {} · {}", page.page(), page.range_label()));
        if ui
            .add_enabled(page.has_next(), egui::Button::new("Next"))
            .clicked()
        {
            dashboard.change_page(1);
        }
        let mut size = page.page_size();
        ComboBox::new("trips_page_size", "per page")
            .selected_text(size.to_string())
            .show_ui(ui, |ui| {
                for option in TRIP_PAGE_SIZES {
                    ui.selectable_value(&mut size, option, option.to_string());
                }
            });
        dashboard.set_trips_page_size(size);
    });
}

fn draw_trip_table(dashboard: &mut Dashboard, ui: &mut Ui, rows: &[TripRow]) {
    let sort = dashboard.state().sort;
    let columns: [(&str, Option<SortField>); 8] = [
        ("Trip ID", Some(SortField::TripId)),
        ("Vendor", None),
        ("Pickup", Some(SortField::Pickup)),
        ("Dropoff", Some(SortField::Dropoff)),
        ("Distance", Some(SortField::Distance)),
        ("Duration", Some(SortField::Duration)),
        ("Fare", Some(SortField::Fare)),
        ("Speed", Some(SortField::Speed)),
    ];

    egui::Grid::new("trips_table").striped(true).show(ui, |ui| {
        for (title, field) in columns {
            match field {
                Some(field) => {
                    let marker = match sort.as_query() {
                        Some((active, SortDirection::Asc)) if active == field => " ▲",
                        Some((active, SortDirection::Desc)) if active == field => " ▼",
                        _ => "",
                    };
                    if ui.button(format!("{}{}", title, marker)).clicked() {
                        dashboard.handle_sort(field);
                    }
                }
                None => {
                    ui.strong(title);
                }
            }
        }
        ui.end_row();

        for row in rows {
            ui.label(&row.trip_id);
            ui.label(&row.vendor);
            ui.label(&row.pickup);
            ui.label(&row.dropoff);
            ui.label(&row.distance);
            ui.label(&row.duration);
            ui.label(&row.fare);
            ui.label(&row.speed);
            ui.end_row();
        }
    });
}

fn draw_vendors(dashboard: &mut Dashboard, ui: &mut Ui) {
    let cards = view(dashboard.vendors(), |vendors| VendorCard::cards(vendors));
    draw_panel(
        dashboard,
        ui,
        Panel::Vendors,
        "Failed to load vendors",
        cards,
        |dashboard, ui, cards| {
            ui.horizontal_wrapped(|ui| {
                for card in cards {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("#{}", card.rank)).small());
                            ui.strong(&card.name);
                            ui.label(&card.id_label);
                            if ui.button("View Trips").clicked() {
                                dashboard.view_vendor_trips(&card.vendor_id);
                            }
                        });
                    });
                }
            });
        },
    );
}

fn draw_locations(dashboard: &mut Dashboard, ui: &mut Ui) {
    let cards = view(dashboard.locations(), |locations| {
        locations
            .iter()
            .map(LocationCard::from_location)
            .collect::<Vec<_>>()
    });
    draw_panel(
        dashboard,
        ui,
        Panel::Locations,
        "Failed to load locations",
        cards,
        |dashboard, ui, cards| {
            ui.horizontal_wrapped(|ui| {
                for card in cards {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.vertical(|ui| {
                            ui.strong(&card.title);
                            ui.label(format!("Borough: {}", card.borough));
                            ui.label(format!("Zone: {}", card.zone));
                            if ui.button("View Trips").clicked() {
                                dashboard.view_location_trips(card.location_id);
                            }
                        });
                    });
                }
            });
        },
    );

    ui.separator();
    ui.horizontal(|ui| {
        let page = dashboard.state().locations_page.clone();
        if ui
            .add_enabled(page.has_previous(), egui::Button::new("Previous"))
            .clicked()
        {
            dashboard.change_locations_page(-1);
        }
        ui.label(format!("Page {} · {}", page.page(), page.range_label()));
        if ui
            .add_enabled(page.has_next(), egui::Button::new("Next"))
            .clicked()
        {
            dashboard.change_locations_page(1);
        }
        let mut size = page.page_size();
        ComboBox::new("locations_page_size", "per page")
            .selected_text(size.to_string())
            .show_ui(ui, |ui| {
                for option in LOCATION_PAGE_SIZES {
                    ui.selectable_value(&mut size, option, option.to_string());
                }
            });
        dashboard.set_locations_page_size(size);
    });
}

fn draw_insights(dashboard: &mut Dashboard, ui: &mut Ui) {
    ui.strong("System Overview");
    let tiles = view(dashboard.overview(), MetricTile::overview);
    draw_panel(
        dashboard,
        ui,
        Panel::Overview,
        "Failed to load overview",
        tiles,
        |_, ui, tiles| draw_tiles(ui, &tiles),
    );

    ui.add_space(12.0);
    ui.strong("Top Performing Vendors");
    let directory = dashboard.vendor_directory().clone();
    let ranked = view(dashboard.top_vendors(), |vendors| {
        VendorRankRow::ranked(vendors, &directory)
    });
    draw_panel(
        dashboard,
        ui,
        Panel::TopVendors,
        "Failed to load vendor ranking",
        ranked,
        |_, ui, rows| {
            egui::Grid::new("vendor_ranking").striped(true).show(ui, |ui| {
                for row in rows {
                    let rank = RichText::new(row.rank.to_string());
                    ui.label(if row.highlighted { rank.strong() } else { rank });
                    ui.label(&row.name);
                    ui.label(&row.trips);
                    ui.label(&row.revenue);
                    ui.end_row();
                }
            });
        },
    );

    ui.add_space(12.0);
    ui.strong("Custom Algorithm Performance");
    let card = view(dashboard.algorithm(), AlgorithmCard::from_performance);
    draw_panel(
        dashboard,
        ui,
        Panel::Algorithm,
        "Failed to load algorithm performance",
        card,
        |_, ui, card| {
            egui::Grid::new("algorithm_stats").show(ui, |ui| {
                let stats = [
                    ("Algorithm", &card.status),
                    ("Complexity", &card.complexity),
                    ("Trips Analyzed", &card.trips_analyzed),
                    ("Outliers Detected", &card.outliers_detected),
                    ("Outlier Rate", &card.outlier_rate),
                    ("Data Quality Score", &card.quality_score),
                    ("Min Fare", &card.min_fare),
                    ("Max Fare", &card.max_fare),
                    ("Avg Fare", &card.avg_fare),
                ];
                for (label, value) in stats {
                    ui.label(label);
                    ui.strong(value.as_str());
                    ui.end_row();
                }
            });
        },
    );
}

fn draw_analytics(app: &mut DashboardApp, ui: &mut Ui) {
    let tiles = view(app.dashboard.analytics(), |a| {
        MetricTile::analytics(&a.summary, a.peak_hour)
    });
    draw_panel(
        &mut app.dashboard,
        ui,
        Panel::Analytics,
        "Failed to load analytics",
        tiles,
        |_, ui, tiles| draw_tiles(ui, &tiles),
    );
    for target in [
        ChartTarget::DistanceFare,
        ChartTarget::BoroughShare,
        ChartTarget::RevenueAnalysis,
    ] {
        ui.add_space(12.0);
        draw_chart(app, ui, target);
    }
}

/// Lay out the surface of `target`, show whatever it holds and its tooltip.
fn draw_chart(app: &mut DashboardApp, ui: &mut Ui, target: ChartTarget) {
    let state = view(
        app.dashboard
            .chart(target)
            .unwrap_or(&Loadable::Idle),
        |_| (),
    );
    if let PanelView::Failed(message) = &state {
        if error_card(ui, "Failed to load chart", message) {
            app.dashboard.retry(Panel::Chart(target));
        }
        return;
    }

    let size = egui::vec2(ui.available_width().max(1.0), CHART_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let pixels_per_point = ui.ctx().pixels_per_point();
    app.dashboard.attach_surface(
        target,
        rect.width().round() as u32,
        rect.height().round() as u32,
        pixels_per_point as f64,
    );

    let painter = ui.painter_at(rect);
    if let Some(surface) = app.dashboard.surface(target) {
        match surface.content() {
            SurfaceContent::Bitmap(image) => {
                let revision = surface.revision();
                let stale = app
                    .textures
                    .get(&target)
                    .map_or(true, |(seen, _)| *seen != revision);
                if stale {
                    let size = [image.width() as usize, image.height() as usize];
                    let texture = ui.ctx().load_texture(
                        target.id(),
                        egui::ColorImage::from_rgb(size, image.as_raw()),
                        TextureOptions::LINEAR,
                    );
                    app.textures.insert(target, (revision, texture));
                }
                if let Some((_, texture)) = app.textures.get(&target) {
                    painter.image(
                        texture.id(),
                        rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }
            SurfaceContent::Canvas(canvas) => replay(&painter, rect, canvas),
            SurfaceContent::Blank => {}
        }
    }
    if matches!(state, PanelView::Loading) {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Loading...",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
    }

    if let Some(pos) = response.hover_pos() {
        let local = pos - rect.min;
        if let Some(lines) = app.dashboard.tooltip(target, local.x as f64, local.y as f64) {
            response.on_hover_text(lines.join("\n"));
        }
    }
}

/// Paint recorded canvas operations into `rect`. Operations are in device
/// pixels and egui works in points, so every coordinate is divided by the
/// canvas scale.
fn replay(painter: &egui::Painter, rect: Rect, canvas: &Canvas) {
    let scale = canvas.scale().max(f64::EPSILON);
    let to_pos = |p: &Point| {
        Pos2::new(
            rect.min.x + (p.x / scale) as f32,
            rect.min.y + (p.y / scale) as f32,
        )
    };
    let length = |v: f64| (v / scale) as f32;

    for op in canvas.ops() {
        match op {
            DrawOp::Fill(color) => {
                painter.rect_filled(rect, 0.0, color32(color));
            }
            DrawOp::Line {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_pos(from), to_pos(to)],
                    Stroke::new(length(*width), color32(color)),
                );
            }
            DrawOp::Path {
                points,
                color,
                width,
            } => {
                painter.add(Shape::line(
                    points.iter().map(to_pos).collect(),
                    Stroke::new(length(*width), color32(color)),
                ));
            }
            DrawOp::Rect { min, max, color } => {
                painter.rect_filled(
                    Rect::from_min_max(to_pos(min), to_pos(max)),
                    0.0,
                    color32(color),
                );
            }
            DrawOp::Circle {
                center,
                radius,
                color,
            } => {
                painter.circle_filled(to_pos(center), length(*radius), color32(color));
            }
            DrawOp::Polygon { points, color } => {
                painter.add(Shape::convex_polygon(
                    points.iter().map(to_pos).collect(),
                    color32(color),
                    Stroke::NONE,
                ));
            }
            DrawOp::Text {
                at,
                text,
                size,
                color,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    to_pos(at),
                    anchor,
                    text,
                    FontId::proportional(length(*size)),
                    color32(color),
                );
            }
        }
    }
}

fn color32(color: &RGBAColor) -> Color32 {
    let alpha = (color.3.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.0, color.1, color.2, alpha)
}

fn draw_toasts(app: &mut DashboardApp, ctx: &Context) {
    if app.dashboard.toasts().items().is_empty() {
        return;
    }
    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            for (index, toast) in app.dashboard.toasts().items().iter().enumerate() {
                let fill = match toast.kind {
                    ToastKind::Info => Color32::from_rgb(37, 99, 235),
                    ToastKind::Success => Color32::from_rgb(22, 163, 74),
                    ToastKind::Error => Color32::from_rgb(220, 38, 38),
                };
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&toast.message).color(Color32::WHITE));
                        if ui.small_button("x").clicked() {
                            dismissed = Some(index);
                        }
                    });
                });
            }
        });
    if let Some(index) = dismissed {
        app.dashboard.toasts_mut().dismiss(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date("  "), Ok(None));
        assert_eq!(
            parse_date("2024-01-31"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 31))
        );
        assert!(parse_date("31/01/2024").is_err());
    }

    #[test]
    fn test_color_conversion() {
        let color = color32(&RGBAColor(10, 20, 30, 0.5));
        assert_eq!(color, Color32::from_rgba_unmultiplied(10, 20, 30, 128));
    }
}
