use eframe::egui::{self, Color32, Pos2, RichText, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::data::view;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Charts section (central panel)
// ---------------------------------------------------------------------------

/// Render all charts for the current filtered table.
pub fn charts_section(ui: &mut Ui, state: &AppState) {
    if state.filtered.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No papers match the current filters");
        });
        return;
    }

    ui.heading("Publication Trends");
    timeline_chart(ui, state);

    ui.columns(2, |cols| {
        subheading(&mut cols[0], "Top Publishing Journals");
        journal_chart(&mut cols[0], state);
        subheading(&mut cols[1], "Source Distribution");
        source_pie(&mut cols[1], state);
    });

    ui.heading("Abstract Analysis");
    ui.columns(2, |cols| {
        subheading(&mut cols[0], "Abstract Word Counts");
        abstract_histogram(&mut cols[0], state);
        subheading(&mut cols[1], "Average Length Over Time");
        length_trend(&mut cols[1], state);
    });
}

fn subheading(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).strong());
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn timeline_chart(ui: &mut Ui, state: &AppState) {
    let range = (state.selection.year_min, state.selection.year_max);
    let series = view::timeline(&state.filtered, range);

    let points: PlotPoints = series
        .iter()
        .map(|&(year, count)| [f64::from(year), count as f64])
        .collect();
    let markers: PlotPoints = series
        .iter()
        .map(|&(year, count)| [f64::from(year), count as f64])
        .collect();

    Plot::new("timeline")
        .height(220.0)
        .x_axis_label("Year")
        .y_axis_label("Papers")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Publications")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(markers)
                    .shape(MarkerShape::Circle)
                    .radius(4.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

fn journal_chart(ui: &mut Ui, state: &AppState) {
    let ranked = view::journal_chart(&state.filtered, state.top_n_journals);
    let axis_labels: Vec<String> = ranked.iter().map(|(j, _)| j.clone()).collect();

    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, (journal, count))| {
            Bar::new(i as f64, *count as f64)
                .name(journal)
                .fill(Color32::from_rgb(95, 145, 220))
        })
        .collect();

    Plot::new("journals")
        .height(260.0)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if (mark.value - idx as f64).abs() < 0.25 {
                axis_labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_axis_label("Papers")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.6));
        });
}

fn abstract_histogram(ui: &mut Ui, state: &AppState) {
    let bins = view::abstract_histogram(&state.filtered, 30);
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let center = (b.lo + b.hi) / 2.0;
            Bar::new(center, b.count as f64)
                .width((b.hi - b.lo).max(1.0) * 0.95)
                .fill(Color32::from_rgb(120, 180, 140))
        })
        .collect();

    Plot::new("abstract_hist")
        .height(220.0)
        .x_axis_label("Word count")
        .y_axis_label("Papers")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn length_trend(ui: &mut Ui, state: &AppState) {
    let series = view::yearly_mean_abstract_len(&state.filtered);
    let points: PlotPoints = series
        .iter()
        .map(|&(year, mean)| [f64::from(year), mean])
        .collect();

    Plot::new("length_trend")
        .height(220.0)
        .x_axis_label("Year")
        .y_axis_label("Avg words")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .color(Color32::from_rgb(220, 150, 90))
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Source pie (hand-painted; egui_plot has no pie primitive)
// ---------------------------------------------------------------------------

fn source_pie(ui: &mut Ui, state: &AppState) {
    let slices = view::source_pie(&state.filtered);
    if slices.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::splat(200.0), egui::Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let mut angle = -std::f32::consts::FRAC_PI_2;
        for slice in &slices {
            let sweep = (slice.fraction as f32) * std::f32::consts::TAU;
            let color = state.source_colors.color_for(&slice.source);

            // Triangle-fan approximation of the wedge.
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut points: Vec<Pos2> = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let a = angle + sweep * (s as f32 / steps as f32);
                points.push(center + Vec2::new(a.cos(), a.sin()) * radius);
            }
            painter.add(egui::Shape::convex_polygon(
                points,
                color,
                Stroke::new(1.0, Color32::BLACK),
            ));
            angle += sweep;
        }

        // Legend
        ui.vertical(|ui: &mut Ui| {
            for slice in &slices {
                let color = state.source_colors.color_for(&slice.source);
                ui.label(
                    RichText::new(format!(
                        "{} – {} ({:.1}%)",
                        slice.source,
                        slice.count,
                        slice.fraction * 100.0
                    ))
                    .color(color),
                );
            }
        });
    });
}
