//! Plotters drawing routines. Each chart is rendered to an in-memory SVG string.

use crate::error::RenderError;
use chrono::{NaiveDate, TimeDelta};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_svg::SVGBackend;

use super::text::truncate_to_width;
use super::util::{compute_left_label_area_px, office_color, padded_range};

const MARGIN: u32 = 16;
const LABEL_FONT_PX: u32 = 12;
const MAX_LABEL_PX: u32 = 300;

fn draw_err<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Draw(format!("{e:?}"))
}

/// Run `draw` on a white SVG canvas and return the SVG markup.
pub fn render_svg<F>(size: (u32, u32), draw: F) -> Result<String, RenderError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), RenderError>,
{
    super::ensure_fonts_registered();
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        draw(&root)?;
        root.present().map_err(draw_err)?;
    }
    Ok(buf)
}

/// Horizontal bar chart, first entry on top.
pub fn draw_horizontal_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    bars: &[(String, usize)],
    color: RGBAColor,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    if bars.is_empty() {
        return Err(RenderError::NoSightings);
    }
    // Plotters puts segment 0 at the bottom.
    let ordered: Vec<&(String, usize)> = bars.iter().rev().collect();
    let labels: Vec<String> = ordered
        .iter()
        .map(|(l, _)| truncate_to_width(l, LABEL_FONT_PX, MAX_LABEL_PX))
        .collect();
    let n = ordered.len() as u32;
    let max = ordered.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(
            LabelAreaPosition::Left,
            compute_left_label_area_px(&labels, LABEL_FONT_PX),
        )
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(0u32..(max + 1), (0u32..n).into_segmented())
        .map_err(draw_err)?;

    let y_label_fmt = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_labels(n as usize)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(ordered.iter().enumerate().map(|(i, (_, c))| {
            let i = i as u32;
            Rectangle::new(
                [
                    (0u32, SegmentValue::Exact(i)),
                    (*c as u32, SegmentValue::Exact(i + 1)),
                ],
                color.mix(0.85).filled(),
            )
        }))
        .map_err(draw_err)?;
    Ok(())
}

/// Scatter of `(longitude, latitude)` pairs.
pub fn draw_location_map<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    points: &[(f64, f64)],
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let (x_min, x_max) =
        padded_range(points.iter().map(|p| p.0)).ok_or(RenderError::NoSightings)?;
    let (y_min, y_max) =
        padded_range(points.iter().map(|p| p.1)).ok_or(RenderError::NoSightings)?;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 72)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(draw_err)?;

    let coord_fmt = |v: &f64| format!("{v:.3}");
    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&coord_fmt)
        .y_label_formatter(&coord_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(draw_err)?;

    let color = office_color(5);
    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 5, color.mix(0.6).filled())),
        )
        .map_err(draw_err)?;
    Ok(())
}

/// Records per day as line + markers. `days` must be ascending.
pub fn draw_daily_counts<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    days: &[(NaiveDate, usize)],
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let (first, last) = match (days.first(), days.last()) {
        (Some(f), Some(l)) => (f.0, l.0),
        _ => return Err(RenderError::NoSightings),
    };
    let span = (last - first).num_days().max(0);
    let series: Vec<(f64, f64)> = days
        .iter()
        .map(|(d, c)| ((*d - first).num_days() as f64, *c as f64))
        .collect();
    let y_max = days.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64 + 1.0;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 56)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(-0.5f64..(span as f64 + 0.5), 0f64..y_max)
        .map_err(draw_err)?;

    let x_label_fmt = |x: &f64| {
        let r = x.round();
        if (x - r).abs() > 1e-6 || r < 0.0 {
            return String::new();
        }
        first
            .checked_add_signed(TimeDelta::days(r as i64))
            .map(|d| d.format("%b %d").to_string())
            .unwrap_or_default()
    };
    let y_label_fmt = |y: &f64| {
        if (y - y.round()).abs() > 1e-6 {
            String::new()
        } else {
            format!("{y:.0}")
        }
    };
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Sightings")
        .x_labels(((span + 1) as usize).min(12))
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(draw_err)?;

    let color = office_color(0);
    let style = ShapeStyle {
        color,
        filled: false,
        stroke_width: 2,
    };
    chart
        .draw_series(LineSeries::new(series.clone(), style))
        .map_err(draw_err)?;
    chart
        .draw_series(
            series
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
        )
        .map_err(draw_err)?;
    Ok(())
}

/// Two-slice pie of public vs private records. Zero slices are left out.
pub fn draw_privacy_pie<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    public: usize,
    private: usize,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let mut sizes: Vec<f64> = Vec::new();
    let mut colors: Vec<RGBColor> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    for (name, n, color) in [
        ("Public", public, RGBColor(68, 114, 196)),
        ("Private", private, RGBColor(237, 125, 49)),
    ] {
        if n > 0 {
            sizes.push(n as f64);
            colors.push(color);
            labels.push(format!("{name} property ({n})"));
        }
    }
    if sizes.is_empty() {
        return Err(RenderError::NoSightings);
    }

    let area = root
        .titled(title, (FontFamily::SansSerif, 24))
        .map_err(draw_err)?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FontFamily::SansSerif, 16).into_font().color(&BLACK));
    pie.percentages((FontFamily::SansSerif, 14).into_font().color(&WHITE));
    area.draw(&pie).map_err(draw_err)?;
    Ok(())
}
