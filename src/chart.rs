// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ChartData;
use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

pub const DEFAULT_SIZE: (u32, u32) = (960, 480);

/// Render the chart as an SVG document.
pub fn render_svg(title: &str, chart: &ChartData, size: (u32, u32)) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw(&root, title, chart)?;
    }
    Ok(buf)
}

/// Render the chart into a PNG file.
pub fn render_png(path: &Path, title: &str, chart: &ChartData, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw(&root, title, chart)
}

/// Runs of consecutive present points; a `None` ends a run.
fn segments(points: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut cur = Vec::new();
    for (i, p) in points.iter().enumerate() {
        match p {
            Some(v) => cur.push((i as f64, *v)),
            None if !cur.is_empty() => out.push(std::mem::take(&mut cur)),
            None => {}
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, title: &str, chart: &ChartData) -> Result<()> {
    let (lo, hi) = chart
        .price_range()
        .ok_or_else(|| anyhow!("No price data to chart for {}", title))?;
    let lo = lo.to_f64().unwrap_or(0.0);
    let hi = hi.to_f64().unwrap_or(0.0);
    let padding = ((hi - lo) * 0.1).max(1.0);
    let y_min = (lo - padding).max(0.0);
    let y_max = hi + padding;
    let x_max = chart.dates.len().saturating_sub(1).max(1) as f64;

    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill canvas: {}", e))?;

    let mut ctx = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..x_max + 0.5, y_min..y_max)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    let dates = &chart.dates;
    let date_label = |x: &f64| -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        dates.get(idx as usize).cloned().unwrap_or_default()
    };
    let price_label = |y: &f64| crate::utils::fmt_rupiah(&rust_decimal::Decimal::from(y.round() as i64));

    ctx.configure_mesh()
        .x_labels(dates.len().clamp(2, 12))
        .x_label_formatter(&date_label)
        .y_label_formatter(&price_label)
        .x_desc("Date")
        .y_desc("Price")
        .draw()
        .map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;

    for (i, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points: Vec<Option<f64>> = series
            .points
            .iter()
            .map(|p| p.and_then(|d| d.to_f64()))
            .collect();

        for (n, seg) in segments(&points).into_iter().enumerate() {
            let drawn = ctx
                .draw_series(LineSeries::new(seg.iter().copied(), color.stroke_width(2)))
                .map_err(|e| anyhow!("Failed to draw line: {}", e))?;
            if n == 0 {
                drawn
                    .label(series.market.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
            ctx.draw_series(seg.iter().map(|p| Circle::new(*p, 3, color.filled())))
                .map_err(|e| anyhow!("Failed to draw point: {}", e))?;
        }
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| anyhow!("Failed to render chart: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_split_segments() {
        let segs = segments(&[Some(1.0), None, Some(2.0), Some(3.0), None]);
        assert_eq!(segs, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
        assert!(segments(&[None, None]).is_empty());
    }

    #[test]
    fn empty_chart_is_an_error() {
        assert!(render_svg("Beras", &ChartData::default(), DEFAULT_SIZE).is_err());
    }
}
