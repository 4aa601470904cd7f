//! Chart of average execution time against input size.

use std::fs;
use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use qsort::TimingTable;

/// `(size, mean ms)` for every bucket whose label is a number and which has
/// at least one sample, in label order.
pub fn average_points(table: &TimingTable) -> Vec<(f64, f64)> {
    table
        .summaries()
        .into_iter()
        .filter_map(|summary| {
            let size: f64 = summary.label.as_str().parse().ok()?;
            Some((size, summary.mean?))
        })
        .collect()
}

/// Plot the per-size averages as a line chart and write it as an SVG.
///
/// Returns `false` without touching the file system when there is nothing
/// to plot.
pub fn plot_average_times<P: AsRef<Path>>(table: &TimingTable, output_path: P) -> Result<bool> {
    let points = average_points(table);
    if points.is_empty() {
        return Ok(false);
    }

    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let mut x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let y_max = points.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(output_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average execution time by input size", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Input size")
        .y_desc("Average execution time (ms)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("Randomized quicksort")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, ShapeStyle::from(&BLUE).filled())),
    )?;

    chart.configure_series_labels().border_style(&BLACK).draw()?;
    root.present()?;

    Ok(true)
}
