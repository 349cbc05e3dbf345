//! Chart rendering.
//!
//! The drawing functions are generic over the plotters backend so they can
//! be exercised against an in-memory buffer; the `render_*` wrappers bind
//! them to PNG files.

use std::path::Path;

use anyhow::{Context, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::stats::DepartmentCount;

/// Pixel size of both charts.
pub const CHART_SIZE: (u32, u32) = (800, 600);

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

/// One bucket of the name-length histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Split the sample into `bin_count` equal-width buckets over its range.
///
/// A constant sample collapses to one unit-width bucket.
pub fn histogram_bins(lengths: &[usize], bin_count: usize) -> Vec<HistogramBin> {
    if lengths.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let min = *lengths.iter().min().expect("non-empty") as f64;
    let max = *lengths.iter().max().expect("non-empty") as f64;
    let width = (max - min) / bin_count as f64;
    if width == 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: min + 1.0,
            count: lengths.len() as u64,
        }];
    }

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for &value in lengths {
        let index = (((value as f64 - min) / width) as usize).min(bin_count - 1);
        bins[index].count += 1;
    }
    bins
}

/// Bar chart of professors per department.
pub fn draw_department_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    counts: &[DepartmentCount],
) -> anyhow::Result<()> {
    if counts.is_empty() {
        bail!("no department counts to chart");
    }

    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;

    let y_max = counts.iter().map(|c| c.count).max().unwrap_or(0) + 1;
    let mut chart = ChartBuilder::on(root)
        .caption("Number of Professors by Department", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(70)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..counts.len() as f64, 0u64..y_max)
        .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len())
        .x_label_formatter(&|x| {
            let index = x.round();
            if index < 0.0 {
                return String::new();
            }
            counts
                .get(index as usize)
                .map(|c| c.department.clone())
                .unwrap_or_default()
        })
        .x_desc("Department")
        .y_desc("Count")
        .draw()
        .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, c)| {
            Rectangle::new(
                [(i as f64 + 0.15, 0u64), (i as f64 + 0.85, c.count)],
                SKY_BLUE.filled(),
            )
        }))
        .map_err(|e| anyhow!("failed to draw department bars: {e}"))?;

    Ok(())
}

/// Histogram of professor name lengths.
pub fn draw_name_length_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bins: &[HistogramBin],
) -> anyhow::Result<()> {
    if bins.is_empty() {
        bail!("no histogram bins to chart");
    }

    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;

    let x_min = bins.first().expect("non-empty").lower;
    let x_max = bins.last().expect("non-empty").upper;
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) + 1;

    let mut chart = ChartBuilder::on(root)
        .caption("Distribution of Professor Name Lengths", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0u64..y_max)
        .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Name Length")
        .y_desc("Frequency")
        .draw()
        .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

    chart
        .draw_series(
            bins.iter()
                .map(|b| Rectangle::new([(b.lower, 0u64), (b.upper, b.count)], LIGHT_GREEN.filled())),
        )
        .map_err(|e| anyhow!("failed to draw histogram: {e}"))?;

    Ok(())
}

/// Render the department bar chart to a PNG file.
pub fn render_department_chart(counts: &[DepartmentCount], path: &Path) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_department_bars(&root, counts)?;
    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Render the 10-bin name-length histogram to a PNG file.
pub fn render_name_length_chart(lengths: &[usize], path: &Path) -> anyhow::Result<()> {
    let bins = histogram_bins(lengths, 10);
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_name_length_histogram(&root, &bins)?;
    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_the_sample_range() {
        let lengths = [1usize, 3, 5, 7, 9, 11, 13, 15, 17, 19, 20];
        let bins = histogram_bins(&lengths, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins.first().unwrap().lower, 1.0);
        assert!((bins.last().unwrap().upper - 20.0).abs() < 1e-9);
        let total: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, lengths.len() as u64);
    }

    #[test]
    fn maximum_value_lands_in_the_last_bin() {
        let bins = histogram_bins(&[1, 10], 10);
        assert_eq!(bins.last().unwrap().count, 1);
        assert_eq!(bins.first().unwrap().count, 1);
    }

    #[test]
    fn constant_sample_collapses_to_one_bin() {
        let bins = histogram_bins(&[6, 6, 6], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(bins[0].upper > bins[0].lower);
    }

    #[test]
    fn empty_sample_yields_no_bins() {
        assert!(histogram_bins(&[], 10).is_empty());
    }
}
