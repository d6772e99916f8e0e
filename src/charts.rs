// wifi7-report: Analysis and Plotting of ns-3 WiFi 7 Parameter Sweep Results
// Copyright (C) 2024-2025 The wifi7-report developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Renders the aggregated tables to PNG charts.
//!
//! Rendering is a stateless map from tables to image files: the same input
//! always produces byte-identical output, which the end-to-end test relies
//! on.
use std::{collections::BTreeMap, error::Error, path::Path};

use itertools::Itertools;
use plotters::coord::{cartesian::Cartesian2d, ranged1d::Ranged, CoordTranslate};
use plotters::prelude::*;
use rayon::prelude::*;

use crate::{
    records::{LatencySample, PublishRateRecord, SummaryRecord},
    stats::percentile,
    util::PathBufExt,
    ReportError,
};

const CHART_SIZE: (u32, u32) = (800, 600);

fn render_err(e: impl ToString) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Aggregate throughput vs packet size, one line per `width/band` label.
pub fn plot_throughput(summary: &[SummaryRecord], img_dir: &Path) -> Result<(), ReportError> {
    let series = summary_series(summary, |r| r.throughput_mbps);
    let out = img_dir.then("throughput_vs_packet.png");
    log::debug!("Plotting {out:?}");
    draw_lines(
        &out,
        "Aggregate Throughput vs Packet Size",
        "Packet Size (Bytes)",
        "Throughput (Mbps)",
        &series,
    )
    .map_err(render_err)
}

/// Drop rate vs packet size, one line per `width/band` label.
pub fn plot_drop_rate(summary: &[SummaryRecord], img_dir: &Path) -> Result<(), ReportError> {
    let series = summary_series(summary, |r| r.drop_rate);
    let out = img_dir.then("droprate_vs_packet.png");
    log::debug!("Plotting {out:?}");
    draw_lines_log_x(
        &out,
        "Drop Rate vs Packet Size",
        "Packet Size (Bytes, log scale)",
        "Drop Rate",
        &series,
    )
    .map_err(render_err)
}

/// Publish rate vs packet size from the optional `publish_rate.csv`.
pub fn plot_publish_rate(
    records: &[PublishRateRecord],
    img_dir: &Path,
) -> Result<(), ReportError> {
    let series: Vec<(String, Vec<(f64, f64)>)> = records
        .iter()
        .filter(|r| r.publish_rate_pps > 0.0)
        .map(|r| {
            (
                format!("{}MHz / {}GHz", r.width, r.band),
                (r.packet_size as f64, r.publish_rate_pps),
            )
        })
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| human_sort::compare(&a.0, &b.0))
        .map(|(label, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            (label, points)
        })
        .collect();
    if series.is_empty() {
        log::warn!("publish_rate.csv contained no positive publish rates, skipping chart");
        return Ok(());
    }
    let out = img_dir.then("publishrate_vs_packet.png");
    log::debug!("Plotting {out:?}");
    draw_lines_log_log(
        &out,
        "Publish Rate vs Packet Size",
        "Packet Size (Bytes, log scale)",
        "Publish Rate (packets/s, log scale)",
        &series,
    )
    .map_err(render_err)
}

/// Empirical CDFs of the packet delay, one chart per `(width, band)` group
/// with one series per packet size, x axis log-scaled and capped at the
/// group's p99.
pub fn plot_latency_cdf(samples: &[LatencySample], img_dir: &Path) -> Result<(), ReportError> {
    group_by_width_band(samples)
        .into_par_iter()
        .try_for_each(|((width, band), group)| {
            let out = img_dir.then(format!("latency_cdf_w{width}_b{band}.png"));
            log::debug!("Plotting {out:?}");
            draw_cdf(&out, width, band, &group).map_err(render_err)
        })
}

/// Latency histogram (ms, 50 bins), one chart per configuration.
pub fn plot_latency_hist(samples: &[LatencySample], img_dir: &Path) -> Result<(), ReportError> {
    let mut partitions: BTreeMap<_, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        partitions
            .entry(sample.key)
            .or_default()
            .push(sample.delay * 1_000.0);
    }
    partitions
        .into_par_iter()
        .try_for_each(|(key, delays_ms)| {
            let out = img_dir.then(format!("latency_hist_{key}.png"));
            log::debug!("Plotting {out:?}");
            draw_histogram(&out, &key.to_string(), &delays_ms).map_err(render_err)
        })
}

/// Delay over simulation time, one chart per packet size with one scatter
/// series per `width/band` label.
pub fn plot_latency_over_time(
    samples: &[LatencySample],
    img_dir: &Path,
) -> Result<(), ReportError> {
    let mut per_packet_size: BTreeMap<u32, Vec<&LatencySample>> = BTreeMap::new();
    for sample in samples {
        per_packet_size
            .entry(sample.key.packet_size)
            .or_default()
            .push(sample);
    }
    per_packet_size
        .into_par_iter()
        .try_for_each(|(packet_size, group)| {
            let series: Vec<(String, Vec<(f64, f64)>)> = group
                .iter()
                .map(|s| (s.key.width_band_label(), (s.time, s.delay * 1_000.0)))
                .into_group_map()
                .into_iter()
                .sorted_by(|a, b| human_sort::compare(&a.0, &b.0))
                .collect();
            let out = img_dir.then(format!("latency_vs_time_ps{packet_size}.png"));
            log::debug!("Plotting {out:?}");
            draw_scatter(
                &out,
                &format!("Latency vs Time (PacketSize={packet_size})"),
                "Time (s)",
                "Latency (ms)",
                &series,
            )
            .map_err(render_err)
        })
}

/// One `(packet_size, metric)` line per `width/band` label, sorted naturally.
fn summary_series(
    summary: &[SummaryRecord],
    metric: impl Fn(&SummaryRecord) -> f64,
) -> Vec<(String, Vec<(f64, f64)>)> {
    summary
        .iter()
        .map(|r| (r.key.width_band_label(), (r.key.packet_size as f64, metric(r))))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| human_sort::compare(&a.0, &b.0))
        .map(|(label, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            (label, points)
        })
        .collect()
}

fn group_by_width_band(
    samples: &[LatencySample],
) -> BTreeMap<(u32, u32), BTreeMap<u32, Vec<f64>>> {
    let mut groups: BTreeMap<(u32, u32), BTreeMap<u32, Vec<f64>>> = BTreeMap::new();
    for sample in samples {
        groups
            .entry((sample.key.width_mhz, sample.key.band_ghz))
            .or_default()
            .entry(sample.key.packet_size)
            .or_default()
            .push(sample.delay);
    }
    groups
}

fn draw_lines(
    out: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let (x_max, y_max) = series_bounds(series);
    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max * 1.05, 0f64..y_max * 1.1)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    draw_line_series(&mut chart, series)?;
    finish_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

fn draw_lines_log_x(
    out: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let (x_min, x_max, y_max) = series_bounds_log_x(series);
    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min * 0.9..x_max * 1.1).log_scale(), 0f64..y_max * 1.1)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    draw_line_series(&mut chart, series)?;
    finish_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

fn draw_lines_log_log(
    out: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let (x_min, x_max, _) = series_bounds_log_x(series);
    let y_min = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
        .fold(f64::INFINITY, f64::min);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
        .fold(0f64, f64::max);
    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (x_min * 0.9..x_max * 1.1).log_scale(),
            (y_min * 0.9..y_max * 1.1).log_scale(),
        )?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    draw_line_series(&mut chart, series)?;
    finish_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

fn draw_cdf(
    out: &Path,
    width: u32,
    band: u32,
    group: &BTreeMap<u32, Vec<f64>>,
) -> Result<(), Box<dyn Error>> {
    let mut all: Vec<f64> = group.values().flatten().copied().collect();
    if all.is_empty() {
        return Ok(());
    }
    all.sort_by(f64::total_cmp);
    // cap the x axis at the p99 so the tail does not squash the body
    let x_min = 1e-4_f64;
    let x_max = percentile(&all, 99.0).max(x_min * 10.0);

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Latency CDF - {width} MHz, {band} GHz"),
            ("sans-serif", 30).into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min..x_max).log_scale(), 0f64..1f64)?;
    chart
        .configure_mesh()
        .x_desc("Delay (s, log scale)")
        .y_desc("Cumulative Probability")
        .draw()?;

    for (idx, (packet_size, delays)) in group.iter().enumerate() {
        let mut sorted = delays.clone();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len() as f64;
        let points: Vec<(f64, f64)> = sorted
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, (i + 1) as f64 / n))
            .filter(|(d, _)| (x_min..=x_max).contains(d))
            .collect();

        let color = Palette99::pick(idx);
        chart
            .draw_series(LineSeries::new(points, &color))?
            .label(format!("{packet_size} B"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    finish_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

fn draw_histogram(out: &Path, config: &str, delays_ms: &[f64]) -> Result<(), Box<dyn Error>> {
    if delays_ms.is_empty() {
        return Ok(());
    }
    const BINS: usize = 50;
    let max = delays_ms.iter().fold(0f64, |acc, &d| acc.max(d)).max(1e-6);
    let bin_width = max / BINS as f64;
    let mut counts = [0u32; BINS];
    for &d in delays_ms {
        let bin = ((d / bin_width) as usize).min(BINS - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(1).max(1);

    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Latency Distribution ({config})"),
            ("sans-serif", 30).into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max, 0u32..y_max + y_max / 10 + 1)?;
    chart
        .configure_mesh()
        .x_desc("Latency (ms)")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new(
            [
                (i as f64 * bin_width, 0),
                ((i + 1) as f64 * bin_width, count),
            ],
            BLUE.mix(0.7).filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}

fn draw_scatter(
    out: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let (x_max, y_max) = series_bounds(series);
    let root = BitMapBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max * 1.05, 0f64..y_max * 1.1)?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx);
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, color.mix(0.5).filled())),
            )?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    finish_legend(&mut chart)?;
    root.present()?;
    Ok(())
}

fn draw_line_series<X, Y>(
    chart: &mut ChartContext<BitMapBackend, Cartesian2d<X, Y>>,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<(), Box<dyn Error>>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    Ok(())
}

fn finish_legend<'a, 'b: 'a, CT: CoordTranslate>(
    chart: &mut ChartContext<'a, BitMapBackend<'b>, CT>,
) -> Result<(), Box<dyn Error>> {
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;
    Ok(())
}

fn series_bounds(series: &[(String, Vec<(f64, f64)>)]) -> (f64, f64) {
    let x_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(x, _)| *x))
        .fold(1f64, f64::max);
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
        .fold(1e-6, f64::max);
    (x_max, y_max)
}

fn series_bounds_log_x(series: &[(String, Vec<(f64, f64)>)]) -> (f64, f64, f64) {
    let x_min = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(x, _)| *x))
        .filter(|x| *x > 0.0)
        .fold(f64::INFINITY, f64::min)
        .min(1e6);
    let (x_max, y_max) = series_bounds(series);
    (x_min.max(1.0), x_max, y_max)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::records::ConfigKey;

    fn summary() -> Vec<SummaryRecord> {
        [(512, 80, 5), (1500, 80, 5), (512, 160, 6), (1500, 160, 6)]
            .into_iter()
            .enumerate()
            .map(|(i, (packet_size, width_mhz, band_ghz))| SummaryRecord {
                key: ConfigKey {
                    packet_size,
                    width_mhz,
                    band_ghz,
                },
                throughput_mbps: 100.0 + 50.0 * i as f64,
                drop_rate: 0.01 * i as f64,
            })
            .collect()
    }

    fn latency() -> Vec<LatencySample> {
        let mut samples = Vec::new();
        for (packet_size, width_mhz, band_ghz) in [(512, 80, 5), (1500, 160, 6)] {
            for i in 1..=100u32 {
                samples.push(LatencySample {
                    time: i as f64 * 0.1,
                    delay: 0.0005 * i as f64,
                    key: ConfigKey {
                        packet_size,
                        width_mhz,
                        band_ghz,
                    },
                });
            }
        }
        samples
    }

    #[test]
    fn renders_summary_charts() {
        let dir = tempfile::tempdir().unwrap();
        plot_throughput(&summary(), dir.path()).unwrap();
        plot_drop_rate(&summary(), dir.path()).unwrap();

        for name in ["throughput_vs_packet.png", "droprate_vs_packet.png"] {
            let meta = std::fs::metadata(dir.path().join(name)).unwrap();
            assert!(meta.len() > 0, "{name} is empty");
        }
    }

    #[test]
    fn renders_latency_charts() {
        let dir = tempfile::tempdir().unwrap();
        let samples = latency();
        plot_latency_cdf(&samples, dir.path()).unwrap();
        plot_latency_hist(&samples, dir.path()).unwrap();
        plot_latency_over_time(&samples, dir.path()).unwrap();

        for name in [
            "latency_cdf_w80_b5.png",
            "latency_cdf_w160_b6.png",
            "latency_hist_ps512_w80_b5GHz.png",
            "latency_vs_time_ps512.png",
            "latency_vs_time_ps1500.png",
        ] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a");
        let second = dir.path().join("b");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();

        plot_throughput(&summary(), &first).unwrap();
        plot_throughput(&summary(), &second).unwrap();

        let a = std::fs::read(first.join("throughput_vs_packet.png")).unwrap();
        let b = std::fs::read(second.join("throughput_vs_packet.png")).unwrap();
        assert_eq!(a, b);
    }
}
