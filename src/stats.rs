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
//! Per-configuration descriptive statistics over latency samples.
use std::{collections::BTreeMap, fs, path::Path};

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::{
    records::{ConfigKey, LatencySample, SummaryRecord},
    ReportError,
};

/// Default threshold for the "fraction of packets under X ms" metric.
pub const DEFAULT_THRESHOLD_MS: f64 = 10.0;

/// Descriptive statistics of one latency partition, all figures in
/// milliseconds except `frac_under_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub samples: usize,
    pub mean_ms: f64,
    pub stddev_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub frac_under_threshold: f64,
}

/// Linearly interpolated order-statistic percentile of a sorted, non-empty
/// slice. `p` is given in percent, e.g. `99.0`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}

/// Partition the samples by [`ConfigKey`] and compute [`LatencyStats`] for
/// every partition with at least one valid delay value.
///
/// Non-finite and non-positive delays are excluded from the computation, so
/// a configuration whose delays are all invalid gets no output row at all
/// (never a row of NaNs).
pub fn aggregate(
    samples: &[LatencySample],
    threshold_ms: f64,
) -> BTreeMap<ConfigKey, LatencyStats> {
    let mut partitions: BTreeMap<ConfigKey, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        if !sample.delay.is_finite() || sample.delay <= 0.0 {
            continue;
        }
        partitions
            .entry(sample.key)
            .or_default()
            .push(sample.delay * 1_000.0);
    }

    partitions
        .into_iter()
        .map(|(key, mut delays_ms)| {
            delays_ms.sort_by(f64::total_cmp);
            let n = delays_ms.len();
            let under = delays_ms.iter().filter(|&&d| d < threshold_ms).count();
            let stats = LatencyStats {
                samples: n,
                mean_ms: delays_ms.iter().mean(),
                stddev_ms: if n > 1 { delays_ms.iter().std_dev() } else { 0.0 },
                p50_ms: percentile(&delays_ms, 50.0),
                p90_ms: percentile(&delays_ms, 90.0),
                p99_ms: percentile(&delays_ms, 99.0),
                frac_under_threshold: under as f64 / n as f64,
            };
            (key, stats)
        })
        .collect()
}

/// Configurations present on one side of the summary/latency join but not
/// the other.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Latency partitions without a matching summary record.
    pub missing_in_summary: Vec<ConfigKey>,
    /// Summary records without any latency samples.
    pub missing_in_latency: Vec<ConfigKey>,
}

/// Check that every aggregated configuration also appears in the summary and
/// vice versa. Mismatches are reported, not dropped; the caller still gets
/// all rows.
pub fn check_coverage(
    stats: &BTreeMap<ConfigKey, LatencyStats>,
    summary: &[SummaryRecord],
) -> Coverage {
    let coverage = Coverage {
        missing_in_summary: stats
            .keys()
            .filter(|key| !summary.iter().any(|r| r.key == **key))
            .copied()
            .collect(),
        missing_in_latency: summary
            .iter()
            .map(|r| r.key)
            .filter(|key| !stats.contains_key(key))
            .collect(),
    };
    for key in &coverage.missing_in_summary {
        log::warn!("latency samples for {key} have no matching summary record");
    }
    for key in &coverage.missing_in_latency {
        log::warn!("summary record {key} has no latency samples");
    }
    coverage
}

#[derive(Debug, Serialize)]
struct LatencyStatsRow {
    #[serde(rename = "packetSize")]
    packet_size: u32,
    width: u32,
    band: u32,
    samples: usize,
    mean_ms: f64,
    stddev_ms: f64,
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
    threshold_ms: f64,
    frac_under_threshold: f64,
}

/// Write the aggregate table to a tidy CSV, one row per configuration,
/// sorted by configuration.
pub fn write_stats_csv(
    path: impl AsRef<Path>,
    stats: &BTreeMap<ConfigKey, LatencyStats>,
    threshold_ms: f64,
) -> Result<(), ReportError> {
    let mut csv = csv::WriterBuilder::new().from_writer(fs::File::create(path.as_ref())?);
    for (key, s) in stats {
        csv.serialize(LatencyStatsRow {
            packet_size: key.packet_size,
            width: key.width_mhz,
            band: key.band_ghz,
            samples: s.samples,
            mean_ms: s.mean_ms,
            stddev_ms: s.stddev_ms,
            p50_ms: s.p50_ms,
            p90_ms: s.p90_ms,
            p99_ms: s.p99_ms,
            threshold_ms,
            frac_under_threshold: s.frac_under_threshold,
        })?;
    }
    csv.flush()?;
    log::info!("Wrote {} stats rows to {:?}", stats.len(), path.as_ref());
    Ok(())
}
