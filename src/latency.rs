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
//! Loader for the per-packet `latency.csv` written by the sweep runs.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    records::{ConfigKey, LatencyCsvRow, LatencySample},
    ReportError,
};

/// Seed for the sub-sampling RNG, fixed so repeated runs plot the same data.
const SUBSAMPLE_SEED: u64 = 42;

/// Load all valid latency samples from the given file.
///
/// Two file layouts exist: the headered form with at least the columns
/// `delay,width,packetSize` (plus optional `time` and `band`), and the
/// legacy headerless form `time,delay,width,packetSize` from the first
/// 5 GHz-only runs. Rows with a non-numeric, non-finite, or non-positive
/// delay are dropped, not errors.
pub fn load_latency(path: impl AsRef<Path>) -> Result<Vec<LatencySample>, ReportError> {
    let path = path.as_ref();
    log::info!("Loading: {path:?}");

    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    let has_headers = first_line.contains("delay");

    let mut samples = Vec::new();
    let mut dropped = 0_usize;

    if has_headers {
        let mut csv = csv::Reader::from_reader(File::open(path)?);
        for result in csv.deserialize() {
            let row: LatencyCsvRow = match result {
                Ok(row) => row,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            match clean(row.into_sample()) {
                Some(sample) => samples.push(sample),
                None => dropped += 1,
            }
        }
    } else {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(File::open(path)?);
        for result in csv.deserialize() {
            let (time, delay, width, packet_size): (f64, f64, u32, u32) = match result {
                Ok(row) => row,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            let sample = LatencySample {
                time,
                delay,
                key: ConfigKey {
                    packet_size,
                    width_mhz: width,
                    // the headerless files were all recorded on the 5 GHz band
                    band_ghz: 5,
                },
            };
            match clean(sample) {
                Some(sample) => samples.push(sample),
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        log::debug!("{path:?}: dropped {dropped} rows with invalid delay values");
    }
    log::info!("{path:?}: {} latency samples", samples.len());
    Ok(samples)
}

fn clean(sample: LatencySample) -> Option<LatencySample> {
    (sample.delay.is_finite() && sample.delay > 0.0 && sample.time.is_finite()).then_some(sample)
}

/// Randomly sub-sample very large inputs before aggregation, trading a bit of
/// tail precision for plotting speed. The fraction only depends on the input
/// size, and the RNG seed is fixed, so any given input always yields the same
/// subset.
pub fn subsample(samples: Vec<LatencySample>) -> Vec<LatencySample> {
    let frac = subsample_fraction(samples.len());
    if frac >= 1.0 {
        return samples;
    }

    let mut rng = StdRng::seed_from_u64(SUBSAMPLE_SEED);
    let kept: Vec<_> = samples
        .into_iter()
        .filter(|_| rng.gen::<f64>() < frac)
        .collect();
    log::info!(
        "sub-sampling to {:.0}% ({} samples) for faster plotting",
        frac * 100.0,
        kept.len()
    );
    kept
}

fn subsample_fraction(n: usize) -> f64 {
    if n > 2_000_000 {
        0.02
    } else if n > 500_000 {
        0.05
    } else {
        1.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_headered_file() {
        let (_dir, path) = write_csv(
            "time,delay,width,packetSize,band\n\
             0.5,0.001,80,1500,b5\n\
             0.6,0.002,80,1500,5\n\
             0.7,0.003,160,1500,6GHz\n",
        );
        let samples = load_latency(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().take(2).all(|s| s.key.band_ghz == 5));
        assert_eq!(samples[2].key.band_ghz, 6);
        assert_eq!(samples[2].key.width_mhz, 160);
    }

    #[test]
    fn load_headerless_file_defaults_to_5ghz() {
        let (_dir, path) = write_csv("0.5,0.001,80,1500\n0.6,0.002,160,512\n");
        let samples = load_latency(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.key.band_ghz == 5));
        assert_eq!(samples[1].key.packet_size, 512);
    }

    #[test]
    fn invalid_delays_are_dropped_not_errors() {
        let (_dir, path) = write_csv(
            "time,delay,width,packetSize,band\n\
             0.1,0.001,80,1500,5\n\
             0.2,not-a-number,80,1500,5\n\
             0.3,-0.5,80,1500,5\n\
             0.4,0,80,1500,5\n\
             0.5,NaN,80,1500,5\n\
             0.6,0.002,80,1500,5\n",
        );
        let samples = load_latency(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.delay > 0.0));
    }

    #[test]
    fn subsample_fractions() {
        assert_eq!(subsample_fraction(100), 1.0);
        assert_eq!(subsample_fraction(500_000), 1.0);
        assert_eq!(subsample_fraction(500_001), 0.05);
        assert_eq!(subsample_fraction(2_000_001), 0.02);
    }

    #[test]
    fn subsample_is_deterministic() {
        let samples: Vec<_> = (0..600_000)
            .map(|i| LatencySample {
                time: i as f64,
                delay: 0.001,
                key: ConfigKey {
                    packet_size: 1500,
                    width_mhz: 80,
                    band_ghz: 5,
                },
            })
            .collect();
        let a = subsample(samples.clone());
        let b = subsample(samples);
        // roughly 5% of 600k, and identical across runs
        assert!((25_000..35_000).contains(&a.len()));
        assert_eq!(a, b);
    }
}
