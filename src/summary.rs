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
//! Parser for the semi-structured `summary.csv` written by the sweep runs.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    records::{ConfigKey, SummaryRecord},
    ReportError,
};

lazy_static! {
    static ref SUMMARY_LINE: Regex = Regex::new(
        r"^ps(?P<ps>\d+)_w(?P<w>\d+)_b(?P<b>\d+)GHz.*Bandwidth=(?P<bw>.*),DropRate=(?P<dr>.*)$"
    )
    .unwrap();
}

/// Parse one summary line into a [`SummaryRecord`].
///
/// Lines that do not match the `ps<ps>_w<w>_b<b>GHz...Bandwidth=<f>,DropRate=<f>`
/// pattern yield `None`, as do matching lines whose numeric fields fail to
/// parse. Neither case is an error; the caller skips the line.
pub fn parse_line(line: &str) -> Option<SummaryRecord> {
    let caps = SUMMARY_LINE.captures(line.trim())?;
    Some(SummaryRecord {
        key: ConfigKey {
            packet_size: caps["ps"].parse().ok()?,
            width_mhz: caps["w"].parse().ok()?,
            band_ghz: caps["b"].parse().ok()?,
        },
        throughput_mbps: caps["bw"].parse().ok()?,
        drop_rate: caps["dr"].parse().ok()?,
    })
}

/// Load all summary records from the given file.
///
/// Unparsable lines are skipped. An input that yields zero records is the
/// single hard failure of the pipeline: every chart depends on the summary,
/// so producing empty plots would only hide the broken input.
pub fn load_summary(path: impl AsRef<Path>) -> Result<Vec<SummaryRecord>, ReportError> {
    let path = path.as_ref();
    log::info!("Loading: {path:?}");

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?;
        match parse_line(&line) {
            Some(record) => records.push(record),
            None if line.trim().is_empty() => {}
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("{path:?}: skipped {skipped} unparsable lines");
    }

    if records.is_empty() {
        return Err(ReportError::EmptySummary(path.to_path_buf()));
    }
    log::info!("{path:?}: {} summary records", records.len());
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_valid_line() {
        let record = parse_line("ps1500_w80_b5GHz,Bandwidth=120.5,DropRate=0.0123").unwrap();
        assert_eq!(
            record.key,
            ConfigKey {
                packet_size: 1500,
                width_mhz: 80,
                band_ghz: 5
            }
        );
        assert_eq!(record.throughput_mbps, 120.5);
        assert_eq!(record.drop_rate, 0.0123);
        assert!((0.0..=1.0).contains(&record.drop_rate));
    }

    #[test]
    fn parse_line_with_extra_run_info() {
        // runs sometimes append extra tags between the config and the metrics
        let record =
            parse_line("ps512_w160_b6GHz_run3,Bandwidth=950.25,DropRate=0.5").unwrap();
        assert_eq!(record.key.packet_size, 512);
        assert_eq!(record.key.width_mhz, 160);
        assert_eq!(record.key.band_ghz, 6);
        assert_eq!(record.throughput_mbps, 950.25);
        assert_eq!(record.drop_rate, 0.5);
    }

    #[test]
    fn skip_non_matching_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("# comment"), None);
        assert_eq!(parse_line("ps1500_w80,Bandwidth=1.0,DropRate=0.0"), None);
        assert_eq!(parse_line("ps1500_w80_b5GHz,Bandwidth=1.0"), None);
    }

    #[test]
    fn skip_malformed_numerics() {
        assert_eq!(
            parse_line("ps1500_w80_b5GHz,Bandwidth=abc,DropRate=0.1"),
            None
        );
        assert_eq!(
            parse_line("ps1500_w80_b5GHz,Bandwidth=1.0,DropRate="),
            None
        );
    }

    #[test]
    fn display_roundtrip() {
        let record = SummaryRecord {
            key: ConfigKey {
                packet_size: 1500,
                width_mhz: 80,
                band_ghz: 5,
            },
            throughput_mbps: 120.5,
            drop_rate: 0.0123,
        };
        assert_eq!(
            record.to_string(),
            "ps1500_w80_b5GHz,Bandwidth=120.5,DropRate=0.0123"
        );
        assert_eq!(parse_line(&record.to_string()), Some(record));
    }

    #[test]
    fn load_summary_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(&path, "no matching lines here\n\n").unwrap();
        assert!(matches!(
            load_summary(&path),
            Err(ReportError::EmptySummary(_))
        ));
    }

    #[test]
    fn load_summary_skips_garbage_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        std::fs::write(
            &path,
            "ps512_w80_b5GHz,Bandwidth=100.0,DropRate=0.01\n\
             garbage\n\
             ps1500_w160_b6GHz,Bandwidth=200.0,DropRate=0.02\n",
        )
        .unwrap();
        let records = load_summary(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key.band_ghz, 6);
    }
}
