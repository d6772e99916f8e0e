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
//! Loader for the optional `publish_rate.csv`.
use std::{fs::File, path::Path};

use crate::{records::PublishRateRecord, ReportError};

/// Load all publish-rate records. Rows that fail to deserialize are skipped.
pub fn load_publish_rate(path: impl AsRef<Path>) -> Result<Vec<PublishRateRecord>, ReportError> {
    let path = path.as_ref();
    log::info!("Loading: {path:?}");

    let mut csv = csv::Reader::from_reader(File::open(path)?);
    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for result in csv.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("{path:?}: skipped {skipped} unparsable rows");
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_with_mixed_band_encodings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publish_rate.csv");
        std::fs::write(
            &path,
            "packetSize,width,band,publishRate_pps\n\
             512,80,b5,2000.0\n\
             1500,160,6,bogus\n\
             1500,160,6,700.5\n",
        )
        .unwrap();
        let records = load_publish_rate(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].band, 5);
        assert_eq!(records[1].publish_rate_pps, 700.5);
    }
}
