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
//! Module defining record data types to (de-)serialize sweep results from CSV.
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// One sweep configuration, uniquely identified by the UDP packet size in
/// bytes, the channel width in MHz, and the frequency band in GHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigKey {
    pub packet_size: u32,
    pub width_mhz: u32,
    pub band_ghz: u32,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ps{}_w{}_b{}GHz",
            self.packet_size, self.width_mhz, self.band_ghz
        )
    }
}

impl ConfigKey {
    /// Label used in chart legends, e.g. `80MHz / 5GHz`.
    pub fn width_band_label(&self) -> String {
        format!("{}MHz / {}GHz", self.width_mhz, self.band_ghz)
    }
}

/// Aggregate result of one simulation run, parsed from one `summary.csv` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRecord {
    pub key: ConfigKey,
    pub throughput_mbps: f64,
    /// Fraction of transmitted packets that were not delivered, in `[0, 1]`.
    pub drop_rate: f64,
}

impl fmt::Display for SummaryRecord {
    /// Renders the canonical summary line; `summary::parse_line` inverts this.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{},Bandwidth={},DropRate={}",
            self.key, self.throughput_mbps, self.drop_rate
        )
    }
}

/// One observed packet delay, tagged with the configuration it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    /// Simulation time at which the packet was received, in seconds.
    pub time: f64,
    /// End-to-end delay of the packet, in seconds.
    pub delay: f64,
    pub key: ConfigKey,
}

/// Row shape of a headered `latency.csv`. Band values appear as `5`, `b5`,
/// or `5GHz` depending on which simulation script produced the file; all
/// variants normalize to the bare integer GHz value.
#[derive(Debug, Clone, Deserialize)]
pub struct LatencyCsvRow {
    #[serde(default)]
    pub time: f64,
    pub delay: f64,
    pub width: u32,
    #[serde(rename = "packetSize")]
    pub packet_size: u32,
    #[serde(deserialize_with = "deserialize_band", default = "default_band")]
    pub band: u32,
}

impl LatencyCsvRow {
    pub fn into_sample(self) -> LatencySample {
        LatencySample {
            time: self.time,
            delay: self.delay,
            key: ConfigKey {
                packet_size: self.packet_size,
                width_mhz: self.width,
                band_ghz: self.band,
            },
        }
    }
}

/// Row of the optional `publish_rate.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishRateRecord {
    #[serde(rename = "packetSize")]
    pub packet_size: u32,
    pub width: u32,
    #[serde(deserialize_with = "deserialize_band", default = "default_band")]
    pub band: u32,
    #[serde(rename = "publishRate_pps")]
    pub publish_rate_pps: f64,
}

/// Normalize a textual band value (`5`, `b5`, `5GHz`, `b5GHz`) to GHz.
pub fn parse_band(raw: &str) -> Option<u32> {
    let s = raw.trim();
    let s = s.strip_prefix('b').unwrap_or(s);
    let s = s.strip_suffix("GHz").unwrap_or(s);
    s.parse().ok()
}

fn default_band() -> u32 {
    // the four-column legacy files were all recorded on the 5 GHz band
    5
}

fn deserialize_band<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let buf = String::deserialize(deserializer)?;
    parse_band(&buf).ok_or_else(|| de::Error::custom(format!("invalid band value {buf:?}")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn band_normalization() {
        assert_eq!(parse_band("5"), Some(5));
        assert_eq!(parse_band("b5"), Some(5));
        assert_eq!(parse_band("5GHz"), Some(5));
        assert_eq!(parse_band("b6GHz"), Some(6));
        assert_eq!(parse_band(" b6 "), Some(6));
        assert_eq!(parse_band("ghz"), None);
        assert_eq!(parse_band(""), None);
    }

    #[test]
    fn deserialize_latency_row_with_band_prefix() {
        let data = "time,delay,width,packetSize,band\n1.5,0.002,80,1500,b5\n";
        let mut csv = csv::Reader::from_reader(data.as_bytes());
        let row: LatencyCsvRow = csv.deserialize().next().unwrap().unwrap();
        assert_eq!(row.band, 5);
        let sample = row.into_sample();
        assert_eq!(
            sample.key,
            ConfigKey {
                packet_size: 1500,
                width_mhz: 80,
                band_ghz: 5
            }
        );
        assert_eq!(sample.delay, 0.002);
    }

    #[test]
    fn deserialize_latency_row_without_band_column() {
        let data = "time,delay,width,packetSize\n0.1,0.01,160,512\n";
        let mut csv = csv::Reader::from_reader(data.as_bytes());
        let row: LatencyCsvRow = csv.deserialize().next().unwrap().unwrap();
        assert_eq!(row.band, 5);
    }

    #[test]
    fn config_key_display() {
        let key = ConfigKey {
            packet_size: 1500,
            width_mhz: 80,
            band_ghz: 5,
        };
        assert_eq!(key.to_string(), "ps1500_w80_b5GHz");
        assert_eq!(key.width_band_label(), "80MHz / 5GHz");
    }
}
