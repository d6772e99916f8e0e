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
//! Library for parsing, aggregating, and plotting the results of an ns-3
//! WiFi 7 parameter sweep (packet size x channel width x frequency band).
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No parsable summary records found in {0:?}")]
    EmptySummary(PathBuf),
    #[error("Render Error: {0}")]
    Render(String),
}

pub mod charts;
pub mod latency;
pub mod publish_rate;
pub mod records;
pub mod stats;
pub mod summary;
pub mod util;

pub mod prelude {
    pub use super::{
        records::{ConfigKey, LatencySample, PublishRateRecord, SummaryRecord},
        stats::LatencyStats,
        ReportError,
    };
}
