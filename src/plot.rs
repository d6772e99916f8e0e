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
use std::{error::Error, fs, path::PathBuf, process};

use clap::{Parser, ValueEnum};

use wifi7_report::{
    charts, latency, publish_rate, summary,
    util::{self, PathBufExt},
};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Overwrite the input path for data.
    #[arg(short, long, default_value = "./")]
    data_path: String,
    /// Overwrite the output path for charts.
    #[arg(short, long, default_value = "./images/")]
    output_path: String,
    /// Type of chart to generate.
    #[arg(short, long, value_enum, default_value_t = Plot::All)]
    plot_type: Plot,
}

#[derive(ValueEnum, Clone, Debug, Default)]
enum Plot {
    /// Generates every chart the available input files support.
    #[default]
    All,
    /// Aggregate throughput vs packet size, one line per width/band.
    Throughput,
    /// Drop rate vs packet size, one line per width/band.
    DropRate,
    /// Empirical latency CDF per (width, band), one series per packet size.
    LatencyCdf,
    /// Latency histogram per configuration.
    LatencyHist,
    /// Latency over simulation time per packet size.
    LatencyOverTime,
    /// Publish rate vs packet size, from the optional publish_rate.csv.
    PublishRate,
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init_logging();

    let args = Args::parse();
    let data_path = PathBuf::from(&args.data_path);
    if !data_path.exists() {
        log::error!("Could not read data in {data_path:?}!");
        process::exit(1)
    }

    // unlike `report`, do not clear the output directory: this binary is for
    // re-rendering a single figure
    let img_dir = PathBuf::from(&args.output_path);
    fs::create_dir_all(&img_dir)?;

    let needs_summary = matches!(args.plot_type, Plot::All | Plot::Throughput | Plot::DropRate);
    let needs_latency = matches!(
        args.plot_type,
        Plot::All | Plot::LatencyCdf | Plot::LatencyHist | Plot::LatencyOverTime
    );

    if needs_summary {
        let records = summary::load_summary(data_path.as_path().then("summary.csv"))?;
        if matches!(args.plot_type, Plot::All | Plot::Throughput) {
            charts::plot_throughput(&records, &img_dir)?;
        }
        if matches!(args.plot_type, Plot::All | Plot::DropRate) {
            charts::plot_drop_rate(&records, &img_dir)?;
        }
    }

    if needs_latency {
        let latency_path = data_path.as_path().then("latency.csv");
        if latency_path.exists() {
            let samples = latency::subsample(latency::load_latency(&latency_path)?);
            if matches!(args.plot_type, Plot::All | Plot::LatencyCdf) {
                charts::plot_latency_cdf(&samples, &img_dir)?;
            }
            if matches!(args.plot_type, Plot::All | Plot::LatencyHist) {
                charts::plot_latency_hist(&samples, &img_dir)?;
            }
            if matches!(args.plot_type, Plot::All | Plot::LatencyOverTime) {
                charts::plot_latency_over_time(&samples, &img_dir)?;
            }
        } else {
            log::info!("{latency_path:?} not found, skipping latency charts");
        }
    }

    if matches!(args.plot_type, Plot::All | Plot::PublishRate) {
        let publish_path = data_path.as_path().then("publish_rate.csv");
        if publish_path.exists() {
            let records = publish_rate::load_publish_rate(&publish_path)?;
            charts::plot_publish_rate(&records, &img_dir)?;
        } else if matches!(args.plot_type, Plot::PublishRate) {
            log::warn!("{publish_path:?} not found, nothing to plot");
        }
    }

    Ok(())
}
