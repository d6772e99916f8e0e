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
use std::{error::Error, path::PathBuf, process};

use clap::Parser;

use wifi7_report::{
    charts, latency, publish_rate, stats, summary,
    util::{self, PathBufExt},
};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Directory containing summary.csv and, optionally, latency.csv and
    /// publish_rate.csv.
    #[arg(short, long, default_value = "./")]
    data_path: String,
    /// Overwrite the output path for charts and the stats table.
    #[arg(short, long, default_value = "./images/")]
    output_path: String,
    /// Threshold for the fraction-of-packets-under metric, in milliseconds.
    #[arg(short = 't', long, default_value_t = stats::DEFAULT_THRESHOLD_MS)]
    latency_threshold_ms: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    util::init_logging();

    let args = Args::parse();
    let data_path = PathBuf::from(&args.data_path);
    if !data_path.exists() {
        log::error!("Could not read data in {data_path:?}!");
        process::exit(1)
    }

    run(&args)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let data_path = PathBuf::from(&args.data_path);
    let img_dir = PathBuf::from(&args.output_path);
    util::prepare_img_dir(&img_dir)?;

    // summary.csv is the one mandatory input; an empty parse aborts the run
    let summary_records = summary::load_summary(data_path.as_path().then("summary.csv"))?;
    charts::plot_throughput(&summary_records, &img_dir)?;
    charts::plot_drop_rate(&summary_records, &img_dir)?;

    let latency_path = data_path.as_path().then("latency.csv");
    if latency_path.exists() {
        let samples = latency::subsample(latency::load_latency(&latency_path)?);
        let table = stats::aggregate(&samples, args.latency_threshold_ms);
        stats::check_coverage(&table, &summary_records);
        stats::write_stats_csv(
            img_dir.as_path().then("latency_stats.csv"),
            &table,
            args.latency_threshold_ms,
        )?;
        charts::plot_latency_cdf(&samples, &img_dir)?;
        charts::plot_latency_hist(&samples, &img_dir)?;
        charts::plot_latency_over_time(&samples, &img_dir)?;
    } else {
        log::info!("{latency_path:?} not found, skipping the latency section");
    }

    let publish_path = data_path.as_path().then("publish_rate.csv");
    if publish_path.exists() {
        let records = publish_rate::load_publish_rate(&publish_path)?;
        charts::plot_publish_rate(&records, &img_dir)?;
    }

    log::info!("All charts saved in {img_dir:?}");
    Ok(())
}
