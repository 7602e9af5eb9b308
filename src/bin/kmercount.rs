use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kmercount::cli::io::open_report_sink;
use kmercount::cli::opts::Cli;
use kmercount::cli::run::{count_records, AggregatorKind, CountOptions, Precision};
use kmercount::kmer::store::StoreConfig;
use std::fs::File;
use std::io::{BufReader, Write};
use std::time::Instant;

fn main() {
    // Catch and handle errors
    // Ensures the temporary store file is removed before the process exits
    if let Err(e) = run() {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run() -> Result<()> {
    let start_time = Instant::now();
    let opt = match Cli::try_parse() {
        Ok(opt) => opt,
        Err(e) => {
            // Usage problems exit 1; --help and --version are not errors
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    };

    let input = File::open(&opt.input_file)
        .context(format!("opening input file {:?}", opt.input_file))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("       {spinner} processed {pos} records {msg}")
            .unwrap(),
    );

    let options = CountOptions {
        width: opt.kmer_size as usize,
        top: opt.top_kmers_to_report as usize,
        precision: Precision::from_arg(opt.precision)?,
        aggregator: AggregatorKind::from_arg(opt.counter_type)?,
        store: StoreConfig::tuned(),
        spill_threshold: None,
    };

    let report = count_records(BufReader::new(input), &options, Some(&pb))?;
    pb.finish_with_message("| Finished counting");

    let mut sink = open_report_sink(opt.output.as_deref())?;
    for (seq, count) in &report.mers {
        writeln!(sink, "{},{}", seq, count).context("writing report line")?;
    }
    sink.flush().context("flushing report")?;

    if report.mers.len() < report.requested {
        eprintln!(
            "Warning. Specified top {} of kmers, only {} were found.",
            report.requested,
            report.mers.len()
        );
    }
    if report.saturated {
        eprintln!("Warning, counters appear to be saturating. Consider increasing precision parameter.");
    }

    let elapsed = start_time.elapsed();
    eprintln!(
        "Processed {} records / {} k-mers in {:.2?}",
        report.counters.records, report.counters.kmers, elapsed
    );
    Ok(())
}
