use std::path::PathBuf;

use clap::{value_parser, Parser};

use crate::model::{DEFAULT_ALLOWED, MIN_OVERLAP};

/// Command-line options for the FASTQ deduplication/consensus tool.
#[derive(Parser)]
#[command(
    name = "dedup-fastq",
    about = "Collapse PCR/optical duplicates in paired-end FASTQ reads into consensus calls",
    long_about = "Collapse PCR and optical duplicates in paired-end FASTQ reads into consensus calls.

EXAMPLES:
    // Defaults
    $ dedup-fastq -1 sample_R1.fastq.gz -2 sample_R2.fastq.gz

    // Thruplex libraries, looser mismatch tolerance
    $ dedup-fastq -1 sample_R1.fastq -2 sample_R2.fastq --thruplex -a 4
    ",
    version = "0.1.0"
)]
pub struct Cli {
    /// Read 1 FASTQ file [path]. Accepts plain or gzip-compressed (.gz) input.
    #[clap(short = '1', long = "read1", value_parser, required = true, help_heading = "Input")]
    pub read1: PathBuf,

    /// Read 2 FASTQ file [path]. Accepts plain or gzip-compressed (.gz) input.
    #[clap(short = '2', long = "read2", value_parser, required = true, help_heading = "Input")]
    pub read2: PathBuf,

    /// Mismatches tolerated when testing for overlap or duplication [integer]
    #[clap(
        short = 'a',
        long,
        default_value_t = DEFAULT_ALLOWED,
        value_parser = value_parser!(u8).range(0..20).map(|v| v as usize),
        help_heading = "Matching"
    )]
    pub allowed: usize,

    /// Minimum R1/R2 overlap length considered when sizing fragments [integer]
    #[clap(
        short = 't',
        long = "min-overlap",
        default_value_t = MIN_OVERLAP,
        help_heading = "Matching"
    )]
    pub min_overlap: usize,

    /// Library was prepared with Takara Thruplex adapters: trim the 6bp UMI
    /// and 11bp stem from both fragment termini [flag]
    #[clap(long, help_heading = "Library prep")]
    pub thruplex: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace) [flag, repeatable]
    #[clap(short = 'v', long, action = clap::ArgAction::Count, help_heading = "Diagnostics")]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
