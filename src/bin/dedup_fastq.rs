use anyhow::Result;
use clap::Parser;
use dedup_fastq::cli::Cli;
use dedup_fastq::pipeline;

fn main() {
    if let Err(e) = run() {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run() -> Result<()> {
    let opt = Cli::parse();

    env_logger::Builder::new().filter_level(opt.log_level()).init();

    pipeline::dedup(&opt.read1, &opt.read2, opt.allowed, opt.min_overlap, opt.thruplex)
}
