use clap::Parser;
use site_scan::report;
use site_scan::{CruxSiteList, Scan, ScanConfig};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging; RUST_LOG still wins when set
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };
    let config = args.apply(config);
    config.validate()?;

    let source = CruxSiteList::new(config.site_list_url.clone(), config.cache_path.clone());
    let output_dir = config.output_dir.clone();
    let keyword = config.keyword.clone();

    let start_time = std::time::Instant::now();
    let scan_report = Scan::with_config(config).run(&source).await?;

    report::print_matches(&scan_report.matches);

    if !args.no_write {
        let path = report::output_path(&output_dir, &keyword);
        report::write_matches(&path, &scan_report.matches)?;
    }

    ::log::info!(
        "Scan complete - {} of {} sites matched ({} fetches failed) in {:.2} seconds",
        scan_report.matches.len(),
        scan_report.sites.len(),
        scan_report.failed_count(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
