use flexi_logger::{Logger, LoggerHandle};
use halo_sobel::image::io::{write_json_file, FileRaster};
use halo_sobel::{load_config, EdgePipeline, SobelError};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SobelError> {
    let mut args = env::args().skip(1);
    let config_path = args.next().ok_or_else(usage)?;
    let mut config = load_config(Path::new(&config_path))?;
    if let Some(units) = args.next() {
        let units = units
            .parse::<usize>()
            .map_err(|_| SobelError::Configuration(format!("invalid unit count `{units}`")))?;
        config.pipeline.units = Some(units);
    }
    let _logger = start_logger(&config.log_level)?;

    let pipeline = EdgePipeline::new(config.pipeline, FileRaster);
    let cfg = pipeline.config();
    println!(
        "width: {}\nheight: {}\nprocessors: {}",
        cfg.width, cfg.height, cfg.workers
    );

    let report = pipeline.run()?;

    println!("Output: <{}>", report.output.display());
    for line in report.timings.report_lines() {
        println!("{line}");
    }
    if let Some(path) = &config.report_json {
        write_json_file(path, &report)?;
        println!("Saved run report to {}", path.display());
    }
    Ok(())
}

fn start_logger(level: &str) -> Result<LoggerHandle, SobelError> {
    Logger::try_with_str(level)
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| SobelError::Configuration(format!("logger initialization failed: {e}")))
}

fn usage() -> SobelError {
    SobelError::Configuration("Usage: halo_sobel <config.json> [units]".to_string())
}
