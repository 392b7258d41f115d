use log::{error, info, LevelFilter};
use radext_core::cli::{self, Cli, OutputFormat};
use radext_core::logging::init_file_logging;
use radext_core::{
    default_extractor, AutoReader, RadextError, RadiomicsPipeline, RunSummary, TextReport,
};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    // nothing is touched on disk until the arguments are valid
    let cli = match cli::resolve_args(&args) {
        Ok(cli) => cli,
        Err(usage) => {
            println!("{}", usage.usage);
            eprint!("{}", usage.detail);
            process::exit(usage.exit_code);
        }
    };

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        if let RadextError::FeatureDisabled(_, feature) = &e {
            eprintln!("Rebuild with: cargo build --features {}", feature);
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> radext_core::Result<()> {
    let config = cli.config();
    init_file_logging(&config.log_file, LevelFilter::Debug)?;

    #[cfg(feature = "python")]
    {
        radext_core::python::attach_radiomics_log(&config.log_file)?;
        match radext_core::python::radiomics_version() {
            Ok(version) => info!("pyradiomics {}", version),
            Err(e) => log::warn!("Could not read pyradiomics version: {}", e),
        }
    }

    info!("Configuration: {:?}", config);
    let extractor = default_extractor(&config.params)?;
    let pipeline = RadiomicsPipeline::new(&config, Box::new(AutoReader::new()), extractor);

    let summary = pipeline.run(&cli.request())?;
    output_summary(&summary, cli.format);
    Ok(())
}

fn output_summary(summary: &RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            print!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
