use clap::Parser;
use log::{error, info};
use radext_core::cli::SliceSelectCli;
use radext_core::logging::setup_logging;
use radext_core::{
    select_and_normalize, AutoReader, AutoWriter, ImageReader, OutputPaths, SliceSelectConfig,
    Volume,
};
use std::process;

fn main() {
    let cli = match SliceSelectCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if radext_core::cli::is_informational(&e) => e.exit(),
        Err(e) => {
            eprint!("{}", e);
            process::exit(1);
        }
    };

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &SliceSelectCli) -> radext_core::Result<()> {
    let config = cli.config();
    let reader = AutoReader::new();
    let writer = AutoWriter::new();

    // fail before any loading when the extension has no writer in this build
    let paths = OutputPaths::for_image(&cli.image, &config.extension);
    paths.check_writable(&writer)?;
    info!("Writing outputs as {}", paths.normalized.display());

    let image = reader.execute(&cli.image)?;
    let label = reader.execute(&cli.label)?;

    let image = bias_correct(image, &label, &config)?;

    let outputs = select_and_normalize(&image, &label, &config)?;
    println!(
        "Biggest slice: {}. Width: {}",
        outputs.selection.biggest, outputs.selection.width
    );
    println!(
        "Selected slices: {}, {}, {}",
        outputs.selection.first, outputs.selection.biggest, outputs.selection.last
    );

    outputs.write(&writer, &paths)?;
    println!("Wrote {}", paths.normalized.display());
    println!("Wrote {}", paths.slice.display());
    println!("Wrote {}", paths.slice_label.display());
    Ok(())
}

#[cfg(feature = "python")]
fn bias_correct(
    image: Volume,
    label: &Volume,
    config: &SliceSelectConfig,
) -> radext_core::Result<Volume> {
    if !config.bias_correction {
        return Ok(image);
    }
    let corrected = radext_core::python::n4_bias_correct(&image, label)?;
    info!("Bias field correction done");
    Ok(corrected)
}

#[cfg(not(feature = "python"))]
fn bias_correct(
    image: Volume,
    _label: &Volume,
    config: &SliceSelectConfig,
) -> radext_core::Result<Volume> {
    if config.bias_correction {
        log::warn!("N4 bias correction requires the 'python' feature, skipping");
    }
    Ok(image)
}
