use std::env;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, error, info};

use huffzip::{Percent, Progress, Silent, decompress_file, decompressed_path};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let quiet = args.iter().skip(1).any(|a| a == "--quiet" || a == "-q");
    let paths: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|a| *a != "--quiet" && *a != "-q")
        .collect();

    if paths.is_empty() || paths.len() > 2 {
        error!(
            "Usage: {} <input_file> [output_file] [--quiet]",
            args.first().map_or("decode", String::as_str)
        );
        eprintln!("  📂 <input_file>:  path to the .abiz file.");
        eprintln!("  💾 [output_file]: defaults to output<input_file without .abiz>.");
        std::process::exit(1);
    }

    let input_filepath = PathBuf::from(paths[0]);
    let output_filepath = match paths.get(1) {
        Some(p) => PathBuf::from(p),
        None => match decompressed_path(&input_filepath) {
            Ok(p) => p,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    info!("--- Start Decoding ---");

    let mut percent;
    let mut silent = Silent;
    let progress: &mut dyn Progress = if quiet {
        &mut silent
    } else {
        percent = Percent::stderr();
        &mut percent
    };

    let start = Instant::now();
    let report = match decompress_file(&input_filepath, &output_filepath, progress) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to decode {}: {}", input_filepath.display(), e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();
    debug!("Bitstream decoding finished in {:.2?}.", elapsed);

    let ratio = if report.output_len > 0 {
        100.0 * (1.0 - (report.input_len as f64) / (report.output_len as f64))
    } else {
        0.0
    };

    println!(
        "\r\n✅ decoding successful.\n\
         📂 input file:        {} ({} bytes, header {} bytes)\n\
         💾 output file:       {} ({} bytes)\n\
         🗜️ compression ratio: {:.2}% (relative to decoded output)\n\
         ⏱️ time:              {:.2?}",
        input_filepath.display(),
        report.input_len,
        report.header_len,
        output_filepath.display(),
        report.output_len,
        ratio,
        elapsed
    );

    info!("--- End ---");
}
