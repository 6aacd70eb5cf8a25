use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, error, info};

use huffzip::{
    CompressReport, Percent, Progress, Silent, build_frequency_table, build_huffman_tree,
    compress_file, compressed_path, derive_codes,
};

struct Args {
    input: PathBuf,
    output: PathBuf,
    quiet: bool,
    list_codes: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut input = None;
    let mut output = None;
    let mut quiet = false;
    let mut list_codes = false;

    for arg in &args[1..] {
        match arg.as_str() {
            "--quiet" | "-q" => quiet = true,
            "--codes" => list_codes = true,
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if output.is_none() => output = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }

    let input = input?;
    let output = output.unwrap_or_else(|| compressed_path(&input));
    Some(Args {
        input,
        output,
        quiet,
        list_codes,
    })
}

fn print_codes(input: &Path) -> huffzip::Result<()> {
    let file = File::open(input)?;
    let len = file.metadata()?.len();
    let freq = build_frequency_table(BufReader::new(file), len)?;
    let tree = build_huffman_tree(&freq)?;
    let (codes, _) = derive_codes(&tree);

    for (byte, code) in codes.iter() {
        println!(
            "Byte: {:#04x} ('{}'), Count: {}, Code: {}",
            byte,
            (byte as char).escape_default(),
            freq.get(byte),
            code
        );
    }
    Ok(())
}

fn print_summary(args: &Args, report: &CompressReport, elapsed: std::time::Duration) {
    println!(
        "\r\n✅ Encoding successful.\n\
         📂  Input:       {} ({} bytes)\n\
         💾  Output:      {} ({} bytes)\n\
         🔣  Symbols:     {} unique, padding {} bits\n\
         ℹ️  Entropy:     {:.4} bits/symbol\n\
         🗜️  Ratio:       {:.4}%\n\
         ⏱️  Time:        {:.2?}",
        args.input.display(),
        report.input_len,
        args.output.display(),
        report.output_len(),
        report.unique_symbols,
        report.padding,
        report.entropy,
        report.ratio(),
        elapsed
    );
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&argv) else {
        error!(
            "Usage: {} <input_file> [output_file] [--quiet] [--codes]",
            argv.first().map_or("encode", String::as_str)
        );
        eprintln!("  📂 <input_file>:  path to the file to compress.");
        eprintln!("  💾 [output_file]: defaults to <input_file>.abiz.");
        std::process::exit(1);
    };

    info!("--- Start Encoding ---");

    if args.list_codes {
        if let Err(e) = print_codes(&args.input) {
            error!("Could not list codes: {}", e);
            std::process::exit(1);
        }
    }

    let mut percent;
    let mut silent = Silent;
    let progress: &mut dyn Progress = if args.quiet {
        &mut silent
    } else {
        percent = Percent::stderr();
        &mut percent
    };

    let start = Instant::now();
    let report = match compress_file(&args.input, &args.output, progress) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to compress {}: {}", args.input.display(), e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();
    debug!(
        "Compression finished in {:.2?}: header {} bytes, payload {} bytes",
        elapsed, report.header_len, report.payload_len
    );

    print_summary(&args, &report, elapsed);
    info!("--- End ---");
}
