//! Converts a PNG file into ICNS and/or ICO files.
//!
//! To create an ICNS file from a PNG, run:
//!
//! ```shell
//! cargo run --example png2icons <path/to/file.png> <path/to/output> -icns
//! # ICNS will be saved to path/to/output.icns
//! ```
//!
//! The output format flag is one of `-icns`, `-ico` (bitmap entries),
//! `-icop` (PNG entries), `-icowe` (bitmap entries below 64 pixels, PNG
//! entries above, for Windows executables) or `-all` (ICNS plus a `-icowe`
//! ICO).  Optional flags select the scaling algorithm (`-nn`, `-bl`, `-bc`,
//! `-bz`, `-hm` or `-bc2`; bicubic by default), reduce PNG entries to a
//! palette (`-colors <n>`, 1 to 256) and print progress (`-i`).

use png2icons::{Algorithm, ConvertOptions, Converter, Logger, OutputFormat};
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::str::FromStr;

fn usage() -> ! {
    println!("Usage: png2icons <input.png> <output-stem> \
              <-icns|-ico|-icop|-icowe|-all> [-nn|-bl|-bc|-bz|-hm|-bc2] \
              [-colors <n>] [-i]");
    process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        usage();
    }
    let input_path = Path::new(&args[0]);
    let output_stem = Path::new(&args[1]);
    let formats = match args[2].as_str() {
        "-all" => vec![OutputFormat::Icns, OutputFormat::IcoForExecutable],
        flag => {
            match OutputFormat::from_str(flag.trim_start_matches('-')) {
                Ok(format) => vec![format],
                Err(error) => {
                    println!("{}", error);
                    usage()
                }
            }
        }
    };

    let mut algorithm = Algorithm::default();
    let mut colors = 0;
    let mut verbose = false;
    let mut rest = args[3..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-i" => verbose = true,
            "-colors" => {
                colors = rest.next()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or_else(|| usage());
            }
            flag => {
                algorithm = Algorithm::from_str(flag.trim_start_matches('-'))
                    .unwrap_or_else(|error| {
                        println!("{}", error);
                        usage()
                    });
            }
        }
    }

    let logger = if verbose {
        env_logger::Builder::from_env(env_logger::Env::default()
                .default_filter_or("info"))
            .init();
        Logger::new(log::logger())
    } else {
        Logger::silent()
    };

    let input = fs::read(input_path).expect("failed to read PNG file");
    let mut converter = Converter::new().with_logger(logger);
    for format in formats {
        let options = ConvertOptions {
            format: format,
            algorithm: algorithm,
            colors: colors,
        };
        let output = match converter.convert(&input, &options) {
            Some(output) => output,
            None => {
                println!("failed to create {} output", format);
                process::exit(1);
            }
        };
        let output_path = output_stem.with_extension(format.extension());
        fs::write(&output_path, output).expect("failed to write icon file");
        println!("wrote {}", output_path.display());
    }
}
