//! Converts an icon source into an ICNS file, an ICO file, or a PNG set.
//!
//! ```shell
//! RUST_LOG=debug cargo run --example convert <format> <root> <candidate>...
//! # e.g. cargo run --example convert icns build icon icons
//! ```
//!
//! Generated files are written to the system temporary directory, or to
//! `$ICON_OUTPUT_DIR` when it is set.

use icon_convert::{ConvertConfig, IconConverter, OutputFormat};
use std::env;
use std::error::Error;
use std::process;
use std::str::FromStr;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        println!("Usage: convert <icns|ico|set|EXT> <root> <candidate>...");
        return;
    }
    let format = OutputFormat::from_str(&args[0]).unwrap_or_else(|err| {
        eprintln!("Error: {}", err);
        process::exit(2);
    });

    let mut config = ConvertConfig::default();
    if let Some(dir) = env::var_os("ICON_OUTPUT_DIR") {
        config = config.with_output_dir(dir);
    }

    let converter = IconConverter::new(config);
    match converter.convert(&args[2..], &args[1..2], &format) {
        Ok(artifacts) => {
            for artifact in artifacts {
                match artifact.size {
                    Some(size) => {
                        println!("{0}x{0}\t{1}", size, artifact.path.display())
                    }
                    None => println!("{}", artifact.path.display()),
                }
            }
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            process::exit(1);
        }
    }
}
