//! Lists the elements of an ICNS file.
//!
//! ```shell
//! cargo run --example icnsinfo <path/to/file.icns>
//! ```

use icon_convert::IconFamily;
use std::env;
use std::fs::File;
use std::io::BufReader;

fn main() {
    if env::args().count() != 2 {
        println!("Usage: icnsinfo <path>");
        return;
    }
    let path = env::args().nth(1).unwrap();
    let file = File::open(path).expect("failed to open file");
    let buffered = BufReader::new(file);
    let family = IconFamily::read(buffered).expect("failed to read ICNS file");
    println!("ICNS file contains {} element(s).", family.elements.len());
    for (index, element) in family.elements.iter().enumerate() {
        let size = element.canonical_size()
            .map(|size| format!("{0}x{0}", size.pixels()))
            .unwrap_or_else(|| "unknown size".to_string());
        println!("Element {}: {} ({}, {} byte {} payload)",
                 index,
                 element.ostype,
                 size,
                 element.data.len(),
                 if element.is_png() { "PNG" } else { "non-PNG" });
    }
}
