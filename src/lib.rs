//! Library for converting icon sources into Apple Icon Image (.icns) files,
//! Windows icon (.ico) files, or sets of PNG files.
//!
//! A source is looked up by candidate name under a list of search roots and
//! may be a single image, an icon file that already has the requested
//! format, or a directory of pre-rendered sizes.  Images are only ever
//! scaled down: an ICNS file holds every canonical size up to the largest
//! image available, and nothing above it.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the ICNS file format.
//!
//! ```no_run
//! use icon_convert::{convert_icon, OutputFormat};
//!
//! let artifacts = convert_icon(&["icon"], &["build"], &OutputFormat::Icns)?;
//! println!("ICNS written to {}", artifacts[0].path.display());
//! # Ok::<(), icon_convert::ConversionError>(())
//! ```

#![warn(missing_docs)]

mod catalog;
mod collect;
mod config;
mod convert;
mod element;
mod error;
mod family;
mod input;
mod ostype;
mod output;
mod pngio;
mod probe;
mod resolve;

pub use catalog::CanonicalSize;
pub use collect::{collect_sized_files, extract_icns_to_png_set};
pub use config::ConvertConfig;
pub use convert::{convert_icon, IconArtifact, IconConverter, OutputFormat};
pub use element::IconElement;
pub use error::{ConversionError, Result};
pub use family::{encode_icns, IconFamily};
pub use ostype::OSType;
pub use probe::{ico_declared_sizes, is_icns, is_ico, is_png};
pub use resolve::{resolve_source, ResolvedSource};
