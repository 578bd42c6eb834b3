use image::DynamicImage;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::catalog::CanonicalSize;
use crate::collect;
use crate::config::ConvertConfig;
use crate::error::{ConversionError, IoResultExt, Result};
use crate::family::encode_icns;
use crate::input::InputInfo;
use crate::output::{self, OutputFile};
use crate::probe;
use crate::resolve::{resolve_source, ResolvedSource};

/// The kind of artifact a conversion produces.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum OutputFormat {
    /// A multi-resolution Apple Icon Image (`.icns`).
    Icns,
    /// A single-resolution Windows icon (`.ico`).
    Ico,
    /// A flat set of PNG files, one per size.
    Set,
    /// Any other single-file extension (without the dot), such as `png`.
    /// Such a format can only be satisfied by a source that already has
    /// that extension.
    Extension(String),
}

impl OutputFormat {
    /// Returns the name of the format, as accepted by `from_str`.
    pub fn name(&self) -> &str {
        match self {
            OutputFormat::Icns => "icns",
            OutputFormat::Ico => "ico",
            OutputFormat::Set => "set",
            OutputFormat::Extension(extension) => extension,
        }
    }

    /// Returns the extension (including the dot) of a single file that
    /// already satisfies this format.  A set is satisfied by a `.png`.
    ///
    /// # Examples
    /// ```
    /// use icon_convert::OutputFormat;
    /// assert_eq!(OutputFormat::Icns.single_file_extension(), ".icns");
    /// assert_eq!(OutputFormat::Set.single_file_extension(), ".png");
    /// ```
    pub fn single_file_extension(&self) -> String {
        match self {
            OutputFormat::Set => ".png".to_string(),
            other => format!(".{}", other.name()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<OutputFormat, String> {
        let name = input.trim().trim_start_matches('.').to_ascii_lowercase();
        match name.as_str() {
            "" => Err(format!("invalid output format {:?}", input)),
            "icns" => Ok(OutputFormat::Icns),
            "ico" => Ok(OutputFormat::Ico),
            "set" => Ok(OutputFormat::Set),
            _ => Ok(OutputFormat::Extension(name)),
        }
    }
}

/// One file produced (or passed through) by a conversion.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct IconArtifact {
    /// Location of the file.
    pub path: PathBuf,
    /// Pixel size of the image in the file, or `None` when the file is to
    /// be used as is (such as a container).
    pub size: Option<u32>,
}

impl IconArtifact {
    /// An artifact to be used verbatim.
    pub fn verbatim<P: Into<PathBuf>>(path: P) -> IconArtifact {
        IconArtifact {
            path: path.into(),
            size: None,
        }
    }

    /// An artifact holding an image of the given size.
    pub fn sized<P: Into<PathBuf>>(path: P, size: u32) -> IconArtifact {
        IconArtifact {
            path: path.into(),
            size: Some(size),
        }
    }
}

/// How a resolved source is handled before encoding.
enum Classified {
    /// Nothing left to encode.
    Finished(Vec<IconArtifact>),
    /// Encode from this input.
    Input(InputInfo),
}

/// Converts icon sources according to a [`ConvertConfig`].
#[derive(Debug, Clone, Default)]
pub struct IconConverter {
    config: ConvertConfig,
}

impl IconConverter {
    /// Creates a converter with the given configuration.
    pub fn new(config: ConvertConfig) -> IconConverter {
        IconConverter { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Resolves the first existing candidate under `roots` and converts it
    /// to `format`.
    ///
    /// A source that already has the format's extension is returned as is
    /// (after a size check for anything but ICNS).  A directory is treated
    /// as a set of pre-rendered sizes, and any other file as a single
    /// master image.  Nothing is ever upscaled: ICNS output only includes
    /// sizes up to the largest available image.
    pub fn convert<S, R>(&self,
                         candidates: &[S],
                         roots: &[R],
                         format: &OutputFormat)
                         -> Result<Vec<IconArtifact>>
        where S: AsRef<str>,
              R: AsRef<Path>
    {
        let extension = format.single_file_extension();
        let source = resolve_source(candidates, roots, Some(extension.as_str()))?;
        log::debug!("resolved icon source {} (directory: {})",
                    source.path.display(),
                    source.is_dir);

        let min_size = self.config.min_size_for(format);
        if source.has_extension(&extension) {
            return self.passthrough(source, format, min_size);
        }

        if let OutputFormat::Extension(_) = format {
            return Err(unsupported(format, &source.path));
        }
        let classified = if source.is_dir {
            self.directory_set(&source, format, min_size)?
        } else {
            self.single_image(&source, format, min_size)?
        };
        match classified {
            Classified::Finished(artifacts) => Ok(artifacts),
            Classified::Input(input) => self.encode(&source, format, &input),
        }
    }

    fn passthrough(&self,
                   source: ResolvedSource,
                   format: &OutputFormat,
                   min_size: u32)
                   -> Result<Vec<IconArtifact>> {
        if *format != OutputFormat::Icns {
            probe::validate_image_size(&source.path, min_size)?;
        }
        log::debug!("{} is already {}, using it as is",
                    source.path.display(),
                    format);
        Ok(vec![IconArtifact::verbatim(source.path)])
    }

    fn directory_set(&self,
                     source: &ResolvedSource,
                     format: &OutputFormat,
                     min_size: u32)
                     -> Result<Classified> {
        let files = collect::collect_sized_files(&source.path)?;
        if files.is_empty() {
            return Err(ConversionError::EmptyIconSet {
                path: source.path.clone(),
            });
        }
        if *format == OutputFormat::Set {
            return Ok(Classified::Finished(files));
        }

        let by_size: BTreeMap<u32, PathBuf> = files.into_iter()
            .filter_map(|file| file.size.map(|size| (size, file.path)))
            .collect();
        // ICNS only resizes down from the largest file, so it has no floor.
        let master_min = match format {
            OutputFormat::Icns => 0,
            _ => min_size,
        };
        let input = InputInfo::from_sized_files(by_size, master_min)
            .ok_or_else(|| {
                ConversionError::EmptyIconSet { path: source.path.clone() }
            })?;
        log::debug!("largest icon in {} is {}x{} ({})",
                    source.path.display(),
                    input.max_size,
                    input.max_size,
                    input.max_path.display());
        Ok(Classified::Input(input))
    }

    fn single_image(&self,
                    source: &ResolvedSource,
                    format: &OutputFormat,
                    min_size: u32)
                    -> Result<Classified> {
        if *format == OutputFormat::Set {
            let head = probe::read_head(&source.path, 4)?;
            if !probe::is_icns(&head) {
                return Err(unsupported(format, &source.path));
            }
            let artifacts =
                collect::extract_icns_to_png_set(&source.path,
                                                 &self.config.output_dir)?;
            return Ok(Classified::Finished(artifacts));
        }

        let image = probe::load_image(&source.path, min_size)?;
        Ok(Classified::Input(InputInfo::from_image(&source.path,
                                                   image,
                                                   min_size)))
    }

    fn encode(&self,
              source: &ResolvedSource,
              format: &OutputFormat,
              input: &InputInfo)
              -> Result<Vec<IconArtifact>> {
        let path = match format {
            OutputFormat::Icns => {
                let sizes = CanonicalSize::up_to(input.max_size);
                let bytes = encode_icns(&sizes, |size| {
                    input.png_payload(size, &self.config)
                })?;
                output::write_output(&self.config.output_dir, ".icns", &bytes)?
            }
            OutputFormat::Ico => {
                let image = self.fit_ico(input.max_image()?, &input.max_path);
                write_ico(&image, &input.max_path, &self.config.output_dir)?
            }
            _ => return Err(unsupported(format, &source.path)),
        };
        log::info!("wrote {} icon {}", format, path.display());
        Ok(vec![IconArtifact::verbatim(path)])
    }

    /// Shrinks `image` to the square ICO cap if either side exceeds it.
    fn fit_ico<'a>(&self,
                   image: &'a DynamicImage,
                   source: &Path)
                   -> Cow<'a, DynamicImage> {
        let cap = self.config.ico_max_size;
        if image.width() <= cap && image.height() <= cap {
            return Cow::Borrowed(image);
        }
        log::debug!("shrinking {} ({}x{}) to {}x{} for ICO",
                    source.display(),
                    image.width(),
                    image.height(),
                    cap,
                    cap);
        Cow::Owned(image.resize_exact(cap, cap, self.config.resize_filter))
    }
}

fn unsupported(format: &OutputFormat, path: &Path) -> ConversionError {
    ConversionError::UnsupportedFormat {
        format: format.name().to_string(),
        path: path.to_path_buf(),
    }
}

/// Writes `image` as a single-entry ICO file in `output_dir`.
fn write_ico(image: &DynamicImage,
             source: &Path,
             output_dir: &Path)
             -> Result<PathBuf> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let icon_image = ico::IconImage::from_rgba_data(width,
                                                    height,
                                                    rgba.into_raw());
    let entry = ico::IconDirEntry::encode(&icon_image)
        .context("cannot encode ICO image from", source)?;
    let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
    icon_dir.add_entry(entry);

    let mut output = OutputFile::create(output_dir, ".ico")?;
    icon_dir.write(output.writer()).context("cannot write", output.path())?;
    output.commit()
}

/// Converts an icon source using the default configuration.
///
/// See [`IconConverter::convert`].
pub fn convert_icon<S, R>(candidates: &[S],
                          roots: &[R],
                          format: &OutputFormat)
                          -> Result<Vec<IconArtifact>>
    where S: AsRef<str>,
          R: AsRef<Path>
{
    IconConverter::default().convert(candidates, roots, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_format() {
        assert_eq!("icns".parse(), Ok(OutputFormat::Icns));
        assert_eq!("ICO".parse(), Ok(OutputFormat::Ico));
        assert_eq!(" set ".parse(), Ok(OutputFormat::Set));
        assert_eq!(".png".parse(),
                   Ok(OutputFormat::Extension("png".to_string())));
        assert!("".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn format_extensions() {
        assert_eq!(OutputFormat::Ico.single_file_extension(), ".ico");
        assert_eq!(OutputFormat::Extension("png".to_string())
                       .single_file_extension(),
                   ".png");
        assert_eq!(OutputFormat::Set.to_string(), "set");
    }

    #[test]
    fn artifacts() {
        assert_eq!(IconArtifact::verbatim("a.icns").size, None);
        assert_eq!(IconArtifact::sized("a.png", 16).size, Some(16));
    }
}
