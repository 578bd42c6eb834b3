use crate::ostype::OSType;

/// One of the fixed square pixel dimensions an ICNS file is built from.
///
/// Variants are declared in ascending order, so the derived `Ord` sorts by
/// pixel size.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CanonicalSize {
    /// 16x16 pixels.
    Px16,
    /// 32x32 pixels.
    Px32,
    /// 64x64 pixels.
    Px64,
    /// 128x128 pixels.
    Px128,
    /// 256x256 pixels.
    Px256,
    /// 512x512 pixels.
    Px512,
    /// 1024x1024 pixels.
    Px1024,
}

impl CanonicalSize {
    /// Every canonical size, smallest first.
    pub const ALL: [CanonicalSize; 7] = [CanonicalSize::Px16,
                                         CanonicalSize::Px32,
                                         CanonicalSize::Px64,
                                         CanonicalSize::Px128,
                                         CanonicalSize::Px256,
                                         CanonicalSize::Px512,
                                         CanonicalSize::Px1024];

    /// Returns the width (and height) of this size, in pixels.
    ///
    /// # Examples
    /// ```
    /// use icon_convert::CanonicalSize;
    /// assert_eq!(CanonicalSize::Px256.pixels(), 256);
    /// ```
    pub fn pixels(self) -> u32 {
        match self {
            CanonicalSize::Px16 => 16,
            CanonicalSize::Px32 => 32,
            CanonicalSize::Px64 => 64,
            CanonicalSize::Px128 => 128,
            CanonicalSize::Px256 => 256,
            CanonicalSize::Px512 => 512,
            CanonicalSize::Px1024 => 1024,
        }
    }

    /// Returns the canonical size with exactly the given pixel dimension.
    pub fn from_pixels(pixels: u32) -> Option<CanonicalSize> {
        CanonicalSize::ALL.iter().copied().find(|size| size.pixels() == pixels)
    }

    /// Returns the OSTypes that must each carry this size's image data, in
    /// the order they are written.  Newer tags come before their legacy
    /// aliases recognized by older versions of macOS.
    ///
    /// # Examples
    /// ```
    /// use icon_convert::{CanonicalSize, OSType};
    /// assert_eq!(CanonicalSize::Px32.ostypes(),
    ///            &[OSType(*b"icp5"), OSType(*b"ic11")]);
    /// ```
    pub fn ostypes(self) -> &'static [OSType] {
        match self {
            CanonicalSize::Px16 => const { &[OSType(*b"icp4")] },
            CanonicalSize::Px32 => const { &[OSType(*b"icp5"), OSType(*b"ic11")] },
            CanonicalSize::Px64 => const { &[OSType(*b"icp6"), OSType(*b"ic12")] },
            CanonicalSize::Px128 => const { &[OSType(*b"ic07")] },
            CanonicalSize::Px256 => const { &[OSType(*b"ic08"), OSType(*b"ic13")] },
            CanonicalSize::Px512 => const { &[OSType(*b"ic09"), OSType(*b"ic14")] },
            CanonicalSize::Px1024 => const { &[OSType(*b"ic10")] },
        }
    }

    /// Get the canonical size written under the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<CanonicalSize> {
        CanonicalSize::ALL
            .iter()
            .copied()
            .find(|size| size.ostypes().contains(&ostype))
    }

    /// Returns every canonical size no larger than `max_pixels`, smallest
    /// first.  Sizes above it are left out; nothing is ever upscaled.
    pub fn up_to(max_pixels: u32) -> Vec<CanonicalSize> {
        CanonicalSize::ALL
            .iter()
            .copied()
            .filter(|size| size.pixels() <= max_pixels)
            .collect()
    }
}
