use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error, ErrorKind, Read, Write};

use crate::catalog::CanonicalSize;
use crate::ostype::OSType;
use crate::probe;

/// The length of an icon element header, in bytes:
pub(crate) const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One tagged chunk in an ICNS file: an OSType followed by its data
/// payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconElement {
    /// The OSType for this element (e.g. `ic08` or `icp4`).
    pub ostype: OSType,
    /// The encoded data payload for this element.
    pub data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Returns the canonical size this element is written for, or `None`
    /// if the OSType is not one this crate produces.
    pub fn canonical_size(&self) -> Option<CanonicalSize> {
        CanonicalSize::from_ostype(self.ostype)
    }

    /// Returns true if the payload is a PNG file.
    pub fn is_png(&self) -> bool {
        probe::is_png(&self.data)
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::new(ErrorKind::InvalidData,
                                  "invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data)?;
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.ostype.as_bytes())?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    /// Appends the encoded element to an in-memory buffer.
    pub(crate) fn append_to(&self, buffer: &mut Vec<u8>) {
        let mut length = [0u8; 4];
        BigEndian::write_u32(&mut length, self.total_length());
        buffer.extend_from_slice(self.ostype.as_bytes());
        buffer.extend_from_slice(&length);
        buffer.extend_from_slice(&self.data);
    }
}
