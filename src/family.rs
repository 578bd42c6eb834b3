use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error, ErrorKind, Read, Write};

use crate::catalog::CanonicalSize;
use crate::element::IconElement;

/// The first four bytes of an ICNS file:
pub(crate) const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icons stored in a single ICNS file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconFamily {
    /// The icon elements stored in the ICNS file.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Builds an icon family holding one element per OSType of each given
    /// size.
    ///
    /// The sizes are visited smallest first no matter what order they are
    /// passed in, and `payload_for` is called exactly once per distinct
    /// size.  Every OSType that aliases a size receives its own copy of the
    /// same payload.  The first error returned by `payload_for` is passed
    /// through and nothing is built.
    pub fn from_sizes<F, E>(sizes: &[CanonicalSize],
                            mut payload_for: F)
                            -> Result<IconFamily, E>
        where F: FnMut(CanonicalSize) -> Result<Vec<u8>, E>
    {
        let mut ordered = sizes.to_vec();
        ordered.sort();
        ordered.dedup();
        let mut family = IconFamily::new();
        for size in ordered {
            let payload = payload_for(size)?;
            for &ostype in size.ostypes() {
                family.elements.push(IconElement::new(ostype, payload.clone()));
            }
        }
        Ok(family)
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconFamily> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *ICNS_MAGIC_LITERAL {
            let msg = "not an icns file (wrong magic literal)";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let file_length = reader.read_u32::<BigEndian>()?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            file_position += element.total_length();
            family.elements.push(element);
        }
        Ok(family)
    }

    /// Writes the icon family to an ICNS file (or other writer).
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(ICNS_MAGIC_LITERAL)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        for element in &self.elements {
            element.write(writer.by_ref())?;
        }
        Ok(())
    }

    /// Encodes the whole icon family into memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for element in &self.elements {
            element.append_to(&mut body);
        }
        let mut header = [0u8; 8];
        header[..4].copy_from_slice(ICNS_MAGIC_LITERAL);
        BigEndian::write_u32(&mut header[4..],
                             body.len() as u32 + ICON_FAMILY_HEADER_LENGTH);
        let mut output = Vec::with_capacity(header.len() + body.len());
        output.extend_from_slice(&header);
        output.extend_from_slice(&body);
        output
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length += element.total_length();
        }
        length
    }
}

/// Encodes a complete ICNS file from a list of sizes and a function that
/// produces the PNG payload for each of them.
///
/// This is [`IconFamily::from_sizes`] followed by
/// [`IconFamily::to_bytes`]: the container is assembled entirely in memory,
/// so an error from `payload_for` never leaves a partial file behind.
///
/// # Examples
/// ```
/// use icon_convert::{encode_icns, CanonicalSize};
/// let bytes = encode_icns(&[CanonicalSize::Px16], |_| {
///     Ok::<_, std::io::Error>(b"png".to_vec())
/// }).unwrap();
/// assert_eq!(&bytes[..], b"icns\0\0\0\x13icp4\0\0\0\x0bpng");
/// ```
pub fn encode_icns<F, E>(sizes: &[CanonicalSize],
                         payload_for: F)
                         -> Result<Vec<u8>, E>
    where F: FnMut(CanonicalSize) -> Result<Vec<u8>, E>
{
    Ok(IconFamily::from_sizes(sizes, payload_for)?.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ostype::OSType;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn write_empty_icon_family() {
        let family = IconFamily::new();
        assert!(family.is_empty());
        assert_eq!(0, family.elements.len());
        let mut output: Vec<u8> = vec![];
        family.write(&mut output).expect("write failed");
        assert_eq!(b"icns\0\0\0\x08", &output as &[u8]);
        assert_eq!(output, family.to_bytes());
    }

    #[test]
    fn read_icon_family_with_fake_elements() {
        let input: Cursor<&[u8]> =
            Cursor::new(b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#");
        let family = IconFamily::read(input).expect("read failed");
        assert_eq!(2, family.elements.len());
        assert_eq!(OSType(*b"quux"), family.elements[0].ostype);
        assert_eq!(6, family.elements[0].data.len());
        assert_eq!(OSType(*b"baz!"), family.elements[1].ostype);
        assert_eq!(1, family.elements[1].data.len());
    }

    #[test]
    fn read_rejects_wrong_magic() {
        let input: Cursor<&[u8]> = Cursor::new(b"icnx\0\0\0\x08");
        let error = IconFamily::read(input).unwrap_err();
        assert_eq!(ErrorKind::InvalidData, error.kind());
    }

    #[test]
    fn write_icon_family_with_fake_elements() {
        let mut family = IconFamily::new();
        family.elements
            .push(IconElement::new(OSType(*b"quux"), b"foobar".to_vec()));
        family.elements
            .push(IconElement::new(OSType(*b"baz!"), b"#".to_vec()));
        let mut output: Vec<u8> = vec![];
        family.write(&mut output).expect("write failed");
        assert_eq!(b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#",
                   &output as &[u8]);
        assert_eq!(output, family.to_bytes());
    }

    #[test]
    fn aliases_carry_identical_payloads() {
        let family = IconFamily::from_sizes(&[CanonicalSize::Px32], |_| {
                Ok::<_, io::Error>(b"thirty-two".to_vec())
            })
            .unwrap();
        assert_eq!(2, family.elements.len());
        assert_eq!(OSType(*b"icp5"), family.elements[0].ostype);
        assert_eq!(OSType(*b"ic11"), family.elements[1].ostype);
        assert_eq!(family.elements[0].data, family.elements[1].data);
    }

    #[test]
    fn sizes_are_written_in_ascending_order_once_each() {
        let mut requested = Vec::new();
        let family = IconFamily::from_sizes(&[CanonicalSize::Px128,
                                              CanonicalSize::Px16,
                                              CanonicalSize::Px128],
                                            |size| {
                                                requested.push(size);
                                                Ok::<_, io::Error>(vec![0])
                                            })
            .unwrap();
        assert_eq!(requested, vec![CanonicalSize::Px16, CanonicalSize::Px128]);
        let ostypes: Vec<OSType> =
            family.elements.iter().map(|el| el.ostype).collect();
        assert_eq!(ostypes, vec![OSType(*b"icp4"), OSType(*b"ic07")]);
    }

    #[test]
    fn payload_error_aborts_encoding() {
        let mut calls = 0;
        let result = encode_icns(&CanonicalSize::ALL, |size| {
            calls += 1;
            if size == CanonicalSize::Px64 {
                Err("no payload")
            } else {
                Ok(vec![1, 2, 3])
            }
        });
        assert_eq!(result, Err("no payload"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn encoded_family_reads_back() {
        let bytes = encode_icns(&CanonicalSize::ALL, |size| {
                Ok::<_, io::Error>(vec![size.pixels() as u8; 5])
            })
            .unwrap();
        let family = IconFamily::read(Cursor::new(&bytes)).unwrap();
        assert_eq!(11, family.elements.len());
        assert_eq!(bytes.len() as u32, family.total_length());
        assert_eq!(bytes, family.to_bytes());
    }

    proptest! {
        #[test]
        fn header_length_matches_body(lengths in prop::collection::vec(0usize..300, 7)) {
            let bytes = encode_icns(&CanonicalSize::ALL, |size| {
                let index = CanonicalSize::ALL.iter().position(|s| *s == size).unwrap();
                Ok::<_, io::Error>(vec![0xAB; lengths[index]])
            }).unwrap();
            prop_assert_eq!(&bytes[..4], b"icns");
            let declared = BigEndian::read_u32(&bytes[4..8]) as usize;
            prop_assert_eq!(declared, bytes.len());

            let mut offset = 8;
            while offset < bytes.len() {
                let chunk = BigEndian::read_u32(&bytes[offset + 4..offset + 8]) as usize;
                prop_assert!(chunk >= 8);
                offset += chunk;
            }
            prop_assert_eq!(offset, bytes.len());
        }
    }
}
