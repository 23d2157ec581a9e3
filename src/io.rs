//! Various traits to help parsing of DNS messages.

use crate::bail;
use byteorder::{ReadBytesExt, BE};
use std::io;
use std::io::Cursor;
use std::io::SeekFrom;

/// The longest a domain name may be in its wire form.
const MAX_NAME_LEN: usize = 255;

pub trait SeekExt: io::Seek {
    /// Returns the number of bytes remaining to be consumed.
    /// This is used as a way to check for malformed input.
    fn remaining(&mut self) -> io::Result<u64>;
}

impl<'a> SeekExt for Cursor<&'a [u8]> {
    fn remaining(&mut self) -> io::Result<u64> {
        let len = self.get_ref().len() as u64;
        Ok(len.saturating_sub(self.position()))
    }
}

/// All types that implement `Read` and `Seek` get methods defined
/// in `DNSReadExt` for free.
impl<R: io::Read + ?Sized + io::Seek> DNSReadExt for R {}

/// Extensions to io::Read to add some DNS specific types.
pub trait DNSReadExt: io::Read + io::Seek {
    /// Reads a domain name, following compression pointers.
    ///
    /// The returned name is fully qualified (it ends with a dot), and the
    /// root is returned as ".". The reader is left just past the name as it
    /// appears at its original position.
    ///
    /// # Errors
    ///
    /// Will return a io::Error(InvalidData) if the name is not ASCII, is too
    /// long, or contains a pointer that doesn't point backwards.
    fn read_qname(&mut self) -> io::Result<String> {
        let mut qname = String::new();

        // Position to restore once the first pointer has been followed.
        let mut resume = None;

        // Pointers must strictly decrease, which rules out loops.
        let mut limit = self.stream_position()?;

        loop {
            let len = self.read_u8()?;

            match len & 0xC0 {
                0x00 if len == 0 => break,

                // Plain label.
                0x00 => {
                    let mut label = vec![0; len.into()];
                    self.read_exact(&mut label)?;

                    if !label.is_ascii() {
                        bail!(InvalidData, "invalid label: not valid ascii");
                    }

                    // Ascii is always valid utf8.
                    qname.push_str(&String::from_utf8_lossy(&label));
                    qname.push('.');

                    if qname.len() > MAX_NAME_LEN {
                        bail!(InvalidData, "domain name longer than {} bytes", MAX_NAME_LEN);
                    }
                }

                // Compression
                0xC0 => {
                    let b2 = self.read_u8()? as u16;
                    let ptr = ((len as u16 & !0xC0) << 8 | b2) as u64;

                    if ptr >= limit {
                        bail!(
                            InvalidData,
                            "invalid compressed pointer pointing to future bytes"
                        );
                    }

                    if resume.is_none() {
                        resume = Some(self.stream_position()?);
                    }

                    limit = ptr;
                    self.seek(SeekFrom::Start(ptr))?;
                }

                _ => bail!(
                    InvalidData,
                    "unsupported compression type {0:b}",
                    len & 0xC0
                ),
            }
        }

        if let Some(pos) = resume {
            self.seek(SeekFrom::Start(pos))?;
        }

        if qname.is_empty() {
            qname.push('.'); // Root domain
        }

        Ok(qname)
    }

    /// Reads a 16 bit big endian value, as used for types and classes.
    fn read_u16be(&mut self) -> io::Result<u16> {
        self.read_u16::<BE>()
    }

    /// Reads a 32 bit big endian value, as used for TTLs.
    fn read_u32be(&mut self) -> io::Result<u32> {
        self.read_u32::<BE>()
    }
}
