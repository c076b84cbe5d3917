use std::io::{Cursor, Read};

use crate::EndianAwareIOError;

type Result<T> = std::result::Result<T, EndianAwareIOError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

pub trait EndianAwareReader {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_u16(&mut self, endian: Endian) -> Result<u16>;

    fn read_u32(&mut self, endian: Endian) -> Result<u32>;
}

impl Endian {
    /// Interpret an NW4C byte order mark as it appears in the file.
    pub fn from_bom(bytes: [u8; 2]) -> Option<Self> {
        match bytes {
            [0xFF, 0xFE] => Some(Endian::Little),
            [0xFE, 0xFF] => Some(Endian::Big),
            _ => None,
        }
    }

    pub fn bom(&self) -> [u8; 2] {
        match self {
            Endian::Little => [0xFF, 0xFE],
            Endian::Big => [0xFE, 0xFF],
        }
    }

    pub fn decode_u16(&self, bytes: &[u8]) -> Result<u16> {
        let arr = <[u8; 2]>::try_from(bytes).map_err(|_| EndianAwareIOError::ConversionError)?;
        Ok(match self {
            Endian::Little => u16::from_le_bytes(arr),
            Endian::Big => u16::from_be_bytes(arr),
        })
    }

    pub fn decode_u32(&self, bytes: &[u8]) -> Result<u32> {
        let arr = <[u8; 4]>::try_from(bytes).map_err(|_| EndianAwareIOError::ConversionError)?;
        Ok(match self {
            Endian::Little => u32::from_le_bytes(arr),
            Endian::Big => u32::from_be_bytes(arr),
        })
    }

    pub fn encode_u16(&self, value: u16) -> Vec<u8> {
        match self {
            Endian::Little => value.to_le_bytes().to_vec(),
            Endian::Big => value.to_be_bytes().to_vec(),
        }
    }

    pub fn encode_u32(&self, value: u32) -> Vec<u8> {
        match self {
            Endian::Little => value.to_le_bytes().to_vec(),
            Endian::Big => value.to_be_bytes().to_vec(),
        }
    }
}

impl EndianAwareReader for Cursor<&[u8]> {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, endian: Endian) -> Result<u16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        endian.decode_u16(&buf)
    }

    fn read_u32(&mut self, endian: Endian) -> Result<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        endian.decode_u32(&buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_u16() {
        assert_eq!(0xFE14, Endian::Little.decode_u16(&[0x14, 0xFE]).unwrap());
        assert_eq!(0xFE14, Endian::Big.decode_u16(&[0xFE, 0x14]).unwrap());
    }

    #[test]
    fn decode_u32() {
        assert_eq!(
            0xFE131415,
            Endian::Little.decode_u32(&[0x15, 0x14, 0x13, 0xFE]).unwrap()
        );
        assert_eq!(
            0xFE131415,
            Endian::Big.decode_u32(&[0xFE, 0x13, 0x14, 0x15]).unwrap()
        );
    }

    #[test]
    fn decode_wrong_size_fails() {
        assert!(Endian::Little.decode_u32(&[0x15, 0x14]).is_err());
    }

    #[test]
    fn encode_u32() {
        assert_eq!(vec![0x13, 0x12, 0x14, 0xFE], Endian::Little.encode_u32(0xFE141213));
        assert_eq!(vec![0xFE, 0x14, 0x12, 0x13], Endian::Big.encode_u32(0xFE141213));
    }

    #[test]
    fn bom_round_trip() {
        assert_eq!(Some(Endian::Little), Endian::from_bom(Endian::Little.bom()));
        assert_eq!(Some(Endian::Big), Endian::from_bom(Endian::Big.bom()));
        assert_eq!(None, Endian::from_bom([0, 0]));
    }

    #[test]
    fn cursor_reads_honor_endian() {
        let bytes: &[u8] = &[0x07, 0x01, 0x02, 0x01, 0x02];
        let mut cursor = Cursor::new(bytes);
        assert_eq!(0x07, cursor.read_u8().unwrap());
        assert_eq!(0x0201, cursor.read_u16(Endian::Little).unwrap());
        assert_eq!(0x0102, cursor.read_u16(Endian::Big).unwrap());
        assert!(cursor.read_u16(Endian::Big).is_err());
    }
}
