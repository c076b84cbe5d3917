use crate::bin_streams::DecompressionStream;
use crate::CompressionError;
use tracing::trace;

type Result<T> = std::result::Result<T, CompressionError>;

/// Decode a headerless run-length stream into exactly `length` bytes.
///
/// A flag byte with the high bit set repeats the following byte
/// `flag - 0x80 + 3` times; otherwise the next `flag + 1` bytes are copied.
pub fn decompress(bytes: &[u8], length: usize) -> Result<Vec<u8>> {
    let mut stream = DecompressionStream::new(bytes, length);
    while !stream.is_complete() {
        let flag = stream.read_u8()?;
        if flag >= 0x80 {
            let value = stream.read_u8()?;
            stream.repeat(value, (flag - 0x80) as usize + 3)?;
        } else {
            stream.copy_literals(flag as usize + 1)?;
        }
    }
    trace!(consumed = stream.tell(), length, "RLE decompressed");
    stream.finish()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rle_literals_then_run() {
        let compressed = [0x02, 0xAA, 0xBB, 0xCC, 0x81, 0xFF];
        let actual = decompress(&compressed, 7).unwrap();
        assert_eq!(vec![0xAA, 0xBB, 0xCC, 0xFF, 0xFF, 0xFF, 0xFF], actual);
    }

    #[test]
    fn rle_longest_run() {
        let compressed = [0xFF, 0x42];
        let actual = decompress(&compressed, 130).unwrap();
        assert_eq!(vec![0x42; 130], actual);
    }

    #[test]
    fn rle_zero_length_reads_nothing() {
        assert!(decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn rle_overrun_fails() {
        let compressed = [0x81, 0xFF];
        assert!(matches!(
            decompress(&compressed, 3),
            Err(CompressionError::Overrun { expected: 3 })
        ));
    }

    #[test]
    fn rle_literal_overrun_fails() {
        let compressed = [0x03, 0x01, 0x02, 0x03, 0x04];
        assert!(matches!(
            decompress(&compressed, 2),
            Err(CompressionError::Overrun { expected: 2 })
        ));
    }

    #[test]
    fn rle_truncated_fails() {
        let compressed = [0x04, 0x01, 0x02];
        assert!(matches!(
            decompress(&compressed, 5),
            Err(CompressionError::UnexpectedEnd { .. })
        ));
    }
}
