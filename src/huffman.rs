use crate::bin_streams::DecompressionStream;
use crate::CompressionError;
use tracing::trace;

type Result<T> = std::result::Result<T, CompressionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolWidth {
    Nibble,
    Byte,
}

impl SymbolWidth {
    pub fn bits(&self) -> usize {
        match self {
            SymbolWidth::Nibble => 4,
            SymbolWidth::Byte => 8,
        }
    }
}

/// Decode a Huffman stream with an embedded tree into `length` bytes.
///
/// Layout: tree size byte, root node byte, `2 * tree size` bytes of child
/// nodes, then the code as little-endian 32-bit words read from the most
/// significant bit down. Node bits 0-5 hold the child offset, bit 7 marks the
/// left child as a leaf and bit 6 the right child.
pub fn decompress(bytes: &[u8], length: usize, width: SymbolWidth) -> Result<Vec<u8>> {
    if length == 0 {
        return Ok(Vec::new());
    }
    let symbol_count = length.saturating_mul(8) / width.bits();
    let mut stream = DecompressionStream::new(bytes, symbol_count);
    let tree_size = stream.read_u8()? as usize;
    let root = stream.read_u8()?;
    let tree = stream.read_bytes(tree_size * 2)?;
    trace!(tree_size, root, symbol_count, "Huffman tree loaded");

    let mut code = 0u32;
    let mut next = 0usize;
    let mut pos = root;
    let mut bit = 0usize;
    while !stream.is_complete() {
        if bit % 32 == 0 {
            code = stream.read_u32_le()?;
        }
        next += (pos & 0x3F) as usize * 2 + 2;
        let direction = if (code >> (31 - bit % 32)) & 1 == 0 { 2 } else { 1 };
        let leaf = (pos >> 5 >> direction) & 1 != 0;
        let index = next - direction;
        pos = *tree
            .get(index)
            .ok_or(CompressionError::InvalidTreeNode(index))?;
        if leaf {
            stream.write_u8(pos)?;
            pos = root;
            next = 0;
        }
        bit += 1;
    }

    let symbols = stream.finish()?;
    Ok(match width {
        SymbolWidth::Byte => symbols,
        SymbolWidth::Nibble => symbols
            .chunks(2)
            .map(|pair| (pair[1] & 0xF) << 4 | (pair[0] & 0xF))
            .collect(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn huffman_byte_symbols_single_level_tree() {
        // Root with two leaf children 'A' (bit 0) and 'B' (bit 1); code 0110.
        let compressed = [0x01, 0xC0, b'A', b'B', 0x00, 0x00, 0x00, 0x60];
        let actual = decompress(&compressed, 4, SymbolWidth::Byte).unwrap();
        assert_eq!(b"ABBA".to_vec(), actual);
    }

    #[test]
    fn huffman_byte_symbols_two_level_tree() {
        // A = 0, B = 10, C = 11; code 0 10 11 0.
        let compressed = [0x02, 0x80, b'A', 0xC0, b'B', b'C', 0x00, 0x00, 0x00, 0x58];
        let actual = decompress(&compressed, 4, SymbolWidth::Byte).unwrap();
        assert_eq!(b"ABCA".to_vec(), actual);
    }

    #[test]
    fn huffman_nibble_symbols_pack_low_first() {
        let compressed = [0x01, 0xC0, 0x01, 0x02, 0x00, 0x00, 0x00, 0x60];
        let actual = decompress(&compressed, 2, SymbolWidth::Nibble).unwrap();
        assert_eq!(vec![0x21, 0x12], actual);
    }

    #[test]
    fn huffman_code_spanning_words() {
        // 33 symbols force a second code word to be read.
        let mut compressed = vec![0x01, 0xC0, b'A', b'B'];
        compressed.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        compressed.extend_from_slice(&0x0000_0000u32.to_le_bytes());
        let actual = decompress(&compressed, 33, SymbolWidth::Byte).unwrap();
        let mut expected = vec![b'B'; 32];
        expected.push(b'A');
        assert_eq!(expected, actual);
    }

    #[test]
    fn huffman_node_outside_tree_fails() {
        // Root offset points well past the two-byte tree.
        let compressed = [0x01, 0xFF, b'A', b'B', 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            decompress(&compressed, 1, SymbolWidth::Byte),
            Err(CompressionError::InvalidTreeNode(_))
        ));
    }

    #[test]
    fn huffman_truncated_code_fails() {
        let compressed = [0x01, 0xC0, b'A', b'B'];
        assert!(matches!(
            decompress(&compressed, 1, SymbolWidth::Byte),
            Err(CompressionError::UnexpectedEnd { .. })
        ));
    }
}
