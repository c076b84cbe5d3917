use crate::CompressionError;

type Result<T> = std::result::Result<T, CompressionError>;

/// Cursor over a compressed buffer paired with the output it produces.
///
/// Every write is checked against the declared length so that decoders fail
/// on overrun instead of truncating, and every read fails once the input is
/// exhausted.
pub struct DecompressionStream<'a> {
    input: &'a [u8],
    position: usize,
    output: Vec<u8>,
    expected: usize,
}

impl<'a> DecompressionStream<'a> {
    pub fn new(input: &'a [u8], expected: usize) -> Self {
        DecompressionStream {
            input,
            position: 0,
            output: Vec::with_capacity(expected.min(input.len().saturating_mul(8))),
            expected,
        }
    }

    pub fn tell(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn is_complete(&self) -> bool {
        self.output.len() >= self.expected
    }

    fn unexpected_end(&self) -> CompressionError {
        CompressionError::UnexpectedEnd {
            produced: self.output.len(),
            expected: self.expected,
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = *self
            .input
            .get(self.position)
            .ok_or_else(|| self.unexpected_end())?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(self.unexpected_end());
        }
        let input: &'a [u8] = self.input;
        let bytes = &input[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        if self.output.len() >= self.expected {
            return Err(CompressionError::Overrun {
                expected: self.expected,
            });
        }
        self.output.push(value);
        Ok(())
    }

    /// Move `count` bytes straight from input to output.
    pub fn copy_literals(&mut self, count: usize) -> Result<()> {
        if self.output.len() + count > self.expected {
            return Err(CompressionError::Overrun {
                expected: self.expected,
            });
        }
        let bytes = self.read_bytes(count)?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    pub fn repeat(&mut self, value: u8, count: usize) -> Result<()> {
        for _ in 0..count {
            self.write_u8(value)?;
        }
        Ok(())
    }

    /// Copy `length` bytes starting `displacement` bytes behind the end of the
    /// output. Source and destination may overlap.
    pub fn copy_back(&mut self, displacement: usize, length: usize) -> Result<()> {
        if displacement == 0 || displacement > self.output.len() {
            return Err(CompressionError::InvalidDisplacement {
                displacement,
                position: self.output.len(),
            });
        }
        for _ in 0..length {
            let value = self.output[self.output.len() - displacement];
            self.write_u8(value)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        if self.output.len() != self.expected {
            return Err(CompressionError::UnexpectedEnd {
                produced: self.output.len(),
                expected: self.expected,
            });
        }
        Ok(self.output)
    }
}
