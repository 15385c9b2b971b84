use super::DecompressError;

/// Forward-only MSB-first bit cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    src: &'a [u8],
    /// absolute position in bits from the start of `src`
    position: usize,
    start: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self::starting_at(src, 0)
    }

    /// Start reading at byte `offset`. An offset past the end is allowed, every
    /// read from it fails with [`DecompressError::TruncatedStream`].
    pub fn starting_at(src: &'a [u8], offset: usize) -> Self {
        let start = offset.saturating_mul(8);

        Self {
            src,
            position: start,
            start,
        }
    }

    /// Bits consumed since the reader was created.
    pub fn bits_read(&self) -> usize {
        self.position - self.start
    }

    pub fn remaining(&self) -> usize {
        (self.src.len() * 8).saturating_sub(self.position)
    }

    fn ensure(&self, needed: usize) -> Result<(), DecompressError> {
        let available = self.remaining();
        if needed > available {
            return Err(DecompressError::TruncatedStream {
                position: self.bits_read(),
                needed,
                available,
            });
        }

        Ok(())
    }

    fn next_bit(&mut self) -> u64 {
        let byte = self.src[self.position / 8];
        let shift = 7 - (self.position % 8);
        self.position += 1;

        u64::from((byte >> shift) & 1)
    }

    pub fn read_bit(&mut self) -> Result<bool, DecompressError> {
        self.ensure(1)?;
        Ok(self.next_bit() != 0)
    }

    /// Read the next `bits` bits as an unsigned integer, most significant bit
    /// first. Nothing is consumed if fewer than `bits` bits remain.
    pub fn consume(&mut self, bits: u32) -> Result<u64, DecompressError> {
        assert!(bits <= 64, "Cannot consume more than 64 bits at once");
        self.ensure(bits as usize)?;

        let mut value = 0;
        for _ in 0..bits {
            value = (value << 1) | self.next_bit();
        }

        Ok(value)
    }

    pub fn skip(&mut self, bits: usize) -> Result<(), DecompressError> {
        self.ensure(bits)?;
        self.position += bits;
        Ok(())
    }
}
