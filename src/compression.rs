mod bits;
pub use bits::BitReader;

mod decompress;
pub use decompress::{DecompressError, Decompressed, Decompressor, Header};

mod plane;
pub use plane::{Cursor, Plane, PlaneWriter};

mod reconstruct;

/// Grammar of the next packet in a plane's packet stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Rle,
    Literal,
}

impl PacketKind {
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::Literal
        } else {
            Self::Rle
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Rle => Self::Literal,
            Self::Literal => Self::Rle,
        }
    }
}

/// Which of the two scratch planes the next pass writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    A,
    B,
}

impl Buffer {
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::B
        } else {
            Self::A
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Selects which reconstruction steps run once both planes are filled.
///
/// | mode    | code | unroll secondary | unroll primary | secondary ^= primary |
/// |---------|------|------------------|----------------|----------------------|
/// | `Mode1` | `0`  | yes              | yes            | no                   |
/// | `Mode2` | `10` | no               | yes            | yes                  |
/// | `Mode3` | `11` | yes              | yes            | yes                  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    Mode1,
    Mode2,
    Mode3,
}

impl EncodingMode {
    pub const fn unrolls_secondary(self) -> bool {
        !matches!(self, Self::Mode2)
    }

    pub const fn combines(self) -> bool {
        !matches!(self, Self::Mode1)
    }
}

/// A single decoded packet, before its cells are placed into a plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// A run of `length` zero symbols, i.e. `2 * length` zero cells.
    /// Saturates at `u64::MAX` for absurdly long prefixes.
    Run { length: u64 },
    /// Cells of the non-terminator symbols, high bit first.
    Literal { cells: Vec<u8> },
}

impl Packet {
    pub const fn kind(&self) -> PacketKind {
        match self {
            Self::Run { .. } => PacketKind::Rle,
            Self::Literal { .. } => PacketKind::Literal,
        }
    }

    pub fn cell_count(&self) -> u64 {
        match self {
            Self::Run { length } => length.saturating_mul(2),
            Self::Literal { cells } => cells.len() as u64,
        }
    }

    /// Hand the packet's cells to `writer`. Returns the number of cells dropped
    /// because the plane ran out of columns.
    pub fn write_to(&self, writer: &mut PlaneWriter) -> u64 {
        let count = self.cell_count();

        let stored = match self {
            Self::Run { .. } => {
                let take = usize::try_from(count).unwrap_or(usize::MAX);
                writer.write(std::iter::repeat(0).take(take))
            }
            Self::Literal { cells } => writer.write(cells.iter().copied()),
        };

        count - stored as u64
    }
}
