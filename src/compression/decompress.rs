use super::{BitReader, Buffer, EncodingMode, Packet, PacketKind, Plane, PlaneWriter};
use crate::Sprite;
use thiserror::Error;

/// Side length of a tile in pixels.
const TILE_SIZE: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    #[error("Stream truncated at bit {position}: {needed} more bits needed, {available} left")]
    TruncatedStream {
        position: usize,
        needed: usize,
        available: usize,
    },
}

/// The fixed 10 bit sprite header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width_tiles: u8,
    pub height_tiles: u8,
    pub buffer: Buffer,
    pub initial_packet: PacketKind,
}

impl Header {
    pub fn parse(reader: &mut BitReader) -> Result<Self, DecompressError> {
        let width_tiles = reader.consume(4)? as u8;
        let height_tiles = reader.consume(4)? as u8;
        let buffer = Buffer::from_bit(reader.read_bit()?);
        let initial_packet = PacketKind::from_bit(reader.read_bit()?);

        Ok(Self {
            width_tiles,
            height_tiles,
            buffer,
            initial_packet,
        })
    }

    pub const fn width_px(&self) -> usize {
        self.width_tiles as usize * TILE_SIZE
    }

    pub const fn height_px(&self) -> usize {
        self.height_tiles as usize * TILE_SIZE
    }

    pub const fn total_px(&self) -> usize {
        self.width_px() * self.height_px()
    }
}

impl Packet {
    pub fn decode(kind: PacketKind, reader: &mut BitReader) -> Result<Self, DecompressError> {
        match kind {
            PacketKind::Rle => Self::decode_run(reader),
            PacketKind::Literal => Self::decode_literal(reader),
        }
    }

    fn decode_run(reader: &mut BitReader) -> Result<Self, DecompressError> {
        // unary prefix, terminating zero included in both value and width
        let mut prefix: u64 = 0;
        let mut width: usize = 0;
        loop {
            let bit = reader.read_bit()?;
            prefix = prefix.checked_mul(2).map_or(u64::MAX, |p| p | u64::from(bit));
            width += 1;

            if !bit {
                break;
            }
        }

        let extra = match u32::try_from(width) {
            Ok(bits) if bits <= 64 => reader.consume(bits)?,
            _ => {
                // prefix has already saturated
                reader.skip(width)?;
                u64::MAX
            }
        };

        Ok(Self::Run {
            length: prefix.saturating_add(extra).saturating_add(1),
        })
    }

    fn decode_literal(reader: &mut BitReader) -> Result<Self, DecompressError> {
        let mut cells = Vec::new();

        loop {
            let symbol = reader.consume(2)? as u8;
            if symbol == 0b00 {
                break;
            }

            cells.push(symbol >> 1);
            cells.push(symbol & 1);
        }

        Ok(Self::Literal { cells })
    }
}

impl EncodingMode {
    /// `0` is mode 1, `10` mode 2, `11` mode 3.
    pub fn read(reader: &mut BitReader) -> Result<Self, DecompressError> {
        if !reader.read_bit()? {
            return Ok(Self::Mode1);
        }

        if reader.read_bit()? {
            Ok(Self::Mode3)
        } else {
            Ok(Self::Mode2)
        }
    }
}

/// Output of a full decode session.
#[derive(Debug, Clone)]
pub struct Decompressed {
    pub sprite: Sprite,
    /// `None` for empty sprites, which stop after the header.
    pub mode: Option<EncodingMode>,
    pub bits_read: usize,
}

impl Decompressed {
    pub const fn bytes_read(&self) -> usize {
        self.bits_read.div_ceil(8)
    }
}

/// One sprite decode session over its own reader.
#[derive(Debug, Clone)]
pub struct Decompressor<'a> {
    reader: BitReader<'a>,
}

impl<'a> Decompressor<'a> {
    /// Decode the sprite starting at byte `offset` of `src`.
    pub fn new(src: &'a [u8], offset: usize) -> Self {
        Self {
            reader: BitReader::starting_at(src, offset),
        }
    }

    pub fn decompress(mut self) -> Result<Decompressed, DecompressError> {
        let header = Header::parse(&mut self.reader)?;
        log::debug!("header: {:?}", header);

        let (width, height) = (header.width_px(), header.height_px());
        let size = (u32::from(header.width_tiles), u32::from(header.height_tiles));

        if header.total_px() == 0 {
            return Ok(Decompressed {
                sprite: Sprite::new(size, Plane::new(width, height), Plane::new(width, height)),
                mode: None,
                bits_read: self.reader.bits_read(),
            });
        }

        let mut planes = [Plane::new(width, height), Plane::new(width, height)];
        let mut buffer = header.buffer;

        self.fill_plane(&mut planes[buffer.index()], header.initial_packet)?;
        buffer = buffer.toggled();

        let mode = EncodingMode::read(&mut self.reader)?;
        let next_packet = PacketKind::from_bit(self.reader.read_bit()?);
        log::debug!("mode: {:?}, second pass starts with {:?}", mode, next_packet);

        self.fill_plane(&mut planes[buffer.index()], next_packet)?;
        buffer = buffer.toggled();

        // two toggles put the selector back on the plane filled first
        let [a, b] = planes;
        let (mut primary, mut secondary) = match buffer {
            Buffer::A => (a, b),
            Buffer::B => (b, a),
        };

        mode.reconstruct(&mut primary, &mut secondary);

        Ok(Decompressed {
            sprite: Sprite::new(size, primary, secondary),
            mode: Some(mode),
            bits_read: self.reader.bits_read(),
        })
    }

    /// Decode alternating packets into `plane` until every cell is written.
    fn fill_plane(&mut self, plane: &mut Plane, first: PacketKind) -> Result<(), DecompressError> {
        let mut writer = PlaneWriter::new(plane);
        let mut kind = first;
        let mut packets = 0;
        let mut dropped = 0;

        while !writer.is_full() {
            let packet = Packet::decode(kind, &mut self.reader)?;
            log::trace!("{:?} packet: {:?}", packet.kind(), packet);

            dropped += packet.write_to(&mut writer);
            packets += 1;
            kind = kind.flipped();
        }

        log::debug!(
            "filled plane with {} packets, {} excess cells dropped, cursor at {:?}",
            packets,
            dropped,
            writer.cursor()
        );

        Ok(())
    }
}
