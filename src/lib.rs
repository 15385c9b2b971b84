mod compression;
pub use compression::{
    BitReader, Buffer, Cursor, DecompressError, Decompressed, Decompressor, EncodingMode, Header,
    Packet, PacketKind, Plane, PlaneWriter,
};

mod palette;
pub use palette::{ColorIndex, Palette};

mod rom;
pub use rom::{MappedRom, MappedSprite, Rom, RomLoadError, RomMap, RomMetadata, SpriteDefinition};

mod sprite;
pub use sprite::{to_ansi, BitPlane, Sprite};
