use std::{fs, path::Path};
use thiserror::Error;

use crate::{DecompressError, Decompressor, Sprite};

mod map;
pub use map::{RomMap, RomMetadata, SpriteDefinition};

/// A raw ROM dump (or any buffer holding compressed sprites).
#[derive(Debug, Clone)]
pub struct Rom {
    data: Vec<u8>,
    crc: u32,
}

impl Rom {
    pub fn new(data: Vec<u8>) -> Self {
        let crc = crc32fast::hash(&data);
        Self { data, crc }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RomLoadError> {
        Ok(Self::new(fs::read(path.as_ref())?))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub const fn crc(&self) -> u32 {
        self.crc
    }
}

#[derive(Debug, Clone)]
pub struct MappedRom {
    pub metadata: RomMetadata,
    pub sprites: Vec<MappedSprite>,
}

#[derive(Debug, Clone)]
pub struct MappedSprite {
    pub name: String,
    pub category: Option<String>,
    pub offset: usize,
    pub sprite: Sprite,
}

#[derive(Error, Debug)]
pub enum RomLoadError {
    #[error("Failed to read ROM file")]
    Read(#[from] std::io::Error),
    #[error("Failed to decompress sprite {name}")]
    Decompress {
        name: String,
        #[source]
        source: DecompressError,
    },
    #[error("No compatible data map found for the ROM")]
    IncompatibleMap,
    #[error("Sprite definition for {name} expects {expected:?} tiles but decoded {found:?}")]
    InvalidSpriteSize {
        name: String,
        expected: (u32, u32),
        found: (u32, u32),
    },
}

impl MappedRom {
    /// Decode every sprite the map lists. Fails if the map does not name the
    /// ROM's CRC.
    pub fn new(rom: &Rom, map: &RomMap) -> Result<Self, RomLoadError> {
        let metadata = map
            .metadata_for(rom)
            .ok_or(RomLoadError::IncompatibleMap)?
            .clone();

        Self::decode_sprites(rom, map, metadata)
    }

    /// Like [`MappedRom::new`], without checking the CRC.
    pub fn new_forced(rom: &Rom, map: &RomMap) -> Result<Self, RomLoadError> {
        let metadata = map.metadata_for(rom).cloned().unwrap_or_else(|| RomMetadata {
            name: "unknown".to_string(),
            crc: rom.crc(),
        });

        Self::decode_sprites(rom, map, metadata)
    }

    fn decode_sprites(
        rom: &Rom,
        map: &RomMap,
        metadata: RomMetadata,
    ) -> Result<Self, RomLoadError> {
        let mut sprites = Vec::with_capacity(map.sprites.len());

        for definition in &map.sprites {
            let decompressed = Decompressor::new(rom.data(), definition.offset)
                .decompress()
                .map_err(|source| RomLoadError::Decompress {
                    name: definition.name.clone(),
                    source,
                })?;

            let bytes_read = decompressed.bytes_read();
            let sprite = decompressed.sprite;
            if let Some(expected) = definition.size {
                if expected != sprite.size {
                    return Err(RomLoadError::InvalidSpriteSize {
                        name: definition.name.clone(),
                        expected,
                        found: sprite.size,
                    });
                }
            }

            log::debug!(
                "decoded {} at {:#07x} ({} bytes)",
                definition.name,
                definition.offset,
                bytes_read
            );

            sprites.push(MappedSprite {
                name: definition.name.clone(),
                category: definition.category.clone(),
                offset: definition.offset,
                sprite,
            });
        }

        Ok(Self { metadata, sprites })
    }
}
