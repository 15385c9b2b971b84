use crate::Rom;
use serde::{Deserialize, Serialize};

/// Describes where the compressed sprites of one or more ROM dumps live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RomMap {
    #[serde(default)]
    pub supported_roms: Vec<RomMetadata>,

    #[serde(rename = "sprite", default)]
    pub sprites: Vec<SpriteDefinition>,
}

impl RomMap {
    pub fn parse(map: &str) -> Result<RomMap, toml::de::Error> {
        toml::de::from_str(map)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn is_compatible_with(&self, rom: &Rom) -> bool {
        self.metadata_for(rom).is_some()
    }

    pub fn metadata_for(&self, rom: &Rom) -> Option<&RomMetadata> {
        self.supported_roms
            .iter()
            .find(|rom_type| rom_type.crc == rom.crc())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RomMetadata {
    pub name: String,
    pub crc: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpriteDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Byte offset of the compressed stream inside the ROM.
    pub offset: usize,

    /// Expected size in tiles, checked after decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(u32, u32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"
        [[supported_roms]]
        name = "Test Cartridge"
        crc = 0xCBF43926

        [[sprite]]
        name = "bulb"
        category = "front"
        offset = 0x10
        size = [5, 5]

        [[sprite]]
        name = "ghost"
        offset = 32
    "#;

    #[test]
    fn parses_sprite_entries() {
        let map = RomMap::parse(MAP).unwrap();

        assert_eq!(map.supported_roms[0].name, "Test Cartridge");
        assert_eq!(map.sprites.len(), 2);
        assert_eq!(map.sprites[0].offset, 0x10);
        assert_eq!(map.sprites[0].size, Some((5, 5)));
        assert_eq!(map.sprites[0].category.as_deref(), Some("front"));
        assert_eq!(map.sprites[1].size, None);
    }

    #[test]
    fn written_maps_parse_back() {
        let map = RomMap::parse(MAP).unwrap();
        let text = map.to_toml().unwrap();

        assert_eq!(RomMap::parse(&text).unwrap(), map);
    }

    #[test]
    fn matches_rom_by_crc() {
        let map = RomMap::parse(MAP).unwrap();

        // crc32 of "123456789"
        assert!(map.is_compatible_with(&Rom::new(b"123456789".to_vec())));
        assert!(!map.is_compatible_with(&Rom::new(b"12345678".to_vec())));
    }

    #[test]
    fn rejects_missing_offset() {
        assert!(RomMap::parse("[[sprite]]\nname = \"x\"\n").is_err());
    }
}
