use image::Rgb;

/// Four shades, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette([Rgb<u8>; 4]);

/// A 2 bit colour index, `2 * primary + secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorIndex(u8);

impl ColorIndex {
    pub const fn new(index: u8) -> Self {
        assert!(index < 4, "ColorIndex must be less than 4");

        ColorIndex(index)
    }

    pub const fn from_planes(primary: u8, secondary: u8) -> Self {
        ColorIndex(((primary & 1) << 1) | (secondary & 1))
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Palette {
    /// White, light gray, dark gray, black.
    pub const GRAYSCALE: Palette = Palette([
        Rgb([0xff, 0xff, 0xff]),
        Rgb([0xaa, 0xaa, 0xaa]),
        Rgb([0x55, 0x55, 0x55]),
        Rgb([0x00, 0x00, 0x00]),
    ]);

    /// The green tint of the original handheld's LCD.
    pub const GREEN: Palette = Palette([
        Rgb([0x9b, 0xbc, 0x0f]),
        Rgb([0x8b, 0xac, 0x0f]),
        Rgb([0x30, 0x62, 0x30]),
        Rgb([0x0f, 0x38, 0x0f]),
    ]);

    pub const fn new(colors: [Rgb<u8>; 4]) -> Self {
        Palette(colors)
    }

    pub const fn get(&self, index: ColorIndex) -> Rgb<u8> {
        self.0[index.0 as usize]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::GRAYSCALE
    }
}
