use crate::{ColorIndex, Palette, Plane};
use image::{imageops, RgbImage};

const TILE_SIZE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitPlane {
    /// High bit of the colour index.
    Primary,
    /// Low bit of the colour index.
    Secondary,
}

/// A fully decoded sprite: two finished bit-planes and its size in tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub size: (u32, u32),
    primary: Plane,
    secondary: Plane,
}

impl Sprite {
    pub fn new(size: (u32, u32), primary: Plane, secondary: Plane) -> Self {
        let (width, height) = ((size.0 * TILE_SIZE) as usize, (size.1 * TILE_SIZE) as usize);
        for plane in [&primary, &secondary] {
            assert_eq!(
                (plane.width(), plane.height()),
                (width, height),
                "Plane size does not match sprite size"
            );
        }

        Sprite {
            size,
            primary,
            secondary,
        }
    }

    pub const fn width_px(&self) -> u32 {
        self.size.0 * TILE_SIZE
    }

    pub const fn height_px(&self) -> u32 {
        self.size.1 * TILE_SIZE
    }

    pub fn primary(&self) -> &Plane {
        &self.primary
    }

    pub fn secondary(&self) -> &Plane {
        &self.secondary
    }

    pub fn get(&self, plane: BitPlane, x: u32, y: u32) -> u8 {
        let plane = match plane {
            BitPlane::Primary => &self.primary,
            BitPlane::Secondary => &self.secondary,
        };

        plane.get(x as usize, y as usize)
    }

    pub fn color_index(&self, x: u32, y: u32) -> ColorIndex {
        ColorIndex::from_planes(
            self.get(BitPlane::Primary, x, y),
            self.get(BitPlane::Secondary, x, y),
        )
    }

    pub fn to_image(&self, palette: &Palette) -> RgbImage {
        RgbImage::from_fn(self.width_px(), self.height_px(), |x, y| {
            palette.get(self.color_index(x, y))
        })
    }

    /// Place the sprite on a square canvas of `canvas_tiles` tiles, centred
    /// horizontally and resting on the bottom edge. The canvas grows to fit
    /// sprites larger than it.
    pub fn to_image_on_canvas(&self, canvas_tiles: u32, palette: &Palette) -> RgbImage {
        let side = canvas_tiles.max(self.size.0).max(self.size.1);
        let background = palette.get(ColorIndex::new(0));
        let mut canvas = RgbImage::from_pixel(side * TILE_SIZE, side * TILE_SIZE, background);

        let x = (side - self.size.0).div_ceil(2) * TILE_SIZE;
        let y = (side - self.size.1) * TILE_SIZE;
        imageops::overlay(&mut canvas, &self.to_image(palette), x.into(), y.into());

        canvas
    }
}

/// Render an image as rows of true-colour terminal cells, two columns per
/// pixel so the result keeps its aspect ratio.
pub fn to_ansi(image: &RgbImage) -> String {
    let mut out = String::new();

    for row in image.rows() {
        for pixel in row {
            let [r, g, b] = pixel.0;
            out.push_str(&format!("\x1b[48;2;{};{};{}m  ", r, g, b));
        }
        out.push_str("\x1b[0m\n");
    }

    out
}
