use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hypnos::{Decompressor, MappedRom, Palette, Rom, RomMap, RomMetadata, Sprite, SpriteDefinition};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
struct Arguments {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode compressed sprite files and print them to the terminal
    Show {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Decode the sprites a ROM map points at and print them
    Rom {
        rom: PathBuf,

        /// ROM map listing the sprite offsets
        #[arg(short = 'm', long)]
        rom_map: PathBuf,

        /// Only print sprites with this name
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Try to decode a sprite at every offset of a ROM. This will return a lot of garbage but
    /// can be used to find sprites that are not in any ROM map yet
    Scan {
        rom: PathBuf,

        #[command(flatten)]
        args: ScanArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    #[arg(short, long, default_value = "gray")]
    palette: PaletteChoice,

    /// Place sprites bottom-centred on a square canvas of this many tiles
    #[arg(short, long)]
    canvas: Option<u32>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum PaletteChoice {
    /// White to black
    Gray,

    /// Green handheld LCD shades
    Green,
}

impl RenderArgs {
    fn palette(&self) -> Palette {
        match self.palette {
            PaletteChoice::Gray => Palette::GRAYSCALE,
            PaletteChoice::Green => Palette::GREEN,
        }
    }

    fn render(&self, sprite: &Sprite) -> String {
        let palette = self.palette();
        let image = match self.canvas {
            Some(tiles) => sprite.to_image_on_canvas(tiles, &palette),
            None => sprite.to_image(&palette),
        };

        hypnos::to_ansi(&image)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    colog::init();

    match args.command {
        Commands::Show { files, render } => show(files, render),
        Commands::Rom {
            rom,
            rom_map,
            name,
            render,
        } => show_rom(rom, rom_map, name, render),
        Commands::Scan { rom, args } => scan(rom, args),
    }
}

fn show(files: Vec<PathBuf>, render: RenderArgs) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let decoded = files
        .par_iter()
        .map(|path| -> anyhow::Result<_> {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let decompressed = Decompressor::new(&data, 0)
                .decompress()
                .with_context(|| format!("Failed to decompress {}", path.display()))?;

            Ok((path, decompressed))
        })
        .collect::<Vec<_>>();

    let mut failed = 0;
    for result in decoded {
        let (path, decompressed) = match result {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!("{:#}", err);
                failed += 1;
                continue;
            }
        };

        let sprite = &decompressed.sprite;
        log::info!(
            "{}: {}x{} tiles, {:?}, {} bytes",
            path.display(),
            sprite.size.0,
            sprite.size.1,
            decompressed.mode,
            decompressed.bytes_read()
        );
        print!("{}", render.render(sprite));
    }

    if failed == files.len() {
        anyhow::bail!("None of the supplied files could be decoded");
    }

    Ok(())
}

fn open_rom(path: &Path) -> anyhow::Result<Rom> {
    Rom::open(path).with_context(|| format!("Failed to read ROM {}", path.display()))
}

fn show_rom(
    rom_path: PathBuf,
    map_path: PathBuf,
    name: Option<String>,
    render: RenderArgs,
) -> anyhow::Result<()> {
    let rom = open_rom(&rom_path)?;
    let map = RomMap::parse(
        &fs::read_to_string(&map_path)
            .with_context(|| format!("Failed to read ROM map {}", map_path.display()))?,
    )?;

    let mapped = if map.is_compatible_with(&rom) {
        MappedRom::new(&rom, &map)?
    } else {
        log::warn!("ROM map is not compatible with the supplied ROM. Continuing anyway.");
        MappedRom::new_forced(&rom, &map)?
    };

    log::info!(
        "Loaded ROM: '{}' with CRC: {:#010x}",
        mapped.metadata.name,
        mapped.metadata.crc
    );

    let mut shown = 0;
    for sprite in mapped
        .sprites
        .iter()
        .filter(|sprite| name.as_ref().map_or(true, |name| &sprite.name == name))
    {
        match &sprite.category {
            Some(category) => println!("{}/{} @ {:#07x}", category, sprite.name, sprite.offset),
            None => println!("{} @ {:#07x}", sprite.name, sprite.offset),
        }
        print!("{}", render.render(&sprite.sprite));
        shown += 1;
    }

    if shown == 0 {
        log::warn!("No sprites matched");
    }

    Ok(())
}

#[derive(Args, Debug, Clone)]
struct ScanArgs {
    /// Write the found sprites to this file as a ROM map
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short, long)]
    force: bool,

    /// The minimum number of tiles per side to consider a valid sprite.
    /// Small sprites are decoded from almost any offset, so low values return a lot of garbage
    #[arg(short, long, default_value = "5")]
    threshold: u32,
}

fn scan(rom_path: PathBuf, args: ScanArgs) -> anyhow::Result<()> {
    use indicatif::{ParallelProgressIterator, ProgressBar};
    use rayon::prelude::*;

    if let Some(out) = &args.out {
        if out.exists() && !args.force {
            anyhow::bail!("{} already exists, use --force to overwrite", out.display());
        }
    }

    let rom = open_rom(&rom_path)?;
    log::info!("Scanning entire ROM for sprites...");

    let progress = ProgressBar::new(rom.data().len() as u64);

    let found = (0..rom.data().len())
        .into_par_iter()
        .progress_with(progress.clone())
        .filter_map(|offset| {
            let result = Decompressor::new(rom.data(), offset).decompress().ok()?;
            let (width, height) = result.sprite.size;

            if width != height || width < args.threshold {
                return None;
            }

            progress.println(format!(
                "Found potential {}x{} sprite at {:#07x}-{:#07x}",
                width,
                height,
                offset,
                offset + result.bytes_read()
            ));

            Some(SpriteDefinition {
                name: format!("sprite_{:#07x}", offset),
                category: None,
                offset,
                size: Some((width, height)),
            })
        })
        .collect::<Vec<_>>();

    progress.finish_and_clear();
    log::info!("Done! Found {} potential sprites", found.len());

    if let Some(out) = &args.out {
        let map = RomMap {
            supported_roms: vec![RomMetadata {
                name: rom_path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".to_string()),
                crc: rom.crc(),
            }],
            sprites: found,
        };

        fs::write(out, map.to_toml()?).with_context(|| "Failed to write ROM map")?;
        log::info!("Wrote ROM map to {}", out.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rom_error_names_the_path() {
        let path = Path::new("does/not/exist.gb");
        let err = open_rom(path).unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.contains("Failed to read ROM does/not/exist.gb"), "{}", message);
        assert!(message.contains("Failed to read ROM file"), "{}", message);
    }
}
