use crate::tmx::{Cell, Layer, Tile};
use anyhow::{bail, Result};
use clap::ValueEnum;

/// Horizontal flip bit of a regular background tile entry.
pub const HFLIP: u16 = 1 << 10;
/// Vertical flip bit of a regular background tile entry.
pub const VFLIP: u16 = 1 << 11;

// Tile ids above this overlap the flip bits of a regular background entry
const ID_MASK: u16 = (1 << 10) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Regular background: 32x32 screenblocks, flip bits in bits 10-11
    #[value(name = "gba")]
    Regular,
    /// Affine background: flat square map, no flip bits
    #[value(name = "gba-affine")]
    Affine,
}

/// Affine backgrounds only exist in the four square sizes the hardware
/// supports; regular backgrounds are built from whole screenblocks.
pub fn check_map_size(width: usize, height: usize, mode: Mode) -> Result<()> {
    match mode {
        Mode::Affine => match (width, height) {
            (16, 16) | (32, 32) | (64, 64) | (128, 128) => Ok(()),
            _ => bail!("Map must be 16x16, 32x32, 64x64 or 128x128 in size."),
        },
        Mode::Regular => {
            if width == 0 || height == 0 || width % 32 != 0 || height % 32 != 0 {
                bail!("Map width and height must be a multiple of 32.");
            }
            Ok(())
        }
    }
}

/// Make a name safe for use in C declarations. Idempotent.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `0x`-prefixed uppercase hex, zero-padded to at least `padding` digits.
pub fn hex(value: u32, padding: usize) -> String {
    format!("0x{:01$X}", value, padding)
}

fn regular_entry(cell: Cell, tile_offset: u16) -> u16 {
    match cell.tile {
        Tile::Blank => 0,
        Tile::Id(id) => {
            let mut entry = id.wrapping_add(tile_offset);
            if cell.hflip {
                entry |= HFLIP;
            }
            if cell.vflip {
                entry |= VFLIP;
            }
            entry
        }
    }
}

fn affine_entry(cell: Cell, tile_offset: u16) -> u16 {
    match cell.tile {
        Tile::Blank => 0,
        Tile::Id(id) => id.wrapping_add(tile_offset),
    }
}

/// Encode one tile layer into its final in-memory order: row-major for
/// affine backgrounds, screenblock-major for regular ones (block row,
/// then block column, then row and column inside the 32x32 block).
pub fn encode_layer(layer: &Layer, mode: Mode, tile_offset: u16) -> Vec<u16> {
    let mut words = Vec::with_capacity(layer.width * layer.height);
    match mode {
        Mode::Affine => {
            for y in 0..layer.height {
                for x in 0..layer.width {
                    words.push(affine_entry(layer.cell_at(x, y), tile_offset));
                }
            }
        }
        Mode::Regular => {
            let blocks_x = layer.width / 32;
            let blocks_y = layer.height / 32;
            let mut oversize = false;
            for j in 0..blocks_y {
                for k in 0..blocks_x {
                    for y in 0..32 {
                        for x in 0..32 {
                            let cell = layer.cell_at(x + 32 * k, y + 32 * j);
                            if let Tile::Id(id) = cell.tile {
                                if id.wrapping_add(tile_offset) > ID_MASK {
                                    oversize = true;
                                }
                            }
                            words.push(regular_entry(cell, tile_offset));
                        }
                    }
                }
            }
            if oversize {
                eprintln!(
                    "Layer {}: tile ids above 1023 overlap the flip bits",
                    layer.name
                );
            }
        }
    }
    words
}
