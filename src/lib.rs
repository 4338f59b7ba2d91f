//! C code generation for GBA tilemap backgrounds from Tiled maps.

use anyhow::{anyhow, Result};
use std::path::Path;

pub mod emit;
pub mod encode;
pub mod options;
pub mod tmx;

pub use emit::MacroStyle;
pub use encode::Mode;
pub use options::ExportOptions;

/// Run one export: validate the map size, encode every layer, render
/// both documents and write `<output>.h` and `<output>.c`. Nothing is
/// written if validation fails.
pub fn export(
    map: &tmx::Map,
    mode: Mode,
    output: &Path,
    varname: Option<&str>,
    options: &ExportOptions,
) -> Result<()> {
    encode::check_map_size(map.width, map.height, mode)?;

    let base = output
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("invalid output path {}", output.display()))?;
    let varname = encode::sanitize_identifier(varname.unwrap_or(&base));
    let style = options.macro_style.unwrap_or(match mode {
        Mode::Regular => MacroStyle::Plain,
        Mode::Affine => MacroStyle::Parenthesized,
    });

    let arrays: Vec<Option<Vec<u16>>> = map
        .layers
        .iter()
        .map(|layer| {
            if layer.is_tiles {
                Some(encode::encode_layer(layer, mode, options.tile_offset))
            } else {
                None
            }
        })
        .collect();

    let header = emit::render_header(map, &varname, style);
    let source = emit::render_source(map, &arrays, &base, mode, options.alignment);
    emit::write_files(output, &header, &source)
}
