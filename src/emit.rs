use crate::encode::{hex, sanitize_identifier, Mode};
use crate::tmx::Map;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Existing generated headers use both macro conventions, so both are
/// kept. Regular mode defaults to plain, affine mode to parenthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroStyle {
    Plain,
    Parenthesized,
}

impl MacroStyle {
    fn define(self, value: usize) -> String {
        match self {
            MacroStyle::Plain => format!("{}", value),
            MacroStyle::Parenthesized => format!("({})", value),
        }
    }
}

pub fn render_header(map: &Map, varname: &str, style: MacroStyle) -> String {
    let upper = sanitize_identifier(varname).to_uppercase();
    let guard = format!("_{}_H_", upper);
    let length = map.width * map.height;

    let mut out = String::new();
    out.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));
    out.push_str(&format!("#define {}_WIDTH {}\n", upper, style.define(map.width)));
    out.push_str(&format!("#define {}_HEIGHT {}\n", upper, style.define(map.height)));
    out.push_str(&format!("#define {}_LENGTH {}\n", upper, style.define(length)));
    out.push_str("\n#ifdef __cplusplus\nextern \"C\" {\n#endif\n\n");
    for layer in &map.layers {
        out.push_str(&format!(
            "extern const unsigned short {}[{}];\n",
            sanitize_identifier(&layer.name),
            length
        ));
    }
    out.push_str("\n#ifdef __cplusplus\n}\n#endif\n\n");
    out.push_str(&format!("#endif // {}\n", guard));
    out
}

/// Render the source file. `arrays` runs parallel to `map.layers`;
/// `None` marks a non-tile layer, which keeps its declaration but gets
/// an empty initializer.
pub fn render_source(
    map: &Map,
    arrays: &[Option<Vec<u16>>],
    include_base: &str,
    mode: Mode,
    alignment: u32,
) -> String {
    let length = map.width * map.height;
    let mut out = format!("#include \"{}.h\"\n", include_base);
    for (layer, words) in map.layers.iter().zip(arrays) {
        out.push('\n');
        out.push_str(&format!(
            "const unsigned short {}[{}] __attribute__((aligned({}))) = {{\n",
            sanitize_identifier(&layer.name),
            length,
            alignment
        ));
        if let Some(words) = words {
            out.push_str(&array_body(words, layer.width, mode));
            out.push('\n');
        }
        out.push_str("};\n");
    }
    out
}

// Entries are joined with separators, so no trailing comma can ever
// appear in front of the closing brace. Line and screenblock breaks
// are cosmetic only.
fn array_body(words: &[u16], width: usize, mode: Mode) -> String {
    match mode {
        Mode::Affine => {
            let rows: Vec<String> = words.chunks(width).map(row_text).collect();
            format!("\t{}", rows.join(",\n\t"))
        }
        Mode::Regular => {
            let mut out = String::new();
            for (b, block) in words.chunks(32 * 32).enumerate() {
                if b > 0 {
                    out.push_str(",\n\n");
                }
                let rows: Vec<String> = block.chunks(32).map(row_text).collect();
                out.push_str(&format!("\t// Screenblock {}\n\t{}", b, rows.join(",\n\t")));
            }
            out
        }
    }
}

fn row_text(row: &[u16]) -> String {
    row.iter()
        .map(|w| hex(*w as u32, 4))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write `<base>.h` and `<base>.c`, truncating existing files. The
/// header goes first; if it fails, the source is not attempted.
pub fn write_files(base: &Path, header: &str, source: &str) -> Result<()> {
    let header_path = base.with_extension("h");
    fs::write(&header_path, header)
        .with_context(|| format!("writing {}", header_path.display()))?;
    let source_path = base.with_extension("c");
    fs::write(&source_path, source)
        .with_context(|| format!("writing {}", source_path.display()))?;
    Ok(())
}
