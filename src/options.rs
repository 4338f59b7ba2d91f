use crate::emit::MacroStyle;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Export options (provided as a yaml file)
#[derive(Debug, Deserialize)]
pub struct ExportOptions {
    /// Force one macro convention instead of the per-mode default
    #[serde(default)]
    pub macro_style: Option<MacroStyle>,
    /// Added to every non-blank tile id, for charblocks that do not
    /// start at tile 0
    #[serde(default)]
    pub tile_offset: u16,
    #[serde(default = "default_alignment")]
    pub alignment: u32,
}

fn default_alignment() -> u32 {
    4
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            macro_style: None,
            tile_offset: 0,
            alignment: default_alignment(),
        }
    }
}

pub fn load(filename: &str) -> Result<ExportOptions> {
    let contents =
        fs::read_to_string(filename).with_context(|| format!("reading {}", filename))?;
    let options =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", filename))?;
    Ok(options)
}
