use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tiles2gba::{export, options, tmx, ExportOptions, Mode};

/// GBA tool that generates C code for tilemap backgrounds from maps made using tiled editor (tmx files)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tiled input file (.TMX file)
    filename: String,
    /// Export mode
    #[arg(short, long, value_enum, default_value = "gba")]
    mode: Mode,
    /// Output base path, .h and .c are appended (default: input file without extension)
    #[arg(short, long)]
    output: Option<String>,
    /// Base name for the include guard and macros (default: output file stem)
    #[arg(short, long)]
    varname: Option<String>,
    /// Export options (provide yaml file)
    #[arg(long = "options")]
    yaml: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let options = match &args.yaml {
        Some(filename) => options::load(filename)?,
        None => ExportOptions::default(),
    };
    let map = tmx::load(&args.filename)?;
    let output = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&args.filename).with_extension(""));
    export(&map, args.mode, &output, args.varname.as_deref(), &options)
}
