// tests/export_tests.rs

use std::fs;
use std::path::PathBuf;
use tiles2gba::{export, tmx, ExportOptions, MacroStyle, Mode};

fn tmx_with_layer(width: usize, height: usize, csv: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" renderorder="right-down" width="{w}" height="{h}" tilewidth="8" tileheight="8">
 <tileset firstgid="1" name="tiles" tilewidth="8" tileheight="8" tilecount="1024" columns="32"/>
 <layer id="1" name="bg0" width="{w}" height="{h}">
  <data encoding="csv">
{csv}
</data>
 </layer>
</map>"#,
        w = width,
        h = height,
        csv = csv
    )
}

fn sequential_csv(count: usize) -> String {
    // gids 1.. so the zero-based tile ids come out as 0..count-1
    (1..=count)
        .map(|gid| gid.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn temp_base(name: &str) -> PathBuf {
    let mut path = PathBuf::from(std::env::temp_dir());
    path.push(name);
    path
}

#[test]
fn full_export_writes_header_and_source() {
    let map = tmx::from_str(&tmx_with_layer(32, 32, &sequential_csv(1024))).unwrap();
    let base = temp_base("tiles2gba_full_export");
    export(&map, Mode::Regular, &base, None, &ExportOptions::default()).unwrap();

    let header = fs::read_to_string(base.with_extension("h")).unwrap();
    assert!(header.contains("#ifndef _TILES2GBA_FULL_EXPORT_H_"));
    assert!(header.contains("#define TILES2GBA_FULL_EXPORT_LENGTH 1024"));
    assert!(header.contains("extern const unsigned short bg0[1024];"));

    let source = fs::read_to_string(base.with_extension("c")).unwrap();
    assert!(source.starts_with("#include \"tiles2gba_full_export.h\""));
    assert!(source.contains("// Screenblock 0"));

    fs::remove_file(base.with_extension("h")).unwrap();
    fs::remove_file(base.with_extension("c")).unwrap();
}

#[test]
fn sequential_regular_map_round_trips() {
    let map = tmx::from_str(&tmx_with_layer(32, 32, &sequential_csv(1024))).unwrap();
    let base = temp_base("tiles2gba_round_trip");
    export(&map, Mode::Regular, &base, None, &ExportOptions::default()).unwrap();

    let source = fs::read_to_string(base.with_extension("c")).unwrap();
    let body = source
        .split_once('{')
        .unwrap()
        .1
        .split_once('}')
        .unwrap()
        .0;
    let values: Vec<u16> = body
        .split(',')
        .map(|entry| {
            let entry = entry.trim().trim_start_matches("// Screenblock 0").trim();
            u16::from_str_radix(entry.trim_start_matches("0x"), 16).unwrap()
        })
        .collect();
    // a 32x32 map is a single screenblock, so screenblock order and
    // row-major order coincide
    assert_eq!(values, (0..1024).collect::<Vec<u16>>());

    fs::remove_file(base.with_extension("h")).unwrap();
    fs::remove_file(base.with_extension("c")).unwrap();
}

#[test]
fn affine_export_parenthesizes_macros_by_default() {
    let map = tmx::from_str(&tmx_with_layer(16, 16, &sequential_csv(256))).unwrap();
    let base = temp_base("tiles2gba_affine");
    export(&map, Mode::Affine, &base, Some("level"), &ExportOptions::default()).unwrap();

    let header = fs::read_to_string(base.with_extension("h")).unwrap();
    assert!(header.contains("#define LEVEL_WIDTH (16)"));
    assert!(header.contains("#define LEVEL_LENGTH (256)"));
    let source = fs::read_to_string(base.with_extension("c")).unwrap();
    assert!(!source.contains("// Screenblock"));

    fs::remove_file(base.with_extension("h")).unwrap();
    fs::remove_file(base.with_extension("c")).unwrap();
}

#[test]
fn macro_style_override_wins_over_mode_default() {
    let map = tmx::from_str(&tmx_with_layer(32, 32, &sequential_csv(1024))).unwrap();
    let base = temp_base("tiles2gba_macro_style");
    let options = ExportOptions {
        macro_style: Some(MacroStyle::Parenthesized),
        ..Default::default()
    };
    export(&map, Mode::Regular, &base, None, &options).unwrap();

    let header = fs::read_to_string(base.with_extension("h")).unwrap();
    assert!(header.contains("#define TILES2GBA_MACRO_STYLE_WIDTH (32)"));

    fs::remove_file(base.with_extension("h")).unwrap();
    fs::remove_file(base.with_extension("c")).unwrap();
}

#[test]
fn invalid_affine_size_writes_nothing() {
    let csv = sequential_csv(900);
    let map = tmx::from_str(&tmx_with_layer(30, 30, &csv)).unwrap();
    let base = temp_base("tiles2gba_invalid_affine");
    let err = export(&map, Mode::Affine, &base, None, &ExportOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Map must be 16x16, 32x32, 64x64 or 128x128 in size."
    );
    assert!(!base.with_extension("h").exists());
    assert!(!base.with_extension("c").exists());
}

#[test]
fn invalid_regular_size_writes_nothing() {
    let csv = sequential_csv(33 * 32);
    let map = tmx::from_str(&tmx_with_layer(33, 32, &csv)).unwrap();
    let base = temp_base("tiles2gba_invalid_regular");
    let err = export(&map, Mode::Regular, &base, None, &ExportOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Map width and height must be a multiple of 32."
    );
    assert!(!base.with_extension("h").exists());
    assert!(!base.with_extension("c").exists());
}

#[test]
fn export_from_a_tmx_file_on_disk() {
    let tmx_path = temp_base("tiles2gba_on_disk.tmx");
    fs::write(&tmx_path, tmx_with_layer(32, 32, &sequential_csv(1024))).unwrap();
    let map = tmx::load(tmx_path.to_str().unwrap()).unwrap();
    assert_eq!(map.width, 32);
    assert_eq!(map.layers.len(), 1);
    fs::remove_file(&tmx_path).unwrap();
}
