use anyhow::{anyhow, Context, Result};
use std::fs;
use xml_dom::level2::{Node, NodeType, RefNode};

// Tiled packs flip flags into the high bits of each gid
const GID_HFLIP: u32 = 0x8000_0000;
const GID_VFLIP: u32 = 0x4000_0000;
const GID_DFLIP: u32 = 0x2000_0000;
const GID_MASK: u32 = 0x1FFF_FFFF;

/// A single cell of a tile layer. Blank cells stay blank whatever
/// their flip flags say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Blank,
    Id(u16),
}

#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub tile: Tile,
    pub hflip: bool,
    pub vflip: bool,
}

#[derive(Debug)]
pub struct Layer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Tile layers carry cell data; object and image layers don't,
    /// but still get a declaration in the generated header.
    pub is_tiles: bool,
    pub cells: Vec<Cell>,
}

impl Layer {
    pub fn cell_at(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }
}

#[derive(Debug)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub layers: Vec<Layer>,
}

fn attr(node: &RefNode, name: &str) -> Option<String> {
    for a in &node.attributes() {
        if a.0.local_name() == name {
            if let Some(t) = a.1.first_child() {
                return t.node_value();
            }
        }
    }
    None
}

pub fn load(filename: &str) -> Result<Map> {
    let xml =
        fs::read_to_string(filename).with_context(|| format!("reading {}", filename))?;
    from_str(&xml)
}

pub fn from_str(xml: &str) -> Result<Map> {
    let dom = xml_dom::parser::read_xml(xml).map_err(|e| anyhow!("XML parse error: {}", e))?;
    let root = dom
        .child_nodes()
        .into_iter()
        .find(|n| n.node_type() == NodeType::Element && n.local_name() == "map")
        .ok_or_else(|| anyhow!("no <map> element found"))?;

    let width = attr(&root, "width")
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| anyhow!("map has no width"))?;
    let height = attr(&root, "height")
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| anyhow!("map has no height"))?;

    // Tile ids are relative to the first tileset. GBA maps use a single
    // charblock, so a single tileset is the norm.
    let mut firstgid = 1u32;
    let mut tilesets = 0;
    for n in &root.child_nodes() {
        if n.node_type() == NodeType::Element && n.local_name() == "tileset" {
            tilesets += 1;
            if tilesets == 1 {
                if let Some(s) = attr(n, "firstgid") {
                    firstgid = s.parse::<u32>()?;
                }
            }
        }
    }
    if tilesets > 1 {
        eprintln!("Only the first tileset will be used");
    }

    let mut layers = Vec::new();
    for n in &root.child_nodes() {
        if n.node_type() != NodeType::Element {
            continue;
        }
        match n.local_name().as_str() {
            "layer" => layers.push(tile_layer(n, width, height, firstgid)?),
            "objectgroup" | "imagelayer" => layers.push(Layer {
                name: attr(n, "name").unwrap_or_default(),
                width,
                height,
                is_tiles: false,
                cells: Vec::new(),
            }),
            _ => {}
        }
    }

    Ok(Map {
        width,
        height,
        layers,
    })
}

fn tile_layer(node: &RefNode, map_width: usize, map_height: usize, firstgid: u32) -> Result<Layer> {
    let name = attr(node, "name").unwrap_or_default();
    let width = attr(node, "width")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(map_width);
    let height = attr(node, "height")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(map_height);

    let data = node
        .child_nodes()
        .into_iter()
        .find(|n| n.node_type() == NodeType::Element && n.local_name() == "data")
        .ok_or_else(|| anyhow!("layer {}: no <data> element", name))?;
    match attr(&data, "encoding") {
        Some(e) if e == "csv" => {}
        _ => return Err(anyhow!("layer {}: only CSV-encoded layer data is supported", name)),
    }
    let text = data
        .first_child()
        .filter(|t| t.node_type() == NodeType::Text)
        .and_then(|t| t.node_value())
        .ok_or_else(|| anyhow!("layer {}: empty <data> element", name))?;

    let csv: String = text.split_whitespace().collect();
    let mut cells = Vec::with_capacity(width * height);
    let mut diagonal = false;
    let mut foreign = false;
    for token in csv.split(',') {
        let gid = token
            .parse::<u32>()
            .with_context(|| format!("layer {}: bad tile value {:?}", name, token))?;
        if gid & GID_DFLIP != 0 {
            diagonal = true;
        }
        let id = gid & GID_MASK;
        let tile = if id == 0 {
            Tile::Blank
        } else if id < firstgid {
            foreign = true;
            Tile::Blank
        } else {
            Tile::Id((id - firstgid) as u16)
        };
        cells.push(Cell {
            tile,
            hflip: gid & GID_HFLIP != 0,
            vflip: gid & GID_VFLIP != 0,
        });
    }
    if cells.len() != width * height {
        return Err(anyhow!(
            "layer {}: {} tiles in data, expected {}",
            name,
            cells.len(),
            width * height
        ));
    }
    if diagonal {
        eprintln!(
            "Layer {}: diagonally flipped tiles cannot be represented and lose that flag",
            name
        );
    }
    if foreign {
        eprintln!("Layer {}: tiles from another tileset treated as blank", name);
    }

    Ok(Layer {
        name,
        width,
        height,
        is_tiles: true,
        cells,
    })
}
