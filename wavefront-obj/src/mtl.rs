//! Parser for MTL material libraries referenced by a `mtllib` directive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use obj_math::Vec3;

use crate::diagnostic::{self, Diagnostic};
use crate::reader::ChunkedLineReader;
use crate::text::{self, split_line_key_rest};
use crate::types::{MtlMaterial, TextureMapChannel, TextureMapEntry};

/// Fixed argument counts for every texture-map option the MTL format defines, keyed by option
/// name including its leading dash.
const TEXTURE_MAP_OPTION_ARITY: &[(&str, usize)] = &[
    ("-blendu", 1),
    ("-blendv", 1),
    ("-boost", 1),
    ("-mm", 2),
    ("-o", 3),
    ("-s", 3),
    ("-t", 3),
    ("-texres", 1),
    ("-clamp", 1),
    ("-bm", 1),
    ("-imfchan", 1),
];

fn option_arity(option: &str) -> Option<usize> {
    TEXTURE_MAP_OPTION_ARITY.iter().find(|(name, _)| *name == option).map(|(_, n)| *n)
}

/// Maps a `map_*` (or bare `refl`/`bump`) directive key to the [`TextureMapChannel`] it feeds,
/// normalizing the handful of alternate spellings other exporters emit.
fn texture_map_channel(key: &str) -> Option<TextureMapChannel> {
    match key {
        "map_Kd" => Some(TextureMapChannel::Diffuse),
        "map_Ks" => Some(TextureMapChannel::SpecularColor),
        "map_Ns" => Some(TextureMapChannel::SpecularExponent),
        "map_Ka" => Some(TextureMapChannel::Ambient),
        "map_d" => Some(TextureMapChannel::Alpha),
        "map_refl" | "refl" => Some(TextureMapChannel::Reflection),
        "map_Ke" => Some(TextureMapChannel::Emission),
        "map_Bump" | "bump" => Some(TextureMapChannel::Bump),
        _ => None,
    }
}

/// Normalizes a texture-map directive key for exporters that emit it in an unexpected form:
/// bare `refl` means `map_refl`, and anything containing `bump` (`bump`, `map_Bump`, `map_bump`)
/// is folded to `map_Bump`.
fn fix_bad_map_key(key: &str) -> String {
    if key == "refl" {
        "map_refl".to_owned()
    } else if key.contains("bump") || key == "map_Bump" {
        "map_Bump".to_owned()
    } else {
        key.to_owned()
    }
}

/// Splits a `map_*` directive's argument list on whitespace and applies the `-o`/`-s`/`-bm`/
/// `-type` options it recognizes to `entry` and `material`, returning the image path with every
/// recognized option and its arguments stripped.
fn apply_texture_map_options<'a>(
    args: &'a str,
    entry: &mut TextureMapEntry,
    material: &mut MtlMaterial,
) -> &'a str {
    let fields: Vec<&str> = args.split_whitespace().collect();

    if let Some(pos) = fields.iter().position(|&f| f == "-o") {
        if pos + 3 < fields.len() {
            let mut v = [0.0f32; 3];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = fields[pos + 1 + i].parse().unwrap_or(0.0);
            }
            entry.translation = Vec3::from(v);
        }
    }
    if let Some(pos) = fields.iter().position(|&f| f == "-s") {
        if pos + 3 < fields.len() {
            let mut v = [1.0f32; 3];
            for (i, slot) in v.iter_mut().enumerate() {
                *slot = fields[pos + 1 + i].parse().unwrap_or(1.0);
            }
            entry.scale = Vec3::from(v);
        }
    }
    if let Some(pos) = fields.iter().position(|&f| f == "-bm") {
        if pos + 1 < fields.len() {
            material.map_bump_strength = fields[pos + 1].parse().unwrap_or(0.0);
        }
    }
    if let Some(pos) = fields.iter().position(|&f| f == "-type") {
        if pos + 1 < fields.len() {
            entry.projection_type = Some(2); // only sphere projection is supported
            if fields[pos + 1] != "sphere" {
                log::warn!("texture map projection '{}' is not supported, using 'sphere'", fields[pos + 1]);
            }
        }
    }

    skip_unsupported_options(args)
}

/// Scans `line` for the last recognized texture-map option and everything up to and including
/// its arguments, returning whatever trails it: that remainder is the image path. Mirrors how
/// exporters put options before the path, e.g. `map_Kd -o 1 1 1 texture.png`.
fn skip_unsupported_options(line: &str) -> &str {
    let mut last_option: Option<(&str, usize)> = None;
    for &(name, _) in TEXTURE_MAP_OPTION_ARITY {
        if let Some(pos) = line.find(name) {
            if last_option.is_none_or(|(_, last_pos)| pos >= last_pos) {
                last_option = Some((name, pos));
            }
        }
    }

    let Some((name, pos)) = last_option else {
        return line.trim();
    };

    let mut rest = &line[pos + name.len()..];
    let arity = option_arity(name).unwrap_or(0);
    for _ in 0..arity {
        rest = text::skip_ws(rest);
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    rest.trim()
}

/// Parses a color directive (`Ka`/`Kd`/`Ks`/`Ke`)'s three channels independently: each of r/g/b
/// falls back to `fallback` on its own if the field is missing or fails to parse, rather than the
/// whole triple falling back together. The `xyz`/`spectral` color spaces from the MTL spec are not
/// supported.
fn parse_color(args: &str, fallback: f32) -> Vec3 {
    let mut fields = args.split_whitespace();
    let mut channel = || fields.next().and_then(|f| f.parse().ok()).unwrap_or(fallback);
    Vec3::new(channel(), channel(), channel())
}

fn parse_scalar(args: &str, default: f32) -> f32 {
    args.split_whitespace().next().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn parse_int_or(args: &str, default: i32) -> i32 {
    args.split_whitespace().next().and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Parses the MTL file at `path` (the directory containing `obj_path` joined with the `mtllib`
/// reference) and inserts every `newmtl` block found into `materials`, keyed by name.
///
/// A missing or unreadable MTL file is reported as a [`Diagnostic`] and otherwise ignored: OBJ
/// files routinely reference material libraries that did not ship alongside them.
pub fn parse_mtl_file(path: &Path, mtl_dir: &Path, materials: &mut HashMap<String, MtlMaterial>) {
    let reader = match ChunkedLineReader::open(path) {
        Ok(r) => r,
        Err(source) => {
            diagnostic::report(&Diagnostic::FileOpenError { path: path.display().to_string(), source });
            return;
        }
    };

    let mut current: Option<String> = None;

    let result = reader.for_each_line(|line| {
        let Some((key, rest)) = split_line_key_rest(line) else { return };
        if rest.is_empty() && key != "newmtl" {
            return;
        }
        let key = fix_bad_map_key(key);

        if key == "newmtl" {
            current = Some(rest.to_owned());
            if materials.contains_key(rest) {
                diagnostic::report(&Diagnostic::DuplicateMaterial { name: rest.to_owned() });
            }
            materials.insert(rest.to_owned(), MtlMaterial::new(rest.to_owned()));
            return;
        }

        let Some(name) = current.as_deref() else { return };
        let Some(material) = materials.get_mut(name) else { return };

        match key.as_str() {
            "Ns" => material.ns = parse_scalar(rest, material.ns),
            "Ni" => material.ni = parse_scalar(rest, material.ni),
            "d" => material.d = parse_scalar(rest, material.d),
            "Tr" => material.d = 1.0 - parse_scalar(rest, 1.0 - material.d),
            "illum" => material.illum = parse_int_or(rest, material.illum),
            "Ka" => material.ka = parse_color(rest, 0.0),
            "Kd" => material.kd = parse_color(rest, 0.8),
            "Ks" => material.ks = parse_color(rest, 0.5),
            "Ke" => material.ke = parse_color(rest, 0.0),
            _ if key.contains("map_") => {
                let Some(channel) = texture_map_channel(&key) else { return };
                let mut entry = TextureMapEntry::new(mtl_dir.to_path_buf());
                let image_path = apply_texture_map_options(rest, &mut entry, material);
                entry.image_path = image_path.to_owned();
                material.texture_maps.insert(channel, entry);
            }
            _ => {}
        }
    });

    if let Err(source) = result {
        diagnostic::report(&Diagnostic::FileOpenError { path: path.display().to_string(), source });
    }
}

/// Resolves a `mtllib` reference (possibly relative) against the directory the OBJ file lives in.
pub fn resolve_mtl_path(obj_dir: &Path, reference: &str) -> PathBuf {
    obj_dir.join(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_map_option_arity_matches_known_options() {
        assert_eq!(option_arity("-o"), Some(3));
        assert_eq!(option_arity("-bm"), Some(1));
        assert_eq!(option_arity("-mm"), Some(2));
        assert_eq!(option_arity("-nonexistent"), None);
    }

    #[test]
    fn skips_options_to_find_image_path() {
        assert_eq!(skip_unsupported_options("-o 1 1 1 -s 2 2 2 wood.png"), "wood.png");
        assert_eq!(skip_unsupported_options("wood.png"), "wood.png");
    }

    #[test]
    fn normalizes_alternate_map_keys() {
        assert_eq!(fix_bad_map_key("refl"), "map_refl");
        assert_eq!(fix_bad_map_key("bump"), "map_Bump");
        assert_eq!(fix_bad_map_key("map_Bump"), "map_Bump");
        assert_eq!(fix_bad_map_key("map_Kd"), "map_Kd");
    }

    #[test]
    fn parses_colors_with_per_channel_fallback() {
        assert_eq!(parse_color("0.5", 0.0), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(parse_color("0.1 0.2 0.3", 0.0), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(parse_color("0.5 0.3", 0.8), Vec3::new(0.5, 0.3, 0.8));
        assert_eq!(parse_color("garbage", 1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(parse_color("0.1 garbage 0.3", 0.8), Vec3::new(0.1, 0.8, 0.3));
    }

    #[test]
    fn parses_material_block_end_to_end() {
        let dir = std::env::temp_dir();
        let path = dir.join("wavefront-obj-mtl-test.mtl");
        std::fs::write(
            &path,
            "newmtl Red\nKd 0.8 0.1 0.1\nNs 96.0\nmap_Kd -o 0 0 0 -s 1 1 1 red.png\n",
        )
        .unwrap();

        let mut materials = HashMap::new();
        parse_mtl_file(&path, &dir, &mut materials);
        std::fs::remove_file(&path).ok();

        let red = materials.get("Red").expect("material parsed");
        assert_eq!(red.kd, Vec3::new(0.8, 0.1, 0.1));
        assert_eq!(red.ns, 96.0);
        let map = red.texture_maps.get(&TextureMapChannel::Diffuse).expect("diffuse map parsed");
        assert_eq!(map.image_path, "red.png");
    }

    #[test]
    fn duplicate_newmtl_replaces_rather_than_merges() {
        let dir = std::env::temp_dir();
        let path = dir.join("wavefront-obj-mtl-duplicate-test.mtl");
        std::fs::write(
            &path,
            "newmtl Red\nKd 0.8 0.1 0.1\nNs 96.0\nnewmtl Red\nKd 0.2 0.2 0.2\n",
        )
        .unwrap();

        let mut materials = HashMap::new();
        parse_mtl_file(&path, &dir, &mut materials);
        std::fs::remove_file(&path).ok();

        let red = materials.get("Red").expect("material parsed");
        assert_eq!(red.kd, Vec3::new(0.2, 0.2, 0.2));
        // Ns was only set on the first block; the second `newmtl` must have reset it to the
        // MTL-spec default rather than carrying the stale value forward.
        assert_eq!(red.ns, 324.0);
    }
}
