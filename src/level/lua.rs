use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{BakedLevel, LevelObject, ObjectGeometry};
use crate::geometry::Point;

const LUA_KEYWORDS: [&str; 22] = [
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Render a baked level as a Lua chunk
///
/// Format:
/// ```text
/// return {walls={objects={{id="walls/0",xy={x0,y0,x1,y1,...},convex={{...},{...}}},
///                         {id="walls/1",circle={cx,cy,r},subclass="Bumper"}}}}
/// ```
/// Coordinates are flattened into alternating x, y numbers.
pub fn level_to_lua(level: &BakedLevel) -> Result<String> {
    let mut out = String::from("return {");

    for (i, layer) in level.layers.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, "{}={{objects={{", table_key(&layer.name))?;
        for (j, object) in layer.objects.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            write_object(&mut out, object)
                .with_context(|| format!("Failed to encode object '{}'", object.id))?;
        }
        out.push_str("}}");
    }

    out.push('}');
    Ok(out)
}

/// Write a baked level to a Lua file
pub fn write_lua(path: &Path, level: &BakedLevel) -> Result<()> {
    let chunk = level_to_lua(level)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create level file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(chunk.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}

fn write_object(out: &mut String, object: &LevelObject) -> Result<()> {
    write!(out, "{{id={}", quote(&object.id))?;

    match &object.geometry {
        ObjectGeometry::Polygon { xy, convex } => {
            out.push_str(",xy=");
            write_coords(out, xy)?;
            if let Some(parts) = convex {
                out.push_str(",convex={");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_coords(out, part)?;
                }
                out.push('}');
            }
        }
        ObjectGeometry::Circle { center, radius } => {
            write!(
                out,
                ",circle={{{},{},{}}}",
                number(center.x)?,
                number(center.y)?,
                number(*radius)?
            )?;
        }
    }

    if let Some(subclass) = &object.subclass {
        write!(out, ",subclass={}", quote(subclass))?;
    }
    if let Some(script) = &object.script {
        write!(out, ",script={}", quote(script))?;
    }
    out.push('}');
    Ok(())
}

fn write_coords(out: &mut String, points: &[Point]) -> Result<()> {
    out.push('{');
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write!(out, "{},{}", number(p.x)?, number(p.y)?)?;
    }
    out.push('}');
    Ok(())
}

fn number(value: f64) -> Result<String> {
    if !value.is_finite() {
        bail!("Cannot encode non-finite number {} in Lua", value);
    }
    Ok(value.to_string())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !LUA_KEYWORDS.contains(&name)
}

fn table_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        format!("[{}]", quote(name))
    }
}

/// Double-quoted Lua string literal
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
