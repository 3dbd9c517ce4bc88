//! Serializes a resolved vector barcode into a Microsoft Enhanced Metafile document.

mod geometry;
mod records;

use crate::error::{Error, Result};
use crate::symbol::Symbol;
use crate::vector::HAlign;
use std::io::Write;

const TA_CENTER_BASELINE: u32 = 0x0006 | 0x0018;
const TA_LEFT_BASELINE: u32 = 0x0000 | 0x0018;
const TA_RIGHT_BASELINE: u32 = 0x0002 | 0x0018;

fn align_mode(align: HAlign) -> u32 {
    match align {
        HAlign::Center => TA_CENTER_BASELINE,
        HAlign::Left => TA_LEFT_BASELINE,
        HAlign::Right => TA_RIGHT_BASELINE,
    }
}

/// A standard 8-colour palette for the colour-fill symbology's rectangle colour indices 1..=8,
/// in the order cyan, blue, magenta, red, yellow, green, black, white. The reference backend
/// resolves these through its own palette lookup; this table fills that role here.
fn palette_colorref(colour: u8) -> u32 {
    const PALETTE: [(u8, u8, u8); 8] = [
        (0, 255, 255),
        (0, 0, 255),
        (255, 0, 255),
        (255, 0, 0),
        (255, 255, 0),
        (0, 255, 0),
        (0, 0, 0),
        (255, 255, 255),
    ];
    let (r, g, b) = PALETTE[(colour - 1) as usize];
    u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16)
}

/// Converts UTF-8 text constrained to scalars <= U+00FF into UTF-16LE code-unit pairs, the way
/// the reference backend's `utfle_copy` does: a byte >= 0x80 is the lead of a two-byte UTF-8
/// sequence and is combined with the following byte into one code unit.
fn utfle_encode(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2);
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            out.push(b);
            out.push(0);
            i += 1;
        } else {
            let lead = b;
            let trail = bytes[i + 1];
            let unit = ((u16::from(lead) & 0x1f) << 6) + (u16::from(trail) & 0x3f);
            out.extend_from_slice(&unit.to_le_bytes());
            i += 2;
        }
    }
    out
}

/// Number of UTF-16 code units [`utfle_encode`] will produce for `text`, without allocating.
fn utfle_length(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] < 0x80 {
            i += 1;
        } else {
            i += 2;
        }
        count += 1;
    }
    count
}

fn bump_up(n: usize) -> usize {
    if n % 2 == 1 {
        n + 1
    } else {
        n
    }
}

fn world_transform(rotate_angle: u16, width: f32, height: f32) -> (f32, f32, f32, f32, f32, f32) {
    match rotate_angle {
        90 => (0.0, 1.0, -1.0, 0.0, height, 0.0),
        180 => (-1.0, 0.0, 0.0, -1.0, width, height),
        270 => (0.0, -1.0, 1.0, 0.0, 0.0, width),
        _ => (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
    }
}

/// Serializes `symbol`'s vector graph as an EMF document, writing it to `symbol.outfile` or to
/// standard output when the `STDOUT` output option is set.
pub fn emf_plot(symbol: &Symbol, rotate_angle: u16) -> Result<()> {
    let document = build_document(symbol, rotate_angle)?;

    if symbol.output_options.contains(crate::symbol::OutputOptions::STDOUT) {
        std::io::stdout().write_all(&document).map_err(Error::FileAccess)
    } else {
        std::fs::write(&symbol.outfile, &document).map_err(Error::FileAccess)
    }
}

fn build_document(symbol: &Symbol, rotate_angle: u16) -> Result<Vec<u8>> {
    let width = symbol.vector.width.ceil() as i32;
    let height = symbol.vector.height.ceil() as i32;
    let (bound_w, bound_h) = if rotate_angle == 90 || rotate_angle == 270 {
        (height, width)
    } else {
        (width, height)
    };

    let mut body: Vec<u8> = Vec::new();
    let mut record_count: u32 = 1; // the header itself

    records::write_setmapmode(&mut body)?;
    record_count += 1;

    if rotate_angle != 0 {
        let (m11, m12, m21, m22, dx, dy) = world_transform(rotate_angle, width as f32, height as f32);
        records::write_setworldtransform(&mut body, m11, m12, m21, m22, dx, dy)?;
        record_count += 1;
    }

    records::write_createbrushindirect(&mut body, 1, symbol.bgcolour.to_colorref())?;
    record_count += 1;

    let uses_colour_fill = symbol.symbology.uses_colour_fill();
    let mut colours_used: Vec<u8> = Vec::new();
    if uses_colour_fill {
        let mut used = [false; 9];
        for r in &symbol.vector.rectangles {
            if (1..=8).contains(&r.colour) {
                used[r.colour as usize] = true;
            }
        }
        for c in 1..=8u8 {
            if used[c as usize] {
                colours_used.push(c);
            }
        }
        for &c in &colours_used {
            records::write_createbrushindirect(&mut body, 1 + u32::from(c), palette_colorref(c))?;
            record_count += 1;
        }
    } else {
        records::write_createbrushindirect(&mut body, 2, symbol.fgcolour.to_colorref())?;
        record_count += 1;
    }

    records::write_createpen(&mut body, 10)?;
    record_count += 1;

    let (fsize1, fsize2) = symbol.vector.font_sizes();
    let has_strings = !symbol.vector.strings.is_empty();
    let weight = if symbol.bold_text() { 700 } else { 400 };
    if has_strings {
        if let Some(f1) = fsize1 {
            records::write_extcreatefontindirectw(&mut body, 11, f1.round() as i32, weight, "sans-serif")?;
            record_count += 1;
        }
        if let Some(f2) = fsize2 {
            records::write_extcreatefontindirectw(&mut body, 12, f2.round() as i32, weight, "sans-serif")?;
            record_count += 1;
        }
    }

    records::write_selectobject(&mut body, 1)?;
    record_count += 1;
    records::write_selectobject(&mut body, 10)?;
    record_count += 1;

    let draw_background = !symbol.bgcolour.is_transparent();
    if draw_background {
        records::write_rectangle(&mut body, 0, 0, bound_w, bound_h)?;
        record_count += 1;
    }

    if uses_colour_fill {
        for &c in &colours_used {
            records::write_selectobject(&mut body, 1 + u32::from(c))?;
            record_count += 1;
            for r in symbol.vector.rectangles.iter().filter(|r| r.colour == c) {
                records::write_rectangle(
                    &mut body,
                    r.x as i32,
                    r.y as i32,
                    (r.x + r.width) as i32,
                    (r.y + r.height) as i32,
                )?;
                record_count += 1;
            }
        }
    } else {
        records::write_selectobject(&mut body, 2)?;
        record_count += 1;
        for r in &symbol.vector.rectangles {
            records::write_rectangle(
                &mut body,
                r.x as i32,
                r.y as i32,
                (r.x + r.width) as i32,
                (r.y + r.height) as i32,
            )?;
            record_count += 1;
        }
    }

    for h in &symbol.vector.hexagons {
        let r = h.diameter / 2.0;
        let verts = geometry::hexagon_vertices(h.x, h.y, r, h.rotation);
        let (left, top, right, bottom) = geometry::hexagon_bounds(&verts);
        let ipoints: [(i32, i32); 6] = verts.map(|(x, y)| (x.round() as i32, y.round() as i32));
        records::write_polygon(
            &mut body,
            (left.round() as i32, top.round() as i32, right.round() as i32, bottom.round() as i32),
            &ipoints,
        )?;
        record_count += 1;
    }

    let is_bullseye = symbol.symbology.is_bullseye();
    let circle_count = symbol.vector.circles.len();
    for (i, c) in symbol.vector.circles.iter().enumerate() {
        let r = c.diameter / 2.0;
        records::write_ellipse(
            &mut body,
            (c.x - r) as i32,
            (c.y - r) as i32,
            (c.x + r) as i32,
            (c.y + r) as i32,
        )?;
        record_count += 1;
        if is_bullseye && i + 1 < circle_count {
            let handle = if i % 2 == 0 { 2 } else { 1 };
            records::write_selectobject(&mut body, handle)?;
            record_count += 1;
        }
    }

    if has_strings {
        records::write_selectobject(&mut body, 11)?;
        record_count += 1;
        records::write_settextcolor(&mut body, symbol.fgcolour.to_colorref())?;
        record_count += 1;

        let groups: Vec<(u32, f64)> = [fsize1.map(|f| (11, f)), fsize2.map(|f| (12, f))]
            .into_iter()
            .flatten()
            .collect();

        for (handle, fsize) in groups {
            if handle == 12 {
                records::write_selectobject(&mut body, 12)?;
                record_count += 1;
            }
            // Reset per font-size group: the reference implementation re-initializes its
            // "current halign" tracker to unset at the start of each pass, so the first string
            // in a group always emits an EMR_SETTEXTALIGN even if it matches the previous
            // group's final alignment.
            let mut current_halign: Option<HAlign> = None;
            for s in symbol.vector.strings.iter().filter(|s| s.font_size == fsize) {
                if current_halign != Some(s.halign) {
                    records::write_settextalign(&mut body, align_mode(s.halign))?;
                    record_count += 1;
                    current_halign = Some(s.halign);
                }
                let utfle_len = utfle_length(&s.text);
                let bumped_len = bump_up(utfle_len);
                let mut payload = utfle_encode(&s.text);
                while payload.len() < bumped_len * 2 {
                    payload.push(0);
                }
                records::write_exttextoutw(&mut body, s.x as i32, s.y as i32, utfle_len as u32, &payload)?;
                record_count += 1;
            }
        }
    }

    records::write_eof(&mut body)?;
    record_count += 1;

    let bytecount = 108 + body.len() as u32;
    let handles: u16 = if uses_colour_fill {
        11
    } else if fsize2.is_some() {
        5
    } else {
        4
    };

    log::debug!("emf_plot: bytecount={bytecount} recordcount={record_count} handles={handles}");

    let mut out = Vec::with_capacity(bytecount as usize);
    records::write_header(&mut out, (0, 0, bound_w, bound_h), bytecount, record_count, handles)?;
    out.extend_from_slice(&body);
    Ok(out)
}
