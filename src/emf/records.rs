//! Byte-builders for individual EMR records. Every record is little-endian and size-prefixed;
//! every size is a multiple of 4, per [MS-EMF].

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

pub const EMR_HEADER: u32 = 1;
pub const EMR_POLYGON: u32 = 3;
pub const EMR_SETMAPMODE: u32 = 0x11;
pub const EMR_EOF: u32 = 0x0e;
pub const EMR_SETTEXTALIGN: u32 = 0x16;
pub const EMR_SETTEXTCOLOR: u32 = 0x18;
pub const EMR_SETWORLDTRANSFORM: u32 = 0x23;
pub const EMR_SELECTOBJECT: u32 = 0x25;
pub const EMR_CREATEPEN: u32 = 0x26;
pub const EMR_CREATEBRUSHINDIRECT: u32 = 0x27;
pub const EMR_ELLIPSE: u32 = 0x2a;
pub const EMR_RECTANGLE: u32 = 0x2b;
pub const EMR_EXTCREATEFONTINDIRECTW: u32 = 0x52;
pub const EMR_EXTTEXTOUTW: u32 = 0x54;

const MM_TEXT: u32 = 1;
const BS_SOLID: u32 = 0;
const HS_SOLIDCLR: u32 = 6;
const PS_NULL: u32 = 5;

fn header_prefix<W: Write>(w: &mut W, ty: u32, size: u32) -> io::Result<()> {
    w.write_u32::<LittleEndian>(ty)?;
    w.write_u32::<LittleEndian>(size)
}

/// The fixed 108-byte EMR_HEADER record (type 1), including HeaderExtension1 and 2.
#[allow(clippy::too_many_arguments)]
pub fn write_header<W: Write>(
    w: &mut W,
    bounds: (i32, i32, i32, i32),
    bytes: u32,
    records: u32,
    handles: u16,
) -> io::Result<()> {
    header_prefix(w, EMR_HEADER, 108)?;
    let (left, top, right, bottom) = bounds;
    w.write_i32::<LittleEndian>(left)?;
    w.write_i32::<LittleEndian>(top)?;
    w.write_i32::<LittleEndian>(right)?;
    w.write_i32::<LittleEndian>(bottom)?;
    // frame, in .01mm units: bounds * 30 (a fixed device-to-physical scale).
    w.write_i32::<LittleEndian>(left * 30)?;
    w.write_i32::<LittleEndian>(top * 30)?;
    w.write_i32::<LittleEndian>(right * 30)?;
    w.write_i32::<LittleEndian>(bottom * 30)?;
    w.write_u32::<LittleEndian>(0x464d4520)?; // record signature "EMF "
    w.write_u32::<LittleEndian>(0x00010000)?; // version 1.0
    w.write_u32::<LittleEndian>(bytes)?;
    w.write_u32::<LittleEndian>(records)?;
    w.write_u16::<LittleEndian>(handles)?;
    w.write_u16::<LittleEndian>(0)?; // reserved
    w.write_u32::<LittleEndian>(0)?; // description length
    w.write_u32::<LittleEndian>(0)?; // description offset
    w.write_u32::<LittleEndian>(0)?; // n_pal_entries
    w.write_i32::<LittleEndian>(1000)?; // device width, px
    w.write_i32::<LittleEndian>(1000)?; // device height, px
    w.write_i32::<LittleEndian>(300)?; // device width, mm
    w.write_i32::<LittleEndian>(300)?; // device height, mm
    w.write_u32::<LittleEndian>(0)?; // cb_pixel_format
    w.write_u32::<LittleEndian>(0)?; // off_pixel_format
    w.write_u32::<LittleEndian>(0)?; // b_open_gl
    w.write_i32::<LittleEndian>(0)?; // micrometers width
    w.write_i32::<LittleEndian>(0) // micrometers height
}

pub fn write_setmapmode<W: Write>(w: &mut W) -> io::Result<()> {
    header_prefix(w, EMR_SETMAPMODE, 12)?;
    w.write_u32::<LittleEndian>(MM_TEXT)
}

pub fn write_setworldtransform<W: Write>(
    w: &mut W,
    m11: f32,
    m12: f32,
    m21: f32,
    m22: f32,
    dx: f32,
    dy: f32,
) -> io::Result<()> {
    header_prefix(w, EMR_SETWORLDTRANSFORM, 32)?;
    w.write_f32::<LittleEndian>(m11)?;
    w.write_f32::<LittleEndian>(m12)?;
    w.write_f32::<LittleEndian>(m21)?;
    w.write_f32::<LittleEndian>(m22)?;
    w.write_f32::<LittleEndian>(dx)?;
    w.write_f32::<LittleEndian>(dy)
}

pub fn write_createbrushindirect<W: Write>(w: &mut W, ih_brush: u32, colorref: u32) -> io::Result<()> {
    header_prefix(w, EMR_CREATEBRUSHINDIRECT, 24)?;
    w.write_u32::<LittleEndian>(ih_brush)?;
    w.write_u32::<LittleEndian>(BS_SOLID)?;
    w.write_u32::<LittleEndian>(colorref)?;
    w.write_u32::<LittleEndian>(HS_SOLIDCLR)
}

pub fn write_createpen<W: Write>(w: &mut W, ih_pen: u32) -> io::Result<()> {
    header_prefix(w, EMR_CREATEPEN, 28)?;
    w.write_u32::<LittleEndian>(ih_pen)?;
    w.write_u32::<LittleEndian>(PS_NULL)?;
    w.write_i32::<LittleEndian>(1)?; // pen width x
    w.write_i32::<LittleEndian>(0)?; // pen width y
    w.write_u32::<LittleEndian>(0) // colour, unused for PS_NULL
}

pub fn write_selectobject<W: Write>(w: &mut W, ih_object: u32) -> io::Result<()> {
    header_prefix(w, EMR_SELECTOBJECT, 12)?;
    w.write_u32::<LittleEndian>(ih_object)
}

pub fn write_rectangle<W: Write>(w: &mut W, left: i32, top: i32, right: i32, bottom: i32) -> io::Result<()> {
    header_prefix(w, EMR_RECTANGLE, 24)?;
    w.write_i32::<LittleEndian>(left)?;
    w.write_i32::<LittleEndian>(top)?;
    w.write_i32::<LittleEndian>(right)?;
    w.write_i32::<LittleEndian>(bottom)
}

pub fn write_ellipse<W: Write>(w: &mut W, left: i32, top: i32, right: i32, bottom: i32) -> io::Result<()> {
    header_prefix(w, EMR_ELLIPSE, 24)?;
    w.write_i32::<LittleEndian>(left)?;
    w.write_i32::<LittleEndian>(top)?;
    w.write_i32::<LittleEndian>(right)?;
    w.write_i32::<LittleEndian>(bottom)
}

pub fn write_polygon<W: Write>(w: &mut W, bounds: (i32, i32, i32, i32), points: &[(i32, i32); 6]) -> io::Result<()> {
    header_prefix(w, EMR_POLYGON, 76)?;
    let (left, top, right, bottom) = bounds;
    w.write_i32::<LittleEndian>(left)?;
    w.write_i32::<LittleEndian>(top)?;
    w.write_i32::<LittleEndian>(right)?;
    w.write_i32::<LittleEndian>(bottom)?;
    w.write_u32::<LittleEndian>(points.len() as u32)?;
    for &(x, y) in points {
        w.write_i32::<LittleEndian>(x)?;
        w.write_i32::<LittleEndian>(y)?;
    }
    Ok(())
}

/// UTF-16LE-encode a face name into a fixed 32-code-unit (64-byte) field, null padded.
pub fn write_facename_field<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    let units: Vec<u16> = name.encode_utf16().collect();
    for &u in &units {
        w.write_u16::<LittleEndian>(u)?;
    }
    for _ in units.len()..32 {
        w.write_u16::<LittleEndian>(0)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn write_extcreatefontindirectw<W: Write>(
    w: &mut W,
    ih_fonts: u32,
    height: i32,
    weight: i32,
    facename: &str,
) -> io::Result<()> {
    header_prefix(w, EMR_EXTCREATEFONTINDIRECTW, 104)?;
    w.write_u32::<LittleEndian>(ih_fonts)?;
    w.write_i32::<LittleEndian>(height)?;
    w.write_i32::<LittleEndian>(0)?; // width, 0 = use aspect ratio
    w.write_i32::<LittleEndian>(0)?; // escapement
    w.write_i32::<LittleEndian>(0)?; // orientation
    w.write_i32::<LittleEndian>(weight)?;
    w.write_u8(0)?; // italic
    w.write_u8(0)?; // underline
    w.write_u8(0)?; // strike out
    w.write_u8(0)?; // char_set: ANSI_CHARSET
    w.write_u8(0)?; // out_precision: OUT_DEFAULT_PRECIS
    w.write_u8(0)?; // clip_precision: CLIP_DEFAULT_PRECIS
    w.write_u8(0)?; // quality: DEFAULT_QUALITY
    w.write_u8(0x02 | (0x02 << 6))?; // pitch_and_family: VARIABLE_PITCH | FF_SWISS
    write_facename_field(w, facename)
}

pub fn write_settextcolor<W: Write>(w: &mut W, colorref: u32) -> io::Result<()> {
    header_prefix(w, EMR_SETTEXTCOLOR, 12)?;
    w.write_u32::<LittleEndian>(colorref)
}

pub fn write_settextalign<W: Write>(w: &mut W, mode: u32) -> io::Result<()> {
    header_prefix(w, EMR_SETTEXTALIGN, 12)?;
    w.write_u32::<LittleEndian>(mode)
}

/// `EMR_EXTTEXTOUTW`, followed immediately by its UTF-16LE payload (already padded to an even
/// code unit count by the caller).
pub fn write_exttextoutw<W: Write>(w: &mut W, x: i32, y: i32, char_count: u32, payload_le: &[u8]) -> io::Result<()> {
    let size = 76 + payload_le.len() as u32;
    header_prefix(w, EMR_EXTTEXTOUTW, size)?;
    // bounds: ignored by readers, conventionally all-0xff.
    for _ in 0..4 {
        w.write_u32::<LittleEndian>(0xffff_ffff)?;
    }
    w.write_u32::<LittleEndian>(2)?; // i_graphics_mode: GM_ADVANCED
    w.write_f32::<LittleEndian>(1.0)?; // ex_scale
    w.write_f32::<LittleEndian>(1.0)?; // ey_scale
    w.write_i32::<LittleEndian>(x)?;
    w.write_i32::<LittleEndian>(y)?;
    w.write_u32::<LittleEndian>(char_count)?;
    w.write_u32::<LittleEndian>(76)?; // off_string: payload starts right after this fixed header
    w.write_u32::<LittleEndian>(0)?; // options
    for _ in 0..4 {
        w.write_u32::<LittleEndian>(0xffff_ffff)?; // rectangle: ignored
    }
    w.write_u32::<LittleEndian>(0)?; // off_dx
    w.write_all(payload_le)
}

pub fn write_eof<W: Write>(w: &mut W) -> io::Result<()> {
    header_prefix(w, EMR_EOF, 20)?;
    w.write_u32::<LittleEndian>(0)?; // n_pal_entries
    w.write_u32::<LittleEndian>(0)?; // off_pal_entries
    w.write_u32::<LittleEndian>(20) // size_last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setmapmode_is_twelve_bytes() {
        let mut buf = Vec::new();
        write_setmapmode(&mut buf).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[0..4], &EMR_SETMAPMODE.to_le_bytes());
        assert_eq!(&buf[4..8], &12u32.to_le_bytes());
    }

    #[test]
    fn header_is_108_bytes() {
        let mut buf = Vec::new();
        write_header(&mut buf, (0, 0, 100, 50), 500, 10, 4).unwrap();
        assert_eq!(buf.len(), 108);
    }

    #[test]
    fn exttextoutw_size_includes_payload() {
        let mut buf = Vec::new();
        write_exttextoutw(&mut buf, 0, 0, 1, &[0x41, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(buf.len(), 76 + 4);
        assert_eq!(u32::from_le_bytes(buf[4..8].try_into().unwrap()), 80);
    }

    #[test]
    fn all_record_sizes_are_multiples_of_four() {
        let mut buf = Vec::new();
        write_rectangle(&mut buf, 0, 0, 1, 1).unwrap();
        write_ellipse(&mut buf, 0, 0, 1, 1).unwrap();
        write_polygon(&mut buf, (0, 0, 1, 1), &[(0, 0); 6]).unwrap();
        assert_eq!(buf.len() % 4, 0);
    }
}
