//! Per-ECI encoding classification and single-scalar encoders.
//!
//! Single-byte and double-byte code pages are delegated to [`encoding_rs`], except for
//! ISO-8859-9 (Turkish) and ISO-8859-11 (Thai), which that crate omits because neither is an
//! encoding HTML5 mandates; those two keep small hand-written reverse tables here instead.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The character-encoding family a convertible ECI identifier maps to.
#[derive(Debug, Clone, Copy)]
pub enum EncodingKind {
    /// ECI 0 and 3: ISO/IEC 8859-1, special-cased ahead of the general table.
    Latin1,
    /// ECI 170: the printable 7-bit subset shared by every symbology-invariant font.
    AsciiInvariant,
    /// ECI 27: plain 7-bit US-ASCII.
    Ascii,
    /// A single-byte code page backed by `encoding_rs`.
    EncodingRs(&'static encoding_rs::Encoding),
    /// ISO-8859-9, not supported by `encoding_rs`.
    Iso88599,
    /// ISO-8859-11, not supported by `encoding_rs`.
    Iso885911,
    /// ECI 20: Shift JIS, backed by `encoding_rs`.
    ShiftJis,
    /// ECI 25: UTF-16 big-endian.
    Utf16Be,
    /// ECI 33: UTF-16 little-endian.
    Utf16Le,
    /// ECI 34: UTF-32 big-endian.
    Utf32Be,
    /// ECI 35: UTF-32 little-endian.
    Utf32Le,
    /// ECI 28: Big5, backed by `encoding_rs`.
    Big5,
    /// ECI 29: GB2312, approximated by `encoding_rs`'s GBK superset (see classify() note).
    Gb2312,
    /// ECI 30: EUC-KR / KS X 1001.
    EucKr,
    /// ECI 31: GBK.
    Gbk,
    /// ECI 32: GB18030.
    Gb18030,
}

/// Maps an ECI identifier to the encoding it addresses, or `None` if the identifier is
/// unassigned, reserved, or is UTF-8 itself (ECI 26, which needs no conversion).
///
/// Mirrors `eci_funcs[36]` from the reference ECI dispatch table: indices 0, 1, 2, 14, 19, and 26
/// have no entry (0 and 3 both alias `Latin1`, special-cased before this table is consulted).
pub fn classify(eci: u32) -> Option<EncodingKind> {
    use EncodingKind::*;
    Some(match eci {
        0 | 3 => Latin1,
        4 => EncodingRs(encoding_rs::ISO_8859_2),
        5 => EncodingRs(encoding_rs::ISO_8859_3),
        6 => EncodingRs(encoding_rs::ISO_8859_4),
        7 => EncodingRs(encoding_rs::ISO_8859_5),
        8 => EncodingRs(encoding_rs::ISO_8859_6),
        9 => EncodingRs(encoding_rs::ISO_8859_7),
        10 => EncodingRs(encoding_rs::ISO_8859_8),
        11 => Iso88599,
        12 => EncodingRs(encoding_rs::ISO_8859_10),
        13 => Iso885911,
        15 => EncodingRs(encoding_rs::ISO_8859_13),
        16 => EncodingRs(encoding_rs::ISO_8859_14),
        17 => EncodingRs(encoding_rs::ISO_8859_15),
        18 => EncodingRs(encoding_rs::ISO_8859_16),
        20 => ShiftJis,
        21 => EncodingRs(encoding_rs::WINDOWS_1250),
        22 => EncodingRs(encoding_rs::WINDOWS_1251),
        23 => EncodingRs(encoding_rs::WINDOWS_1252),
        24 => EncodingRs(encoding_rs::WINDOWS_1256),
        25 => Utf16Be,
        27 => Ascii,
        28 => Big5,
        29 => Gb2312,
        30 => EucKr,
        31 => Gbk,
        32 => Gb18030,
        33 => Utf16Le,
        34 => Utf32Be,
        35 => Utf32Le,
        170 => AsciiInvariant,
        _ => return None,
    })
}

fn push_iso8859_table(lead_start: u32, table: &'static [char]) -> HashMap<char, u8> {
    table
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, (lead_start + i as u32) as u8))
        .collect()
}

// Source: ftp://ftp.unicode.org/Public/MAPPINGS/ISO8859/8859-9.TXT
const ISO_8859_9_HIGH: [char; 96] = [
    '\u{00A0}', '\u{00A1}', '\u{00A2}', '\u{00A3}', '\u{00A4}', '\u{00A5}', '\u{00A6}', '\u{00A7}',
    '\u{00A8}', '\u{00A9}', '\u{00AA}', '\u{00AB}', '\u{00AC}', '\u{00AD}', '\u{00AE}', '\u{00AF}',
    '\u{00B0}', '\u{00B1}', '\u{00B2}', '\u{00B3}', '\u{00B4}', '\u{00B5}', '\u{00B6}', '\u{00B7}',
    '\u{00B8}', '\u{00B9}', '\u{00BA}', '\u{00BB}', '\u{00BC}', '\u{00BD}', '\u{00BE}', '\u{00BF}',
    '\u{00C0}', '\u{00C1}', '\u{00C2}', '\u{00C3}', '\u{00C4}', '\u{00C5}', '\u{00C6}', '\u{00C7}',
    '\u{00C8}', '\u{00C9}', '\u{00CA}', '\u{00CB}', '\u{00CC}', '\u{00CD}', '\u{00CE}', '\u{00CF}',
    '\u{011E}', '\u{00D1}', '\u{00D2}', '\u{00D3}', '\u{00D4}', '\u{00D5}', '\u{00D6}', '\u{00D7}',
    '\u{00D8}', '\u{00D9}', '\u{00DA}', '\u{00DB}', '\u{00DC}', '\u{0130}', '\u{015E}', '\u{00DF}',
    '\u{00E0}', '\u{00E1}', '\u{00E2}', '\u{00E3}', '\u{00E4}', '\u{00E5}', '\u{00E6}', '\u{00E7}',
    '\u{00E8}', '\u{00E9}', '\u{00EA}', '\u{00EB}', '\u{00EC}', '\u{00ED}', '\u{00EE}', '\u{00EF}',
    '\u{011F}', '\u{00F1}', '\u{00F2}', '\u{00F3}', '\u{00F4}', '\u{00F5}', '\u{00F6}', '\u{00F7}',
    '\u{00F8}', '\u{00F9}', '\u{00FA}', '\u{00FB}', '\u{00FC}', '\u{0131}', '\u{015F}', '\u{00FF}',
];

// Source: ftp://ftp.unicode.org/Public/MAPPINGS/ISO8859/8859-11.TXT
const ISO_8859_11_HIGH: [char; 88] = [
    '\u{00A0}', '\u{0E01}', '\u{0E02}', '\u{0E03}', '\u{0E04}', '\u{0E05}', '\u{0E06}', '\u{0E07}',
    '\u{0E08}', '\u{0E09}', '\u{0E0A}', '\u{0E0B}', '\u{0E0C}', '\u{0E0D}', '\u{0E0E}', '\u{0E0F}',
    '\u{0E10}', '\u{0E11}', '\u{0E12}', '\u{0E13}', '\u{0E14}', '\u{0E15}', '\u{0E16}', '\u{0E17}',
    '\u{0E18}', '\u{0E19}', '\u{0E1A}', '\u{0E1B}', '\u{0E1C}', '\u{0E1D}', '\u{0E1E}', '\u{0E1F}',
    '\u{0E20}', '\u{0E21}', '\u{0E22}', '\u{0E23}', '\u{0E24}', '\u{0E25}', '\u{0E26}', '\u{0E27}',
    '\u{0E28}', '\u{0E29}', '\u{0E2A}', '\u{0E2B}', '\u{0E2C}', '\u{0E2D}', '\u{0E2E}', '\u{0E2F}',
    '\u{0E30}', '\u{0E31}', '\u{0E32}', '\u{0E33}', '\u{0E34}', '\u{0E35}', '\u{0E36}', '\u{0E37}',
    '\u{0E38}', '\u{0E39}', '\u{0E3A}', '\u{0E3F}', '\u{0E40}', '\u{0E41}', '\u{0E42}', '\u{0E43}',
    '\u{0E44}', '\u{0E45}', '\u{0E46}', '\u{0E47}', '\u{0E48}', '\u{0E49}', '\u{0E4A}', '\u{0E4B}',
    '\u{0E4C}', '\u{0E4D}', '\u{0E4E}', '\u{0E4F}', '\u{0E50}', '\u{0E51}', '\u{0E52}', '\u{0E53}',
    '\u{0E54}', '\u{0E55}', '\u{0E56}', '\u{0E57}', '\u{0E58}', '\u{0E59}', '\u{0E5A}', '\u{0E5B}',
];

static ISO_8859_9_REVERSE: Lazy<HashMap<char, u8>> = Lazy::new(|| push_iso8859_table(0xA0, &ISO_8859_9_HIGH));
static ISO_8859_11_REVERSE: Lazy<HashMap<char, u8>> = Lazy::new(|| push_iso8859_table(0xA0, &ISO_8859_11_HIGH));

fn encode_iso8859_high(table: &HashMap<char, u8>, scalar: u32) -> Option<Vec<u8>> {
    if scalar < 0x80 {
        return Some(vec![scalar as u8]);
    }
    char::from_u32(scalar).and_then(|c| table.get(&c)).map(|&b| vec![b])
}

/// Encode a single Unicode scalar value into the bytes the given encoding kind prescribes, or
/// `None` if the scalar has no representation in that encoding.
pub fn encode_scalar(kind: EncodingKind, scalar: u32) -> Option<Vec<u8>> {
    use EncodingKind::*;
    match kind {
        Latin1 => {
            if scalar < 0x80 || (0xA0..0x100).contains(&scalar) {
                Some(vec![scalar as u8])
            } else {
                None
            }
        }
        AsciiInvariant => {
            let ok = scalar == 0x7f
                || (scalar <= u32::from(b'z')
                    && scalar != u32::from(b'#')
                    && scalar != u32::from(b'$')
                    && scalar != u32::from(b'@')
                    && (scalar <= u32::from(b'Z') || scalar == u32::from(b'_') || scalar >= u32::from(b'a')));
            ok.then(|| vec![scalar as u8])
        }
        Ascii => (scalar < 0x80).then(|| vec![scalar as u8]),
        Iso88599 => encode_iso8859_high(&ISO_8859_9_REVERSE, scalar),
        Iso885911 => encode_iso8859_high(&ISO_8859_11_REVERSE, scalar),
        Utf16Be => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u16; 2];
            let units = c.encode_utf16(&mut buf);
            let mut out = Vec::with_capacity(units.len() * 2);
            for &u in units.iter() {
                out.extend_from_slice(&u.to_be_bytes());
            }
            Some(out)
        }
        Utf16Le => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u16; 2];
            let units = c.encode_utf16(&mut buf);
            let mut out = Vec::with_capacity(units.len() * 2);
            for &u in units.iter() {
                out.extend_from_slice(&u.to_le_bytes());
            }
            Some(out)
        }
        Utf32Be => Some(scalar.to_be_bytes().to_vec()),
        Utf32Le => Some(scalar.to_le_bytes().to_vec()),
        EucKr => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = encoding_rs::EUC_KR.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
        Gbk | Gb2312 => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = encoding_rs::GBK.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
        Gb18030 => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = encoding_rs::GB18030.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
        Big5 => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = encoding_rs::BIG5.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
        ShiftJis => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = encoding_rs::SHIFT_JIS.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
        EncodingRs(enc) => {
            let c = char::from_u32(scalar)?;
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            let (encoded, _, unmappable) = enc.encode(s);
            (!unmappable).then(|| encoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_rejects_c1_controls() {
        assert_eq!(encode_scalar(EncodingKind::Latin1, 0x80), None);
        assert_eq!(encode_scalar(EncodingKind::Latin1, 0x9f), None);
        assert_eq!(encode_scalar(EncodingKind::Latin1, 0xa0), Some(vec![0xa0]));
    }

    #[test]
    fn ascii_invariant_rejects_hash() {
        assert_eq!(encode_scalar(EncodingKind::AsciiInvariant, u32::from(b'#')), None);
        assert_eq!(encode_scalar(EncodingKind::AsciiInvariant, u32::from(b'A')), Some(vec![b'A']));
    }

    #[test]
    fn big5_encodes_zhong() {
        // U+4E2D, Big5 0xA4 0xA4
        assert_eq!(encode_scalar(EncodingKind::Big5, 0x4E2D), Some(vec![0xA4, 0xA4]));
    }

    #[test]
    fn euc_kr_encodes_hangul_syllable() {
        // U+AC00, KS X 1001 0xB0 0xA1
        assert_eq!(encode_scalar(EncodingKind::EucKr, 0xAC00), Some(vec![0xB0, 0xA1]));
    }

    #[test]
    fn iso_8859_9_turkish_g_breve() {
        assert_eq!(encode_scalar(EncodingKind::Iso88599, 0x011E), Some(vec![0xD0]));
    }

    #[test]
    fn iso_8859_11_thai_ko_kai() {
        assert_eq!(encode_scalar(EncodingKind::Iso885911, 0x0E01), Some(vec![0xA1]));
    }

    #[test]
    fn utf16be_round_trips_bmp_scalar() {
        assert_eq!(encode_scalar(EncodingKind::Utf16Be, 0x4E2D), Some(vec![0x4E, 0x2D]));
    }

    #[test]
    fn classify_excludes_reserved_ecis() {
        for eci in [1, 2, 14, 19, 26] {
            assert!(classify(eci).is_none(), "eci {eci} should be unmapped");
        }
        assert!(classify(24).is_some(), "eci 24 (windows-1256) should be convertible");
    }
}
