//! Classifies Extended Channel Interpretation identifiers and transcodes UTF-8 text into the
//! byte sequence a target encoding prescribes.

mod decode;
mod tables;

use crate::error::{Error, Result};
use decode::{Utf8Decoder, ACCEPT, REJECT};
use tables::{classify, encode_scalar};

/// A block of text tagged with the ECI it should be interpreted under (0 means "unset").
#[derive(Debug, Clone)]
pub struct Segment {
    pub eci: u32,
    pub text: Vec<u8>,
}

/// ECI identifiers considered by [`best_eci`], in ascending-scan order. 14 and 19 are skipped
/// (unassigned), as is 20 (Shift JIS is deliberately never auto-selected).
const CANDIDATE_ECIS: &[u32] = &[3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 16, 17, 18, 21, 22, 23, 24];

/// True when `eci` addresses a character encoding this crate can transcode into (i.e. it isn't
/// unassigned, reserved, or UTF-8 itself).
pub fn is_convertible(eci: u32) -> bool {
    classify(eci).is_some()
}

/// An upper bound on the number of bytes [`transcode`] will need for `source` under `eci`.
///
/// Preserves the reference implementation's estimator verbatim, including its known
/// undercount for UTF-32 targets on code points above U+FFFF (see `SPEC_FULL.md` design notes).
pub fn output_length(eci: u32, source: &[u8]) -> usize {
    match eci {
        20 => source.len() + source.iter().filter(|&&b| b == b'\\').count(),
        25 | 33 => source.len() + source.iter().filter(|&&b| b < 0x80).count(),
        32 => source.len() * 2,
        34 | 35 => {
            let ascii = source.iter().filter(|&&b| b < 0x80).count();
            let non_ascii = source.len() - ascii;
            3 * ascii + non_ascii
        }
        _ => source.len(),
    }
}

/// Transcodes `source` (valid UTF-8) into the byte sequence `eci` prescribes.
pub fn transcode(eci: u32, source: &[u8]) -> Result<Vec<u8>> {
    let kind = classify(eci).ok_or(Error::InvalidData)?;

    let mut decoder = Utf8Decoder::new();
    let mut out = Vec::with_capacity(output_length(eci, source));

    for &byte in source {
        match decoder.decode(byte) {
            ACCEPT => {
                let bytes = encode_scalar(kind, decoder.codepoint()).ok_or(Error::InvalidData)?;
                out.extend(bytes);
            }
            REJECT => return Err(Error::InvalidData),
            _ => {}
        }
    }

    log::debug!("transcode: eci={eci} input_len={} output_len={}", source.len(), out.len());
    Ok(out)
}

/// Checks whether every scalar in `source` converts cleanly under `eci`, without allocating the
/// output buffer.
fn all_scalars_convert(eci: u32, source: &[u8]) -> bool {
    let Some(kind) = classify(eci) else { return false };
    let mut decoder = Utf8Decoder::new();
    for &byte in source {
        match decoder.decode(byte) {
            ACCEPT => {
                if encode_scalar(kind, decoder.codepoint()).is_none() {
                    return false;
                }
            }
            REJECT => return false,
            _ => {}
        }
    }
    decoder.is_accepting()
}

/// Finds the lowest ECI under which every scalar in `source` converts. Returns 26 (UTF-8) if
/// none of the candidate ECIs work but `source` is valid UTF-8, or 0 if `source` is not valid
/// UTF-8 at all.
pub fn best_eci(source: &[u8]) -> u32 {
    if decode::decode_all(source).is_none() {
        return 0;
    }
    for &eci in CANDIDATE_ECIS {
        if all_scalars_convert(eci, source) {
            log::debug!("best_eci: chose {eci}");
            return eci;
        }
    }
    log::debug!("best_eci: falling back to utf-8 (26)");
    26
}

/// Assigns a best-fit ECI to every segment whose `eci` field is 0, avoiding a gratuitous switch
/// into the symbology's default ECI when the previous segment was already using a non-default
/// ECI.
///
/// Returns the first ECI actually assigned, or 0 if some auto-resolved segment's text isn't
/// valid UTF-8 under any candidate encoding — matching the reference implementation, which
/// abandons the whole scan (leaving any segments already resolved in this call as they are) the
/// moment one segment comes back unresolvable, rather than skipping past it.
pub fn best_eci_segs(default_eci: u32, segs: &mut [Segment]) -> u32 {
    let mut first_eci_set = 0u32;
    for i in 0..segs.len() {
        if segs[i].eci != 0 {
            continue;
        }
        let chosen = best_eci(&segs[i].text);
        if chosen == 0 {
            log::debug!("best_eci_segs: segment {i} has no viable ECI, aborting");
            return 0;
        }
        if chosen == default_eci {
            let prev_is_explicit_nondefault =
                i != 0 && segs[i - 1].eci != 0 && segs[i - 1].eci != default_eci;
            if prev_is_explicit_nondefault {
                segs[i].eci = chosen;
                if first_eci_set == 0 {
                    first_eci_set = chosen;
                }
            }
        } else {
            segs[i].eci = chosen;
            if first_eci_set == 0 {
                first_eci_set = chosen;
            }
        }
    }
    log::debug!("best_eci_segs: first segment resolved to {first_eci_set}");
    first_eci_set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcode_ascii() {
        assert_eq!(transcode(3, b"A").unwrap(), vec![0x41]);
    }

    #[test]
    fn transcode_latin1_accented() {
        assert_eq!(transcode(3, "é".as_bytes()).unwrap(), vec![0xE9]);
    }

    #[test]
    fn transcode_latin1_rejects_c1_control() {
        assert!(transcode(3, &[0xC2, 0x80]).is_err());
    }

    #[test]
    fn transcode_ascii_invariant_rejects_hash() {
        assert!(transcode(170, b"A#").is_err());
    }

    #[test]
    fn transcode_unassigned_eci_is_invalid_data() {
        match transcode(14, b"A") {
            Err(Error::InvalidData) => {}
            other => panic!("expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn transcode_big5() {
        assert_eq!(transcode(28, "中".as_bytes()).unwrap(), vec![0xA4, 0xA4]);
    }

    #[test]
    fn transcode_euc_kr() {
        assert_eq!(transcode(30, "가".as_bytes()).unwrap(), vec![0xB0, 0xA1]);
    }

    #[test]
    fn best_eci_picks_latin1_for_ascii() {
        assert_eq!(best_eci(b"A"), 3);
    }

    #[test]
    fn best_eci_picks_latin1_for_accented_latin() {
        assert_eq!(best_eci("é".as_bytes()), 3);
    }

    #[test]
    fn best_eci_falls_back_to_utf8_for_cjk() {
        assert_eq!(best_eci("中".as_bytes()), 26);
    }

    #[test]
    fn best_eci_zero_for_invalid_utf8() {
        assert_eq!(best_eci(&[0xff, 0xfe]), 0);
    }

    #[test]
    fn is_convertible_excludes_reserved_and_utf8() {
        for eci in [1, 2, 14, 19, 26] {
            assert!(!is_convertible(eci));
        }
        assert!(is_convertible(24));
        assert!(is_convertible(170));
    }

    #[test]
    fn best_eci_segs_avoids_gratuitous_default_switch() {
        let mut segs = vec![
            Segment { eci: 9, text: b"A".to_vec() },
            Segment { eci: 0, text: b"A".to_vec() },
        ];
        let first = best_eci_segs(3, &mut segs);
        // second segment's best fit is 3 (the default); since the previous segment was an
        // explicit non-default ECI, the switch is worth making.
        assert_eq!(segs[1].eci, 3);
        assert_eq!(first, 3);
    }

    #[test]
    fn best_eci_segs_skips_default_switch_when_unneeded() {
        let mut segs = vec![Segment { eci: 0, text: b"A".to_vec() }];
        let first = best_eci_segs(3, &mut segs);
        // first segment, best fit equals default, no preceding non-default segment: left at 0.
        assert_eq!(segs[0].eci, 0);
        assert_eq!(first, 0);
    }

    #[test]
    fn best_eci_segs_aborts_on_unresolvable_segment() {
        let mut segs = vec![Segment { eci: 0, text: vec![0xff, 0xfe] }];
        assert_eq!(best_eci_segs(3, &mut segs), 0);
        // the unresolvable segment is left untouched; caller decides how to recover (e.g.
        // forcing ECI 26 or failing outright).
        assert_eq!(segs[0].eci, 0);
    }
}
