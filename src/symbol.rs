use crate::color::Color;
use crate::vector::VectorGraph;

/// The symbologies whose output behaviour this crate special-cases. Every other symbology uses
/// the default (single foreground colour, no bullseye interleave, extendable human-readable
/// text) behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Ultra,
    MaxiCode,
    GridMatrix,
    UpnQr,
    Other,
}

impl Symbology {
    /// Rectangles are drawn with a per-rectangle colour rather than a single foreground brush.
    pub fn uses_colour_fill(self) -> bool {
        matches!(self, Symbology::Ultra)
    }

    /// Concentric circles alternate between foreground and background brush.
    pub fn is_bullseye(self) -> bool {
        matches!(self, Symbology::MaxiCode)
    }

    /// Human-readable text for this symbology can itself carry style information (for example,
    /// an extended barcode font), so forcing bold weight is only honoured when `SMALL_TEXT` is
    /// also requested.
    pub fn text_is_extendable(self) -> bool {
        !matches!(self, Symbology::MaxiCode | Symbology::Ultra)
    }

    /// The ECI assumed for a segment that does not specify one.
    pub fn default_eci(self) -> u32 {
        match self {
            Symbology::GridMatrix => 29,
            Symbology::UpnQr => 4,
            _ => 3,
        }
    }
}

bitflags::bitflags! {
    /// Output option bits recognised by the EMF writer.
    #[derive(Debug, Clone, Default)]
    pub struct OutputOptions: u32 {
        const STDOUT = 0x01;
        const BOLD_TEXT = 0x02;
        const SMALL_TEXT = 0x04;
    }
}

/// A resolved barcode ready to be transcoded or serialized. This mirrors the subset of the
/// backend's symbol structure that the ECI and EMF subsystems actually consume.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub symbology: Symbology,
    pub vector: VectorGraph,
    pub fgcolour: Color,
    pub bgcolour: Color,
    pub output_options: OutputOptions,
    pub outfile: std::path::PathBuf,
}

impl Symbol {
    /// Bold weight applies when the caller asked for it and either the symbology's human
    /// readable text isn't extendable, or small-text mode was explicitly requested.
    pub fn bold_text(&self) -> bool {
        self.output_options.contains(OutputOptions::BOLD_TEXT)
            && (!self.symbology.text_is_extendable() || self.output_options.contains(OutputOptions::SMALL_TEXT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(symbology: Symbology, opts: OutputOptions) -> Symbol {
        Symbol {
            symbology,
            vector: VectorGraph::default(),
            fgcolour: Color::parse("000000").unwrap(),
            bgcolour: Color::parse("ffffff").unwrap(),
            output_options: opts,
            outfile: "out.emf".into(),
        }
    }

    #[test]
    fn bold_applies_for_non_extendable_symbology() {
        let s = sym(Symbology::MaxiCode, OutputOptions::BOLD_TEXT);
        assert!(s.bold_text());
    }

    #[test]
    fn bold_requires_small_text_for_extendable_symbology() {
        let s = sym(Symbology::Other, OutputOptions::BOLD_TEXT);
        assert!(!s.bold_text());
        let s = sym(Symbology::Other, OutputOptions::BOLD_TEXT | OutputOptions::SMALL_TEXT);
        assert!(s.bold_text());
    }

    #[test]
    fn default_eci_matches_symbology() {
        assert_eq!(Symbology::GridMatrix.default_eci(), 29);
        assert_eq!(Symbology::UpnQr.default_eci(), 4);
        assert_eq!(Symbology::Other.default_eci(), 3);
    }
}
