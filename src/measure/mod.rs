pub mod weighted;

use clap::ValueEnum;

pub use weighted::WeightedMeasurer;

/// Length oracle used by the chunker. Implementations must be pure: the same
/// text always measures the same.
pub trait Measurer: Send + Sync {
    fn measure(&self, text: &str) -> usize;
}

/// Plain code-point count. Lines that carry URLs or wide scripts split
/// differently than under [`WeightedMeasurer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CharMeasurer;

impl Measurer for CharMeasurer {
    fn measure(&self, text: &str) -> usize { text.chars().count() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MeasureKind {
    Weighted,
    Chars,
}

impl MeasureKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" => Some(MeasureKind::Weighted),
            "chars" | "char" | "plain" => Some(MeasureKind::Chars),
            _ => None,
        }
    }

    pub fn build(self, url_length: usize) -> Box<dyn Measurer> {
        match self {
            MeasureKind::Weighted => Box::new(WeightedMeasurer::new(url_length)),
            MeasureKind::Chars => Box::new(CharMeasurer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_measurer_counts_code_points() {
        assert_eq!(CharMeasurer.measure(""), 0);
        assert_eq!(CharMeasurer.measure("Hello World"), 11);
        assert_eq!(CharMeasurer.measure("ação"), 4);
    }

    #[test]
    fn parse_measure_kind() {
        assert_eq!(MeasureKind::parse("weighted"), Some(MeasureKind::Weighted));
        assert_eq!(MeasureKind::parse(" Chars "), Some(MeasureKind::Chars));
        assert_eq!(MeasureKind::parse("bytes"), None);
    }

    #[test]
    fn build_picks_implementation() {
        let url = "https://example.com/a/very/long/path/that/keeps/going/and/going";
        assert_eq!(MeasureKind::Weighted.build(23).measure(url), 23);
        assert_eq!(MeasureKind::Chars.build(23).measure(url), url.chars().count());
    }
}
