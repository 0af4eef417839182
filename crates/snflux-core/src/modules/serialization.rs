use std::fs;
use std::path::Path;

pub fn format_fixed_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$}",
        width = width,
        precision = precision
    )
}

/// Scientific notation with a signed, at least two digit exponent
/// (`1.500000e-05`), right-aligned to `width`.
pub fn format_scientific_f64(value: f64, width: usize, precision: usize) -> String {
    let raw = format!("{value:.precision$e}", precision = precision);
    let rendered = match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    };
    format!("{rendered:>width$}", width = width)
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

#[cfg(test)]
mod tests {
    use super::{
        format_fixed_f64, format_scientific_f64, normalize_text_artifact, write_text_artifact,
    };
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fixed_width_float_formatting_is_deterministic() {
        let first = format_fixed_f64(0.0002, 10, 6);
        let second = format_fixed_f64(0.0002, 10, 6);

        assert_eq!(first, "  0.000200");
        assert_eq!(first, second);
    }

    #[test]
    fn scientific_formatting_pads_exponent() {
        assert_eq!(format_scientific_f64(1.5e-5, 14, 6), "  1.500000e-05");
        assert_eq!(format_scientific_f64(2.25e12, 14, 6), "  2.250000e+12");
        assert_eq!(format_scientific_f64(3.0e-123, 0, 2), "3.00e-123");
        assert_eq!(format_scientific_f64(0.0, 0, 1), "0.0e+00");
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("artifact.dat");
        let input = "line 1\r\nline 2\rline 3";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("artifact should be readable");

        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("artifact should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"line 1\nline 2\nline 3\n");
    }
}
