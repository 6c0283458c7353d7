//! Scala (.scl) tuning file export
//!
//! The unison is implicit in the format, so only degrees 1.. are listed.
//! Every pitch line carries a decimal point, which Scala readers use to tell
//! cents apart from ratios.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{NejiError, Result};

/// Attribution comment written into every file
pub const ATTRIBUTION: &str = "Created using the neji calculator";

/// Textual rendering of cents values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CentsFormat {
    /// Shortest representation that round-trips the `f64`
    #[default]
    Full,
    /// Six decimal places
    Fixed,
}

impl CentsFormat {
    /// Render one pitch line value, always with a decimal point.
    pub fn render(self, cents: f64) -> String {
        match self {
            CentsFormat::Full => {
                let s = format!("{}", cents);
                if s.contains('.') {
                    s
                } else {
                    format!("{s}.0")
                }
            }
            CentsFormat::Fixed => format!("{:.6}", cents),
        }
    }
}

/// A tuning ready to be written as `<name>.scl`
#[derive(Clone, Debug, PartialEq)]
pub struct ScalaFile {
    name: String,
    cents: Vec<f64>,
    format: CentsFormat,
}

impl ScalaFile {
    /// `cents` is the whole tuning, starting with the 0-cent unison.
    pub fn new(name: &str, cents: &[f64]) -> Result<Self> {
        match cents.first() {
            None => {
                return Err(NejiError::InvalidTuning(
                    "a tuning needs at least the unison".to_string(),
                ))
            }
            Some(&first) if first != 0.0 => {
                return Err(NejiError::InvalidTuning(format!(
                    "first degree must be the 0-cent unison, got {first}"
                )))
            }
            Some(_) => {}
        }

        Ok(Self {
            name: name.to_string(),
            cents: cents.to_vec(),
            format: CentsFormat::default(),
        })
    }

    /// Use `format` for the pitch lines.
    pub fn with_format(mut self, format: CentsFormat) -> Self {
        self.format = format;
        self
    }

    /// `<name>.scl`
    pub fn file_name(&self) -> String {
        format!("{}.scl", self.name)
    }

    /// Notes listed in the file; the unison is not counted.
    pub fn note_count(&self) -> usize {
        self.cents.len() - 1
    }

    /// Full file contents: header, note count, then one pitch per line.
    pub fn render(&self) -> String {
        let mut ret = String::new();
        ret.push_str(&format!("! {}\n", self.file_name()));
        ret.push_str(&format!("! {}\n", ATTRIBUTION));
        ret.push_str("!\n");
        ret.push_str(&format!("{}\n", self.name));
        ret.push_str(&format!(" {}\n", self.note_count()));
        ret.push_str("!\n");

        for &cents in &self.cents[1..] {
            ret.push_str(&format!(" {}\n", self.format.render(cents)));
        }

        ret
    }

    /// Write `<name>.scl` into `dir` and return its path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let io_err = |source| NejiError::Io {
            path: path.clone(),
            source,
        };

        let mut file = std::fs::File::create(&path).map_err(io_err)?;
        file.write_all(self.render().as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        log::info!("wrote {} notes to {}", self.note_count(), path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let scl = ScalaFile::new("tiny", &[0.0, 100.0, 1200.0]).unwrap();
        let text = scl.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "! tiny.scl",
                "! Created using the neji calculator",
                "!",
                "tiny",
                " 2",
                "!",
                " 100.0",
                " 1200.0",
            ]
        );
    }

    #[test]
    fn test_cents_formats() {
        assert_eq!(CentsFormat::Full.render(1200.0), "1200.0");
        assert_eq!(CentsFormat::Full.render(701.9550008653874), "701.9550008653874");
        assert_eq!(CentsFormat::Fixed.render(701.9550008653874), "701.955001");
        assert_eq!(CentsFormat::Fixed.render(100.0), "100.000000");
    }

    #[test]
    fn test_fixed_format_applies_to_body() {
        let scl = ScalaFile::new("fixed", &[0.0, 386.3137138648348])
            .unwrap()
            .with_format(CentsFormat::Fixed);
        assert!(scl.render().ends_with(" 386.313714\n"));
    }

    #[test]
    fn test_invalid_tunings() {
        assert!(matches!(
            ScalaFile::new("empty", &[]),
            Err(NejiError::InvalidTuning(_))
        ));
        assert!(matches!(
            ScalaFile::new("shifted", &[3.0, 1200.0]),
            Err(NejiError::InvalidTuning(_))
        ));
    }

    #[test]
    fn test_unison_only() {
        let scl = ScalaFile::new("unison", &[0.0]).unwrap();
        assert_eq!(scl.note_count(), 0);
        assert!(scl.render().ends_with(" 0\n!\n"));
    }
}
