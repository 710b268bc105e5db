//! PCD header model and parsing.

use crate::error::PcdError;

/// Storage layout declared by the `DATA` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Ascii,
    Binary,
    BinaryCompressed,
}

/// The parsed header of a PCD file.
#[derive(Debug, Clone, PartialEq)]
pub struct PcdHeader {
    pub fields: Vec<String>,
    /// Per-field type letters (`F`, `U`, `I`).
    pub types: Vec<char>,
    pub width: u32,
    pub height: u32,
    pub points: usize,
    pub data: DataFormat,
}

impl PcdHeader {
    /// Header for a cloud written with `x y z rgba` fields.
    pub fn xyzrgba(width: u32, height: u32, points: usize) -> Self {
        Self {
            fields: ["x", "y", "z", "rgba"].iter().map(|s| s.to_string()).collect(),
            types: vec!['F', 'F', 'F', 'U'],
            width,
            height,
            points,
            data: DataFormat::Ascii,
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn field_type(&self, index: usize) -> char {
        self.types.get(index).copied().unwrap_or('F')
    }

    /// Render the header, ending with the `DATA` line.
    pub fn render(&self) -> String {
        let data = match self.data {
            DataFormat::Ascii => "ascii",
            DataFormat::Binary => "binary",
            DataFormat::BinaryCompressed => "binary_compressed",
        };
        let n = self.fields.len();
        let join = |items: Vec<String>| items.join(" ");

        let mut out = String::new();
        out.push_str("# .PCD v0.7 - Point Cloud Data file format\n");
        out.push_str("VERSION 0.7\n");
        out.push_str(&format!("FIELDS {}\n", self.fields.join(" ")));
        out.push_str(&format!("SIZE {}\n", join(vec!["4".to_string(); n])));
        out.push_str(&format!(
            "TYPE {}\n",
            join(self.types.iter().map(|t| t.to_string()).collect())
        ));
        out.push_str(&format!("COUNT {}\n", join(vec!["1".to_string(); n])));
        out.push_str(&format!("WIDTH {}\n", self.width));
        out.push_str(&format!("HEIGHT {}\n", self.height));
        out.push_str("VIEWPOINT 0 0 0 1 0 0 0\n");
        out.push_str(&format!("POINTS {}\n", self.points));
        out.push_str(&format!("DATA {}\n", data));
        out
    }

    /// Parse header lines up to and including `DATA`.
    ///
    /// Returns the header and the number of lines it occupied.
    pub fn parse(text: &str) -> Result<(Self, usize), PcdError> {
        let mut fields: Option<Vec<String>> = None;
        let mut types: Option<Vec<char>> = None;
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut points: Option<usize> = None;

        for (line_no, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let key = parts.next().unwrap_or_default();
            let values: Vec<&str> = parts.collect();

            match key {
                "VERSION" | "VIEWPOINT" => {}
                "FIELDS" => fields = Some(values.iter().map(|s| s.to_string()).collect()),
                "TYPE" => {
                    types = Some(
                        values
                            .iter()
                            .map(|s| s.chars().next().unwrap_or('F').to_ascii_uppercase())
                            .collect(),
                    )
                }
                "SIZE" => {}
                "COUNT" => {
                    if let Some(bad) = values.iter().find(|v| **v != "1") {
                        return Err(PcdError::Unsupported(format!("field COUNT {}", bad)));
                    }
                }
                "WIDTH" => width = Some(parse_value("WIDTH", &values)?),
                "HEIGHT" => height = Some(parse_value("HEIGHT", &values)?),
                "POINTS" => points = Some(parse_value("POINTS", &values)?),
                "DATA" => {
                    let data = match values.first().copied() {
                        Some("ascii") => DataFormat::Ascii,
                        Some("binary") => DataFormat::Binary,
                        Some("binary_compressed") => DataFormat::BinaryCompressed,
                        other => {
                            return Err(PcdError::InvalidHeader {
                                key: "DATA",
                                value: other.unwrap_or_default().to_string(),
                            });
                        }
                    };

                    let fields = fields.ok_or(PcdError::MissingHeader("FIELDS"))?;
                    let width = width.ok_or(PcdError::MissingHeader("WIDTH"))?;
                    let height = height.unwrap_or(1);
                    let points =
                        points.unwrap_or((width as usize).saturating_mul(height as usize));
                    let types = types.unwrap_or_else(|| vec!['F'; fields.len()]);

                    let header = Self {
                        fields,
                        types,
                        width,
                        height,
                        points,
                        data,
                    };
                    return Ok((header, line_no + 1));
                }
                other => {
                    return Err(PcdError::InvalidHeader {
                        key: "header",
                        value: other.to_string(),
                    });
                }
            }
        }

        Err(PcdError::MissingHeader("DATA"))
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, values: &[&str]) -> Result<T, PcdError> {
    let raw = values.first().copied().unwrap_or_default();
    raw.parse::<T>().map_err(|_| PcdError::InvalidHeader {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_then_parse() {
        let header = PcdHeader::xyzrgba(640, 480, 307_200);
        let text = header.render();
        let (parsed, lines) = PcdHeader::parse(&text).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(lines, text.lines().count());
    }

    #[test]
    fn test_render_layout() {
        let text = PcdHeader::xyzrgba(3, 1, 3).render();
        assert!(text.contains("FIELDS x y z rgba\n"));
        assert!(text.contains("SIZE 4 4 4 4\n"));
        assert!(text.contains("TYPE F F F U\n"));
        assert!(text.contains("COUNT 1 1 1 1\n"));
        assert!(text.ends_with("DATA ascii\n"));
    }

    #[test]
    fn test_missing_fields() {
        let err = PcdHeader::parse("WIDTH 1\nDATA ascii\n").unwrap_err();
        assert!(matches!(err, PcdError::MissingHeader("FIELDS")));
    }

    #[test]
    fn test_missing_data_line() {
        let err = PcdHeader::parse("FIELDS x y z\nWIDTH 1\n").unwrap_err();
        assert!(matches!(err, PcdError::MissingHeader("DATA")));
    }

    #[test]
    fn test_bad_width() {
        let err = PcdHeader::parse("FIELDS x y z\nWIDTH abc\nDATA ascii\n").unwrap_err();
        assert!(matches!(err, PcdError::InvalidHeader { key: "WIDTH", .. }));
    }

    #[test]
    fn test_points_defaults_to_grid_size() {
        let (header, _) =
            PcdHeader::parse("FIELDS x y z\nWIDTH 4\nHEIGHT 2\nDATA ascii\n").unwrap();
        assert_eq!(header.points, 8);
        assert_eq!(header.types, vec!['F'; 3]);
    }
}
