//! PLY header types and the line-driven grammar that builds them.

use std::fmt;

use tracing::debug;

use crate::{buffer::Endianness, ByteCursor, PlyError, ScalarType};

/// PLY file format (ascii or binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    /// Byte order of binary bodies. Ascii bodies never decode binary values,
    /// so the default is returned for them.
    pub fn endianness(&self) -> Endianness {
        match self {
            PlyFormat::BinaryBigEndian => Endianness::Big,
            PlyFormat::Ascii | PlyFormat::BinaryLittleEndian => Endianness::Little,
        }
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
            PlyFormat::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

/// Shape and types of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    /// A scalar property with a single value
    Scalar { data_type: ScalarType },
    /// A list property with variable length
    List {
        count_type: ScalarType,
        data_type: ScalarType,
    },
}

/// PLY property definition
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub property_type: PropertyType,
}

impl PropertyDef {
    pub fn is_list(&self) -> bool {
        matches!(self.property_type, PropertyType::List { .. })
    }
}

/// PLY element definition (e.g., vertex, face)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
}

/// PLY header containing format information and element definitions
#[derive(Debug, Clone, PartialEq)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub elements: Vec<ElementDef>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

impl PlyHeader {
    /// Parses a header from the front of `bytes`.
    ///
    /// Returns the header and the number of bytes it occupied, so the body
    /// starts at that offset.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize), PlyError> {
        let mut cursor = ByteCursor::new();
        cursor.append(bytes);
        let mut parser = HeaderParser::new();
        loop {
            match parser.step(&mut cursor)? {
                HeaderStep::Progress => {}
                HeaderStep::Suspend => {
                    return Err(PlyError::PrematureEndOfStream {
                        element: None,
                        remaining: 0,
                    })
                }
                HeaderStep::Complete(header) => {
                    return Ok((header, bytes.len() - cursor.available()))
                }
            }
        }
    }

    /// Get element definition by name
    pub fn get_element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Check if this header defines an element with the given name
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Begin,
    Format,
    Header(PlyFormat),
}

#[derive(Debug)]
pub(crate) enum HeaderStep {
    /// A line was consumed, more header follows.
    Progress,
    /// No complete line is buffered yet.
    Suspend,
    Complete(PlyHeader),
}

#[derive(Debug)]
pub(crate) struct HeaderParser {
    state: HeaderState,
    elements: Vec<ElementDef>,
    comments: Vec<String>,
    obj_info: Vec<String>,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            state: HeaderState::Begin,
            elements: Vec::new(),
            comments: Vec::new(),
            obj_info: Vec::new(),
        }
    }

    /// Consumes at most one header line.
    pub fn step(&mut self, cursor: &mut ByteCursor) -> Result<HeaderStep, PlyError> {
        let Some(line) = cursor.try_consume_line()? else {
            return Ok(HeaderStep::Suspend);
        };

        match self.state {
            HeaderState::Begin => {
                if line != "ply" {
                    return Err(PlyError::MagicMismatch { line });
                }
                self.state = HeaderState::Format;
            }
            HeaderState::Format => {
                let format = match line.as_str() {
                    "format ascii 1.0" => PlyFormat::Ascii,
                    "format binary_little_endian 1.0" => PlyFormat::BinaryLittleEndian,
                    "format binary_big_endian 1.0" => PlyFormat::BinaryBigEndian,
                    _ => return Err(PlyError::InvalidFormatLine { line }),
                };
                cursor.set_endianness(format.endianness());
                self.state = HeaderState::Header(format);
            }
            HeaderState::Header(format) => {
                if self.parse_declaration(line)? {
                    let header = PlyHeader {
                        format,
                        version: "1.0".to_string(),
                        elements: std::mem::take(&mut self.elements),
                        comments: std::mem::take(&mut self.comments),
                        obj_info: std::mem::take(&mut self.obj_info),
                    };
                    debug!(
                        format = %header.format,
                        elements = header.elements.len(),
                        "parsed ply header"
                    );
                    return Ok(HeaderStep::Complete(header));
                }
            }
        }

        Ok(HeaderStep::Progress)
    }

    /// Handles one declaration line. Returns true on `end_header`.
    fn parse_declaration(&mut self, line: String) -> Result<bool, PlyError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.first().copied() {
            Some("end_header") if parts.len() == 1 => return Ok(true),
            Some("comment") => self.comments.push(keyword_rest(&line, "comment")),
            Some("obj_info") => self.obj_info.push(keyword_rest(&line, "obj_info")),
            Some("element") => {
                if parts.len() != 3 {
                    return Err(PlyError::MalformedElementLine { line });
                }
                let Ok(count) = parts[2].parse::<usize>() else {
                    return Err(PlyError::MalformedElementLine { line });
                };
                self.elements.push(ElementDef {
                    name: parts[1].to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let Some(element) = self.elements.last_mut() else {
                    return Err(PlyError::PropertyWithoutElement { line });
                };
                let property = match parts.as_slice() {
                    ["property", "list", count_type, data_type, name] => PropertyDef {
                        name: name.to_string(),
                        property_type: PropertyType::List {
                            count_type: ScalarType::parse(count_type)?,
                            data_type: ScalarType::parse(data_type)?,
                        },
                    },
                    ["property", data_type, name] if *data_type != "list" => PropertyDef {
                        name: name.to_string(),
                        property_type: PropertyType::Scalar {
                            data_type: ScalarType::parse(data_type)?,
                        },
                    },
                    _ => return Err(PlyError::InvalidHeaderLine { line }),
                };

                element.properties.push(property);

                // Ascii rows cannot tell where a list ends and the next
                // property begins unless the list stands alone.
                if element.properties.len() > 1 && element.properties.iter().any(|p| p.is_list())
                {
                    return Err(PlyError::UnsupportedSchema {
                        element: element.name.clone(),
                    });
                }
            }
            _ => return Err(PlyError::InvalidHeaderLine { line }),
        }

        Ok(false)
    }
}

/// Text after a leading keyword, e.g. the body of a comment line.
fn keyword_rest(line: &str, keyword: &str) -> String {
    line.trim_start()
        .strip_prefix(keyword)
        .unwrap_or_default()
        .trim()
        .to_string()
}
