//! An incremental PLY (Polygon File Format) decoder.
//!
//! PLY files start with a text header describing a list of elements (vertices,
//! faces, ...) and their typed properties, followed by a body in ascii or
//! binary (little or big endian). This crate decodes that body while the bytes
//! are still arriving: feed chunks of any size, split anywhere, and fully
//! decoded [`ElementRecord`]s come out in file order.
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use streaming_ply::PlyDecoder;
//!
//! #[derive(Deserialize, Debug)]
//! struct Vertex {
//!     x: f32,
//!     y: f32,
//!     z: f32,
//! }
//!
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 1
//! property float x
//! property float y
//! property float z
//! end_header
//! 1.0 2.0 3.0
//! "#;
//!
//! let mut decoder = PlyDecoder::new();
//! let mut vertices = Vec::new();
//! for chunk in ply_data.as_bytes().chunks(5) {
//!     decoder.feed(chunk);
//!     while let Some(record) = decoder.next_record()? {
//!         vertices.push(record.deserialize::<Vertex>()?);
//!     }
//! }
//! decoder.finish()?;
//!
//! println!("Found {} vertices", decoder.header().unwrap().get_element("vertex").unwrap().count);
//! println!("First vertex: {:?}", vertices[0]);
//! # Ok::<(), streaming_ply::PlyError>(())
//! ```

mod buffer;
mod de;
mod decoder;
mod error;
mod header;
mod options;
mod reader;
mod record;
mod types;

pub use buffer::{ByteCursor, Endianness};
pub use decoder::{PlyDecoder, Step};
pub use error::PlyError;
pub use header::{ElementDef, PlyFormat, PlyHeader, PropertyDef, PropertyType};
pub use options::DecoderOptions;
pub use reader::RecordReader;
pub use record::{ElementRecord, PropertyValue};
pub use types::{ScalarType, ScalarValue};
