use serde::de::DeserializeOwned;

use crate::{de::RecordDeserializer, PlyError, ScalarValue};

/// The value of one property within a record.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

impl PropertyValue {
    pub fn as_scalar(&self) -> Option<ScalarValue> {
        match self {
            PropertyValue::Scalar(v) => Some(*v),
            PropertyValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScalarValue]> {
        match self {
            PropertyValue::Scalar(_) => None,
            PropertyValue::List(values) => Some(values),
        }
    }
}

/// One fully decoded element instance, e.g. a single vertex or face.
///
/// Fields keep the declaration order of the element's properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub element: String,
    pub fields: Vec<(String, PropertyValue)>,
}

impl ElementRecord {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            fields: Vec::new(),
        }
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Deserializes this record into any type whose fields are named after
    /// the element's properties.
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use streaming_ply::PlyDecoder;
    ///
    /// #[derive(Deserialize)]
    /// struct Vertex { x: f32, y: f32 }
    ///
    /// let mut decoder = PlyDecoder::new();
    /// decoder.feed(b"ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n0.5 2\n");
    /// let record = decoder.next_record()?.unwrap();
    /// let vertex: Vertex = record.deserialize()?;
    /// assert_eq!((vertex.x, vertex.y), (0.5, 2.0));
    /// # Ok::<(), streaming_ply::PlyError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, PlyError> {
        T::deserialize(RecordDeserializer::new(self))
    }
}
