use crate::{
    de::ElementCursor, ByteCursor, ElementDef, ElementRecord, PlyError, PropertyType,
    PropertyValue, Step,
};

/// Decodes at most one property of the row in progress. Byte order comes
/// from the [`ByteCursor`].
pub(crate) fn step(
    elements: &[ElementDef],
    cursor: &mut ElementCursor,
    buffer: &mut ByteCursor,
) -> Result<Step, PlyError> {
    let Some(elem_def) = cursor.current(elements) else {
        return if buffer.has_bytes() {
            Err(PlyError::UnexpectedBodyData)
        } else {
            Ok(Step::Done)
        };
    };

    if let Some(prop) = elem_def.properties.get(cursor.next_property) {
        let value = match prop.property_type {
            PropertyType::Scalar { data_type } => buffer
                .try_consume_scalar(data_type)
                .map(PropertyValue::Scalar),
            PropertyType::List {
                count_type,
                data_type,
            } => buffer
                .try_consume_list(count_type, data_type)?
                .map(PropertyValue::List),
        };
        let Some(value) = value else {
            return Ok(Step::Suspend);
        };
        cursor.fields.push((prop.name.clone(), value));
        cursor.next_property += 1;
    }

    if cursor.next_property < elem_def.properties.len() {
        return Ok(Step::Progress);
    }

    let record = ElementRecord {
        element: elem_def.name.clone(),
        fields: std::mem::take(&mut cursor.fields),
    };
    cursor.finish_record(elements);
    Ok(Step::Record(record))
}
