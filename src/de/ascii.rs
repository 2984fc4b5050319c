use crate::{
    de::ElementCursor, ByteCursor, ElementDef, ElementRecord, PlyError, PropertyDef, PropertyType,
    PropertyValue, Step,
};

/// Decodes at most one body line.
pub(crate) fn step(
    elements: &[ElementDef],
    cursor: &mut ElementCursor,
    buffer: &mut ByteCursor,
) -> Result<Step, PlyError> {
    let Some(elem_def) = cursor.current(elements) else {
        return match buffer.try_consume_line()? {
            Some(_) => Err(PlyError::UnexpectedBodyData),
            None if buffer.has_bytes() => Ok(Step::Suspend),
            None => Ok(Step::Done),
        };
    };

    let Some(line) = buffer.try_consume_line()? else {
        return Ok(Step::Suspend);
    };

    let record = parse_row(elem_def, &line)?;
    cursor.finish_record(elements);
    Ok(Step::Record(record))
}

/// Turns one line into a record. An element without properties reads a
/// blank line as its row.
fn parse_row(elem_def: &ElementDef, line: &str) -> Result<ElementRecord, PlyError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut record = ElementRecord::new(elem_def.name.as_str());

    if let [PropertyDef {
        name,
        property_type: PropertyType::List {
            count_type,
            data_type,
        },
    }] = elem_def.properties.as_slice()
    {
        let Some((len_token, value_tokens)) = tokens.split_first() else {
            return Err(PlyError::PropertyCountMismatch {
                element: elem_def.name.clone(),
                expected: 1,
                found: 0,
            });
        };
        let declared = count_type.parse_ascii(len_token)?.to_list_len()?;
        let found = value_tokens.len();
        if declared != found {
            return Err(PlyError::ListLengthMismatch {
                element: elem_def.name.clone(),
                declared,
                found,
            });
        }
        let values = value_tokens
            .iter()
            .map(|token| data_type.parse_ascii(token))
            .collect::<Result<Vec<_>, _>>()?;
        record
            .fields
            .push((name.clone(), PropertyValue::List(values)));
        return Ok(record);
    }

    if tokens.len() != elem_def.properties.len() {
        return Err(PlyError::PropertyCountMismatch {
            element: elem_def.name.clone(),
            expected: elem_def.properties.len(),
            found: tokens.len(),
        });
    }

    for (prop, token) in elem_def.properties.iter().zip(tokens) {
        let PropertyType::Scalar { data_type } = prop.property_type else {
            return Err(PlyError::UnsupportedSchema {
                element: elem_def.name.clone(),
            });
        };
        record
            .fields
            .push((prop.name.clone(), PropertyValue::Scalar(data_type.parse_ascii(token)?)));
    }

    Ok(record)
}
