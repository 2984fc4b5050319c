use serde::Deserialize;
use std::collections::HashMap;
use streaming_ply::{ElementRecord, PlyDecoder, PlyError};

#[derive(Deserialize, Debug, PartialEq)]
struct Vertex {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug, PartialEq)]
struct Face {
    #[serde(alias = "vertex_index")]
    vertex_indices: Vec<u32>,
}

#[derive(Deserialize, Debug, PartialEq)]
struct AllTypes {
    a: i8,
    b: i8,
    c: u8,
    d: u8,
    e: i16,
    f: i16,
    g: u16,
    h: u16,
    i: i32,
    j: i32,
    k: u32,
    l: u32,
    m: f32,
    n: f32,
    o: f64,
    p: f64,
}

fn records(data: &[u8]) -> Vec<ElementRecord> {
    let mut decoder = PlyDecoder::new();
    let mut records = Vec::new();
    decoder.push(data, |r| records.push(r)).unwrap();
    records.extend(decoder.finish().unwrap());
    records
}

#[test]
fn test_vertices_and_faces() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_index
end_header
5.0 3.0 2.0
1.0 0.0 0.0
0.5 1.0 0.0
3 0 1 2
"#;

    let records = records(ply_data.as_bytes());
    let vertices: Vec<Vertex> = records
        .iter()
        .filter(|r| r.element == "vertex")
        .map(|r| r.deserialize().unwrap())
        .collect();
    assert_eq!(vertices.len(), 3);
    assert_eq!(
        vertices[0],
        Vertex {
            x: 5.0,
            y: 3.0,
            z: 2.0
        }
    );

    let face: Face = records[3].deserialize().unwrap();
    assert_eq!(face.vertex_indices, vec![0, 1, 2]);
}

#[test]
fn test_all_scalar_types() {
    let ply_data = r#"ply
format ascii 1.0
element point 1
property char a
property int8 b
property uchar c
property uint8 d
property short e
property int16 f
property uint16 g
property ushort h
property int32 i
property int j
property uint32 k
property uint l
property float32 m
property float n
property float64 o
property double p
end_header
1 -1 2 2 3 -3 4 4 5 -5 6 6 7 7.5 8 8.25
"#;

    let records = records(ply_data.as_bytes());
    assert_eq!(records.len(), 1);

    let point: AllTypes = records[0].deserialize().unwrap();
    assert_eq!(point.a, 1);
    assert_eq!(point.b, -1);
    assert_eq!(point.c, 2);
    assert_eq!(point.f, -3);
    assert_eq!(point.g, 4);
    assert_eq!(point.j, -5);
    assert_eq!(point.k, 6);
    assert_eq!(point.m, 7.0);
    assert_eq!(point.n, 7.5);
    assert_eq!(point.p, 8.25);
}

#[test]
fn test_binary_big_endian() {
    let mut binary_data = b"ply\nformat binary_big_endian 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n".to_vec();
    binary_data.extend_from_slice(&1.5f32.to_be_bytes());
    binary_data.extend_from_slice(&2.5f32.to_be_bytes());
    binary_data.extend_from_slice(&3.5f32.to_be_bytes());

    let vertex: Vertex = records(&binary_data)[0].deserialize().unwrap();
    assert_eq!(
        vertex,
        Vertex {
            x: 1.5,
            y: 2.5,
            z: 3.5
        }
    );
}

#[test]
fn test_integers_widen_into_floats() {
    let ply_data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty int x\nproperty uchar y\nproperty double z\nend_header\n1 2 3\n";
    let vertex: Vertex = records(ply_data.as_bytes())[0].deserialize().unwrap();
    assert_eq!(
        vertex,
        Vertex {
            x: 1.0,
            y: 2.0,
            z: 3.0
        }
    );
}

#[test]
fn test_optional_and_ignored_fields() {
    #[derive(Deserialize, Debug)]
    struct Partial {
        x: f32,
        red: Option<u8>,
        nx: Option<f32>,
    }

    let ply_data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty uchar red\nend_header\n1.0 2.0 255\n";
    let vertex: Partial = records(ply_data.as_bytes())[0].deserialize().unwrap();
    assert_eq!(vertex.x, 1.0);
    assert_eq!(vertex.red, Some(255));
    assert_eq!(vertex.nx, None);
}

#[test]
fn test_missing_field() {
    let ply_data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n1.0 2.0\n";
    let result = records(ply_data.as_bytes())[0].deserialize::<Vertex>();
    assert!(matches!(result, Err(PlyError::Serde(msg)) if msg.contains("z")));
}

#[test]
fn test_map_rows() {
    let ply_data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n0.25 0.5\n";
    let row: HashMap<String, f32> = records(ply_data.as_bytes())[0].deserialize().unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(row["x"], 0.25);
    assert_eq!(row["y"], 0.5);
}

#[test]
fn test_row_must_be_struct_or_map() {
    let ply_data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty uint a\nend_header\n7\n";
    let result = records(ply_data.as_bytes())[0].deserialize::<u32>();
    assert!(matches!(result, Err(PlyError::RowMustBeStructOrMap)));
}

#[test]
fn test_out_of_range_list_value() {
    let ply_data = "ply\nformat ascii 1.0\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n2 0 -1\n";
    let result = records(ply_data.as_bytes())[0].deserialize::<Face>();
    assert!(matches!(result, Err(PlyError::Serde(_))));
}
