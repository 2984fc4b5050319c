//! Driving the decoder from an async byte source.

use serde::Deserialize;
use std::io::Cursor;
use std::pin::Pin;
use std::task::{Context, Poll};
use streaming_ply::{PlyDecoder, PlyError};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

#[derive(Deserialize, Debug, PartialEq)]
struct Vertex {
    x: f32,
    y: f32,
    z: f32,
}

fn generate_binary_ply(vertex_count: usize) -> Vec<u8> {
    let header = format!(
        r#"ply
format binary_little_endian 1.0
element vertex {vertex_count}
property float x
property float y
property float z
end_header
"#
    );

    let mut binary_data = header.into_bytes();
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        binary_data.extend_from_slice(&base.to_le_bytes());
        binary_data.extend_from_slice(&(base + 1.0).to_le_bytes());
        binary_data.extend_from_slice(&(base + 2.0).to_le_bytes());
    }
    binary_data
}

/// Hands out the data in irregular bursts, like a socket would.
struct SimulatedNetworkStream {
    data: Vec<u8>,
    position: usize,
    chunk_sizes: Vec<usize>,
    chunk_index: usize,
}

impl SimulatedNetworkStream {
    fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            chunk_sizes: vec![1024, 2048, 7, 512, 4096, 33],
            chunk_index: 0,
        }
    }
}

impl AsyncRead for SimulatedNetworkStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.position >= self.data.len() {
            return Poll::Ready(Ok(()));
        }

        let chunk_size = self.chunk_sizes[self.chunk_index % self.chunk_sizes.len()];
        let available = chunk_size.min(buf.remaining());
        let end = (self.position + available).min(self.data.len());

        if end > self.position {
            buf.put_slice(&self.data[self.position..end]);
            self.position = end;
            self.chunk_index += 1;
        }

        Poll::Ready(Ok(()))
    }
}

async fn decode_stream<R: AsyncRead + Unpin>(
    mut source: R,
    buffer_size: usize,
) -> Result<Vec<Vertex>, PlyError> {
    let mut decoder = PlyDecoder::new();
    let mut vertices = Vec::new();
    let mut buffer = vec![0u8; buffer_size];

    loop {
        let bytes_read = source.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        decoder.feed(&buffer[..bytes_read]);
        while let Some(record) = decoder.next_record()? {
            vertices.push(record.deserialize()?);
        }
        tokio::task::yield_now().await;
    }

    for record in decoder.finish()? {
        vertices.push(record.deserialize()?);
    }
    Ok(vertices)
}

#[tokio::test]
async fn test_simple_async_parsing() {
    let ply_data = r#"ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
end_header
1.0 2.0 3.0
4.0 5.0 6.0
"#;

    let vertices = decode_stream(Cursor::new(ply_data.as_bytes()), 16)
        .await
        .unwrap();
    assert_eq!(
        vertices,
        vec![
            Vertex {
                x: 1.0,
                y: 2.0,
                z: 3.0
            },
            Vertex {
                x: 4.0,
                y: 5.0,
                z: 6.0
            },
        ]
    );
}

#[tokio::test]
async fn test_network_stream() {
    let vertex_count = 1000;
    let stream = SimulatedNetworkStream::new(generate_binary_ply(vertex_count));

    let vertices = decode_stream(stream, 4096).await.unwrap();
    assert_eq!(vertices.len(), vertex_count);
    assert_eq!(vertices[0].y, 1.0);

    let last = &vertices[vertex_count - 1];
    let base = (vertex_count - 1) as f32 * 0.01;
    assert_eq!(last.x, base);
    assert_eq!(last.z, base + 2.0);
}

#[tokio::test]
async fn test_truncated_network_stream() {
    let mut data = generate_binary_ply(10);
    data.truncate(data.len() - 5);

    let result = decode_stream(SimulatedNetworkStream::new(data), 64).await;
    assert!(matches!(
        result,
        Err(PlyError::PrematureEndOfStream { element: Some(element), remaining: 1 }) if element == "vertex"
    ));
}
