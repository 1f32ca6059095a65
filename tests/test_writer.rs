mod common;

use common::{decode_chunked, header_lines};
use pretty_assertions::assert_eq;
use rawhttp::http::headers::HeaderMap;
use rawhttp::http::response::{StatusCode, default_headers};
use rawhttp::http::writer::ResponseWriter;
use rawhttp::server::{HandlerError, write_error_response};

fn writer() -> ResponseWriter<Vec<u8>> {
    ResponseWriter::new(Vec::new())
}

fn output(w: ResponseWriter<Vec<u8>>) -> String {
    String::from_utf8(w.into_inner()).unwrap()
}

#[tokio::test]
async fn test_status_lines() {
    let cases = [
        (StatusCode::OK, "HTTP/1.1 200 OK\r\n"),
        (StatusCode::BAD_REQUEST, "HTTP/1.1 400 Bad Request\r\n"),
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "HTTP/1.1 500 Internal Server Error\r\n",
        ),
        (StatusCode(404), "HTTP/1.1 404 \r\n"),
    ];

    for (status, expected) in cases {
        let mut w = writer();
        w.write_status_line(status).await.unwrap();
        assert_eq!(output(w), expected);
    }
}

#[tokio::test]
async fn test_write_headers() {
    let mut w = writer();
    w.write_headers(&default_headers(12, "text/html")).await.unwrap();

    let out = output(w);
    let mut lines = header_lines(&out);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "connection: close",
            "content-length: 12",
            "content-type: text/html",
        ]
    );
}

#[tokio::test]
async fn test_write_empty_headers() {
    let mut w = writer();
    w.write_headers(&HeaderMap::new()).await.unwrap();

    assert_eq!(output(w), "\r\n");
}

#[tokio::test]
async fn test_write_body_is_verbatim() {
    let mut w = writer();
    w.write_body(b"\x00raw\r\nbytes").await.unwrap();

    assert_eq!(w.bytes_written(), 11);
    assert_eq!(w.into_inner(), b"\x00raw\r\nbytes".to_vec());
}

#[tokio::test]
async fn test_write_chunked_body() {
    let mut w = writer();
    w.write_chunked_body(b"hello").await.unwrap();
    assert_eq!(output(w), "5\r\nhello\r\n");

    let mut w = writer();
    w.write_chunked_body(&[b'x'; 26]).await.unwrap();
    assert_eq!(output(w), format!("1A\r\n{}\r\n", "x".repeat(26)));

    let mut w = writer();
    w.write_chunked_body(b"").await.unwrap();
    assert_eq!(output(w), "0\r\n\r\n");
}

#[tokio::test]
async fn test_write_chunked_body_done() {
    let mut w = writer();
    w.write_chunked_body_done().await.unwrap();

    assert_eq!(output(w), "0\r\n");
}

#[tokio::test]
async fn test_chunks_decode_to_original_payload() {
    let pieces: [&[u8]; 4] = [b"Hello, ", b"chunked", &[b'-'; 300], b" world"];

    let mut w = writer();
    for piece in pieces {
        w.write_chunked_body(piece).await.unwrap();
    }
    w.write_chunked_body_done().await.unwrap();

    let encoded = w.into_inner();
    let (payload, rest) = decode_chunked(&encoded);
    assert_eq!(payload, pieces.concat());
    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_full_chunked_response_with_trailers() {
    let mut headers = HeaderMap::new();
    headers.set("Transfer-Encoding", "chunked");

    let mut trailers = HeaderMap::new();
    trailers.set("X-Content-Length", "11");

    let mut w = writer();
    w.write_status_line(StatusCode::OK).await.unwrap();
    w.write_headers(&headers).await.unwrap();
    w.write_chunked_body(b"hello ").await.unwrap();
    w.write_chunked_body(b"world").await.unwrap();
    w.write_chunked_body_done().await.unwrap();
    w.write_trailers(&trailers).await.unwrap();

    assert_eq!(
        output(w),
        "HTTP/1.1 200 OK\r\n\
         transfer-encoding: chunked\r\n\
         \r\n\
         6\r\nhello \r\n\
         5\r\nworld\r\n\
         0\r\n\
         x-content-length: 11\r\n\
         \r\n"
    );
}

#[tokio::test]
async fn test_write_error_response() {
    let mut w = writer();
    let err = HandlerError::new(StatusCode::BAD_REQUEST, "nope");
    write_error_response(&mut w, &err).await.unwrap();

    let out = output(w);
    let (head, body) = out.split_once("\r\n\r\n").unwrap();
    let mut lines: Vec<&str> = head.split("\r\n").collect();
    assert_eq!(lines.remove(0), "HTTP/1.1 400 Bad Request");
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "connection: close",
            "content-length: 4",
            "content-type: text/plain",
        ]
    );
    assert_eq!(body, "nope");
}

#[test]
fn test_default_headers() {
    let headers = default_headers(42, "video/mp4");

    assert_eq!(headers.len(), 3);
    assert_eq!(headers.get("Content-Length"), Some("42"));
    assert_eq!(headers.get("Connection"), Some("close"));
    assert_eq!(headers.get("Content-Type"), Some("video/mp4"));
}
