//! Canned-response upstream for exercising the blocking client without a
//! real joke service. Serves a fixed sequence of responses and captures the
//! raw requests for assertions.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Bind and immediately drop a listener so the port refuses connections.
pub fn refused_base_url() -> String {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(err) => panic!("fixture bind failed: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("fixture local_addr failed: {err}"),
    };
    drop(listener);
    format!("http://{addr}")
}

/// Serve `responses` to consecutive connections in order; join the handle to
/// collect the captured requests.
pub fn spawn_upstream(responses: Vec<String>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener,
        Err(err) => panic!("fixture bind failed: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("fixture local_addr failed: {err}"),
    };

    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for response in responses {
            let (mut stream, _) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(err) => panic!("fixture accept failed: {err}"),
            };
            captured.push(read_request(&mut stream));
            if let Err(err) = stream.write_all(response.as_bytes()) {
                panic!("fixture write failed: {err}");
            }
        }
        captured
    });

    (format!("http://{addr}"), handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0_u8; 4096];
    loop {
        let read = match stream.read(&mut buf) {
            Ok(read) => read,
            Err(err) => panic!("fixture read failed: {err}"),
        };
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        if let Some(head_end) = head_end(&data) {
            let body_len = content_length(&data[..head_end]);
            if data.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}
