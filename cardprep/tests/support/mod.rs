use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Canned response for one path.
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }
}

/// Serves `routes` over plain HTTP/1.1 on 127.0.0.1 from a background thread.
///
/// Unknown paths answer 404. Every response closes its connection. The
/// returned base URL has no trailing slash.
pub fn serve(routes: Vec<(&'static str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let routes: HashMap<&'static str, Route> = routes.into_iter().collect();

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let _ = respond(stream, &routes);
        }
    });

    format!("http://{}", addr)
}

fn respond(mut stream: TcpStream, routes: &HashMap<&'static str, Route>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    // drain headers
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    let (status, content_type, body) = match routes.get(path.as_str()) {
        Some(route) => (route.status, route.content_type, route.body.as_slice()),
        None => (404, "text/plain", &b"not found"[..]),
    };
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };

    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        content_type,
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}
