//! Scripted in-process HTTP server for client behavior tests.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Method + target from the request line, e.g. `GET /v1/things?limit=2`.
    pub target: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Scripted behavior for one incoming request.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Close the connection without answering.
    DropConnection,
    Respond {
        status: u16,
        body: String,
        headers: Vec<(String, String)>,
    },
}

impl MockOutcome {
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn respond_with_headers(
        status: u16,
        body: impl Into<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self::Respond {
            status,
            body: body.into(),
            headers,
        }
    }
}

fn header_end_offset(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn read_http_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buffer = Vec::new();
    loop {
        let mut chunk = [0_u8; 2048];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if header_end_offset(&buffer).is_some() {
            break;
        }
    }

    let header_end = header_end_offset(&buffer)?;
    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next()?.to_string();
    let target = request_line
        .rsplit_once(" HTTP/")
        .map(|(t, _)| t.to_string())
        .unwrap_or(request_line);

    let mut authorization = None;
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => authorization = Some(value.trim().to_string()),
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    let mut body_bytes = buffer[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let mut chunk = [0_u8; 2048];
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        body_bytes.extend_from_slice(&chunk[..read]);
    }

    Some(CapturedRequest {
        target,
        authorization,
        body: String::from_utf8_lossy(&body_bytes).to_string(),
    })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

async fn write_http_response(
    stream: &mut TcpStream,
    status: u16,
    body: &str,
    headers: &[(String, String)],
) -> std::io::Result<()> {
    let mut response = format!("HTTP/1.1 {} {}\r\n", status, status_text(status));
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await
}

/// Start a listener that answers each incoming request with the next
/// scripted outcome. Returns the base URL, the captured requests, and the
/// server task handle (abort it when done).
pub async fn start_mock_server(
    outcomes: Vec<MockOutcome>,
) -> (
    String,
    Arc<Mutex<Vec<CapturedRequest>>>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let captured = Arc::new(Mutex::new(Vec::<CapturedRequest>::new()));
    let scripted = Arc::new(Mutex::new(VecDeque::from(outcomes)));
    let captured_clone = Arc::clone(&captured);
    let scripted_clone = Arc::clone(&scripted);

    let handle = tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(value) => value,
                Err(_) => break,
            };
            let captured_inner = Arc::clone(&captured_clone);
            let scripted_inner = Arc::clone(&scripted_clone);
            tokio::spawn(async move {
                let Some(request) = read_http_request(&mut stream).await else {
                    return;
                };
                captured_inner.lock().await.push(request);

                let outcome = scripted_inner
                    .lock()
                    .await
                    .pop_front()
                    .unwrap_or(MockOutcome::Respond {
                        status: 500,
                        body: r#"{ "errors": [{ "title": "UNEXPECTED", "detail": "no scripted outcome left" }] }"#.to_string(),
                        headers: Vec::new(),
                    });

                match outcome {
                    MockOutcome::DropConnection => {}
                    MockOutcome::Respond {
                        status,
                        body,
                        headers,
                    } => {
                        let _ = write_http_response(&mut stream, status, &body, &headers).await;
                    }
                }
            });
        }
    });

    (format!("http://{addr}"), captured, handle)
}
