use std::time::Duration;

use tracing::{debug, warn};

use super::{ChatPayload, ChatReply, ChatTransport, TransportError, CHAT_ENDPOINT};
use crate::utils::url::construct_api_url;

/// `ChatTransport` backed by a reqwest client posting JSON to `/api/chat`.
#[derive(Clone, Debug)]
pub struct HttpChatTransport {
    client: reqwest::Client,
    chat_url: String,
}

impl HttpChatTransport {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, server_url))
    }

    pub fn with_client(client: reqwest::Client, server_url: &str) -> Self {
        Self {
            client,
            chat_url: construct_api_url(server_url, CHAT_ENDPOINT),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply, TransportError> {
        debug!(
            url = %self.chat_url,
            has_message = payload.message().is_some(),
            image_bytes = payload.image().map(str::len).unwrap_or(0),
            "posting chat payload"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                warn!(url = %self.chat_url, error = %err, "chat request failed");
                TransportError::Connect(err.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Connect(err.to_string()))?;

        if !status.is_success() {
            let response = serde_json::from_str::<ChatReply>(&body)
                .ok()
                .and_then(|reply| reply.text().map(str::to_owned));
            warn!(
                status = status.as_u16(),
                has_notice = response.is_some(),
                "chat endpoint returned an error status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                response,
            });
        }

        let reply = serde_json::from_str::<ChatReply>(&body)
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        debug!(status = status.as_u16(), "chat reply received");
        Ok(reply)
    }

    fn endpoint(&self) -> String {
        self.chat_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;

    type CapturedRequests = Arc<Mutex<Vec<(String, Vec<(String, String)>, Vec<u8>)>>>;

    async fn read_http_request(
        stream: &mut TcpStream,
    ) -> Result<(String, Vec<(String, String)>, Vec<u8>), String> {
        let mut buffer = Vec::new();
        let mut header_end = None;
        while header_end.is_none() {
            let mut chunk = [0_u8; 1024];
            let read = stream
                .read(&mut chunk)
                .await
                .map_err(|err| err.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP headers".to_string());
            }
            buffer.extend_from_slice(&chunk[..read]);
            header_end = buffer
                .windows(4)
                .position(|window| window == b"\r\n\r\n")
                .map(|index| index + 4);
        }

        let header_end = header_end.expect("header end should exist");
        let header_text =
            std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
        let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
        let request_line = lines
            .next()
            .ok_or_else(|| "Missing HTTP request line".to_string())?
            .to_string();

        let mut headers = Vec::new();
        let mut content_length = 0_usize;
        for line in lines {
            let mut parts = line.splitn(2, ':');
            let Some(name) = parts.next() else {
                continue;
            };
            let value = parts.next().unwrap_or_default().trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
            }
            headers.push((name.to_string(), value));
        }

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let mut chunk = vec![0_u8; content_length.saturating_sub(body.len())];
            let read = stream
                .read(&mut chunk)
                .await
                .map_err(|err| err.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP body".to_string());
            }
            body.extend_from_slice(&chunk[..read]);
        }
        body.truncate(content_length);

        Ok((request_line, headers, body))
    }

    /// Serves one canned response and records the request it received.
    async fn spawn_stub_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, CapturedRequests) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let captured: CapturedRequests = Arc::new(Mutex::new(Vec::new()));
        let captured_for_server = Arc::clone(&captured);

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let request = read_http_request(&mut stream).await?;
            captured_for_server.lock().await.push(request);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            stream.shutdown().await.map_err(|err| err.to_string())
        });

        (format!("http://{addr}/"), captured)
    }

    #[tokio::test]
    async fn posts_json_to_chat_endpoint_and_parses_reply() {
        let (base_url, captured) =
            spawn_stub_server("200 OK", r#"{"response":"Hi there"}"#).await;
        let transport = HttpChatTransport::new(&base_url, None).expect("client should build");

        let reply = transport
            .send(&ChatPayload::new(Some("Hello".into()), None).unwrap())
            .await
            .expect("exchange should succeed");
        assert_eq!(reply.text(), Some("Hi there"));

        let requests = captured.lock().await;
        assert_eq!(requests.len(), 1);
        let (request_line, headers, body) = &requests[0];
        assert_eq!(request_line, "POST /api/chat HTTP/1.1");
        let content_type = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str());
        assert_eq!(content_type, Some("application/json"));
        let body_json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(body_json, serde_json::json!({ "message": "Hello" }));
    }

    #[tokio::test]
    async fn error_status_keeps_server_notice() {
        let (base_url, _captured) = spawn_stub_server(
            "400 Bad Request",
            r#"{"response":"⚠️ Message contains prohibited content."}"#,
        )
        .await;
        let transport = HttpChatTransport::new(&base_url, None).unwrap();

        let err = transport
            .send(&ChatPayload::new(Some("bad words".into()), None).unwrap())
            .await
            .expect_err("400 should be an error");
        assert_eq!(
            err,
            TransportError::Status {
                status: 400,
                response: Some("⚠️ Message contains prohibited content.".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn error_status_without_json_body_has_no_notice() {
        let (base_url, _captured) =
            spawn_stub_server("500 Internal Server Error", "<html>oops</html>").await;
        let transport = HttpChatTransport::new(&base_url, None).unwrap();

        let err = transport
            .send(&ChatPayload::new(Some("hi".into()), None).unwrap())
            .await
            .expect_err("500 should be an error");
        assert_eq!(
            err,
            TransportError::Status {
                status: 500,
                response: None,
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let (base_url, _captured) = spawn_stub_server("200 OK", "not json").await;
        let transport = HttpChatTransport::new(&base_url, None).unwrap();

        let err = transport
            .send(&ChatPayload::new(Some("hi".into()), None).unwrap())
            .await
            .expect_err("garbage should not parse");
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpChatTransport::new(&format!("http://{addr}"), None).unwrap();
        let err = transport
            .send(&ChatPayload::new(Some("hi".into()), None).unwrap())
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[test]
    fn chat_url_joins_endpoint_without_double_slash() {
        let transport = HttpChatTransport::with_client(
            reqwest::Client::new(),
            "http://farm.example:5000/",
        );
        assert_eq!(transport.chat_url(), "http://farm.example:5000/api/chat");
        assert_eq!(transport.endpoint(), "http://farm.example:5000/api/chat");
    }
}
