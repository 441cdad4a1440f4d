//! WebSocket transport for the verification service.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use mintgate_faults::RawFault;
use mintgate_verification::{ProviderEvent, ProviderSession, SessionId, VerificationProvider};

use crate::config::ClientConfig;

const EVENT_CHANNEL_CAPACITY: usize = 16;

type WsSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsSocket, Message>;
type WsSource = SplitStream<WsSocket>;

/// Frames this client sends to the verification service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ClientFrame {
    OpenSession,
    #[serde(rename_all = "camelCase")]
    CloseSession { session_id: SessionId },
}

/// First frame the service answers on a fresh connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCreated {
    session_id: SessionId,
    scan_payload: String,
}

struct LiveSession {
    sink: WsSink,
    reader: JoinHandle<()>,
}

/// WebSocket client for the verification service.
///
/// One connection per session: `open_session` dials the service, sends an
/// `openSession` frame, reads the `sessionCreated` reply, then hands the
/// read half to a forwarder task that pumps provider frames into the
/// session's event channel. `close_session` sends a `closeSession` frame
/// and tears the connection down.
pub struct WsVerificationProvider {
    endpoint: String,
    sessions: Mutex<HashMap<SessionId, LiveSession>>,
}

impl WsVerificationProvider {
    /// Create a provider dialing the given endpoint
    /// (e.g. `ws://127.0.0.1:9302/session`).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.verification_url.clone())
    }

    /// The configured service endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VerificationProvider for WsVerificationProvider {
    async fn open_session(&self) -> Result<ProviderSession, RawFault> {
        let (socket, _) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|e| RawFault::from(format!("verification service connect failed: {e}")))?;
        let (mut sink, mut stream) = socket.split();

        let open = serde_json::to_string(&ClientFrame::OpenSession).unwrap_or_default();
        sink.send(Message::Text(open))
            .await
            .map_err(|e| RawFault::from(format!("verification service send failed: {e}")))?;

        let created = read_session_created(&mut stream).await?;
        debug!(session = %created.session_id, "verification session opened");

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let reader = tokio::spawn(forward_events(stream, events_tx));

        let mut sessions = self.sessions.lock().await;
        sessions.insert(created.session_id.clone(), LiveSession { sink, reader });

        Ok(ProviderSession {
            session_id: created.session_id,
            scan_payload: created.scan_payload,
            events: events_rx,
        })
    }

    async fn close_session(&self, session_id: &SessionId) {
        let removed = self.sessions.lock().await.remove(session_id);
        let Some(mut live) = removed else {
            debug!(session = %session_id, "close for unknown session");
            return;
        };

        let frame = serde_json::to_string(&ClientFrame::CloseSession {
            session_id: session_id.clone(),
        })
        .unwrap_or_default();
        if let Err(e) = live.sink.send(Message::Text(frame)).await {
            debug!(session = %session_id, error = %e, "close frame not delivered");
        }
        let _ = live.sink.close().await;
        live.reader.abort();
        debug!(session = %session_id, "verification session closed");
    }
}

/// Wait for the `sessionCreated` reply, skipping control frames.
async fn read_session_created(stream: &mut WsSource) -> Result<SessionCreated, RawFault> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                return serde_json::from_str(&text)
                    .map_err(|e| RawFault::from(format!("unexpected session reply: {e}")));
            }
            Some(Ok(Message::Close(_))) | None => {
                return Err(RawFault::from(
                    "verification service closed before the session reply",
                ));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                return Err(RawFault::from(format!(
                    "verification service receive failed: {e}"
                )));
            }
        }
    }
}

/// Pump provider frames from the socket into the session's event channel.
///
/// Ends when the socket closes or the session receiver is dropped; the
/// channel closing is how the pipeline learns the provider hung up.
async fn forward_events(mut stream: WsSource, events: mpsc::Sender<ProviderEvent>) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ProviderEvent>(&text) {
                Ok(event) => {
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => debug!(error = %e, "ignoring unparseable verification frame"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "verification stream error");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frames_use_camel_case_type_tags() {
        assert_eq!(
            serde_json::to_value(&ClientFrame::OpenSession).unwrap(),
            json!({ "type": "openSession" })
        );
        assert_eq!(
            serde_json::to_value(&ClientFrame::CloseSession {
                session_id: SessionId::new("s-1"),
            })
            .unwrap(),
            json!({ "type": "closeSession", "sessionId": "s-1" })
        );
    }

    #[test]
    fn session_created_parses_from_tagged_frame() {
        let frame = json!({
            "type": "sessionCreated",
            "sessionId": "s-42",
            "scanPayload": "mintgate://verify/s-42",
        });
        let created: SessionCreated = serde_json::from_value(frame).unwrap();
        assert_eq!(created.session_id, SessionId::new("s-42"));
        assert_eq!(created.scan_payload, "mintgate://verify/s-42");
    }

    #[tokio::test]
    async fn open_session_handshakes_and_streams_events() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(tcp).await.unwrap();

            let open = socket.next().await.unwrap().unwrap();
            let open: serde_json::Value = serde_json::from_str(open.to_text().unwrap()).unwrap();
            assert_eq!(open, json!({ "type": "openSession" }));

            let created = json!({
                "type": "sessionCreated",
                "sessionId": "s-7",
                "scanPayload": "mintgate://verify/s-7",
            });
            socket
                .send(Message::Text(created.to_string()))
                .await
                .unwrap();
            socket
                .send(Message::Text(
                    json!({ "type": "requestReceived" }).to_string(),
                ))
                .await
                .unwrap();

            let close = socket.next().await.unwrap().unwrap();
            let close: serde_json::Value = serde_json::from_str(close.to_text().unwrap()).unwrap();
            assert_eq!(close["type"], "closeSession");
            assert_eq!(close["sessionId"], "s-7");
        });

        let provider = WsVerificationProvider::new(format!("ws://{addr}/session"));
        let mut session = provider.open_session().await.unwrap();
        assert_eq!(session.session_id, SessionId::new("s-7"));
        assert_eq!(session.scan_payload, "mintgate://verify/s-7");
        assert_eq!(
            session.events.recv().await,
            Some(ProviderEvent::RequestReceived)
        );

        provider.close_session(&session.session_id).await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connect_failure_surfaces_as_fault() {
        // Port 1 on loopback refuses connections.
        let provider = WsVerificationProvider::new("ws://127.0.0.1:1/session");
        let err = provider.open_session().await.unwrap_err();
        assert!(err.message().contains("connect failed"));
    }
}
