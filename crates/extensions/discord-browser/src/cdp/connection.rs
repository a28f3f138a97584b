//! WebSocket plumbing shared by the browser client and its page sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
pub(crate) type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// One browser-level WebSocket. Page sessions multiplex over it by `sessionId`.
pub(crate) struct CdpConnection {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Pending,
    next_id: AtomicU64,
    closed: Arc<AtomicBool>,
    request_timeout: Duration,
}

impl CdpConnection {
    /// Open the WebSocket and spawn the receive loop.
    pub(crate) async fn open(
        ws_url: &str,
        request_timeout: Duration,
    ) -> Result<(Arc<Self>, JoinHandle<()>), CdpError> {
        let (ws_stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;
        let (sink, source) = ws_stream.split();

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(receive_loop(source, pending.clone(), closed.clone()));

        let connection = Arc::new(Self {
            ws_tx: tokio::sync::Mutex::new(sink),
            pending,
            next_id: AtomicU64::new(1),
            closed,
            request_timeout,
        });
        Ok((connection, task))
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        if self.is_closed() {
            return Err(CdpError::SessionClosed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };
        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let sent = {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await
        };
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("{} timed out", method)))
            }
        }
    }
}

async fn receive_loop(mut source: WsSource, pending: Pending, closed: Arc<AtomicBool>) {
    while let Some(msg) = source.next().await {
        match msg {
            Ok(Message::Text(text)) => dispatch(&text, &pending),
            Ok(Message::Close(_)) => {
                debug!("CDP WebSocket closed");
                break;
            }
            Err(e) => {
                error!("CDP WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    closed.store(true, Ordering::SeqCst);
    // Dropping the senders wakes every waiter with SessionClosed.
    pending.lock().clear();
}

/// Route one incoming frame to the waiter registered for its id.
pub(crate) fn dispatch(text: &str, pending: &Pending) {
    let response: CdpResponse = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse CDP message: {}", e);
            return;
        }
    };

    let Some(id) = response.id else {
        trace!(
            "CDP event ignored: {}",
            response.method.as_deref().unwrap_or("<unknown>")
        );
        return;
    };

    let Some(tx) = pending.lock().remove(&id) else {
        debug!("CDP response for unknown request {}", id);
        return;
    };

    let result = match response.error {
        Some(error) => Err(CdpError::Protocol {
            code: error.code,
            message: error.message,
        }),
        None => Ok(response.result.unwrap_or(Value::Null)),
    };
    let _ = tx.send(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(pending: &Pending, id: u64) -> oneshot::Receiver<Result<Value, CdpError>> {
        let (tx, rx) = oneshot::channel();
        pending.lock().insert(id, tx);
        rx
    }

    #[test]
    fn test_dispatch_result() {
        let pending: Pending = Arc::default();
        let mut rx = register(&pending, 4);

        dispatch(r#"{"id":4,"result":{"frameId":"F"}}"#, &pending);

        let value = rx.try_recv().unwrap().unwrap();
        assert_eq!(value, json!({"frameId": "F"}));
        assert!(pending.lock().is_empty());
    }

    #[test]
    fn test_dispatch_error() {
        let pending: Pending = Arc::default();
        let mut rx = register(&pending, 9);

        dispatch(
            r#"{"id":9,"error":{"code":-32000,"message":"Cannot find context"}}"#,
            &pending,
        );

        let err = rx.try_recv().unwrap().unwrap_err();
        assert!(matches!(err, CdpError::Protocol { code: -32000, .. }));
    }

    #[test]
    fn test_dispatch_empty_result_is_null() {
        let pending: Pending = Arc::default();
        let mut rx = register(&pending, 1);

        dispatch(r#"{"id":1}"#, &pending);

        assert_eq!(rx.try_recv().unwrap().unwrap(), Value::Null);
    }

    #[test]
    fn test_dispatch_ignores_events_and_garbage() {
        let pending: Pending = Arc::default();
        let _rx = register(&pending, 2);

        dispatch(r#"{"method":"Page.frameNavigated","params":{}}"#, &pending);
        dispatch("not json", &pending);
        dispatch(r#"{"id":77,"result":{}}"#, &pending);

        assert!(pending.lock().contains_key(&2));
    }
}
