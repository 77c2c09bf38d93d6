//! Gateway client connection loop
//!
//! Connects, identifies (or resumes), heartbeats and forwards dispatches to
//! the event handler. Dropped connections are re-established with backoff;
//! close codes that cannot be fixed by reconnecting end the loop.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use rand::Rng;
use starboard_common::BotConfig;
use thiserror::Error;
use tokio::time::{interval_at, sleep, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tracing::{debug, error, info, instrument, warn};

use super::SessionState;
use crate::events::{GatewayEventType, ReadyEvent};
use crate::handlers::EventHandler;
use crate::protocol::{
    CloseCode, GatewayMessage, IdentifyPayload, Intents, OpCode, ResumePayload,
};

/// How long to wait for Hello after connecting
const HELLO_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BACKOFF_SECS: u64 = 60;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Gateway refused the session: {0}")]
    Fatal(CloseCode),
}

/// Connection settings
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub url: String,
    pub token: String,
    pub intents: Intents,
}

impl From<&BotConfig> for GatewaySettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            url: config.gateway_url.clone(),
            token: config.token.clone(),
            intents: Intents::bot(),
        }
    }
}

/// Why a connection ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disconnect {
    /// Reconnect and resume the session
    Resume,
    /// Reconnect with a fresh Identify
    Reidentify,
}

/// Gateway client
pub struct GatewayClient {
    settings: GatewaySettings,
    session: SessionState,
    handler: Arc<EventHandler>,
}

impl GatewayClient {
    pub fn new(settings: GatewaySettings, handler: Arc<EventHandler>) -> Self {
        Self {
            settings,
            session: SessionState::new(),
            handler,
        }
    }

    /// Run until the gateway closes with a non-recoverable code
    pub async fn run(&self) -> Result<(), GatewayError> {
        let mut failures: u32 = 0;

        loop {
            match self.connect_once().await {
                Ok(disconnect) => {
                    failures = 0;
                    if disconnect == Disconnect::Reidentify {
                        self.session.reset();
                    }
                    info!(?disconnect, "Reconnecting to gateway");
                }
                Err(GatewayError::Fatal(code)) => {
                    error!(%code, "Gateway closed with a fatal code");
                    return Err(GatewayError::Fatal(code));
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let delay = backoff(failures);
                    warn!(error = %e, delay_ms = delay.as_millis() as u64, "Gateway connection failed");
                    sleep(delay).await;
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn connect_once(&self) -> Result<Disconnect, GatewayError> {
        let resume = self.session.resume_info();
        let url = match (&resume, self.session.resume_url()) {
            (Some(_), Some(resume_url)) => resume_endpoint(&resume_url, &self.settings.url),
            _ => self.settings.url.clone(),
        };

        debug!(%url, resuming = resume.is_some(), "Connecting to gateway");
        let (socket, _) = connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        // The first frame must be Hello
        let hello = loop {
            let frame = timeout(HELLO_TIMEOUT, stream.next())
                .await
                .map_err(|_| GatewayError::Protocol("timed out waiting for Hello".to_string()))?;
            match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    break GatewayMessage::from_json(&text)
                        .ok()
                        .and_then(|m| m.as_hello())
                        .ok_or_else(|| GatewayError::Protocol("expected Hello".to_string()))?;
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    return closed(frame.map(|f| u16::from(f.code)));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(Disconnect::Resume),
            }
        };

        let handshake = match resume {
            Some((session_id, seq)) => {
                info!(%session_id, seq, "Resuming gateway session");
                GatewayMessage::resume(&ResumePayload {
                    token: self.settings.token.clone(),
                    session_id,
                    seq,
                })
            }
            None => GatewayMessage::identify(&IdentifyPayload::new(
                self.settings.token.clone(),
                self.settings.intents,
            )),
        };
        send(&mut sink, &handshake).await?;

        let period = Duration::from_millis(hello.heartbeat_interval.max(1));
        let jitter: f64 = rand::thread_rng().gen();
        let mut heartbeat = interval_at(Instant::now() + period.mul_f64(jitter), period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if !acked {
                        warn!("Heartbeat not acknowledged, reconnecting");
                        return Ok(Disconnect::Resume);
                    }
                    acked = false;
                    send(&mut sink, &GatewayMessage::heartbeat(self.session.sequence())).await?;
                }
                frame = stream.next() => {
                    let text = match frame {
                        Some(Ok(WsMessage::Text(text))) => text,
                        Some(Ok(WsMessage::Close(frame))) => {
                            return closed(frame.map(|f| u16::from(f.code)));
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(Disconnect::Resume),
                    };

                    let message = match GatewayMessage::from_json(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            warn!(error = %e, "Undecodable gateway message");
                            continue;
                        }
                    };

                    match message.op {
                        OpCode::Dispatch => self.on_dispatch(&message),
                        OpCode::Heartbeat => {
                            send(&mut sink, &GatewayMessage::heartbeat(self.session.sequence())).await?;
                        }
                        OpCode::HeartbeatAck => acked = true,
                        OpCode::Reconnect => {
                            info!("Gateway requested reconnect");
                            return Ok(Disconnect::Resume);
                        }
                        OpCode::InvalidSession => {
                            let resumable = message.as_invalid_session().unwrap_or(false);
                            let wait_ms = rand::thread_rng().gen_range(1_000..5_000);
                            warn!(resumable, wait_ms, "Gateway invalidated the session");
                            sleep(Duration::from_millis(wait_ms)).await;
                            return Ok(if resumable {
                                Disconnect::Resume
                            } else {
                                Disconnect::Reidentify
                            });
                        }
                        op => debug!(%op, "Ignoring gateway op"),
                    }
                }
            }
        }
    }

    fn on_dispatch(&self, message: &GatewayMessage) {
        if let Some(seq) = message.s {
            self.session.observe_sequence(seq);
        }

        let Some((event, data)) = message.as_dispatch() else {
            return;
        };

        if GatewayEventType::from_str(event) == Some(GatewayEventType::Ready) {
            match serde_json::from_value::<ReadyEvent>(data.clone()) {
                Ok(ready) => self
                    .session
                    .start(ready.session_id, ready.resume_gateway_url),
                Err(e) => warn!(error = %e, "Malformed READY payload"),
            }
        }

        self.handler.dispatch(event, data.clone());
    }
}

async fn send<S>(sink: &mut S, message: &GatewayMessage) -> Result<(), GatewayError>
where
    S: Sink<WsMessage, Error = tungstenite::Error> + Unpin,
{
    let json = message
        .to_json()
        .map_err(|e| GatewayError::Protocol(e.to_string()))?;
    sink.send(WsMessage::Text(json)).await?;
    Ok(())
}

/// Classify a close frame
fn closed(code: Option<u16>) -> Result<Disconnect, GatewayError> {
    match code.and_then(CloseCode::from_u16) {
        Some(code) if !code.should_reconnect() => Err(GatewayError::Fatal(code)),
        Some(code) => {
            warn!(%code, "Gateway closed the connection");
            Ok(if code.allows_resume() {
                Disconnect::Resume
            } else {
                Disconnect::Reidentify
            })
        }
        None => {
            debug!(?code, "Gateway connection closed");
            Ok(Disconnect::Resume)
        }
    }
}

/// Resume URL with the version and encoding query of the configured URL
fn resume_endpoint(resume_url: &str, gateway_url: &str) -> String {
    match gateway_url.split_once('?') {
        Some((_, query)) if !resume_url.contains('?') => {
            format!("{}/?{query}", resume_url.trim_end_matches('/'))
        }
        _ => resume_url.to_string(),
    }
}

/// Exponential backoff capped at a minute, with up to a second of jitter
fn backoff(failures: u32) -> Duration {
    let secs = 2u64.saturating_pow(failures.min(6)).min(MAX_BACKOFF_SECS);
    let jitter_ms = rand::thread_rng().gen_range(0..1_000);
    Duration::from_secs(secs) + Duration::from_millis(jitter_ms)
}
