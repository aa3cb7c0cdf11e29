//! Per-connection message router.
//!
//! Runs the read/write loop for a single WebSocket connection and drives
//! its two-state lifecycle: `Connected` (ephemeral key only) and, after a
//! successful in-band token binding, additionally registered under the
//! durable identity key. Binding augments the ephemeral mapping, it never
//! replaces it.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ChatMessage, InboundFrame, OutboundFrame};
use crate::domain::{ClientHandle, ClientKey, ClientRegistry};
use crate::service::AuthService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection under a fresh ephemeral key and announces
///   that key to the client as the first frame.
/// - Reads inbound text frames and dispatches them (binding or chat).
/// - Drains the outbound queue; this task is the only writer to the
///   socket, so concurrently enqueued frames are never interleaved.
/// - On close or transport error, purges every registry key mapping to
///   this connection before the handle is discarded.
pub async fn run_connection(
    socket: WebSocket,
    registry: Arc<ClientRegistry>,
    auth: Arc<AuthService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let handle = ClientHandle::new(out_tx);
    let ephemeral_key = ClientKey::ephemeral(handle.conn_id());

    registry.put(ephemeral_key.clone(), handle.clone()).await;
    handle.send(OutboundFrame::ClientId(ephemeral_key.clone()).to_string());
    tracing::info!(client = %ephemeral_key, "client connected");

    loop {
        tokio::select! {
            frame = out_rx.recv() => {
                match frame {
                    Some(text) => {
                        if ws_tx.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    // All senders dropped; nothing left to deliver.
                    None => break,
                }
            }
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_frame(text.as_str(), &ephemeral_key, &handle, &registry, &auth)
                            .await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(client = %ephemeral_key, error = %err, "ws transport error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    let removed = registry.remove_all(&handle).await;
    tracing::info!(client = %ephemeral_key, keys = removed, "client disconnected");
}

/// Classifies and dispatches one inbound text frame.
async fn handle_text_frame(
    text: &str,
    sender_key: &ClientKey,
    sender: &ClientHandle,
    registry: &ClientRegistry,
    auth: &AuthService,
) {
    match InboundFrame::classify(text) {
        InboundFrame::Bind(token) => match auth.authenticate(&token).await {
            Ok(verified) => {
                let identity_key = ClientKey::identity(verified.claims.id);
                registry.put(identity_key, sender.clone()).await;
                sender.send(OutboundFrame::CustomClientId(verified.claims.id).to_string());
                tracing::info!(
                    client = %sender_key,
                    account = verified.claims.id,
                    "client bound to identity"
                );
            }
            Err(err) => {
                tracing::debug!(client = %sender_key, error = %err, "binding token rejected");
                sender.send(OutboundFrame::InvalidToken.to_string());
            }
        },
        InboundFrame::Chat(msg) => dispatch_chat(msg, sender_key, sender, registry).await,
        InboundFrame::Malformed => {
            sender.send(OutboundFrame::Malformed.to_string());
        }
    }
}

/// Routes a chat envelope to its recipients.
///
/// Relayed frames always carry the sender's ephemeral key, bound or not.
async fn dispatch_chat(
    msg: ChatMessage,
    sender_key: &ClientKey,
    sender: &ClientHandle,
    registry: &ClientRegistry,
) {
    match msg.kind.as_str() {
        "private" => {
            let Some(target_id) = msg.target_user_id else {
                sender.send(OutboundFrame::Malformed.to_string());
                return;
            };
            match registry.get(&ClientKey::new(target_id.clone())).await {
                Some(target) => {
                    target.send(
                        OutboundFrame::Private {
                            from: sender_key.clone(),
                            content: msg.content,
                        }
                        .to_string(),
                    );
                }
                None => {
                    sender.send(OutboundFrame::TargetNotFound(target_id).to_string());
                }
            }
        }
        "broadcast" => {
            let frame = OutboundFrame::Broadcast {
                from: sender_key.clone(),
                content: msg.content,
            }
            .to_string();
            // Each distinct connection gets exactly one copy, sender included.
            for peer in registry.connections().await {
                peer.send(frame.clone());
            }
        }
        _ => {
            sender.send(OutboundFrame::UnknownMessageType.to_string());
        }
    }
}
