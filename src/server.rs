use std::{fs, io::ErrorKind, os::unix::fs::FileTypeExt, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
    signal::unix::{SignalKind, signal},
    sync::{Mutex, broadcast},
};

use crate::{
    clock::SystemClock,
    config::Config,
    engine::Engine,
    events::EngineEvent,
    protocol::{
        ClaimAction, ClientRequest, LostFoundAction, ServerResponse, TransactionAction,
        WantedOfferAction, WireError, parse_client_request,
    },
};

pub async fn run(config: Config) -> Result<()> {
    prepare_socket_path(&config.server.socket_path)?;
    let listener = UnixListener::bind(&config.server.socket_path).with_context(|| {
        format!(
            "unable to bind socket {}",
            config.server.socket_path.display()
        )
    })?;

    let engine = Arc::new(Mutex::new(Engine::new(
        config.policy.clone(),
        Arc::new(SystemClock),
    )));

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    eprintln!(
        "swapyard listening on unix socket (NDJSON): {}",
        config.server.socket_path.display()
    );

    let signal_name = loop {
        tokio::select! {
            _ = sigint.recv() => break "SIGINT",
            _ = sigterm.recv() => break "SIGTERM",
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _)) => {
                        let engine = Arc::clone(&engine);
                        tokio::spawn(async move {
                            if let Err(err) = handle_client(stream, engine).await {
                                tracing::warn!(target: "server", error = %format!("{err:#}"), "client_handling_failed");
                            }
                        });
                    }
                    Err(err) => {
                        tracing::warn!(target: "server", error = %err, "accept_failed");
                    }
                }
            }
        }
    };

    cleanup_socket_path(&config.server.socket_path)?;
    eprintln!("swapyard stopped: received {signal_name}");
    Ok(())
}

async fn handle_client(stream: UnixStream, engine: Arc<Mutex<Engine>>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request = match parse_client_request(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(target: "server", error = %err, "invalid_protocol_message");
                let response = ServerResponse {
                    ok: false,
                    data: None,
                    error: Some(WireError {
                        code: "protocol".to_string(),
                        message: err.to_string(),
                    }),
                };
                write_response(&mut write_half, &response).await?;
                continue;
            }
        };

        match request {
            ClientRequest::Exit => break,
            ClientRequest::Subscribe => {
                let receiver = engine.lock().await.subscribe();
                let confirmation =
                    ServerResponse::success(serde_json::json!({ "subscribed": true }));
                write_response(&mut write_half, &confirmation).await?;
                stream_events(&mut write_half, receiver).await;
                break;
            }
            request => {
                let response = dispatch(&engine, request).await;
                write_response(&mut write_half, &response).await?;
            }
        }
    }

    Ok(())
}

/// Forwards broadcast events until the client goes away. A lagged
/// receiver skips ahead; the engine never waits for subscribers.
async fn stream_events(
    write_half: &mut tokio::net::unix::OwnedWriteHalf,
    mut receiver: broadcast::Receiver<EngineEvent>,
) {
    loop {
        let event = match receiver.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(target: "server", skipped, "event_subscriber_lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let Ok(payload) = serde_json::to_string(&event) else {
            continue;
        };
        if write_half.write_all(payload.as_bytes()).await.is_err()
            || write_half.write_all(b"\n").await.is_err()
        {
            break;
        }
    }
}

async fn write_response(
    write_half: &mut tokio::net::unix::OwnedWriteHalf,
    response: &ServerResponse,
) -> Result<()> {
    let payload = serde_json::to_string(response).context("failed to serialize response")?;
    write_half.write_all(payload.as_bytes()).await?;
    write_half.write_all(b"\n").await?;
    Ok(())
}

async fn dispatch(engine: &Arc<Mutex<Engine>>, request: ClientRequest) -> ServerResponse {
    let mut engine = engine.lock().await;
    match request {
        // Handled at the connection layer; kept total for the match.
        ClientRequest::Subscribe | ClientRequest::Exit => ServerResponse::success(Value::Null),
        ClientRequest::CreateItem { actor, item } => {
            ServerResponse::from_result(engine.create_item(&actor, item))
        }
        ClientRequest::DelistItem { actor, item_id } => {
            ServerResponse::from_result(engine.delist_item(&item_id, &actor))
        }
        ClientRequest::GetItem { item_id } => {
            ServerResponse::from_result(engine.item(&item_id).cloned())
        }
        ClientRequest::Claim { actor, item_id } => {
            ServerResponse::from_result(engine.claim_item(&item_id, &actor))
        }
        ClientRequest::ClaimAction {
            actor,
            claim_id,
            action,
            expected_status,
        } => ServerResponse::from_result(match action {
            ClaimAction::Confirm => engine.confirm_claim(&claim_id, &actor, expected_status),
            ClaimAction::Complete => engine.complete_claim(&claim_id, &actor, expected_status),
            ClaimAction::Cancel => engine.cancel_claim(&claim_id, &actor, expected_status),
        }),
        ClientRequest::ExpirePendingClaims => {
            ServerResponse::from_result(engine.expire_pending_claims())
        }
        ClientRequest::RequestItem {
            actor,
            item_id,
            request,
        } => ServerResponse::from_result(engine.request_item(&item_id, &actor, request)),
        ClientRequest::TransactionAction {
            actor,
            transaction_id,
            action,
            expected_status,
        } => ServerResponse::from_result(match action {
            TransactionAction::Accept => {
                engine.accept_request(&transaction_id, &actor, expected_status)
            }
            TransactionAction::Cancel => {
                engine.cancel_transaction(&transaction_id, &actor, expected_status)
            }
            TransactionAction::ConfirmHandover => {
                engine.confirm_handover(&transaction_id, &actor, expected_status)
            }
            TransactionAction::MarkReturn => {
                engine.mark_return(&transaction_id, &actor, expected_status)
            }
            TransactionAction::ConfirmReturn => {
                engine.confirm_return(&transaction_id, &actor, expected_status)
            }
            TransactionAction::RaiseDispute => {
                engine.raise_dispute(&transaction_id, &actor, expected_status)
            }
        }),
        ClientRequest::ProposeAgreement {
            actor,
            transaction_id,
            agreement,
            expected_status,
        } => ServerResponse::from_result(engine.propose_agreement(
            &transaction_id,
            &actor,
            agreement,
            expected_status,
        )),
        ClientRequest::Negotiate {
            actor,
            transaction_id,
            counter,
        } => ServerResponse::from_result(engine.counter_offer(&transaction_id, &actor, counter)),
        ClientRequest::RespondNegotiation {
            actor,
            transaction_id,
            accept,
        } => {
            ServerResponse::from_result(engine.respond_to_proposal(&transaction_id, &actor, accept))
        }
        ClientRequest::ProposePickup {
            actor,
            transaction_id,
            pickup,
        } => ServerResponse::from_result(engine.propose_pickup(&transaction_id, &actor, pickup)),
        ClientRequest::ConfirmPickup {
            actor,
            transaction_id,
        } => ServerResponse::from_result(engine.confirm_pickup(&transaction_id, &actor)),
        ClientRequest::GetTransaction { transaction_id } => {
            ServerResponse::from_result(engine.transaction(&transaction_id).cloned())
        }
        ClientRequest::CreateLostFoundPost { actor, post } => {
            ServerResponse::from_result(engine.create_lostfound_post(&actor, post))
        }
        ClientRequest::GetVerificationPrompts { post_id } => {
            ServerResponse::from_result(engine.verification_prompts(&post_id))
        }
        ClientRequest::SubmitLostFoundClaim {
            actor,
            post_id,
            message,
            answers,
        } => ServerResponse::from_result(
            engine.submit_lostfound_claim(&post_id, &actor, message, answers),
        ),
        ClientRequest::LostFoundClaimAction {
            actor,
            claim_id,
            action,
            expected_status,
        } => ServerResponse::from_result(match action {
            LostFoundAction::StartVerification => {
                engine.start_verification(&claim_id, &actor, expected_status)
            }
            LostFoundAction::Verify => {
                engine.approve_verification(&claim_id, &actor, expected_status)
            }
            LostFoundAction::Reject => {
                engine.reject_lostfound_claim(&claim_id, &actor, expected_status)
            }
        }),
        ClientRequest::SubmitVerificationAnswers {
            actor,
            claim_id,
            answers,
        } => ServerResponse::from_result(
            engine.submit_verification_answers(&claim_id, &actor, answers),
        ),
        ClientRequest::ProposeMeetup {
            actor,
            claim_id,
            meetup,
        } => ServerResponse::from_result(engine.propose_meetup(&claim_id, &actor, meetup)),
        ClientRequest::AcceptMeetup { actor, claim_id } => {
            ServerResponse::from_result(engine.accept_meetup(&claim_id, &actor))
        }
        ClientRequest::ResolveLostFound { actor, claim_id } => {
            ServerResponse::from_result(engine.resolve_lostfound_claim(&claim_id, &actor))
        }
        ClientRequest::CreateWantedItem { actor, title } => {
            ServerResponse::from_result(engine.create_wanted_item(&actor, title))
        }
        ClientRequest::SubmitWantedOffer {
            actor,
            wanted_id,
            offer,
        } => ServerResponse::from_result(engine.submit_wanted_offer(&wanted_id, &actor, offer)),
        ClientRequest::WantedOfferAction {
            actor,
            offer_id,
            action,
            reason,
            expected_status,
        } => ServerResponse::from_result(match action {
            WantedOfferAction::Accept => {
                engine.accept_wanted_offer(&offer_id, &actor, expected_status)
            }
            WantedOfferAction::Reject => {
                engine.reject_wanted_offer(&offer_id, &actor, reason, expected_status)
            }
            WantedOfferAction::Cancel => {
                engine.cancel_wanted_offer(&offer_id, &actor, expected_status)
            }
        }),
        ClientRequest::Ack {
            actor,
            kind,
            conversation_id,
        } => {
            engine.record_ack(kind, conversation_id, &actor);
            ServerResponse::success(serde_json::json!({ "acknowledged": true }))
        }
        ClientRequest::TrustScore { user } => ServerResponse::success(serde_json::json!({
            "user": user,
            "score": engine.trust_score(&user),
        })),
        ClientRequest::RecentEvents => ServerResponse::from_result(Ok(engine.recent_events())),
    }
}

fn prepare_socket_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }

    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            if metadata.file_type().is_socket() || metadata.is_file() {
                fs::remove_file(path)
                    .with_context(|| format!("unable to remove stale socket {}", path.display()))?;
            } else {
                bail!(
                    "socket path exists but is not removable as file/socket: {}",
                    path.display()
                );
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("unable to inspect {}", path.display()));
        }
    }

    Ok(())
}

fn cleanup_socket_path(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("unable to remove {}", path.display())),
    }
}
