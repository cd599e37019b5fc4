// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The guidance protocol.
//!
//! A caller asks for guidance and waits for the first of an external answer
//! or its deadline. Whoever removes the pending entry from the map resolves
//! it; everyone else is a no-op. The expiry sweep and shutdown use the same
//! removal, so an entry resolves exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use dashmap::DashMap;
use strata_bus::{BusEvent, SharedEventBus};
use strata_config::InterventionConfig;
use strata_core::{ComplexityTier, Request, RequestId, StrataError, UserChoice};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Responder = oneshot::Sender<Result<UserChoice, StrataError>>;

struct PendingGuidance {
    /// Distinguishes a re-request for the same id from the one it replaced.
    seq: u64,
    suggested_tier: ComplexityTier,
    requested_at: Instant,
    responder: Responder,
}

pub struct GuidanceBroker {
    pending: DashMap<RequestId, PendingGuidance>,
    next_seq: AtomicU64,
    bus: Option<SharedEventBus>,
    default_timeout: Duration,
    expiry: Duration,
    sweep_interval: Duration,
}

impl GuidanceBroker {
    pub fn new(config: &InterventionConfig, bus: Option<SharedEventBus>) -> Self {
        Self {
            pending: DashMap::new(),
            next_seq: AtomicU64::new(0),
            bus,
            default_timeout: Duration::from_millis(config.default_guidance_timeout_ms),
            expiry: Duration::from_secs(config.guidance_expiry_secs),
            sweep_interval: Duration::from_secs(config.sweep_interval_secs.max(1)),
        }
    }

    fn publish(&self, event: BusEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }

    /// Ask the external controller how to route `request`.
    ///
    /// Resolves with the controller's choice, or with the suggested tier once
    /// the request's max-wait (or the configured default) elapses. Fails only
    /// when the expiry sweep or shutdown rejects the question first.
    pub async fn request_guidance(
        &self,
        request: &Request,
        suggested_tier: ComplexityTier,
    ) -> Result<UserChoice, StrataError> {
        let wait = request
            .max_wait_ms()
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);
        let id = request.id.clone();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = oneshot::channel();

        let replaced = self.pending.insert(
            id.clone(),
            PendingGuidance {
                seq,
                suggested_tier,
                requested_at: Instant::now(),
                responder: tx,
            },
        );
        if let Some(old) = replaced {
            warn!(request_id = %id, "guidance re-requested; rejecting the earlier question");
            let _ = old.responder.send(Err(StrataError::GuidanceRejected {
                request_id: id.clone(),
                reason: "superseded by a newer guidance request".into(),
            }));
        }

        let deadline = TimeDelta::from_std(wait)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or_else(Utc::now);
        info!(request_id = %id, suggested = %suggested_tier, wait_ms = wait.as_millis() as u64, "guidance requested");
        self.publish(BusEvent::GuidanceRequested {
            request_id: id.clone(),
            suggested_tier,
            deadline,
        });

        tokio::select! {
            answer = &mut rx => Self::unwrap_answer(&id, answer),
            _ = tokio::time::sleep(wait) => {
                if self.pending.remove_if(&id, |_, p| p.seq == seq).is_some() {
                    debug!(request_id = %id, "guidance timed out; using suggested tier");
                    self.publish(BusEvent::GuidanceTimedOut {
                        request_id: id.clone(),
                        suggested_tier,
                    });
                    return Ok(UserChoice::default_for(suggested_tier));
                }
                // Someone else resolved it while the timer fired.
                Self::unwrap_answer(&id, rx.await)
            }
        }
    }

    fn unwrap_answer(
        id: &RequestId,
        answer: Result<Result<UserChoice, StrataError>, oneshot::error::RecvError>,
    ) -> Result<UserChoice, StrataError> {
        answer.unwrap_or_else(|_| {
            Err(StrataError::GuidanceRejected {
                request_id: id.clone(),
                reason: "guidance channel closed".into(),
            })
        })
    }

    /// Deliver the controller's answer.
    ///
    /// Returns `false` when nothing is waiting: the question already timed
    /// out, was answered, expired, or never existed.
    pub fn provide_guidance(&self, request_id: &RequestId, choice: UserChoice) -> bool {
        let Some((_, pending)) = self.pending.remove(request_id) else {
            debug!(request_id = %request_id, "guidance answer with nothing pending");
            return false;
        };
        debug!(
            request_id = %request_id,
            suggested = %pending.suggested_tier,
            selected = %choice.selected_tier,
            "guidance received"
        );
        self.publish(BusEvent::GuidanceReceived {
            request_id: request_id.clone(),
            choice: choice.clone(),
        });
        pending.responder.send(Ok(choice)).is_ok()
    }

    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending.contains_key(request_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Reject every question outstanding longer than the expiry window.
    ///
    /// Returns how many were rejected.
    pub fn expire_stale(&self) -> usize {
        let stale: Vec<(RequestId, u64)> = self
            .pending
            .iter()
            .filter(|entry| entry.requested_at.elapsed() > self.expiry)
            .map(|entry| (entry.key().clone(), entry.seq))
            .collect();

        let mut expired = 0;
        for (id, seq) in stale {
            let Some((_, pending)) = self.pending.remove_if(&id, |_, p| p.seq == seq) else {
                continue;
            };
            warn!(request_id = %id, "guidance expired");
            let _ = pending.responder.send(Err(StrataError::GuidanceExpired {
                request_id: id.clone(),
            }));
            self.publish(BusEvent::GuidanceExpired { request_id: id });
            expired += 1;
        }
        expired
    }

    /// Reject every outstanding question with `reason`.
    pub fn reject_all(&self, reason: &str) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|e| e.key().clone()).collect();
        let mut rejected = 0;
        for id in ids {
            if let Some((_, pending)) = self.pending.remove(&id) {
                let _ = pending.responder.send(Err(StrataError::GuidanceRejected {
                    request_id: id,
                    reason: reason.to_string(),
                }));
                rejected += 1;
            }
        }
        rejected
    }

    /// Run [`expire_stale`](Self::expire_stale) every sweep interval until
    /// `cancel` fires.
    pub fn spawn_expiry_sweep(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.sweep_interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("guidance sweep cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let expired = self.expire_stale();
                        if expired > 0 {
                            info!(expired, "guidance sweep rejected stale requests");
                        }
                    }
                }
            }
        })
    }
}
