use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    claims::{Claim, ClaimAllocator, ClaimStatus},
    clock::{Clock, SystemClock},
    config::{OfferAcceptancePolicy, PolicyConfig},
    engine::{invariants, store::EntityStore},
    error::{EngineResult, not_found, stale_state, unauthorized, validation_error},
    events::{AckKind, EngineEvent, EntityKind, EventEmitter, ExternalAck, LifecycleEvent,
        OrderedLifecycleEvent},
    ledger::SlotLedger,
    lifecycle::{
        AgreementProposal, CounterTerms, PickupProposal, Transaction, TransactionManager,
        TransactionRequest, TransactionStatus,
    },
    lostfound::{
        LostFoundClaim, LostFoundClaimStatus, LostFoundPost, MeetupDetails, NewLostFoundPost,
        PostStatus, VerificationAnswer, VerificationFlow,
    },
    trust::{TrustBook, TrustOutcome, TrustRecord},
    types::{ItemMode, NewItem, SYSTEM_ACTOR, ShareableItem, UnixSeconds, UserId},
    wanted::{NewWantedOffer, OfferManager, WantedItem, WantedOffer, WantedOfferStatus},
};

/// The lifecycle engine: single source of truth for every marketplace
/// entity. Hosts serialize access (one engine behind a mutex), so each
/// operation runs start-to-finish against a consistent store; slot
/// reservation and claim creation happen inside one such operation.
pub struct Engine {
    store: EntityStore,
    emitter: EventEmitter,
    trust: TrustBook,
    policy: PolicyConfig,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(policy: PolicyConfig, clock: Arc<dyn Clock>) -> Self {
        let emitter = EventEmitter::default();
        let trust = TrustBook::new(policy.trust.clone());
        Self {
            store: EntityStore::default(),
            emitter,
            trust,
            policy,
            clock,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(PolicyConfig::default(), Arc::new(SystemClock))
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.emitter.subscribe()
    }

    pub fn recent_events(&self) -> Vec<OrderedLifecycleEvent> {
        self.emitter.recent().cloned().collect()
    }

    pub fn trust_score(&self, user: &UserId) -> i64 {
        self.trust.score(user)
    }

    pub fn trust_record(&self, user: &UserId) -> Option<&TrustRecord> {
        self.trust.record(user)
    }

    pub fn assert_invariants(&self) -> EngineResult<()> {
        invariants::assert_slot_accounting(&self.store)?;
        invariants::assert_resolution_exclusivity(&self.store)?;
        invariants::assert_giveaway_prices(&self.store)
    }

    // ---- items ----------------------------------------------------------

    pub fn create_item(&mut self, owner: &UserId, new_item: NewItem) -> EngineResult<ShareableItem> {
        if new_item.max_claimers == 0 {
            return Err(validation_error("max_claimers must be at least 1"));
        }
        if new_item.instant_claim && new_item.mode != ItemMode::Give {
            return Err(validation_error(
                "instant claim is only available for giveaway items",
            ));
        }

        let now = self.clock.now_unix();
        let item = ShareableItem {
            id: new_entity_id(),
            owner: owner.clone(),
            title: new_item.title,
            mode: new_item.mode,
            price: if new_item.mode == ItemMode::Give {
                0
            } else {
                new_item.price
            },
            instant_claim: new_item.instant_claim,
            max_claimers: new_item.max_claimers,
            claimed_count: 0,
            available: true,
            rental_limits: new_item.rental_limits,
            created_at: now,
        };

        self.store.items.insert(item.id.clone(), item.clone());
        self.emit(EntityKind::Item, &item.id, None, "available", owner, now);
        Ok(item)
    }

    /// Owner withdrawal. Rejected while any transaction still holds the
    /// item; existing claims keep their slots and may still settle.
    pub fn delist_item(&mut self, item_id: &str, actor: &UserId) -> EngineResult<ShareableItem> {
        let now = self.clock.now_unix();
        let in_flight = self
            .store
            .transactions_for_item(item_id)
            .any(|tx| !tx.status.is_terminal());

        let item = self
            .store
            .items
            .get_mut(item_id)
            .ok_or_else(|| not_found(format!("item '{item_id}' does not exist")))?;
        if actor != &item.owner {
            return Err(unauthorized(format!(
                "only the owner may delist item '{item_id}'"
            )));
        }
        if in_flight {
            return Err(validation_error(format!(
                "item '{item_id}' has a transaction in flight and cannot be delisted"
            )));
        }

        SlotLedger::mark_unavailable(item);
        let snapshot = item.clone();
        self.emit(
            EntityKind::Item,
            item_id,
            Some("available"),
            "unavailable",
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn item(&self, item_id: &str) -> EngineResult<&ShareableItem> {
        self.store
            .items
            .get(item_id)
            .ok_or_else(|| not_found(format!("item '{item_id}' does not exist")))
    }

    // ---- claims ---------------------------------------------------------

    pub fn claim_item(&mut self, item_id: &str, requester: &UserId) -> EngineResult<Claim> {
        let now = self.clock.now_unix();
        let existing = self
            .store
            .claims
            .values()
            .find(|c| c.item_id == item_id && &c.requester == requester && c.status.holds_slot());

        let item = self
            .store
            .items
            .get_mut(item_id)
            .ok_or_else(|| not_found(format!("item '{item_id}' does not exist")))?;
        if item.mode != ItemMode::Give {
            return Err(validation_error(
                "claims apply to giveaway items; rentals and sales go through requests",
            ));
        }
        if requester == &item.owner {
            return Err(validation_error(format!(
                "'{requester}' cannot claim their own item '{item_id}'"
            )));
        }

        let claim = ClaimAllocator::admit(
            item,
            existing,
            new_entity_id(),
            requester,
            now,
            self.policy.claim_ttl_secs,
        )?;

        let to_status = claim.status.as_str();
        self.store.claims.insert(claim.id.clone(), claim.clone());
        self.emit(EntityKind::Claim, &claim.id, None, to_status, requester, now);
        Ok(claim)
    }

    pub fn confirm_claim(
        &mut self,
        claim_id: &str,
        actor: &UserId,
        expected: Option<ClaimStatus>,
    ) -> EngineResult<Claim> {
        let now = self.clock.now_unix();
        let claim = self
            .store
            .claims
            .get_mut(claim_id)
            .ok_or_else(|| not_found(format!("claim '{claim_id}' does not exist")))?;
        check_expected(claim.status, expected, "claim", claim_id)?;

        let item = self
            .store
            .items
            .get(&claim.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", claim.item_id)))?;

        let from = claim.status.as_str();
        ClaimAllocator::confirm(item, claim, actor)?;
        let snapshot = claim.clone();

        self.emit(
            EntityKind::Claim,
            claim_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn complete_claim(
        &mut self,
        claim_id: &str,
        actor: &UserId,
        expected: Option<ClaimStatus>,
    ) -> EngineResult<Claim> {
        let now = self.clock.now_unix();
        let claim = self
            .store
            .claims
            .get_mut(claim_id)
            .ok_or_else(|| not_found(format!("claim '{claim_id}' does not exist")))?;
        check_expected(claim.status, expected, "claim", claim_id)?;

        let item = self
            .store
            .items
            .get(&claim.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", claim.item_id)))?;
        let owner = item.owner.clone();

        let from = claim.status.as_str();
        ClaimAllocator::complete(item, claim, actor)?;
        let snapshot = claim.clone();

        self.emit(
            EntityKind::Claim,
            claim_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        self.trust
            .apply(&owner, TrustOutcome::ClaimCompleted, claim_id, now);
        self.trust
            .apply(&snapshot.requester, TrustOutcome::ClaimCompleted, claim_id, now);
        Ok(snapshot)
    }

    pub fn cancel_claim(
        &mut self,
        claim_id: &str,
        actor: &UserId,
        expected: Option<ClaimStatus>,
    ) -> EngineResult<Claim> {
        let now = self.clock.now_unix();
        let claim = self
            .store
            .claims
            .get_mut(claim_id)
            .ok_or_else(|| not_found(format!("claim '{claim_id}' does not exist")))?;
        check_expected(claim.status, expected, "claim", claim_id)?;

        let item = self
            .store
            .items
            .get_mut(&claim.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", claim.item_id)))?;

        let from = claim.status.as_str();
        ClaimAllocator::cancel(item, claim, actor)?;
        let snapshot = claim.clone();

        self.emit(
            EntityKind::Claim,
            claim_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    /// TTL sweep over pending claims. Returns the ids that expired. Only
    /// ever invoked explicitly; the engine runs no timers of its own.
    pub fn expire_pending_claims(&mut self) -> EngineResult<Vec<String>> {
        let now = self.clock.now_unix();
        let candidates: Vec<String> = self
            .store
            .claims
            .values()
            .filter(|c| {
                c.status == ClaimStatus::Pending
                    && c.expires_at.is_some_and(|deadline| now >= deadline)
            })
            .map(|c| c.id.clone())
            .collect();

        let system: UserId = SYSTEM_ACTOR.to_string();
        let mut expired = Vec::new();
        for claim_id in candidates {
            let Some(claim) = self.store.claims.get_mut(&claim_id) else {
                continue;
            };
            let Some(item) = self.store.items.get_mut(&claim.item_id) else {
                continue;
            };

            let from = claim.status.as_str();
            if ClaimAllocator::expire(item, claim, now)? {
                let to = claim.status.as_str();
                self.emit(EntityKind::Claim, &claim_id, Some(from), to, &system, now);
                expired.push(claim_id);
            }
        }
        Ok(expired)
    }

    pub fn claim(&self, claim_id: &str) -> EngineResult<&Claim> {
        self.store
            .claims
            .get(claim_id)
            .ok_or_else(|| not_found(format!("claim '{claim_id}' does not exist")))
    }

    // ---- transactions ---------------------------------------------------

    pub fn request_item(
        &mut self,
        item_id: &str,
        requester: &UserId,
        request: TransactionRequest,
    ) -> EngineResult<Transaction> {
        let now = self.clock.now_unix();
        let item = self
            .store
            .items
            .get(item_id)
            .ok_or_else(|| not_found(format!("item '{item_id}' does not exist")))?;

        let tx = TransactionManager::open(new_entity_id(), item, requester, request, now)?;
        let to = tx.status.as_str();
        self.store.transactions.insert(tx.id.clone(), tx.clone());
        self.emit(EntityKind::Transaction, &tx.id, None, to, requester, now);
        Ok(tx)
    }

    pub fn accept_request(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        self.transaction_step(tx_id, actor, expected, |tx, item, actor, now| {
            TransactionManager::accept(tx, item, actor, now)
        })
    }

    pub fn cancel_transaction(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        self.transaction_step(tx_id, actor, expected, |tx, item, actor, now| {
            TransactionManager::cancel(tx, item, actor, now)
        })
    }

    pub fn propose_agreement(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        agreement: AgreementProposal,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        self.transaction_step(tx_id, actor, expected, move |tx, item, actor, now| {
            TransactionManager::propose_agreement(tx, item, actor, agreement, now)
        })
    }

    pub fn counter_offer(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        counter: CounterTerms,
    ) -> EngineResult<Transaction> {
        self.transaction_step(tx_id, actor, None, move |tx, item, actor, now| {
            TransactionManager::counter(tx, item, actor, counter, now)
        })
    }

    /// Accept or reject the pending proposal. Acceptance activates the
    /// transaction and, for rentals and sales, binds the item exclusively.
    pub fn respond_to_proposal(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        accept: bool,
    ) -> EngineResult<Transaction> {
        let now = self.clock.now_unix();
        let tx = self
            .store
            .transactions
            .get_mut(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))?;
        let item = self
            .store
            .items
            .get_mut(&tx.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", tx.item_id)))?;

        let from = tx.status.as_str();
        let activated = TransactionManager::respond(tx, item, actor, accept, now)?;
        if activated && item.mode != ItemMode::Give {
            SlotLedger::mark_unavailable(item);
        }
        let snapshot = tx.clone();

        self.emit(
            EntityKind::Transaction,
            tx_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn propose_pickup(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        proposal: PickupProposal,
    ) -> EngineResult<Transaction> {
        let now = self.clock.now_unix();
        let tx = self
            .store
            .transactions
            .get_mut(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))?;

        TransactionManager::propose_pickup(tx, actor, proposal, now)?;
        let snapshot = tx.clone();

        self.emit(
            EntityKind::Transaction,
            tx_id,
            None,
            "pickup_proposed",
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn confirm_pickup(&mut self, tx_id: &str, actor: &UserId) -> EngineResult<Transaction> {
        let now = self.clock.now_unix();
        let tx = self
            .store
            .transactions
            .get_mut(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))?;

        TransactionManager::confirm_pickup(tx, actor, now)?;
        let snapshot = tx.clone();

        self.emit(
            EntityKind::Transaction,
            tx_id,
            Some("pickup_proposed"),
            "pickup_confirmed",
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn confirm_handover(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        let snapshot = self.transaction_step(tx_id, actor, expected, |tx, item, actor, now| {
            TransactionManager::confirm_handover(tx, item, actor, now)
        })?;

        let now = self.clock.now_unix();
        self.trust
            .apply(&snapshot.owner, TrustOutcome::CompletedOnTime, tx_id, now);
        self.trust
            .apply(&snapshot.requester, TrustOutcome::CompletedOnTime, tx_id, now);
        Ok(snapshot)
    }

    pub fn mark_return(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        self.transaction_step(tx_id, actor, expected, |tx, item, actor, now| {
            TransactionManager::mark_return(tx, item, actor, now)
        })
    }

    pub fn confirm_return(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        let now = self.clock.now_unix();
        let tx = self
            .store
            .transactions
            .get_mut(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))?;
        check_expected(tx.status, expected, "transaction", tx_id)?;

        let item = self
            .store
            .items
            .get_mut(&tx.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", tx.item_id)))?;

        let from = tx.status.as_str();
        let outcome = TransactionManager::confirm_return(tx, item, actor, now)?;
        SlotLedger::mark_available(item);
        let snapshot = tx.clone();

        self.emit(
            EntityKind::Transaction,
            tx_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        if outcome.late {
            self.trust
                .apply(&snapshot.requester, TrustOutcome::LateReturn, tx_id, now);
            self.trust.apply(
                &snapshot.owner,
                TrustOutcome::LateReturnReceived,
                tx_id,
                now,
            );
        } else {
            self.trust
                .apply(&snapshot.owner, TrustOutcome::CompletedOnTime, tx_id, now);
            self.trust
                .apply(&snapshot.requester, TrustOutcome::CompletedOnTime, tx_id, now);
        }
        Ok(snapshot)
    }

    pub fn raise_dispute(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
    ) -> EngineResult<Transaction> {
        let snapshot = self.transaction_step(tx_id, actor, expected, |tx, item, actor, now| {
            TransactionManager::raise_dispute(tx, item, actor, now)
        })?;

        let now = self.clock.now_unix();
        self.trust
            .apply(&snapshot.owner, TrustOutcome::DisputeRaised, tx_id, now);
        self.trust
            .apply(&snapshot.requester, TrustOutcome::DisputeRaised, tx_id, now);
        Ok(snapshot)
    }

    pub fn transaction(&self, tx_id: &str) -> EngineResult<&Transaction> {
        self.store
            .transactions
            .get(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))
    }

    fn transaction_step<F>(
        &mut self,
        tx_id: &str,
        actor: &UserId,
        expected: Option<TransactionStatus>,
        step: F,
    ) -> EngineResult<Transaction>
    where
        F: FnOnce(&mut Transaction, &ShareableItem, &UserId, UnixSeconds) -> EngineResult<()>,
    {
        let now = self.clock.now_unix();
        let tx = self
            .store
            .transactions
            .get_mut(tx_id)
            .ok_or_else(|| not_found(format!("transaction '{tx_id}' does not exist")))?;
        check_expected(tx.status, expected, "transaction", tx_id)?;

        let item = self
            .store
            .items
            .get(&tx.item_id)
            .ok_or_else(|| not_found(format!("item '{}' does not exist", tx.item_id)))?;

        let from = tx.status.as_str();
        step(tx, item, actor, now)?;
        let snapshot = tx.clone();

        self.emit(
            EntityKind::Transaction,
            tx_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    // ---- lost & found ---------------------------------------------------

    pub fn create_lostfound_post(
        &mut self,
        owner: &UserId,
        new_post: NewLostFoundPost,
    ) -> EngineResult<LostFoundPost> {
        let now = self.clock.now_unix();
        let post = LostFoundPost {
            id: new_entity_id(),
            owner: owner.clone(),
            title: new_post.title,
            status: PostStatus::Open,
            verification_questions: new_post.verification_questions,
            created_at: now,
        };

        self.store.posts.insert(post.id.clone(), post.clone());
        self.emit(EntityKind::LostFoundPost, &post.id, None, "open", owner, now);
        Ok(post)
    }

    /// Questions as shown to claimants: prompts only, expected answers
    /// never leave the post.
    pub fn verification_prompts(&self, post_id: &str) -> EngineResult<Vec<String>> {
        let post = self.lostfound_post(post_id)?;
        Ok(post
            .verification_questions
            .iter()
            .map(|q| q.question.clone())
            .collect())
    }

    pub fn submit_lostfound_claim(
        &mut self,
        post_id: &str,
        claimant: &UserId,
        message: Option<String>,
        answers: Vec<VerificationAnswer>,
    ) -> EngineResult<LostFoundClaim> {
        let now = self.clock.now_unix();
        let post = self
            .store
            .posts
            .get(post_id)
            .ok_or_else(|| not_found(format!("post '{post_id}' does not exist")))?;

        let claim =
            VerificationFlow::submit(new_entity_id(), post, claimant, message, answers, now)?;
        let to = claim.status.as_str();
        self.store
            .lostfound_claims
            .insert(claim.id.clone(), claim.clone());
        self.emit(EntityKind::LostFoundClaim, &claim.id, None, to, claimant, now);
        Ok(claim)
    }

    pub fn start_verification(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        expected: Option<LostFoundClaimStatus>,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, expected, |post, claim, actor, now| {
            VerificationFlow::start_verification(post, claim, actor, now)
        })
    }

    pub fn submit_verification_answers(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        answers: Vec<VerificationAnswer>,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, None, move |_post, claim, actor, now| {
            VerificationFlow::record_answers(claim, actor, answers, now)
        })
    }

    pub fn approve_verification(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        expected: Option<LostFoundClaimStatus>,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, expected, |post, claim, actor, now| {
            VerificationFlow::approve(post, claim, actor, now)
        })
    }

    pub fn reject_lostfound_claim(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        expected: Option<LostFoundClaimStatus>,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, expected, |post, claim, actor, now| {
            VerificationFlow::reject(post, claim, actor, now)
        })
    }

    pub fn propose_meetup(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        meetup: MeetupDetails,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, None, move |post, claim, actor, now| {
            VerificationFlow::propose_meetup(post, claim, actor, meetup, now)
        })
    }

    pub fn accept_meetup(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
    ) -> EngineResult<LostFoundClaim> {
        self.lostfound_step(lf_claim_id, actor, None, |_post, claim, actor, now| {
            VerificationFlow::accept_meetup(claim, actor, now)
        })
    }

    /// Resolution is the concurrency-sensitive step: the winning claim,
    /// the post, and every sibling claim settle in this one operation so
    /// no second handover can ever be arranged.
    pub fn resolve_lostfound_claim(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
    ) -> EngineResult<LostFoundClaim> {
        let now = self.clock.now_unix();
        let claim = self
            .store
            .lostfound_claims
            .get_mut(lf_claim_id)
            .ok_or_else(|| not_found(format!("lost&found claim '{lf_claim_id}' does not exist")))?;
        let post = self
            .store
            .posts
            .get_mut(&claim.post_id)
            .ok_or_else(|| not_found(format!("post '{}' does not exist", claim.post_id)))?;
        let post_id = post.id.clone();
        let owner = post.owner.clone();

        let from = claim.status.as_str();
        VerificationFlow::resolve(post, claim, actor, now)?;
        let snapshot = claim.clone();

        self.emit(
            EntityKind::LostFoundClaim,
            lf_claim_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        self.emit(
            EntityKind::LostFoundPost,
            &post_id,
            Some("open"),
            "resolved",
            actor,
            now,
        );

        // Administrative close of every other claim still in flight.
        let siblings: Vec<String> = self
            .store
            .lostfound_claims
            .values()
            .filter(|c| c.post_id == post_id && c.id != lf_claim_id && !c.status.is_terminal())
            .map(|c| c.id.clone())
            .collect();
        let system: UserId = SYSTEM_ACTOR.to_string();
        for sibling_id in siblings {
            let Some(sibling) = self.store.lostfound_claims.get_mut(&sibling_id) else {
                continue;
            };
            let sibling_from = sibling.status.as_str();
            if VerificationFlow::close_superseded(sibling, now) {
                self.emit(
                    EntityKind::LostFoundClaim,
                    &sibling_id,
                    Some(sibling_from),
                    "rejected",
                    &system,
                    now,
                );
            }
        }

        self.trust
            .apply(&owner, TrustOutcome::LostFoundResolved, lf_claim_id, now);
        self.trust.apply(
            &snapshot.claimant,
            TrustOutcome::LostFoundResolved,
            lf_claim_id,
            now,
        );
        Ok(snapshot)
    }

    pub fn lostfound_post(&self, post_id: &str) -> EngineResult<&LostFoundPost> {
        self.store
            .posts
            .get(post_id)
            .ok_or_else(|| not_found(format!("post '{post_id}' does not exist")))
    }

    pub fn lostfound_claim(&self, lf_claim_id: &str) -> EngineResult<&LostFoundClaim> {
        self.store
            .lostfound_claims
            .get(lf_claim_id)
            .ok_or_else(|| not_found(format!("lost&found claim '{lf_claim_id}' does not exist")))
    }

    fn lostfound_step<F>(
        &mut self,
        lf_claim_id: &str,
        actor: &UserId,
        expected: Option<LostFoundClaimStatus>,
        step: F,
    ) -> EngineResult<LostFoundClaim>
    where
        F: FnOnce(&LostFoundPost, &mut LostFoundClaim, &UserId, UnixSeconds) -> EngineResult<()>,
    {
        let now = self.clock.now_unix();
        let claim = self
            .store
            .lostfound_claims
            .get_mut(lf_claim_id)
            .ok_or_else(|| not_found(format!("lost&found claim '{lf_claim_id}' does not exist")))?;
        check_expected(claim.status, expected, "lost&found claim", lf_claim_id)?;

        let post = self
            .store
            .posts
            .get(&claim.post_id)
            .ok_or_else(|| not_found(format!("post '{}' does not exist", claim.post_id)))?;

        let from = claim.status.as_str();
        step(post, claim, actor, now)?;
        let snapshot = claim.clone();

        self.emit(
            EntityKind::LostFoundClaim,
            lf_claim_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    // ---- wanted items ---------------------------------------------------

    pub fn create_wanted_item(&mut self, owner: &UserId, title: String) -> EngineResult<WantedItem> {
        let now = self.clock.now_unix();
        let wanted = WantedItem {
            id: new_entity_id(),
            owner: owner.clone(),
            title,
            created_at: now,
        };
        self.store
            .wanted_items
            .insert(wanted.id.clone(), wanted.clone());
        Ok(wanted)
    }

    pub fn submit_wanted_offer(
        &mut self,
        wanted_id: &str,
        offerer: &UserId,
        offer: NewWantedOffer,
    ) -> EngineResult<WantedOffer> {
        let now = self.clock.now_unix();
        let wanted = self
            .store
            .wanted_items
            .get(wanted_id)
            .ok_or_else(|| not_found(format!("wanted item '{wanted_id}' does not exist")))?;

        let offer = OfferManager::open(new_entity_id(), wanted, offerer, offer, now)?;
        let to = offer.status.as_str();
        self.store
            .wanted_offers
            .insert(offer.id.clone(), offer.clone());
        self.emit(EntityKind::WantedOffer, &offer.id, None, to, offerer, now);
        Ok(offer)
    }

    /// Acceptance; sibling handling follows the configured policy.
    pub fn accept_wanted_offer(
        &mut self,
        offer_id: &str,
        actor: &UserId,
        expected: Option<WantedOfferStatus>,
    ) -> EngineResult<WantedOffer> {
        let now = self.clock.now_unix();
        let offer = self
            .store
            .wanted_offers
            .get_mut(offer_id)
            .ok_or_else(|| not_found(format!("offer '{offer_id}' does not exist")))?;
        check_expected(offer.status, expected, "offer", offer_id)?;

        let wanted = self
            .store
            .wanted_items
            .get(&offer.wanted_id)
            .ok_or_else(|| not_found(format!("wanted item '{}' does not exist", offer.wanted_id)))?;
        let wanted_id = wanted.id.clone();

        let from = offer.status.as_str();
        OfferManager::accept(wanted, offer, actor, now)?;
        let snapshot = offer.clone();

        self.emit(
            EntityKind::WantedOffer,
            offer_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );

        if self.policy.offer_acceptance == OfferAcceptancePolicy::CloseSiblings {
            let siblings: Vec<String> = self
                .store
                .wanted_offers
                .values()
                .filter(|o| {
                    o.wanted_id == wanted_id
                        && o.id != offer_id
                        && o.status == WantedOfferStatus::Pending
                })
                .map(|o| o.id.clone())
                .collect();
            let system: UserId = SYSTEM_ACTOR.to_string();
            for sibling_id in siblings {
                let Some(sibling) = self.store.wanted_offers.get_mut(&sibling_id) else {
                    continue;
                };
                if OfferManager::close_superseded(sibling, now) {
                    self.emit(
                        EntityKind::WantedOffer,
                        &sibling_id,
                        Some("pending"),
                        "rejected",
                        &system,
                        now,
                    );
                }
            }
        }

        Ok(snapshot)
    }

    pub fn reject_wanted_offer(
        &mut self,
        offer_id: &str,
        actor: &UserId,
        reason: Option<String>,
        expected: Option<WantedOfferStatus>,
    ) -> EngineResult<WantedOffer> {
        let now = self.clock.now_unix();
        let offer = self
            .store
            .wanted_offers
            .get_mut(offer_id)
            .ok_or_else(|| not_found(format!("offer '{offer_id}' does not exist")))?;
        check_expected(offer.status, expected, "offer", offer_id)?;

        let wanted = self
            .store
            .wanted_items
            .get(&offer.wanted_id)
            .ok_or_else(|| not_found(format!("wanted item '{}' does not exist", offer.wanted_id)))?;

        let from = offer.status.as_str();
        OfferManager::reject(wanted, offer, actor, reason, now)?;
        let snapshot = offer.clone();

        self.emit(
            EntityKind::WantedOffer,
            offer_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn cancel_wanted_offer(
        &mut self,
        offer_id: &str,
        actor: &UserId,
        expected: Option<WantedOfferStatus>,
    ) -> EngineResult<WantedOffer> {
        let now = self.clock.now_unix();
        let offer = self
            .store
            .wanted_offers
            .get_mut(offer_id)
            .ok_or_else(|| not_found(format!("offer '{offer_id}' does not exist")))?;
        check_expected(offer.status, expected, "offer", offer_id)?;

        let from = offer.status.as_str();
        OfferManager::cancel(offer, actor, now)?;
        let snapshot = offer.clone();

        self.emit(
            EntityKind::WantedOffer,
            offer_id,
            Some(from),
            snapshot.status.as_str(),
            actor,
            now,
        );
        Ok(snapshot)
    }

    pub fn wanted_item(&self, wanted_id: &str) -> EngineResult<&WantedItem> {
        self.store
            .wanted_items
            .get(wanted_id)
            .ok_or_else(|| not_found(format!("wanted item '{wanted_id}' does not exist")))
    }

    pub fn wanted_offer(&self, offer_id: &str) -> EngineResult<&WantedOffer> {
        self.store
            .wanted_offers
            .get(offer_id)
            .ok_or_else(|| not_found(format!("offer '{offer_id}' does not exist")))
    }

    // ---- channel acknowledgements ---------------------------------------

    /// Typing and read receipts pass straight through to subscribers.
    pub fn record_ack(&mut self, kind: AckKind, conversation_id: String, actor: &UserId) {
        let ack = ExternalAck {
            kind,
            conversation_id,
            actor: actor.clone(),
            at: self.clock.now_unix(),
        };
        self.emitter.publish_ack(ack);
    }

    fn emit(
        &mut self,
        entity_kind: EntityKind,
        entity_id: &str,
        from_status: Option<&str>,
        to_status: &str,
        actor: &UserId,
        at: UnixSeconds,
    ) {
        self.emitter.emit(LifecycleEvent {
            entity_kind,
            entity_id: entity_id.to_string(),
            from_status: from_status.map(str::to_string),
            to_status: to_status.to_string(),
            actor: actor.clone(),
            at,
        });
    }
}

fn new_entity_id() -> String {
    Uuid::now_v7().to_string()
}

fn check_expected<S>(current: S, expected: Option<S>, entity: &str, id: &str) -> EngineResult<()>
where
    S: PartialEq + Copy + StatusLabel,
{
    if let Some(expected) = expected
        && expected != current
    {
        return Err(stale_state(format!(
            "{entity} '{id}' is {}, caller expected {}",
            current.label(),
            expected.label()
        )));
    }
    Ok(())
}

/// Status enums expose their wire label for error messages and events.
trait StatusLabel {
    fn label(&self) -> &'static str;
}

impl StatusLabel for ClaimStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusLabel for TransactionStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusLabel for LostFoundClaimStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}

impl StatusLabel for WantedOfferStatus {
    fn label(&self) -> &'static str {
        self.as_str()
    }
}
