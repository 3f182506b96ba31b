use crate::{
    error::{EngineResult, stale_state, terminal_state, unauthorized, unavailable, validation_error},
    lifecycle::{
        transitions::{ensure_from, validate_transition},
        types::{
            AgreementProposal, CounterTerms, PickupDetails, PickupProposal, PickupStatus,
            Transaction, TransactionRequest, TransactionStatus,
        },
    },
    negotiation::{Negotiator, ProposalTerms},
    types::{ItemMode, ShareableItem, TransactionId, UnixSeconds, UserId},
};

/// What a confirmed return settled to; feeds the trust adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub late: bool,
}

/// Drives one transaction through the status graph in `transitions`. Every
/// operation re-checks the current status before mutating and stamps
/// `updated_at` on success.
pub struct TransactionManager;

impl TransactionManager {
    pub fn open(
        id: TransactionId,
        item: &ShareableItem,
        requester: &UserId,
        request: TransactionRequest,
        now: UnixSeconds,
    ) -> EngineResult<Transaction> {
        if requester == &item.owner {
            return Err(validation_error(format!(
                "'{}' cannot request their own item '{}'",
                requester, item.id
            )));
        }
        if !item.available {
            return Err(unavailable(format!(
                "item '{}' is no longer available",
                item.id
            )));
        }

        let terms = ProposalTerms::build(
            item.mode,
            request.price,
            request.rental_days,
            &item.rental_limits,
        )?;

        Ok(Transaction {
            id,
            item_id: item.id.clone(),
            owner: item.owner.clone(),
            requester: requester.clone(),
            status: TransactionStatus::Pending,
            agreed_price: 0,
            agreed_rental_days: None,
            start_date: None,
            end_date: None,
            terms: None,
            pickup: None,
            proposal: Negotiator::open(&terms, requester, request.message, now),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn accept(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(tx, actor, "accept the request")?;
        ensure_from(tx.status, TransactionStatus::Pending)?;
        Self::advance(tx, TransactionStatus::Accepted, item.mode, now)
    }

    pub fn cancel(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        ensure_from(tx.status, TransactionStatus::Pending)?;
        Self::advance(tx, TransactionStatus::Cancelled, item.mode, now)
    }

    pub fn propose_agreement(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        agreement: AgreementProposal,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(tx, actor, "propose the agreement")?;
        ensure_from(tx.status, TransactionStatus::Accepted)?;
        validate_transition(tx.status, TransactionStatus::AgreementProposed, item.mode)?;

        let terms = ProposalTerms::build(
            item.mode,
            agreement.price,
            agreement.rental_days,
            &item.rental_limits,
        )?;
        tx.start_date = agreement.start_date;
        tx.end_date = agreement.end_date;
        tx.terms = agreement.terms;
        Negotiator::counter(&mut tx.proposal, actor, terms, agreement.message, now)?;

        tx.status = TransactionStatus::AgreementProposed;
        tx.updated_at = now;
        Ok(())
    }

    pub fn counter(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        counter: CounterTerms,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        ensure_from(tx.status, TransactionStatus::AgreementProposed)?;
        validate_transition(tx.status, TransactionStatus::AgreementProposed, item.mode)?;

        let terms = ProposalTerms::build(
            item.mode,
            counter.price,
            counter.rental_days,
            &item.rental_limits,
        )?;
        Negotiator::counter(&mut tx.proposal, actor, terms, counter.message, now)?;
        tx.updated_at = now;
        Ok(())
    }

    /// Accept or reject the pending proposal. Acceptance settles the agreed
    /// terms and activates the transaction; rejection reopens negotiation.
    /// Returns whether the transaction activated.
    pub fn respond(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        accept: bool,
        now: UnixSeconds,
    ) -> EngineResult<bool> {
        ensure_party(tx, actor)?;
        ensure_from(tx.status, TransactionStatus::AgreementProposed)?;

        let Some(terms) = Negotiator::respond(&mut tx.proposal, actor, accept, now)? else {
            tx.updated_at = now;
            return Ok(false);
        };

        validate_transition(tx.status, TransactionStatus::Active, item.mode)?;
        tx.agreed_price = if item.mode == ItemMode::Give {
            0
        } else {
            terms.price()
        };
        tx.agreed_rental_days = terms.rental_days();
        tx.status = TransactionStatus::Active;
        tx.updated_at = now;
        Ok(true)
    }

    /// Handover confirmation for sales and giveaways.
    pub fn confirm_handover(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(tx, actor, "confirm the handover")?;
        ensure_from(tx.status, TransactionStatus::Active)?;
        Self::advance(tx, TransactionStatus::Completed, item.mode, now)
    }

    pub fn mark_return(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        ensure_from(tx.status, TransactionStatus::Active)?;
        Self::advance(tx, TransactionStatus::ReturnPending, item.mode, now)
    }

    pub fn confirm_return(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<ReturnOutcome> {
        ensure_owner(tx, actor, "confirm the return")?;
        ensure_from(tx.status, TransactionStatus::ReturnPending)?;
        Self::advance(tx, TransactionStatus::Completed, item.mode, now)?;
        Ok(ReturnOutcome {
            late: tx.end_date.is_some_and(|end| now > end),
        })
    }

    pub fn raise_dispute(
        tx: &mut Transaction,
        item: &ShareableItem,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        Self::advance(tx, TransactionStatus::Disputed, item.mode, now)
    }

    /// The pickup sub-protocol runs alongside the main machine and never
    /// blocks it. Re-proposing replaces the previous details.
    pub fn propose_pickup(
        tx: &mut Transaction,
        actor: &UserId,
        proposal: PickupProposal,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        if tx.status.is_terminal() {
            return Err(terminal_state(format!(
                "transaction is already {}",
                tx.status.as_str()
            )));
        }
        if !matches!(
            tx.status,
            TransactionStatus::Accepted
                | TransactionStatus::AgreementProposed
                | TransactionStatus::Active
        ) {
            return Err(validation_error(format!(
                "pickup cannot be arranged while the transaction is {}",
                tx.status.as_str()
            )));
        }

        tx.pickup = Some(PickupDetails {
            location: proposal.location,
            date: proposal.date,
            time: proposal.time,
            instructions: proposal.instructions,
            status: PickupStatus::Proposed,
            proposed_by: actor.clone(),
        });
        tx.updated_at = now;
        Ok(())
    }

    pub fn confirm_pickup(
        tx: &mut Transaction,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_party(tx, actor)?;
        let Some(pickup) = tx.pickup.as_mut() else {
            return Err(validation_error("no pickup details have been proposed"));
        };
        if pickup.status == PickupStatus::Confirmed {
            return Err(stale_state("pickup is already confirmed"));
        }
        if &pickup.proposed_by == actor {
            return Err(unauthorized(
                "only the counterparty may confirm proposed pickup details",
            ));
        }

        pickup.status = PickupStatus::Confirmed;
        tx.updated_at = now;
        Ok(())
    }

    fn advance(
        tx: &mut Transaction,
        to: TransactionStatus,
        mode: ItemMode,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        validate_transition(tx.status, to, mode)?;
        tx.status = to;
        tx.updated_at = now;
        Ok(())
    }
}

fn ensure_party(tx: &Transaction, actor: &UserId) -> EngineResult<()> {
    if tx.is_party(actor) {
        Ok(())
    } else {
        Err(unauthorized(format!(
            "'{}' is neither owner nor requester on transaction '{}'",
            actor, tx.id
        )))
    }
}

fn ensure_owner(tx: &Transaction, actor: &UserId, action: &str) -> EngineResult<()> {
    ensure_party(tx, actor)?;
    if actor == &tx.owner {
        Ok(())
    } else {
        Err(unauthorized(format!(
            "only the owner may {action} on transaction '{}'",
            tx.id
        )))
    }
}
