use crate::{
    error::{EngineResult, unauthorized, validation_error},
    negotiation::types::{
        CounterOffer, HistoryEntry, NegotiableProposal, ProposalKind, ProposalStatus,
        ProposalTerms,
    },
    types::{UnixSeconds, UserId},
};

/// The counter-offer exchange, independent of the entity embedding it.
///
/// The open proposal lives in `counter_offer`; it moves into `history`
/// exactly once, when it is accepted, rejected, or superseded by the
/// counterparty's next counter. The initial terms are archived at open
/// time, so history length equals the number of settled proposals plus one.
pub struct Negotiator;

impl Negotiator {
    pub fn open(
        terms: &ProposalTerms,
        by: &UserId,
        message: Option<String>,
        now: UnixSeconds,
    ) -> NegotiableProposal {
        NegotiableProposal {
            proposed_price: terms.price(),
            proposed_rental_days: terms.rental_days(),
            message: message.clone(),
            counter_offer: None,
            history: vec![HistoryEntry {
                by: by.clone(),
                kind: ProposalKind::Initial,
                price: terms.price(),
                rental_days: terms.rental_days(),
                message,
                status: ProposalStatus::Pending,
                created_at: now,
            }],
        }
    }

    /// Replaces the open proposal. Superseding a pending counter is only
    /// allowed for its counterparty and archives the superseded entry as
    /// rejected.
    pub fn counter(
        proposal: &mut NegotiableProposal,
        actor: &UserId,
        terms: ProposalTerms,
        message: Option<String>,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        if let Some(pending) = proposal.counter_offer.take() {
            if &pending.by == actor {
                proposal.counter_offer = Some(pending);
                return Err(unauthorized(
                    "only the counterparty to the last proposal may counter it",
                ));
            }
            proposal
                .history
                .push(archive(&pending, ProposalStatus::Rejected, now));
        }

        proposal.counter_offer = Some(CounterOffer {
            by: actor.clone(),
            terms,
            message,
            status: ProposalStatus::Pending,
            created_at: now,
        });
        Ok(())
    }

    /// Accepts or rejects the open proposal. Returns the agreed terms on
    /// acceptance, `None` on rejection (negotiation stays open).
    pub fn respond(
        proposal: &mut NegotiableProposal,
        actor: &UserId,
        accept: bool,
        now: UnixSeconds,
    ) -> EngineResult<Option<ProposalTerms>> {
        let Some(pending) = proposal.counter_offer.take() else {
            return Err(validation_error("no pending proposal to respond to"));
        };
        if &pending.by == actor {
            proposal.counter_offer = Some(pending);
            return Err(unauthorized(
                "only the counterparty to the last proposal may respond to it",
            ));
        }

        let status = if accept {
            ProposalStatus::Accepted
        } else {
            ProposalStatus::Rejected
        };
        proposal.history.push(archive(&pending, status, now));

        Ok(accept.then_some(pending.terms))
    }
}

fn archive(pending: &CounterOffer, status: ProposalStatus, now: UnixSeconds) -> HistoryEntry {
    HistoryEntry {
        by: pending.by.clone(),
        kind: ProposalKind::Counter,
        price: pending.terms.price(),
        rental_days: pending.terms.rental_days(),
        message: pending.message.clone(),
        status,
        created_at: now,
    }
}
