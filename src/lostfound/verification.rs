use crate::{
    error::{EngineResult, stale_state, terminal_state, unauthorized, unavailable, validation_error},
    lostfound::types::{
        LostFoundClaim, LostFoundClaimStatus, LostFoundPost, MeetupDetails, PostStatus,
        VerificationAnswer,
    },
    types::{LostFoundClaimId, UnixSeconds, UserId},
};

/// The verification flow for one lost-and-found claim. The engine never
/// matches answers against expected answers; approval is an owner
/// decision, this module only records and gates.
pub struct VerificationFlow;

impl VerificationFlow {
    pub fn submit(
        id: LostFoundClaimId,
        post: &LostFoundPost,
        claimant: &UserId,
        message: Option<String>,
        answers: Vec<VerificationAnswer>,
        now: UnixSeconds,
    ) -> EngineResult<LostFoundClaim> {
        if claimant == &post.owner {
            return Err(validation_error(format!(
                "'{}' cannot claim their own post '{}'",
                claimant, post.id
            )));
        }
        if post.status == PostStatus::Resolved {
            return Err(unavailable(format!(
                "post '{}' is already resolved",
                post.id
            )));
        }

        Ok(LostFoundClaim {
            id,
            post_id: post.id.clone(),
            claimant: claimant.clone(),
            status: LostFoundClaimStatus::Submitted,
            message,
            verification_answers: answers,
            meetup: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn start_verification(
        post: &LostFoundPost,
        claim: &mut LostFoundClaim,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(post, actor)?;
        ensure_from(claim, LostFoundClaimStatus::Submitted)?;
        advance(claim, LostFoundClaimStatus::VerificationPending, now);
        Ok(())
    }

    /// Re-submission replaces the recorded answer set; the owner always
    /// reviews the latest one.
    pub fn record_answers(
        claim: &mut LostFoundClaim,
        actor: &UserId,
        answers: Vec<VerificationAnswer>,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        if actor != &claim.claimant {
            return Err(unauthorized(format!(
                "only the claimant may answer verification questions on claim '{}'",
                claim.id
            )));
        }
        ensure_from(claim, LostFoundClaimStatus::VerificationPending)?;

        claim.verification_answers = answers;
        claim.updated_at = now;
        Ok(())
    }

    pub fn approve(
        post: &LostFoundPost,
        claim: &mut LostFoundClaim,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(post, actor)?;
        ensure_from(claim, LostFoundClaimStatus::VerificationPending)?;
        advance(claim, LostFoundClaimStatus::Verified, now);
        Ok(())
    }

    pub fn reject(
        post: &LostFoundPost,
        claim: &mut LostFoundClaim,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(post, actor)?;
        if claim.status.is_terminal() {
            return Err(terminal_state(format!(
                "claim '{}' is already {}",
                claim.id,
                claim.status.as_str()
            )));
        }
        if !matches!(
            claim.status,
            LostFoundClaimStatus::Submitted | LostFoundClaimStatus::VerificationPending
        ) {
            return Err(stale_state(format!(
                "claim '{}' is {}, rejection applies before verification settles",
                claim.id,
                claim.status.as_str()
            )));
        }
        advance(claim, LostFoundClaimStatus::Rejected, now);
        Ok(())
    }

    pub fn propose_meetup(
        post: &LostFoundPost,
        claim: &mut LostFoundClaim,
        actor: &UserId,
        meetup: MeetupDetails,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        ensure_owner(post, actor)?;
        ensure_from(claim, LostFoundClaimStatus::Verified)?;
        claim.meetup = Some(meetup);
        advance(claim, LostFoundClaimStatus::MeetupProposed, now);
        Ok(())
    }

    pub fn accept_meetup(
        claim: &mut LostFoundClaim,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        if actor != &claim.claimant {
            return Err(unauthorized(format!(
                "only the claimant may accept the meetup on claim '{}'",
                claim.id
            )));
        }
        ensure_from(claim, LostFoundClaimStatus::MeetupProposed)?;
        advance(claim, LostFoundClaimStatus::MeetupAccepted, now);
        Ok(())
    }

    /// Either side marks the handover complete. The caller resolves the
    /// post and closes sibling claims in the same operation.
    pub fn resolve(
        post: &mut LostFoundPost,
        claim: &mut LostFoundClaim,
        actor: &UserId,
        now: UnixSeconds,
    ) -> EngineResult<()> {
        if actor != &claim.claimant && actor != &post.owner {
            return Err(unauthorized(format!(
                "'{}' is neither owner nor claimant for claim '{}'",
                actor, claim.id
            )));
        }
        ensure_from(claim, LostFoundClaimStatus::MeetupAccepted)?;
        advance(claim, LostFoundClaimStatus::Resolved, now);
        post.status = PostStatus::Resolved;
        Ok(())
    }

    /// Administrative close once a sibling claim resolved the post. No
    /// authorization: the engine invokes this as part of resolution.
    pub fn close_superseded(claim: &mut LostFoundClaim, now: UnixSeconds) -> bool {
        if claim.status.is_terminal() {
            return false;
        }
        advance(claim, LostFoundClaimStatus::Rejected, now);
        true
    }
}

fn advance(claim: &mut LostFoundClaim, to: LostFoundClaimStatus, now: UnixSeconds) {
    claim.status = to;
    claim.updated_at = now;
}

fn ensure_from(claim: &LostFoundClaim, required: LostFoundClaimStatus) -> EngineResult<()> {
    if claim.status == required {
        return Ok(());
    }
    if claim.status.is_terminal() {
        return Err(terminal_state(format!(
            "claim '{}' is already {}",
            claim.id,
            claim.status.as_str()
        )));
    }
    Err(stale_state(format!(
        "claim '{}' is {}, expected {}",
        claim.id,
        claim.status.as_str(),
        required.as_str()
    )))
}

fn ensure_owner(post: &LostFoundPost, actor: &UserId) -> EngineResult<()> {
    if actor == &post.owner {
        Ok(())
    } else {
        Err(unauthorized(format!(
            "only the owner of post '{}' may perform this action",
            post.id
        )))
    }
}
