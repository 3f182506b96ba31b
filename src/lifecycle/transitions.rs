use crate::{
    error::{EngineResult, stale_state, terminal_state, validation_error},
    lifecycle::types::TransactionStatus,
    types::ItemMode,
};

/// The single allowed-transition table for transactions. Anything not
/// listed here is rejected, terminal sources first.
pub fn validate_transition(
    from: TransactionStatus,
    to: TransactionStatus,
    mode: ItemMode,
) -> EngineResult<()> {
    use TransactionStatus::*;

    if from.is_terminal() {
        return Err(terminal_state(format!(
            "transaction is already {}",
            from.as_str()
        )));
    }

    let allowed = match (from, to) {
        (Pending, Accepted) | (Pending, Cancelled) => true,
        (Accepted, AgreementProposed) => true,
        (AgreementProposed, Active) | (AgreementProposed, AgreementProposed) => true,
        (Active, ReturnPending) => {
            if mode != ItemMode::Rent {
                return Err(validation_error(
                    "the return flow applies to rentals only",
                ));
            }
            true
        }
        (Active, Completed) => {
            if mode == ItemMode::Rent {
                return Err(validation_error(
                    "rentals complete through return confirmation",
                ));
            }
            true
        }
        (ReturnPending, Completed) => true,
        (Active, Disputed) | (ReturnPending, Disputed) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(validation_error(format!(
            "transition {} -> {} is not permitted",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// Optimistic-concurrency guard: every operation names the status it must
/// start from and fails with `StaleState` when another writer got there
/// first, or `TerminalState` when nothing can follow.
pub fn ensure_from(current: TransactionStatus, required: TransactionStatus) -> EngineResult<()> {
    if current == required {
        return Ok(());
    }
    if current.is_terminal() {
        return Err(terminal_state(format!(
            "transaction is already {}",
            current.as_str()
        )));
    }
    Err(stale_state(format!(
        "transaction is {}, expected {}",
        current.as_str(),
        required.as_str()
    )))
}
