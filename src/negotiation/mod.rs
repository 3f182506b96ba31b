pub mod protocol;
pub mod types;

pub use protocol::Negotiator;
pub use types::{
    CounterOffer, HistoryEntry, NegotiableProposal, ProposalKind, ProposalStatus, ProposalTerms,
};
