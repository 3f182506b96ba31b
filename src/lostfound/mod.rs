pub mod types;
pub mod verification;

pub use types::{
    LostFoundClaim, LostFoundClaimStatus, LostFoundPost, MeetupDetails, NewLostFoundPost,
    PostStatus, VerificationAnswer, VerificationQuestion,
};
pub use verification::VerificationFlow;
