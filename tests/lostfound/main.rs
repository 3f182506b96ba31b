
use swapyard::{
    lostfound::{
        LostFoundClaim, LostFoundPost, PostStatus, VerificationAnswer, VerificationFlow,
        VerificationQuestion,
    },
    types::UserId,
};

pub fn owner() -> UserId {
    "owner".to_string()
}

pub fn claimant() -> UserId {
    "alice".to_string()
}

pub fn post(id: &str) -> LostFoundPost {
    LostFoundPost {
        id: id.to_string(),
        owner: owner(),
        title: "black umbrella".to_string(),
        status: PostStatus::Open,
        verification_questions: vec![VerificationQuestion {
            question: "what is printed on the handle?".to_string(),
            expected_answer: "a red fox".to_string(),
        }],
        created_at: 0,
    }
}

pub fn answers(text: &str) -> Vec<VerificationAnswer> {
    vec![VerificationAnswer {
        question: "what is printed on the handle?".to_string(),
        answer: text.to_string(),
    }]
}

pub fn submitted_claim(id: &str, post: &LostFoundPost, by: &UserId) -> LostFoundClaim {
    VerificationFlow::submit(id.to_string(), post, by, None, Vec::new(), 100)
        .expect("claim should submit")
}
