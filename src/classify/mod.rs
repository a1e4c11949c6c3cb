mod backend;
mod backends;
mod vote;

pub use backend::ColorClassifier;
pub use backends::StubClassifier;
#[cfg(feature = "backend-tract")]
pub use backends::TractClassifier;
pub use vote::{fuse_votes, majority, vote, VOTE_CONFIDENCE_THRESHOLD};
