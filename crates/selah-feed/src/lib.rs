pub mod actions;
pub mod aggregate;
pub mod backend;
pub mod count;
pub mod error;
pub mod identity;
pub mod policy;

#[cfg(test)]
mod testing;

pub use aggregate::{EmptyReason, FeedOutcome, FeedRequest};
pub use backend::{FeedBackend, PostQuery, SessionSource};
pub use count::count_by_key;
pub use error::FeedError;
pub use identity::merge_identity;
pub use policy::PagePolicy;

/// Feed operations bound to one backend and pagination policy.
pub struct FeedService<B> {
    backend: B,
    policy: PagePolicy,
}

impl<B: FeedBackend> FeedService<B> {
    pub fn new(backend: B, policy: PagePolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
