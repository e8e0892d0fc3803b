//! Internal implementation details.

pub(crate) mod chain;
pub(crate) mod dispose_bag;

pub(crate) use chain::ChainGuard;
pub(crate) use dispose_bag::DisposeBag;
