pub mod extraction;
pub mod messaging;
pub mod observability;
pub mod storage;
