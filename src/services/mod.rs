pub mod dispatcher;
pub mod fetcher;
pub mod lister;
pub mod mirror;
pub mod storage;
pub mod worker;
