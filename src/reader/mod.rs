pub mod block;
pub mod database;
pub mod fetcher;
pub mod flatten;
pub mod page_id;
pub mod title;
