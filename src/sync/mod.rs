pub mod feed;
pub mod timer;
