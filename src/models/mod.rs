pub mod brief;
pub mod content;
pub mod history;
pub mod job;
