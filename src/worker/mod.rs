pub mod reaper;
pub mod worker;
