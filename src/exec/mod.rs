pub mod argv;
pub mod launcher;
pub mod pipeline;
pub mod signals;
pub mod terminal;
