pub mod bathroom_log;
pub mod dog;
pub mod feeding;
