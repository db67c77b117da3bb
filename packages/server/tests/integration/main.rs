
mod bathroom_logs;
mod health;
mod stats;
