// Library surface for headless/integration tests and embedding frontends.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod answers;
pub mod app_dirs;
pub mod config;
pub mod feedback;
pub mod frame;
pub mod leaderboard;
pub mod manifest;
pub mod player;
pub mod replay;
pub mod runtime;
pub mod scoring;
pub mod session_log;

/// Runtime tick granularity. The play clock and feedback timing both run on
/// multiples of this.
pub const TICK_RATE_MS: u64 = 100;
