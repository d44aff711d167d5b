use crate::config::GameConfig;

/// A single key transition, queued by the host and drained by the engine
/// once per tick in arrival order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEdge {
    pub lane: usize,
    pub pressed: bool,
    /// Clock time at which the edge arrived, not at which it is drained.
    pub timestamp_ms: i64,
}

/// Maps a pressed character to a lane via the configured lane-key table.
/// Keys outside the table are not gameplay input.
#[inline(always)]
pub fn lane_from_key(config: &GameConfig, key: char) -> Option<usize> {
    config.lane_for_key(key)
}
