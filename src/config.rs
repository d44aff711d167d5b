// Engine Timing Constants (milliseconds)
pub const PERFECT_WINDOW_MS: i64 = 45;
pub const GOOD_WINDOW_MS: i64 = 90;
pub const SPAWN_AHEAD_MS: i64 = 2000;
pub const COUNTDOWN_MS: i64 = 3000;
pub const DESPAWN_AFTER_MS: i64 = 1000;

// Scoring Constants
pub const PERFECT_SCORE: f64 = 100.0;
pub const GOOD_SCORE: f64 = 50.0;
pub const COMBO_MULTIPLIER: f64 = 0.1;

// Lane Constants
pub const DEFAULT_LANE_KEYS: [char; 4] = ['h', 'j', 'k', 'l'];

/// Immutable engine configuration, passed in at construction. The lane
/// count is the length of the lane-key table.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub perfect_window_ms: i64,
    pub good_window_ms: i64,
    pub spawn_ahead_ms: i64,
    pub countdown_ms: i64,
    pub despawn_after_ms: i64,
    pub perfect_score: f64,
    pub good_score: f64,
    pub combo_multiplier: f64,
    pub lane_keys: Vec<char>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            perfect_window_ms: PERFECT_WINDOW_MS,
            good_window_ms: GOOD_WINDOW_MS,
            spawn_ahead_ms: SPAWN_AHEAD_MS,
            countdown_ms: COUNTDOWN_MS,
            despawn_after_ms: DESPAWN_AFTER_MS,
            perfect_score: PERFECT_SCORE,
            good_score: GOOD_SCORE,
            combo_multiplier: COMBO_MULTIPLIER,
            lane_keys: DEFAULT_LANE_KEYS.to_vec(),
        }
    }
}

impl GameConfig {
    #[inline(always)]
    pub fn lane_count(&self) -> usize {
        self.lane_keys.len()
    }

    #[inline(always)]
    pub fn lane_for_key(&self, key: char) -> Option<usize> {
        self.lane_keys.iter().position(|&k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lane_table_maps_home_row() {
        let config = GameConfig::default();
        assert_eq!(config.lane_count(), 4);
        assert_eq!(config.lane_for_key('h'), Some(0));
        assert_eq!(config.lane_for_key('l'), Some(3));
        assert_eq!(config.lane_for_key('x'), None);
    }
}
