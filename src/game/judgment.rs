use crate::config::GameConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JudgeGrade {
    Perfect,
    Good,
}

/// The outcome of one judged press, kept around for render feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Judgment {
    pub grade: JudgeGrade,
    /// Signed press-minus-target error; negative means early.
    pub time_error_ms: i64,
    pub lane: usize,
    /// Arrows resolved by this press, >1 for a chord.
    pub group_size: usize,
}

/// Window comparisons are inclusive: a press exactly on the edge counts.
#[inline(always)]
pub fn classify_tap(abs_error_ms: i64, config: &GameConfig) -> Option<JudgeGrade> {
    if abs_error_ms <= config.perfect_window_ms {
        Some(JudgeGrade::Perfect)
    } else if abs_error_ms <= config.good_window_ms {
        Some(JudgeGrade::Good)
    } else {
        None
    }
}

#[inline(always)]
pub fn base_score(grade: JudgeGrade, config: &GameConfig) -> f64 {
    match grade {
        JudgeGrade::Perfect => config.perfect_score,
        JudgeGrade::Good => config.good_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, Some(JudgeGrade::Perfect); "dead on")]
    #[test_case(45, Some(JudgeGrade::Perfect); "perfect edge is inclusive")]
    #[test_case(46, Some(JudgeGrade::Good); "just past perfect")]
    #[test_case(90, Some(JudgeGrade::Good); "good edge is inclusive")]
    #[test_case(91, None; "outside every window")]
    fn default_windows(abs_error_ms: i64, expected: Option<JudgeGrade>) {
        assert_eq!(classify_tap(abs_error_ms, &GameConfig::default()), expected);
    }

    #[test]
    fn base_scores_follow_config() {
        let config = GameConfig::default();
        assert_eq!(base_score(JudgeGrade::Perfect, &config), 100.0);
        assert_eq!(base_score(JudgeGrade::Good, &config), 50.0);
    }
}
