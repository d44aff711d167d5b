use crate::config::GameConfig;
use crate::game::judgment::{self, JudgeGrade};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JudgeCounts {
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
}

/// Pure accumulator over judgement outcomes. Score never decreases;
/// combo resets to zero on any miss.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreState {
    pub score: f64,
    pub combo: u32,
    pub counts: JudgeCounts,
}

/// Applies one judged press. A chord counts as one press for combo and
/// count purposes but is scored per resolved arrow. Returns the delta.
pub fn apply_hit(
    score: &mut ScoreState,
    grade: JudgeGrade,
    group_size: usize,
    config: &GameConfig,
) -> f64 {
    let base = judgment::base_score(grade, config);
    let delta = base * group_size as f64 * (1.0 + score.combo as f64 * config.combo_multiplier);
    score.score += delta;
    score.combo += 1;
    match grade {
        JudgeGrade::Perfect => score.counts.perfect += 1,
        JudgeGrade::Good => score.counts.good += 1,
    }
    delta
}

/// Applies one missed group: the streak breaks, the score stands.
pub fn apply_miss(score: &mut ScoreState) {
    score.counts.miss += 1;
    score.combo = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_perfect_from_zero_combo() {
        let config = GameConfig::default();
        let mut score = ScoreState::default();
        let delta = apply_hit(&mut score, JudgeGrade::Perfect, 1, &config);
        assert_eq!(delta, 100.0);
        assert_eq!(
            score,
            ScoreState {
                score: 100.0,
                combo: 1,
                counts: JudgeCounts {
                    perfect: 1,
                    good: 0,
                    miss: 0
                },
            }
        );
    }

    #[test]
    fn chord_scores_per_arrow_but_combos_per_press() {
        let config = GameConfig::default();
        let mut score = ScoreState::default();
        let delta = apply_hit(&mut score, JudgeGrade::Perfect, 3, &config);
        assert_eq!(delta, 300.0);
        assert_eq!(score.combo, 1);
        assert_eq!(score.counts.perfect, 1);
    }

    #[test]
    fn combo_multiplier_scales_later_hits() {
        let config = GameConfig::default();
        let mut score = ScoreState::default();
        apply_hit(&mut score, JudgeGrade::Perfect, 1, &config);
        let delta = apply_hit(&mut score, JudgeGrade::Good, 2, &config);
        // 50 * 2 * (1 + 1 * 0.1)
        assert_eq!(delta, 110.0);
        assert_eq!(score.score, 210.0);
        assert_eq!(score.combo, 2);
    }

    #[test]
    fn miss_breaks_combo_without_touching_score() {
        let config = GameConfig::default();
        let mut score = ScoreState::default();
        apply_hit(&mut score, JudgeGrade::Perfect, 1, &config);
        apply_miss(&mut score);
        assert_eq!(score.score, 100.0);
        assert_eq!(score.combo, 0);
        assert_eq!(score.counts.miss, 1);
    }
}
