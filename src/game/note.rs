#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrowStatus {
    Pending,
    Hit,
    Missed,
}

/// A live, in-flight note. `target_time_ms` is absolute clock time; the
/// pause controller shifts it on resume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrowState {
    pub lane: usize,
    pub target_time_ms: i64,
    pub group_id: u32,
    pub status: ArrowStatus,
}

/// Arena of live arrows in spawn order (which is chart order). Mutation
/// is replace-in-place by index; eviction happens once per tick, so
/// indices stay valid within a tick.
#[derive(Clone, Debug, Default)]
pub struct ArrowStore {
    arrows: Vec<ArrowState>,
}

impl ArrowStore {
    #[inline(always)]
    pub fn push(&mut self, arrow: ArrowState) {
        self.arrows.push(arrow);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &ArrowState> {
        self.arrows.iter()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&ArrowState> {
        self.arrows.get(index)
    }

    pub fn clear(&mut self) {
        self.arrows.clear();
    }

    /// Transitions every pending member of a group, returning how many
    /// arrows moved. Hit and missed arrows never change status again.
    pub fn mark_group(&mut self, group_id: u32, status: ArrowStatus) -> usize {
        let mut moved = 0;
        for arrow in &mut self.arrows {
            if arrow.group_id == group_id && arrow.status == ArrowStatus::Pending {
                arrow.status = status;
                moved += 1;
            }
        }
        moved
    }

    /// Shifts every live target forward; relative offsets are untouched.
    pub fn shift_timeline(&mut self, delta_ms: i64) {
        for arrow in &mut self.arrows {
            arrow.target_time_ms += delta_ms;
        }
    }

    pub fn retain(&mut self, keep: impl FnMut(&ArrowState) -> bool) {
        self.arrows.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow(lane: usize, target: i64, group: u32, status: ArrowStatus) -> ArrowState {
        ArrowState {
            lane,
            target_time_ms: target,
            group_id: group,
            status,
        }
    }

    #[test]
    fn mark_group_only_touches_pending_members() {
        let mut store = ArrowStore::default();
        store.push(arrow(0, 1000, 7, ArrowStatus::Pending));
        store.push(arrow(1, 1000, 7, ArrowStatus::Hit));
        store.push(arrow(2, 1000, 7, ArrowStatus::Pending));
        store.push(arrow(3, 1000, 8, ArrowStatus::Pending));

        let moved = store.mark_group(7, ArrowStatus::Missed);
        assert_eq!(moved, 2);
        let statuses: Vec<ArrowStatus> = store.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                ArrowStatus::Missed,
                ArrowStatus::Hit,
                ArrowStatus::Missed,
                ArrowStatus::Pending,
            ]
        );
    }

    #[test]
    fn shift_timeline_preserves_relative_offsets() {
        let mut store = ArrowStore::default();
        store.push(arrow(0, 1000, 0, ArrowStatus::Pending));
        store.push(arrow(1, 1500, 1, ArrowStatus::Pending));
        store.shift_timeline(250);
        let targets: Vec<i64> = store.iter().map(|a| a.target_time_ms).collect();
        assert_eq!(targets, vec![1250, 1750]);
    }
}
