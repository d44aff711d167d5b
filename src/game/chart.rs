use crate::config::GameConfig;
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// On-disk `.purin` song file, parsed as-is before any timing conversion.
#[derive(Deserialize, Debug, Clone)]
pub struct SongFile {
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    pub difficulty: String,
    pub arrows: Vec<SongArrow>,
}

/// One chart entry. `key` may hold several characters for a chord
/// (e.g. "hj"); every character shares the entry's group.
#[derive(Deserialize, Debug, Clone)]
pub struct SongArrow {
    pub beat: f64,
    pub key: String,
}

#[derive(Debug)]
pub enum ChartError {
    /// BPM is zero, negative, or not finite.
    InvalidBpm(f64),
    /// A chart key has no lane in the configured lane-key table.
    UnknownLaneKey(char),
    /// A beat is negative or not finite, so events cannot be ordered.
    UnorderableBeat(f64),
    /// The file is not valid chart JSON.
    Syntax(String),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::InvalidBpm(bpm) => write!(f, "invalid bpm: {bpm}"),
            ChartError::UnknownLaneKey(key) => write!(f, "chart key '{key}' maps to no lane"),
            ChartError::UnorderableBeat(beat) => write!(f, "unorderable beat: {beat}"),
            ChartError::Syntax(msg) => write!(f, "malformed chart file: {msg}"),
        }
    }
}

impl std::error::Error for ChartError {}

/// One scheduled note: a lane plus an absolute offset from song start.
/// Events sharing a beat share a `group_id` and are judged as a chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    pub lane: usize,
    pub time_offset_ms: i64,
    pub group_id: u32,
}

/// Immutable note data for one song, sorted ascending by offset. The
/// spawn scheduler relies on that ordering.
#[derive(Clone, Debug, Default)]
pub struct Chart {
    pub bpm: f64,
    pub difficulty: String,
    pub events: Vec<NoteEvent>,
    pub duration_ms: i64,
}

impl Chart {
    pub fn from_json(text: &str, config: &GameConfig) -> Result<Self, ChartError> {
        let song: SongFile =
            serde_json::from_str(text).map_err(|e| ChartError::Syntax(e.to_string()))?;
        Self::from_song(&song, config)
    }

    /// Converts beat-indexed source data into millisecond-scheduled
    /// events. Rejects anything the engine could not judge safely.
    pub fn from_song(song: &SongFile, config: &GameConfig) -> Result<Self, ChartError> {
        if !song.bpm.is_finite() || song.bpm <= 0.0 {
            return Err(ChartError::InvalidBpm(song.bpm));
        }
        let ms_per_beat = 60_000.0 / song.bpm;

        let mut events = Vec::new();
        let mut group_ids: HashMap<i64, u32> = HashMap::new();
        for arrow in &song.arrows {
            if !arrow.beat.is_finite() || arrow.beat < 0.0 {
                return Err(ChartError::UnorderableBeat(arrow.beat));
            }
            let time_offset_ms = (arrow.beat * ms_per_beat).round() as i64;
            let next_id = group_ids.len() as u32;
            let group_id = *group_ids.entry(time_offset_ms).or_insert(next_id);
            for key in arrow.key.chars() {
                let lane = config
                    .lane_for_key(key)
                    .ok_or(ChartError::UnknownLaneKey(key))?;
                events.push(NoteEvent {
                    lane,
                    time_offset_ms,
                    group_id,
                });
            }
        }

        // Stable, so chord members keep their entry order within a beat.
        events.sort_by_key(|e| e.time_offset_ms);
        let duration_ms = events.last().map_or(0, |e| e.time_offset_ms);

        info!(
            "CHART LOADED: \"{}\" by {}, {} bpm, {} events over {}ms",
            song.title,
            song.artist,
            song.bpm,
            events.len(),
            duration_ms
        );

        Ok(Self {
            bpm: song.bpm,
            difficulty: song.difficulty.clone(),
            events,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn song(bpm: f64, arrows: Vec<(f64, &str)>) -> SongFile {
        SongFile {
            title: "test".into(),
            artist: "test".into(),
            bpm,
            difficulty: "easy".into(),
            arrows: arrows
                .into_iter()
                .map(|(beat, key)| SongArrow {
                    beat,
                    key: key.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn beats_convert_to_milliseconds() {
        let chart = Chart::from_song(
            &song(120.0, vec![(0.0, "h"), (1.0, "j"), (2.5, "k")]),
            &GameConfig::default(),
        )
        .unwrap();
        let offsets: Vec<i64> = chart.events.iter().map(|e| e.time_offset_ms).collect();
        assert_eq!(offsets, vec![0, 500, 1250]);
        assert_eq!(chart.duration_ms, 1250);
    }

    #[test]
    fn chord_entry_shares_one_group_across_lanes() {
        let chart = Chart::from_song(
            &song(120.0, vec![(0.0, "h"), (1.0, "hjk")]),
            &GameConfig::default(),
        )
        .unwrap();
        let chord: Vec<&NoteEvent> = chart
            .events
            .iter()
            .filter(|e| e.time_offset_ms == 500)
            .collect();
        assert_eq!(chord.len(), 3);
        assert!(chord.iter().all(|e| e.group_id == chord[0].group_id));
        assert_ne!(chart.events[0].group_id, chord[0].group_id);
        assert_eq!(
            chord.iter().map(|e| e.lane).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn separate_entries_on_one_beat_share_a_group() {
        let chart = Chart::from_song(
            &song(120.0, vec![(2.0, "h"), (2.0, "l")]),
            &GameConfig::default(),
        )
        .unwrap();
        assert_eq!(chart.events[0].group_id, chart.events[1].group_id);
    }

    #[test]
    fn events_sort_ascending_regardless_of_entry_order() {
        let chart = Chart::from_song(
            &song(120.0, vec![(3.0, "h"), (1.0, "j"), (2.0, "k")]),
            &GameConfig::default(),
        )
        .unwrap();
        let offsets: Vec<i64> = chart.events.iter().map(|e| e.time_offset_ms).collect();
        assert_eq!(offsets, vec![500, 1000, 1500]);
    }

    #[test]
    fn unknown_lane_key_is_rejected() {
        let err = Chart::from_song(&song(120.0, vec![(0.0, "hz")]), &GameConfig::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::UnknownLaneKey('z')));
    }

    #[test]
    fn non_positive_or_non_finite_bpm_is_rejected() {
        for bpm in [0.0, -120.0, f64::NAN, f64::INFINITY] {
            let err = Chart::from_song(&song(bpm, vec![(0.0, "h")]), &GameConfig::default())
                .unwrap_err();
            assert!(matches!(err, ChartError::InvalidBpm(_)), "bpm {bpm}");
        }
    }

    #[test]
    fn unorderable_beats_are_rejected() {
        for beat in [-1.0, f64::NAN] {
            let err = Chart::from_song(&song(120.0, vec![(beat, "h")]), &GameConfig::default())
                .unwrap_err();
            assert!(matches!(err, ChartError::UnorderableBeat(_)));
        }
    }

    #[test]
    fn from_json_surfaces_syntax_errors() {
        let err = Chart::from_json("{ not json", &GameConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::Syntax(_)));
    }
}
