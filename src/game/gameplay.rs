use crate::config::GameConfig;
use crate::core::input::InputEdge;
use crate::core::network::{ClientMessage, Roster, ServerMessage};
use crate::game::chart::Chart;
use crate::game::judgment::{self, JudgeGrade, Judgment};
use crate::game::note::{ArrowState, ArrowStatus, ArrowStore};
use crate::game::scoring::{self, ScoreState};
use log::{debug, info, warn};
use std::collections::VecDeque;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Countdown,
    Playing,
    Paused,
    Finished,
}

/// Per-arrow view handed to the rendering collaborator. `progress` is the
/// fraction of the spawn-ahead fall time already elapsed: 0.0 at spawn,
/// 1.0 at the receptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowSnapshot {
    pub lane: usize,
    pub progress: f32,
    pub status: ArrowStatus,
}

#[derive(Clone, Debug)]
pub struct TickOutput {
    pub phase: GamePhase,
    pub arrows: Vec<ArrowSnapshot>,
    pub score: ScoreState,
    pub last_judgment: Option<Judgment>,
}

pub struct State {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub chart: Option<Chart>,
    /// Absolute clock time of chart beat zero. Shifted on resume.
    pub song_start_ms: i64,
    /// Index of the next unspawned chart event. Never decreases.
    pub spawn_cursor: usize,
    pub arrows: ArrowStore,
    pub score: ScoreState,
    pub paused_at_ms: Option<i64>,
    pub last_tick_ms: i64,
    pub pending_edges: VecDeque<InputEdge>,
    pub held_lanes: Vec<bool>,
    pub last_judgment: Option<Judgment>,
    pub networked: bool,
    pub roster: Roster,
    pub outgoing: Vec<ClientMessage>,
}

pub fn init(config: GameConfig) -> State {
    let lane_count = config.lane_count();
    State {
        config,
        phase: GamePhase::Idle,
        chart: None,
        song_start_ms: 0,
        spawn_cursor: 0,
        arrows: ArrowStore::default(),
        score: ScoreState::default(),
        paused_at_ms: None,
        last_tick_ms: i64::MIN,
        pending_edges: VecDeque::new(),
        held_lanes: vec![false; lane_count],
        last_judgment: None,
        networked: false,
        roster: Roster::default(),
        outgoing: Vec::new(),
    }
}

/// Arms a chart for play. The song's beat zero lands `countdown_ms` after
/// `now_ms`, giving the scheduler a grace period to pre-spawn the opening
/// arrows.
pub fn start_song(state: &mut State, chart: Chart, now_ms: i64) {
    if state.phase != GamePhase::Idle {
        warn!("START IGNORED: phase {:?}", state.phase);
        return;
    }
    state.score = ScoreState::default();
    state.arrows.clear();
    state.spawn_cursor = 0;
    state.paused_at_ms = None;
    state.last_judgment = None;
    state.pending_edges.clear();
    state.song_start_ms = now_ms + state.config.countdown_ms;
    info!(
        "SONG ARMED: {} events, zero at {}ms",
        chart.events.len(),
        state.song_start_ms
    );
    state.chart = Some(chart);
    state.phase = GamePhase::Countdown;
    spawn_due_arrows(state, now_ms);
}

/// Clears all live state back to Idle. Roster and networked mode persist
/// across songs.
pub fn reset(state: &mut State) {
    state.phase = GamePhase::Idle;
    state.chart = None;
    state.song_start_ms = 0;
    state.spawn_cursor = 0;
    state.arrows.clear();
    state.score = ScoreState::default();
    state.paused_at_ms = None;
    state.last_judgment = None;
    state.pending_edges.clear();
    state.held_lanes.fill(false);
}

pub fn queue_input_edge(state: &mut State, lane: usize, pressed: bool, timestamp_ms: i64) {
    state.pending_edges.push_back(InputEdge {
        lane,
        pressed,
        timestamp_ms,
    });
}

/// Character-level entry point for keyboard hosts. Keys outside the lane
/// table are not gameplay input and are dropped here.
pub fn queue_key_edge(state: &mut State, key: char, pressed: bool, timestamp_ms: i64) {
    if let Some(lane) = state.config.lane_for_key(key) {
        queue_input_edge(state, lane, pressed, timestamp_ms);
    }
}

/// Freezes the song timeline. Valid only while Playing; anything else is
/// a logged no-op.
pub fn pause(state: &mut State, now_ms: i64) {
    if state.phase != GamePhase::Playing {
        warn!("PAUSE IGNORED: phase {:?}", state.phase);
        return;
    }
    let now_ms = now_ms.max(state.last_tick_ms);
    state.paused_at_ms = Some(now_ms);
    state.phase = GamePhase::Paused;
    state.pending_edges.clear();
    info!("PAUSED at {now_ms}ms");
}

/// Unfreezes the timeline, shifting beat zero and every live target
/// forward by the pause duration so all judgement windows stay intact.
pub fn resume(state: &mut State, now_ms: i64) {
    if state.phase != GamePhase::Paused {
        warn!("RESUME IGNORED: phase {:?}", state.phase);
        return;
    }
    let Some(paused_at_ms) = state.paused_at_ms.take() else {
        state.phase = GamePhase::Playing;
        return;
    };
    let delta = (now_ms - paused_at_ms).max(0);
    state.song_start_ms += delta;
    state.arrows.shift_timeline(delta);
    state.phase = GamePhase::Playing;
    info!("RESUMED: timeline shifted {delta}ms");
}

pub fn set_networked(state: &mut State, on: bool) {
    state.networked = on;
}

pub fn apply_server_message(state: &mut State, message: &ServerMessage) {
    state.roster.apply(message);
}

/// Drains score updates queued for the multiplayer transport.
pub fn take_outgoing(state: &mut State) -> Vec<ClientMessage> {
    std::mem::take(&mut state.outgoing)
}

/// One frame of engine work: spawn due arrows, judge buffered presses in
/// arrival order, sweep expired groups, evict spent arrows, then report a
/// render/score snapshot. The host calls this once per frame with clock
/// time; a regressed clock is clamped to the previous tick.
pub fn tick(state: &mut State, now_ms: i64) -> TickOutput {
    let now_ms = clamp_tick_time(state, now_ms);

    match state.phase {
        GamePhase::Idle | GamePhase::Finished => {
            state.pending_edges.clear();
            return snapshot(state, now_ms);
        }
        GamePhase::Paused => {
            // Buffered edges would judge against a timeline that shifts
            // on resume; the frozen snapshot uses the pause instant.
            state.pending_edges.clear();
            let frozen_ms = state.paused_at_ms.unwrap_or(now_ms);
            return snapshot(state, frozen_ms);
        }
        GamePhase::Countdown => {
            if now_ms >= state.song_start_ms {
                state.phase = GamePhase::Playing;
                info!("SONG RUNNING: zero at {}ms", state.song_start_ms);
            }
        }
        GamePhase::Playing => {}
    }

    spawn_due_arrows(state, now_ms);
    drain_input_edges(state, now_ms);
    sweep_missed_groups(state, now_ms);
    evict_spent_arrows(state, now_ms);
    check_song_finished(state, now_ms);
    snapshot(state, now_ms)
}

fn clamp_tick_time(state: &mut State, now_ms: i64) -> i64 {
    if now_ms < state.last_tick_ms {
        warn!(
            "STALE TICK: clock regressed {}ms, clamping",
            state.last_tick_ms - now_ms
        );
        return state.last_tick_ms;
    }
    state.last_tick_ms = now_ms;
    now_ms
}

/// Materializes every chart event inside the spawn-ahead horizon, in
/// chart order. Chord members share one offset, so a whole chord always
/// lands within a single call.
fn spawn_due_arrows(state: &mut State, now_ms: i64) {
    let Some(chart) = state.chart.as_ref() else {
        return;
    };
    let horizon = now_ms - state.song_start_ms + state.config.spawn_ahead_ms;
    while state.spawn_cursor < chart.events.len() {
        let event = &chart.events[state.spawn_cursor];
        if event.time_offset_ms > horizon {
            break;
        }
        state.arrows.push(ArrowState {
            lane: event.lane,
            target_time_ms: state.song_start_ms + event.time_offset_ms,
            group_id: event.group_id,
            status: ArrowStatus::Pending,
        });
        state.spawn_cursor += 1;
    }
}

fn drain_input_edges(state: &mut State, now_ms: i64) {
    while let Some(edge) = state.pending_edges.pop_front() {
        if edge.lane >= state.held_lanes.len() {
            continue;
        }
        let was_down = state.held_lanes[edge.lane];
        state.held_lanes[edge.lane] = edge.pressed;
        if edge.pressed && !was_down {
            // Judge at arrival time, clamped so a queued edge can never
            // postdate the tick that drains it.
            judge_press(state, edge.lane, edge.timestamp_ms.min(now_ms));
        }
    }
}

/// Judges one press against the store. Candidates are pending arrows on
/// the pressed lane within the good window; the closest wins, with ties
/// going to the earliest target (store order is chart order). The winning
/// arrow's whole chord group resolves on this single press.
pub fn judge_press(state: &mut State, lane: usize, press_time_ms: i64) -> Option<JudgeGrade> {
    let mut best: Option<(usize, i64)> = None;
    for (index, arrow) in state.arrows.iter().enumerate() {
        if arrow.status != ArrowStatus::Pending || arrow.lane != lane {
            continue;
        }
        let abs_error = (arrow.target_time_ms - press_time_ms).abs();
        if abs_error > state.config.good_window_ms {
            continue;
        }
        if best.is_none_or(|(_, b)| abs_error < b) {
            best = Some((index, abs_error));
        }
    }

    let Some((index, abs_error)) = best else {
        debug!("PRESS IGNORED: lane {lane}, no arrow in window");
        return None;
    };
    let grade = judgment::classify_tap(abs_error, &state.config)?;
    let Some(arrow) = state.arrows.get(index) else {
        return None;
    };
    let group_id = arrow.group_id;
    let time_error_ms = press_time_ms - arrow.target_time_ms;

    let group_size = state.arrows.mark_group(group_id, ArrowStatus::Hit);
    let delta = scoring::apply_hit(&mut state.score, grade, group_size, &state.config);
    info!(
        "JUDGED: lane {lane}, {grade:?} ({time_error_ms:+}ms) x{group_size}, +{delta:.1}, combo {}",
        state.score.combo
    );
    state.last_judgment = Some(Judgment {
        grade,
        time_error_ms,
        lane,
        group_size,
    });
    push_score_update(state);
    Some(grade)
}

/// Expires pending groups whose deadline has passed. A missed arrow drags
/// its whole chord down, and a group counts as one miss, mirroring the
/// one-press-per-chord hit rule.
fn sweep_missed_groups(state: &mut State, now_ms: i64) {
    let deadline = now_ms - state.config.good_window_ms;
    loop {
        let Some(group_id) = state
            .arrows
            .iter()
            .find(|a| a.status == ArrowStatus::Pending && a.target_time_ms < deadline)
            .map(|a| a.group_id)
        else {
            break;
        };
        let dropped = state.arrows.mark_group(group_id, ArrowStatus::Missed);
        scoring::apply_miss(&mut state.score);
        info!("MISSED: group {group_id}, {dropped} arrow(s), combo reset");
        push_score_update(state);
    }
}

fn evict_spent_arrows(state: &mut State, now_ms: i64) {
    let despawn_after_ms = state.config.despawn_after_ms;
    state
        .arrows
        .retain(|a| now_ms - a.target_time_ms < despawn_after_ms);
}

fn check_song_finished(state: &mut State, now_ms: i64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(chart) = state.chart.as_ref() else {
        return;
    };
    if state.spawn_cursor >= chart.events.len()
        && state.arrows.is_empty()
        && now_ms - state.song_start_ms > chart.duration_ms
    {
        state.phase = GamePhase::Finished;
        info!(
            "SONG FINISHED: score {:.0}, combo {}, {}p/{}g/{}m",
            state.score.score,
            state.score.combo,
            state.score.counts.perfect,
            state.score.counts.good,
            state.score.counts.miss
        );
    }
}

fn push_score_update(state: &mut State) {
    if state.networked {
        state.outgoing.push(ClientMessage::ScoreUpdate {
            score: state.score.score,
            combo: state.score.combo,
        });
    }
}

fn snapshot(state: &State, now_ms: i64) -> TickOutput {
    let fall_time = state.config.spawn_ahead_ms.max(1) as f32;
    let arrows = state
        .arrows
        .iter()
        .map(|a| ArrowSnapshot {
            lane: a.lane,
            progress: 1.0 - (a.target_time_ms - now_ms) as f32 / fall_time,
            status: a.status,
        })
        .collect();
    TickOutput {
        phase: state.phase,
        arrows,
        score: state.score.clone(),
        last_judgment: state.last_judgment,
    }
}
