use log::{LevelFilter, info};
use purin::config::GameConfig;
use purin::core::clock::{Clock, ManualClock};
use purin::game::chart::Chart;
use purin::game::gameplay::{self, GamePhase};
use std::error::Error;
use std::fs;

const FRAME_MS: i64 = 16;

// Headless autoplay: loads a .purin chart, plays it perfectly against a
// deterministic clock and prints the score breakdown. Exercises the full
// lifecycle without a renderer or audio.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/songs/tutorial.purin".to_string());
    info!("Loading chart: {path}");

    let config = GameConfig::default();
    let text = fs::read_to_string(&path)?;
    let chart = Chart::from_json(&text, &config)?;
    let duration_ms = chart.duration_ms;

    // One press on the first lane of each group clears the whole chord.
    let mut presses: Vec<(usize, i64)> = Vec::new();
    let mut last_group = None;
    for event in &chart.events {
        if last_group != Some(event.group_id) {
            last_group = Some(event.group_id);
            presses.push((event.lane, event.time_offset_ms));
        }
    }

    let clock = ManualClock::new();
    let mut state = gameplay::init(config);
    gameplay::start_song(&mut state, chart, clock.now_ms());
    let song_start_ms = state.song_start_ms;
    let give_up_ms = song_start_ms + duration_ms + 10_000;

    let mut next_press = 0;
    loop {
        clock.advance(FRAME_MS);
        let now_ms = clock.now_ms();
        while next_press < presses.len() && song_start_ms + presses[next_press].1 <= now_ms {
            let (lane, offset_ms) = presses[next_press];
            gameplay::queue_input_edge(&mut state, lane, true, song_start_ms + offset_ms);
            gameplay::queue_input_edge(&mut state, lane, false, song_start_ms + offset_ms);
            next_press += 1;
        }

        let out = gameplay::tick(&mut state, now_ms);
        if out.phase == GamePhase::Finished {
            println!(
                "score {:.0}  combo {}  perfect {}  good {}  miss {}",
                out.score.score,
                out.score.combo,
                out.score.counts.perfect,
                out.score.counts.good,
                out.score.counts.miss
            );
            return Ok(());
        }
        if now_ms > give_up_ms {
            return Err("song never finished".into());
        }
    }
}
