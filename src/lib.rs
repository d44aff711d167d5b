//! purin: the timing and judgement engine of a scrolling-note rhythm
//! game. Charts are scheduled against an injected clock, key presses are
//! judged against perfect/good windows with chord-group resolution, and
//! a score/combo state evolves from the outcomes. Rendering, audio and
//! the multiplayer transport live in the host; the engine's whole
//! surface is `gameplay::tick` plus the input queue.

pub mod config;
pub mod core;
pub mod game;
