use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Wire shapes for the multiplayer collaborator. The transport itself
// lives outside the engine; these only fix the message JSON: a snake_case
// "type" tag with camelCase fields.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom { room_id: String },
    ScoreUpdate { score: f64, combo: u32 },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_id: String,
    },
    PlayerJoined {
        player_id: String,
        username: String,
    },
    PlayerLeft {
        player_id: String,
    },
    ScoreUpdate {
        player_id: String,
        score: f64,
        combo: u32,
    },
    GameStart {
        song_id: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerEntry {
    pub username: String,
    pub score: f64,
    pub combo: u32,
}

/// Read-only roster view kept current from server broadcasts. The engine
/// applies these messages but interprets nothing beyond the roster.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub room_id: Option<String>,
    players: HashMap<String, PlayerEntry>,
}

impl Roster {
    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::RoomCreated { room_id } => {
                info!("ROOM CREATED: {room_id}");
                self.room_id = Some(room_id.clone());
            }
            ServerMessage::PlayerJoined {
                player_id,
                username,
            } => {
                info!("PLAYER JOINED: {username} ({player_id})");
                self.players.insert(
                    player_id.clone(),
                    PlayerEntry {
                        username: username.clone(),
                        score: 0.0,
                        combo: 0,
                    },
                );
            }
            ServerMessage::PlayerLeft { player_id } => {
                info!("PLAYER LEFT: {player_id}");
                self.players.remove(player_id);
            }
            ServerMessage::ScoreUpdate {
                player_id,
                score,
                combo,
            } => {
                if let Some(player) = self.players.get_mut(player_id) {
                    player.score = *score;
                    player.combo = *combo;
                }
            }
            // Song selection is the host's business, not the roster's.
            ServerMessage::GameStart { song_id } => {
                debug!("GAME START BROADCAST: song {song_id}");
            }
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerEntry> {
        self.players.get(player_id)
    }

    pub fn players(&self) -> impl Iterator<Item = (&String, &PlayerEntry)> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
