//! Persistence layer (flat key-value store of JSON strings).

pub mod store;

pub use store::KvStore;

/// Persisted key names as constants.
pub mod keys {
    /// `RecentStats` of the last stopped session
    pub const STATS: &str = "@fitness_stats";
    /// Newest-first list of `ActivityRecord`
    pub const ACTIVITIES: &str = "@fitness_activities";
    /// Bearer token for the playback API
    pub const PLAYBACK_TOKEN: &str = "@spotify_token";
    /// Last fetched playing track
    pub const CURRENT_TRACK: &str = "@current_track";
    /// `PlayerState` from the last poll
    pub const PLAYER_STATE: &str = "@player_state";
}
