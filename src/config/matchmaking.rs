/// Matchmaking configuration constants.
///
/// This module defines parameters for the matchmaking core, such as the
/// automatic re-dial delay after a client skips to the next stranger.
pub const NEXT_REDIAL_DELAY_MS: u64 = 1000; // Delay before re-running find after "next" (in milliseconds).
