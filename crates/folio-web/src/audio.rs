#![forbid(unsafe_code)]

//! Single-active-playback rule across audio tracks.
//!
//! There is no "current track" pointer: every play event walks all tracks,
//! clears their markers and collects the players that still need pausing.

/// Containers that may hold a player.
pub const TRACK_SELECTOR: &str = ".audio-track";
/// The player inside a track container.
pub const PLAYER_SELECTOR: &str = ".audio-player";
/// Class on the track whose player is playing.
pub const PLAYING_CLASS: &str = "playing";

/// What the shell must do after a `play` event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Other tracks whose players were still running.
    pub pause: Vec<usize>,
}

/// Playing markers for every track that has a player.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AudioDeck {
    playing: Vec<bool>,
}

impl AudioDeck {
    #[must_use]
    pub fn new(tracks: usize) -> Self {
        Self {
            playing: vec![false; tracks],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.playing.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playing.is_empty()
    }

    #[must_use]
    pub fn is_playing(&self, index: usize) -> bool {
        self.playing.get(index).copied().unwrap_or(false)
    }

    /// The track currently marked playing, if any.
    #[must_use]
    pub fn playing(&self) -> Option<usize> {
        self.playing.iter().position(|&playing| playing)
    }

    /// Track `index` fired `play`.
    ///
    /// `is_paused` reports the live paused flag of another track's player.
    pub fn on_play(&mut self, index: usize, is_paused: impl Fn(usize) -> bool) -> PlayOutcome {
        if index >= self.playing.len() {
            return PlayOutcome::default();
        }
        let mut outcome = PlayOutcome::default();
        for (other, playing) in self.playing.iter_mut().enumerate() {
            if other == index {
                continue;
            }
            *playing = false;
            if !is_paused(other) {
                outcome.pause.push(other);
            }
        }
        self.playing[index] = true;
        outcome
    }

    /// Track `index` fired `pause` or `ended`. Returns whether the marker changed.
    pub fn on_stop(&mut self, index: usize) -> bool {
        self.playing
            .get_mut(index)
            .is_some_and(|playing| std::mem::replace(playing, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn second_play_pauses_first_track() {
        let mut deck = AudioDeck::new(2);
        let outcome = deck.on_play(0, |_| true);
        assert!(outcome.pause.is_empty());
        assert_eq!(deck.playing(), Some(0));

        let outcome = deck.on_play(1, |other| other != 0);
        assert_eq!(outcome, PlayOutcome { pause: vec![0] });
        assert!(deck.is_playing(1));
        assert!(!deck.is_playing(0));
    }

    #[test]
    fn stop_clears_only_own_marker() {
        let mut deck = AudioDeck::new(3);
        deck.on_play(2, |_| true);
        assert!(!deck.on_stop(0));
        assert!(deck.on_stop(2));
        assert_eq!(deck.playing(), None);
    }

    #[test]
    fn out_of_range_events_are_ignored() {
        let mut deck = AudioDeck::new(1);
        assert_eq!(deck.on_play(4, |_| false), PlayOutcome::default());
        assert!(!deck.on_stop(4));
        assert_eq!(deck.playing(), None);
    }
}
