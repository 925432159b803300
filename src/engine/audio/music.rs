// Random music track selection

use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Random picks tried before falling back to a scan of the candidates
const MAX_RANDOM_ATTEMPTS: usize = 8;

/// Picks a random playable track from a list of candidate names
pub struct MusicPlaylist {
    candidates: Vec<String>,
    rng: StdRng,
}

impl MusicPlaylist {
    /// The numbered tracks `Music/Track1` to `Music/Track63`
    pub fn numbered() -> Self {
        Self::new((1..=63).map(|n| format!("Music/Track{}", n)).collect())
    }

    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(candidates: Vec<String>, seed: u64) -> Self {
        Self {
            candidates,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a random candidate for which `exists` holds
    ///
    /// Tries a bounded number of random candidates, then scans the whole list.
    /// Every miss is logged as a missing resource.
    pub fn pick(&mut self, exists: impl Fn(&str) -> bool) -> Option<String> {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = self.candidates.choose(&mut self.rng)?;
            if exists(candidate) {
                return Some(candidate.clone());
            }
            warn!("Resource missing: music track {}", candidate);
        }

        let found = self.candidates.iter().find(|c| exists(c)).cloned();
        if found.is_none() {
            warn!("Resource missing: no playable music track among {}", self.candidates.len());
        }
        found
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_playlist() {
        let playlist = MusicPlaylist::numbered();
        assert_eq!(playlist.len(), 63);
    }

    #[test]
    fn test_pick_only_existing_tracks() {
        let mut playlist = MusicPlaylist::with_seed(
            (1..=63).map(|n| format!("Music/Track{}", n)).collect(),
            42,
        );
        // Only one track exists; the scan fallback guarantees it is found
        let picked = playlist.pick(|name| name == "Music/Track17");
        assert_eq!(picked.as_deref(), Some("Music/Track17"));
    }

    #[test]
    fn test_pick_gives_up_without_tracks() {
        let mut playlist = MusicPlaylist::with_seed(vec!["Music/Track1".to_string()], 1);
        assert!(playlist.pick(|_| false).is_none());

        let mut empty = MusicPlaylist::with_seed(Vec::new(), 1);
        assert!(empty.pick(|_| true).is_none());
    }
}
