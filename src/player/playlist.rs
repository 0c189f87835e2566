//! Session orderings and the current position.
//!
//! The base ordering is the list as loaded. The shuffled ordering is a
//! permutation of base indices; it equals the identity permutation while
//! shuffle is off. Switching orderings re-resolves the current position by
//! track id so the same track stays current.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::Track;

use super::controller::PlayerError;

#[derive(Debug, Clone)]
pub struct Playlist {
    base: Vec<Track>,
    order: Vec<usize>,
    shuffle: bool,
    current: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>, start: usize) -> Result<Self, PlayerError> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyLibrary);
        }
        if start >= tracks.len() {
            return Err(PlayerError::StartOutOfRange {
                index: start,
                len: tracks.len(),
            });
        }

        Ok(Self {
            order: (0..tracks.len()).collect(),
            base: tracks,
            shuffle: false,
            current: start,
        })
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[cfg(test)]
    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Position of the current track in the active ordering.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Track {
        &self.base[self.base_index(self.current)]
    }

    /// Tracks in the active ordering.
    pub fn iter(&self) -> impl Iterator<Item = &Track> + '_ {
        (0..self.len()).map(move |i| &self.base[self.base_index(i)])
    }

    /// Make `index` of the active ordering current. Out-of-range indices wrap.
    pub fn select(&mut self, index: usize) -> usize {
        self.current = index % self.len();
        self.current
    }

    /// Step forward, wrapping from the last track to the first.
    pub fn advance(&mut self) -> usize {
        let n = self.len();
        self.current = (self.current + 1) % n;
        self.current
    }

    /// Step back, wrapping from the first track to the last.
    pub fn retreat(&mut self) -> usize {
        let n = self.len();
        self.current = (self.current + n - 1) % n;
        self.current
    }

    /// Flip shuffle and return the new flag.
    ///
    /// Turning shuffle on draws a fresh permutation every time. Turning it
    /// off discards the permutation.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let id = self.current().id;

        self.shuffle = !self.shuffle;
        self.order = (0..self.len()).collect();
        if self.shuffle {
            self.order.shuffle(rng);
        }

        if let Some(pos) = self.position_of(id) {
            self.current = pos;
        }
        self.shuffle
    }

    /// Position of the track with `id` in the active ordering.
    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.iter().position(|t| t.id == id)
    }

    fn base_index(&self, index: usize) -> usize {
        if self.shuffle { self.order[index] } else { index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: 100 + i as u64,
                title: Some(format!("t{i}")),
                artist: None,
                source: format!("/music/{i}.mp3"),
                album_id: 1,
                artwork: None,
            })
            .collect()
    }

    #[test]
    fn rejects_empty_and_out_of_range_start() {
        assert!(matches!(
            Playlist::new(Vec::new(), 0),
            Err(PlayerError::EmptyLibrary)
        ));
        assert!(matches!(
            Playlist::new(tracks(2), 2),
            Err(PlayerError::StartOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn wraps_at_both_ends() {
        let mut p = Playlist::new(tracks(3), 2).unwrap();
        assert_eq!(p.advance(), 0);
        assert_eq!(p.retreat(), 2);
        p.select(0);
        assert_eq!(p.retreat(), 2);
    }

    #[test]
    fn single_track_ring_stays_put() {
        let mut p = Playlist::new(tracks(1), 0).unwrap();
        assert_eq!(p.advance(), 0);
        assert_eq!(p.retreat(), 0);
    }

    #[test]
    fn shuffle_off_resets_to_base_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = Playlist::new(tracks(8), 3).unwrap();
        p.toggle_shuffle(&mut rng);
        p.toggle_shuffle(&mut rng);

        let ids: Vec<u64> = p.iter().map(|t| t.id).collect();
        assert_eq!(ids, (100..108).collect::<Vec<u64>>());
        assert_eq!(p.current().id, 103);
    }

    #[test]
    fn next_walks_the_shuffled_ordering() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut p = Playlist::new(tracks(6), 0).unwrap();
        p.toggle_shuffle(&mut rng);

        let expected: Vec<u64> = p.iter().map(|t| t.id).collect();
        let start = p.current_index();
        let walked: Vec<u64> = (1..=6)
            .map(|k| {
                p.advance();
                assert_eq!(p.current_index(), (start + k) % 6);
                p.current().id
            })
            .collect();
        for (k, id) in walked.iter().enumerate() {
            assert_eq!(*id, expected[(start + k + 1) % 6]);
        }
    }

    proptest! {
        #[test]
        fn next_then_previous_is_identity(n in 1usize..40, start in 0usize..40) {
            let start = start % n;
            let mut p = Playlist::new(tracks(n), start).unwrap();
            p.advance();
            p.retreat();
            prop_assert_eq!(p.current_index(), start);
            p.retreat();
            p.advance();
            prop_assert_eq!(p.current_index(), start);
        }

        #[test]
        fn ends_wrap_in_either_ordering(n in 1usize..40, seed in any::<u64>(), shuffled in any::<bool>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = Playlist::new(tracks(n), 0).unwrap();
            if shuffled {
                p.toggle_shuffle(&mut rng);
            }
            p.select(n - 1);
            prop_assert_eq!(p.advance(), 0);
            prop_assert_eq!(p.retreat(), n - 1);
        }

        #[test]
        fn shuffle_round_trip_keeps_identity(n in 1usize..40, start in 0usize..40, seed in any::<u64>()) {
            let start = start % n;
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = Playlist::new(tracks(n), start).unwrap();
            let before = p.current().id;

            prop_assert!(p.toggle_shuffle(&mut rng));
            prop_assert_eq!(p.current().id, before);
            prop_assert!(!p.toggle_shuffle(&mut rng));
            prop_assert_eq!(p.current().id, before);
            prop_assert_eq!(p.current_index(), start);
        }

        #[test]
        fn shuffled_ordering_is_a_permutation(n in 1usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = Playlist::new(tracks(n), 0).unwrap();
            p.toggle_shuffle(&mut rng);
            let mut ids: Vec<u64> = p.iter().map(|t| t.id).collect();
            ids.sort_unstable();
            prop_assert_eq!(ids, (100..100 + n as u64).collect::<Vec<u64>>());
        }
    }
}
