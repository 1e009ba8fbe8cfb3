//! Session partitioning
//!
//! Splits a scrobble stream into listening sessions: maximal chronological
//! runs whose inter-event gaps stay at or below the configured threshold. A
//! new session starts exactly when the gap to the previous event exceeds the
//! threshold (the boundary itself is inclusive, so a gap equal to the
//! threshold stays in the same session).
//!
//! Sessions are computed once per detection run and discarded afterward; they
//! are never mutated after construction.

use scrubble_common::scrobble::{sort_chronological, Scrobble};

/// One listening session: a non-empty, chronologically ordered, contiguous
/// run of scrobbles.
///
/// Only [`partition`] constructs sessions, which is what guarantees the
/// non-empty invariant behind [`Session::first`] and [`Session::last`].
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    scrobbles: Vec<Scrobble>,
}

impl Session {
    fn start_with(first: Scrobble) -> Self {
        Self {
            scrobbles: vec![first],
        }
    }

    fn push(&mut self, scrobble: Scrobble) {
        self.scrobbles.push(scrobble);
    }

    /// All scrobbles in the session, oldest first.
    pub fn scrobbles(&self) -> &[Scrobble] {
        &self.scrobbles
    }

    /// Earliest scrobble in the session.
    pub fn first(&self) -> &Scrobble {
        &self.scrobbles[0]
    }

    /// Latest scrobble in the session.
    pub fn last(&self) -> &Scrobble {
        &self.scrobbles[self.scrobbles.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.scrobbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scrobbles.is_empty()
    }
}

/// Partition a scrobble stream into listening sessions.
///
/// Input order is arbitrary (exports arrive newest-first); a chronological
/// copy is taken internally and the caller's slice is left untouched. Every
/// input scrobble lands in exactly one session, sessions preserve
/// chronological order internally, and consecutive sessions are separated by
/// a gap strictly greater than `gap_seconds`.
///
/// Empty input produces no sessions. Pure function, no failure modes.
pub fn partition(scrobbles: &[Scrobble], gap_seconds: i64) -> Vec<Session> {
    let ordered = sort_chronological(scrobbles);
    let mut iter = ordered.into_iter();

    let first = match iter.next() {
        Some(first) => first,
        None => return Vec::new(),
    };

    let mut sessions = Vec::new();
    let mut current = Session::start_with(first);

    for scrobble in iter {
        let gap = scrobble.timestamp - current.last().timestamp;
        if gap > gap_seconds {
            sessions.push(current);
            current = Session::start_with(scrobble);
        } else {
            current.push(scrobble);
        }
    }
    sessions.push(current);

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrobble(track: &str, timestamp: i64) -> Scrobble {
        Scrobble::new("Artist", track, timestamp)
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(partition(&[], 1800).is_empty());
    }

    #[test]
    fn test_single_scrobble_single_session() {
        let sessions = partition(&[scrobble("T", 100)], 1800);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 1);
        assert_eq!(sessions[0].first().timestamp, 100);
    }

    #[test]
    fn test_gap_equal_to_threshold_stays_in_session() {
        // Boundary is inclusive: gap == threshold does not split
        let events = vec![scrobble("T1", 0), scrobble("T2", 1800)];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 2);
    }

    #[test]
    fn test_gap_over_threshold_splits() {
        let events = vec![scrobble("T1", 0), scrobble("T2", 1801)];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].last().timestamp, 0);
        assert_eq!(sessions[1].first().timestamp, 1801);
    }

    #[test]
    fn test_newest_first_input_is_normalized() {
        // Export order: newest first
        let events = vec![
            scrobble("T3", 4000),
            scrobble("T2", 200),
            scrobble("T1", 0),
        ];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].first().timestamp, 0);
        assert_eq!(sessions[0].last().timestamp, 200);
        assert_eq!(sessions[1].first().timestamp, 4000);
    }

    #[test]
    fn test_partition_covers_every_event_exactly_once() {
        let events: Vec<Scrobble> = (0..10)
            .map(|i| scrobble(&format!("T{}", i), i * 1000))
            .collect();
        let sessions = partition(&events, 1800);

        let mut covered: Vec<i64> = sessions
            .iter()
            .flat_map(|s| s.scrobbles().iter().map(|e| e.timestamp))
            .collect();
        covered.sort_unstable();
        let mut expected: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
        expected.sort_unstable();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_session_internal_gaps_within_threshold() {
        let events = vec![
            scrobble("A", 0),
            scrobble("B", 300),
            scrobble("C", 5000),
            scrobble("D", 5300),
            scrobble("E", 20000),
        ];
        let sessions = partition(&events, 1800);
        assert_eq!(sessions.len(), 3);

        for session in &sessions {
            let scrobbles = session.scrobbles();
            for pair in scrobbles.windows(2) {
                assert!(pair[1].timestamp - pair[0].timestamp <= 1800);
            }
        }
        // Gap between consecutive sessions strictly exceeds threshold
        for pair in sessions.windows(2) {
            assert!(pair[1].first().timestamp - pair[0].last().timestamp > 1800);
        }
    }
}
