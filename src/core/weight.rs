//! Edge weight policy - segment + preferences to traversal cost
//!
//! A segment is either impassable under the active preferences (`None`) or
//! costs its physical distance plus a fixed transition penalty.

use crate::core::model::{NavigationUserPreferences, PathSegment, SegmentType};

/// Expected wait for an elevator car
pub const ELEVATOR_PENALTY: f64 = 15.0;
pub const ESCALATOR_PENALTY: f64 = 5.0;
pub const STAIRS_PENALTY: f64 = 20.0;
pub const WALKWAY_PENALTY: f64 = 0.0;

/// Fixed transition penalty for a segment type.
pub fn type_penalty(segment_type: SegmentType) -> f64 {
    match segment_type {
        SegmentType::Walkway => WALKWAY_PENALTY,
        SegmentType::Elevator => ELEVATOR_PENALTY,
        SegmentType::Escalator => ESCALATOR_PENALTY,
        SegmentType::Stairs => STAIRS_PENALTY,
    }
}

/// Whether `prefs` forbid traversing `segment` at all.
pub fn is_impassable(segment: &PathSegment, prefs: &NavigationUserPreferences) -> bool {
    (prefs.prefer_accessible_routes && !segment.is_accessible)
        || (prefs.avoid_stairs && segment.segment_type == SegmentType::Stairs)
        || (prefs.avoid_escalators && segment.segment_type == SegmentType::Escalator)
}

/// Traversal cost of `segment` under `prefs`, or `None` when impassable.
///
/// Pure in its inputs, so the solver can evaluate the same segment against a
/// one-off preference override without touching stored state.
pub fn segment_weight(segment: &PathSegment, prefs: &NavigationUserPreferences) -> Option<f64> {
    if is_impassable(segment, prefs) {
        return None;
    }
    Some(segment.distance + type_penalty(segment.segment_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(segment_type: SegmentType, distance: f64, is_accessible: bool) -> PathSegment {
        PathSegment {
            id: "s".to_string(),
            from_poi_id: "a".to_string(),
            to_poi_id: "b".to_string(),
            distance,
            segment_type,
            is_accessible,
            duration_estimate: None,
        }
    }

    #[test]
    fn test_penalties_by_type() {
        let prefs = NavigationUserPreferences::default();
        assert_eq!(segment_weight(&segment(SegmentType::Walkway, 10.0, true), &prefs), Some(10.0));
        assert_eq!(segment_weight(&segment(SegmentType::Elevator, 10.0, true), &prefs), Some(25.0));
        assert_eq!(segment_weight(&segment(SegmentType::Escalator, 10.0, true), &prefs), Some(15.0));
        assert_eq!(segment_weight(&segment(SegmentType::Stairs, 10.0, true), &prefs), Some(30.0));
    }

    #[test]
    fn test_accessibility_excludes_inaccessible_segments() {
        let prefs = NavigationUserPreferences {
            prefer_accessible_routes: true,
            ..Default::default()
        };
        assert_eq!(segment_weight(&segment(SegmentType::Walkway, 4.0, false), &prefs), None);
        assert_eq!(segment_weight(&segment(SegmentType::Elevator, 4.0, true), &prefs), Some(19.0));
    }

    #[test]
    fn test_avoid_flags() {
        let no_stairs = NavigationUserPreferences {
            avoid_stairs: true,
            ..Default::default()
        };
        let no_escalators = NavigationUserPreferences {
            avoid_escalators: true,
            ..Default::default()
        };
        let stairs = segment(SegmentType::Stairs, 1.0, true);
        let escalator = segment(SegmentType::Escalator, 1.0, true);

        assert!(is_impassable(&stairs, &no_stairs));
        assert!(!is_impassable(&escalator, &no_stairs));
        assert!(is_impassable(&escalator, &no_escalators));
        assert!(!is_impassable(&stairs, &no_escalators));
    }

    #[test]
    fn test_zero_distance_elevator_still_costs_penalty() {
        let prefs = NavigationUserPreferences::default();
        assert_eq!(
            segment_weight(&segment(SegmentType::Elevator, 0.0, true), &prefs),
            Some(ELEVATOR_PENALTY)
        );
    }
}
