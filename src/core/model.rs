//! Venue data model: POIs, path segments, floors, layouts, preferences and routes
//!
//! All types serialize with the field names consumers already use
//! (`fromPOIId`, `isAccessible`, `preferAccessibleRoutes`, ...).

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{Error, Result};

/// Kind of place a POI represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiType {
    Store,
    Restroom,
    Elevator,
    Escalator,
    Stairs,
    Exit,
    Info,
    Custom,
}

/// Optional catalog data attached to store POIs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A named, located place within a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub poi_type: PoiType,
    pub x: f64,
    pub y: f64,
    /// Floor index
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_metadata: Option<StoreMetadata>,
}

/// Transition type of a path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Walkway,
    Elevator,
    Escalator,
    Stairs,
}

impl SegmentType {
    /// Walkways are traversable both ways; every other type is directional as authored.
    pub fn is_bidirectional(self) -> bool {
        matches!(self, SegmentType::Walkway)
    }
}

/// Connection between two POIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: String,
    #[serde(rename = "fromPOIId")]
    pub from_poi_id: String,
    #[serde(rename = "toPOIId")]
    pub to_poi_id: String,
    /// Meters
    pub distance: f64,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    #[serde(rename = "isAccessible")]
    pub is_accessible: bool,
    /// Seconds
    #[serde(
        rename = "durationEstimate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_estimate: Option<f64>,
}

impl PathSegment {
    /// Copy of this segment traversed in the opposite direction (same id).
    pub fn reversed(&self) -> Self {
        Self {
            from_poi_id: self.to_poi_id.clone(),
            to_poi_id: self.from_poi_id.clone(),
            ..self.clone()
        }
    }
}

/// One floor of a venue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MallFloor {
    pub level: i32,
    pub name: String,
    #[serde(default)]
    pub pois: Vec<PointOfInterest>,
    #[serde(default)]
    pub path_segments: Vec<PathSegment>,
}

/// Complete floor/POI/segment description of one venue
///
/// Deserialization goes through [`LayoutDocument`] so that segments written
/// without `isAccessible` get a flag derived from their endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LayoutDocument")]
pub struct MallLayout {
    pub id: String,
    pub name: String,
    pub floors: Vec<MallFloor>,
}

/// Layout as written in venue files
#[derive(Deserialize)]
struct LayoutDocument {
    id: String,
    name: String,
    floors: Vec<FloorDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FloorDocument {
    level: i32,
    name: String,
    #[serde(default)]
    pois: Vec<PointOfInterest>,
    #[serde(default)]
    path_segments: Vec<SegmentDocument>,
}

#[derive(Deserialize)]
struct SegmentDocument {
    id: String,
    #[serde(rename = "fromPOIId")]
    from_poi_id: String,
    #[serde(rename = "toPOIId")]
    to_poi_id: String,
    distance: f64,
    #[serde(rename = "type")]
    segment_type: SegmentType,
    #[serde(rename = "isAccessible", default)]
    is_accessible: Option<bool>,
    #[serde(rename = "durationEstimate", default)]
    duration_estimate: Option<f64>,
}

impl SegmentDocument {
    /// An omitted flag means accessible only for a walkway between POIs on
    /// the same level.
    fn resolve(self, levels: &FxHashMap<String, i32>) -> PathSegment {
        let is_accessible = self.is_accessible.unwrap_or_else(|| {
            self.segment_type == SegmentType::Walkway
                && matches!(
                    (levels.get(&self.from_poi_id), levels.get(&self.to_poi_id)),
                    (Some(from), Some(to)) if from == to
                )
        });
        PathSegment {
            id: self.id,
            from_poi_id: self.from_poi_id,
            to_poi_id: self.to_poi_id,
            distance: self.distance,
            segment_type: self.segment_type,
            is_accessible,
            duration_estimate: self.duration_estimate,
        }
    }
}

impl From<LayoutDocument> for MallLayout {
    fn from(doc: LayoutDocument) -> Self {
        let levels: FxHashMap<String, i32> = doc
            .floors
            .iter()
            .flat_map(|f| f.pois.iter())
            .map(|p| (p.id.clone(), p.level))
            .collect();

        let floors = doc
            .floors
            .into_iter()
            .map(|floor| MallFloor {
                level: floor.level,
                name: floor.name,
                pois: floor.pois,
                path_segments: floor
                    .path_segments
                    .into_iter()
                    .map(|s| s.resolve(&levels))
                    .collect(),
            })
            .collect();

        Self {
            id: doc.id,
            name: doc.name,
            floors,
        }
    }
}

impl MallLayout {
    /// All POIs across every floor, in floor order.
    pub fn all_pois(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.floors.iter().flat_map(|f| f.pois.iter())
    }

    /// POIs whose level matches `level`.
    pub fn pois_on_level(&self, level: i32) -> impl Iterator<Item = &PointOfInterest> {
        self.all_pois().filter(move |p| p.level == level)
    }

    pub fn all_segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.floors.iter().flat_map(|f| f.path_segments.iter())
    }

    pub fn poi(&self, id: &str) -> Option<&PointOfInterest> {
        self.all_pois().find(|p| p.id == id)
    }

    pub fn floor(&self, level: i32) -> Option<&MallFloor> {
        self.floors.iter().find(|f| f.level == level)
    }

    /// Check the structural invariants the graph builder relies on.
    pub fn validate(&self) -> Result<()> {
        let mut levels = FxHashSet::default();
        let mut poi_ids = FxHashSet::default();
        let mut segment_ids = FxHashSet::default();

        for floor in &self.floors {
            if !levels.insert(floor.level) {
                return Err(Error::InvalidLayout(format!(
                    "duplicate floor level {}",
                    floor.level
                )));
            }
            for poi in &floor.pois {
                if poi.level != floor.level {
                    return Err(Error::InvalidLayout(format!(
                        "POI '{}' has level {} but is listed on floor {}",
                        poi.id, poi.level, floor.level
                    )));
                }
                if !poi_ids.insert(poi.id.as_str()) {
                    return Err(Error::InvalidLayout(format!("duplicate POI id '{}'", poi.id)));
                }
            }
        }

        for segment in self.all_segments() {
            if !segment_ids.insert(segment.id.as_str()) {
                return Err(Error::InvalidLayout(format!(
                    "duplicate segment id '{}'",
                    segment.id
                )));
            }
            if !segment.distance.is_finite() || segment.distance < 0.0 {
                return Err(Error::InvalidLayout(format!(
                    "segment '{}' has invalid distance {}",
                    segment.id, segment.distance
                )));
            }
            for endpoint in [&segment.from_poi_id, &segment.to_poi_id] {
                if !poi_ids.contains(endpoint.as_str()) {
                    return Err(Error::InvalidLayout(format!(
                        "segment '{}' references unknown POI '{}'",
                        segment.id, endpoint
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Routing objective hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredMode {
    #[default]
    Shortest,
    LeastCrowded,
}

/// Per-session mobility preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationUserPreferences {
    pub prefer_accessible_routes: bool,
    pub avoid_stairs: bool,
    pub avoid_escalators: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_mode: Option<PreferredMode>,
}

impl NavigationUserPreferences {
    /// Preferences with `override_type` applied on top. Overrides only add constraints.
    pub fn with_override(&self, override_type: Option<PreferenceType>) -> Self {
        let mut active = self.clone();
        match override_type {
            Some(PreferenceType::Accessible) => active.prefer_accessible_routes = true,
            Some(PreferenceType::AvoidStairs) => active.avoid_stairs = true,
            Some(PreferenceType::AvoidEscalators) => active.avoid_escalators = true,
            None => {}
        }
        active
    }
}

/// Partial preference update; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
    pub prefer_accessible_routes: Option<bool>,
    pub avoid_stairs: Option<bool>,
    pub avoid_escalators: Option<bool>,
    /// `Some(None)` (an explicit JSON `null`) clears the stored mode
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_mode: Option<Option<PreferredMode>>,
}

/// Distinguish a present `null` from an absent field.
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PreferencesUpdate {
    pub fn apply_to(&self, prefs: &mut NavigationUserPreferences) {
        if let Some(v) = self.prefer_accessible_routes {
            prefs.prefer_accessible_routes = v;
        }
        if let Some(v) = self.avoid_stairs {
            prefs.avoid_stairs = v;
        }
        if let Some(v) = self.avoid_escalators {
            prefs.avoid_escalators = v;
        }
        if let Some(mode) = self.preferred_mode {
            prefs.preferred_mode = mode;
        }
    }
}

/// One-off override applied to a single route request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceType {
    Accessible,
    AvoidStairs,
    AvoidEscalators,
}

/// Temporarily closed POIs and path segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Closures {
    pub closed_poi_ids: Vec<String>,
    pub closed_segment_ids: Vec<String>,
}

impl Closures {
    pub fn is_empty(&self) -> bool {
        self.closed_poi_ids.is_empty() && self.closed_segment_ids.is_empty()
    }
}

/// Computed route between two POIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "originPOIId")]
    pub origin_poi_id: String,
    #[serde(rename = "destinationPOIId")]
    pub destination_poi_id: String,
    /// Segments in travel order
    pub segments: Vec<PathSegment>,
    /// Meters, sum of physical segment distances
    #[serde(rename = "totalDistance")]
    pub total_distance: f64,
    /// Seconds
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration: f64,
    #[serde(rename = "isAccessible")]
    pub is_accessible: bool,
    pub instructions: Vec<String>,
    /// Distinct levels in the order they are visited
    #[serde(rename = "floorsVisited", default)]
    pub floors_visited: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(id: &str, level: i32) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: id.to_uppercase(),
            poi_type: PoiType::Store,
            x: 0.0,
            y: 0.0,
            level,
            description: None,
            store_metadata: None,
        }
    }

    fn walkway(id: &str, from: &str, to: &str, distance: f64) -> PathSegment {
        PathSegment {
            id: id.to_string(),
            from_poi_id: from.to_string(),
            to_poi_id: to.to_string(),
            distance,
            segment_type: SegmentType::Walkway,
            is_accessible: true,
            duration_estimate: None,
        }
    }

    fn layout(segments: Vec<PathSegment>) -> MallLayout {
        MallLayout {
            id: "m".to_string(),
            name: "Mall".to_string(),
            floors: vec![MallFloor {
                level: 0,
                name: "Ground".to_string(),
                pois: vec![poi("a", 0), poi("b", 0)],
                path_segments: segments,
            }],
        }
    }

    #[test]
    fn test_segment_json_field_names() {
        let json = r#"{"id":"s1","fromPOIId":"a","toPOIId":"b","distance":12.5,"type":"walkway","isAccessible":false}"#;
        let seg: PathSegment = serde_json::from_str(json).unwrap();
        assert_eq!(seg.from_poi_id, "a");
        assert_eq!(seg.to_poi_id, "b");
        assert!(!seg.is_accessible);
        assert_eq!(seg.duration_estimate, None);

        let out = serde_json::to_value(&seg).unwrap();
        assert_eq!(out["fromPOIId"], "a");
        assert_eq!(out["isAccessible"], false);
    }

    fn two_floor_json(segments: &str) -> String {
        format!(
            r#"{{"id":"m","name":"Mall","floors":[
                {{"level":0,"name":"G","pois":[
                    {{"id":"a","name":"A","type":"store","x":0,"y":0,"level":0}},
                    {{"id":"b","name":"B","type":"store","x":5,"y":0,"level":0}}],
                  "pathSegments":[{segments}]}},
                {{"level":1,"name":"L1","pois":[
                    {{"id":"c","name":"C","type":"store","x":0,"y":0,"level":1}}]}}]}}"#
        )
    }

    #[test]
    fn test_missing_accessibility_flag_resolved_from_endpoints() {
        let json = two_floor_json(
            r#"{"id":"ab","fromPOIId":"a","toPOIId":"b","distance":5,"type":"walkway"},
               {"id":"ac","fromPOIId":"a","toPOIId":"c","distance":5,"type":"walkway"},
               {"id":"st","fromPOIId":"b","toPOIId":"c","distance":5,"type":"stairs"},
               {"id":"el","fromPOIId":"a","toPOIId":"c","distance":5,"type":"elevator"},
               {"id":"ex","fromPOIId":"b","toPOIId":"c","distance":5,"type":"elevator","isAccessible":true}"#,
        );
        let layout: MallLayout = serde_json::from_str(&json).unwrap();
        let flag = |id: &str| {
            layout
                .all_segments()
                .find(|s| s.id == id)
                .map(|s| s.is_accessible)
                .unwrap()
        };
        assert!(flag("ab"), "same-level walkway");
        assert!(!flag("ac"), "walkway across levels");
        assert!(!flag("st"));
        assert!(!flag("el"));
        assert!(flag("ex"), "explicit flag wins");
    }

    #[test]
    fn test_layout_serializes_resolved_flag() {
        let json = two_floor_json(r#"{"id":"st","fromPOIId":"b","toPOIId":"c","distance":5,"type":"stairs"}"#);
        let layout: MallLayout = serde_json::from_str(&json).unwrap();
        let out = serde_json::to_value(&layout).unwrap();
        assert_eq!(out["floors"][0]["pathSegments"][0]["isAccessible"], false);
    }

    #[test]
    fn test_reversed_keeps_id() {
        let seg = walkway("s1", "a", "b", 3.0);
        let rev = seg.reversed();
        assert_eq!(rev.id, "s1");
        assert_eq!(rev.from_poi_id, "b");
        assert_eq!(rev.to_poi_id, "a");
    }

    #[test]
    fn test_validate_accepts_consistent_layout() {
        assert!(layout(vec![walkway("s1", "a", "b", 3.0)]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_segment() {
        let err = layout(vec![walkway("s1", "a", "ghost", 3.0)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLayout(msg) if msg.contains("ghost")));
    }

    #[test]
    fn test_validate_rejects_negative_distance() {
        assert!(layout(vec![walkway("s1", "a", "b", -1.0)]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_poi_across_floors() {
        let mut l = layout(vec![]);
        l.floors.push(MallFloor {
            level: 1,
            name: "First".to_string(),
            pois: vec![poi("a", 1)],
            path_segments: vec![],
        });
        assert!(l.validate().is_err());
    }

    #[test]
    fn test_preference_override_only_tightens() {
        let stored = NavigationUserPreferences {
            avoid_stairs: true,
            ..Default::default()
        };
        let active = stored.with_override(Some(PreferenceType::Accessible));
        assert!(active.prefer_accessible_routes);
        assert!(active.avoid_stairs);
        assert_eq!(stored.with_override(None), stored);
    }

    #[test]
    fn test_preferences_update_partial() {
        let mut prefs = NavigationUserPreferences::default();
        let update: PreferencesUpdate = serde_json::from_str(r#"{"avoidEscalators":true}"#).unwrap();
        update.apply_to(&mut prefs);
        assert!(prefs.avoid_escalators);
        assert!(!prefs.avoid_stairs);
    }

    #[test]
    fn test_preferences_update_clears_mode_on_null() {
        let mut prefs = NavigationUserPreferences::default();
        let set: PreferencesUpdate =
            serde_json::from_str(r#"{"preferredMode":"least_crowded"}"#).unwrap();
        set.apply_to(&mut prefs);
        assert_eq!(prefs.preferred_mode, Some(PreferredMode::LeastCrowded));

        let untouched: PreferencesUpdate = serde_json::from_str(r#"{"avoidStairs":true}"#).unwrap();
        assert_eq!(untouched.preferred_mode, None);
        untouched.apply_to(&mut prefs);
        assert_eq!(prefs.preferred_mode, Some(PreferredMode::LeastCrowded));

        let clear: PreferencesUpdate = serde_json::from_str(r#"{"preferredMode":null}"#).unwrap();
        assert_eq!(clear.preferred_mode, Some(None));
        clear.apply_to(&mut prefs);
        assert_eq!(prefs.preferred_mode, None);
    }
}
