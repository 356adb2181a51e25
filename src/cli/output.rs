//! Plain-text rendering of routes and POI listings for the terminal

use indoor_wayfinder::{PointOfInterest, Route};

/// Numbered instructions followed by a totals line.
pub fn format_route(route: &Route) -> String {
    let mut out = String::new();
    for (i, step) in route.instructions.iter().enumerate() {
        out.push_str(&format!("{:>2}. {step}\n", i + 1));
    }

    let floors = route
        .floors_visited
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
    out.push_str(&format!(
        "Total: {:.0}m, ~{:.1} min, floors {floors}{}\n",
        route.total_distance,
        route.estimated_duration / 60.0,
        if route.is_accessible { "" } else { " (not step-free)" }
    ));
    out
}

/// One line per POI: level, id, type and name.
pub fn format_pois(pois: &[&PointOfInterest]) -> String {
    let mut out = String::new();
    for poi in pois {
        out.push_str(&format!(
            "L{:<3} {:<24} {:<10} {}\n",
            poi.level,
            poi.id,
            format!("{:?}", poi.poi_type).to_lowercase(),
            poi.name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoor_wayfinder::{sample_layout, NavigationEngine};

    #[test]
    fn test_format_route_lists_steps_and_totals() {
        let engine = NavigationEngine::new(sample_layout().unwrap()).unwrap();
        let route = engine.find_route("g_entrance_1", "g_restroom_1", None).unwrap();
        let text = format_route(&route);
        assert!(text.starts_with(" 1. Walk from Main Entrance to Store B (20m)."));
        assert!(text.contains("Total: 30m"));
        assert!(text.contains("floors 0"));
    }

    #[test]
    fn test_format_pois_one_line_each() {
        let engine = NavigationEngine::new(sample_layout().unwrap()).unwrap();
        let pois = engine.all_pois(Some(1));
        let text = format_pois(&pois);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("l1_food_court"));
    }
}
