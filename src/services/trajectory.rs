//! Nearest-neighbor ordering for the map polyline. A greedy O(n²)
//! heuristic, not a tour optimizer: start from the first input point and
//! repeatedly walk to the closest unvisited point, measuring straight-line
//! distance in raw lat/lng degree-space. Ties break toward input order.

use serde::{Deserialize, Serialize};

use crate::models::trip::TravelSuggestions;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub title: String,
    pub lat: f64,
    pub lng: f64,
}

fn squared_distance(a: &TrajectoryPoint, b: &TrajectoryPoint) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    dlat * dlat + dlng * dlng
}

/// Orders the given points into a visiting sequence. Every input point
/// appears exactly once; the sequence starts at the first input point.
pub fn nearest_neighbor_order(points: Vec<TrajectoryPoint>) -> Vec<TrajectoryPoint> {
    if points.len() <= 1 {
        return points;
    }

    let mut unvisited = points;
    let mut route = Vec::with_capacity(unvisited.len());
    route.push(unvisited.remove(0));

    while !unvisited.is_empty() {
        let current = route.last().unwrap();
        let mut nearest_idx = 0;
        let mut nearest_dist = f64::MAX;
        for (idx, candidate) in unvisited.iter().enumerate() {
            let dist = squared_distance(current, candidate);
            if dist < nearest_dist {
                nearest_dist = dist;
                nearest_idx = idx;
            }
        }
        let next = unvisited.remove(nearest_idx);
        route.push(next);
    }

    route
}

/// Flattens every mappable point of interest in the artifact and orders
/// them for the polyline.
pub fn trajectory_for(suggestions: &TravelSuggestions) -> Vec<TrajectoryPoint> {
    let points = suggestions
        .mappable_locations()
        .into_iter()
        .filter_map(|location| {
            location.coordinates.map(|coords| TrajectoryPoint {
                title: location.title.clone(),
                lat: coords.lat,
                lng: coords.lng,
            })
        })
        .collect();
    nearest_neighbor_order(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(title: &str, lat: f64, lng: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            title: title.to_string(),
            lat,
            lng,
        }
    }

    #[test]
    fn orders_points_by_nearest_neighbor() {
        let points = vec![
            point("a", 0.0, 0.0),
            point("far", 10.0, 10.0),
            point("near", 1.0, 0.0),
            point("mid", 3.0, 0.0),
        ];
        let route = nearest_neighbor_order(points);
        let titles: Vec<&str> = route.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "near", "mid", "far"]);
    }

    #[test]
    fn route_is_a_permutation_of_the_input() {
        let points: Vec<TrajectoryPoint> = (0..12)
            .map(|i| {
                let i = i as f64;
                point(&format!("p{}", i), (i * 7.3) % 5.0, (i * 3.1) % 4.0)
            })
            .collect();
        let route = nearest_neighbor_order(points.clone());

        assert_eq!(route.len(), points.len());
        assert_eq!(route[0], points[0]);
        for p in &points {
            assert_eq!(route.iter().filter(|r| *r == p).count(), 1);
        }

        // Brute-force recheck of the greedy selection at every step.
        let mut remaining: Vec<TrajectoryPoint> = points[1..].to_vec();
        for step in 1..route.len() {
            let prev = &route[step - 1];
            let best = remaining
                .iter()
                .map(|c| squared_distance(prev, c))
                .fold(f64::MAX, f64::min);
            assert_eq!(squared_distance(prev, &route[step]), best);
            let pos = remaining.iter().position(|c| *c == route[step]).unwrap();
            remaining.remove(pos);
        }
    }

    #[test]
    fn ties_break_toward_input_order() {
        let points = vec![
            point("start", 0.0, 0.0),
            point("east", 0.0, 2.0),
            point("west", 0.0, -2.0),
        ];
        let route = nearest_neighbor_order(points);
        assert_eq!(route[1].title, "east");
    }

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(nearest_neighbor_order(Vec::new()).is_empty());
        let one = vec![point("solo", 1.0, 1.0)];
        assert_eq!(nearest_neighbor_order(one.clone()), one);
    }
}
