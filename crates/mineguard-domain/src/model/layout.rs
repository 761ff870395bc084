//! Mine layout: named waypoints and the routes between them

use std::collections::HashMap;

use mineguard_types::Position;

/// Named waypoints of a mine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MineLayout {
    waypoints: HashMap<String, Position>,
}

impl MineLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open pit with a loading area, exit ramp, haul road, dump area and a
    /// light-vehicle patrol loop
    pub fn default_pit() -> Self {
        let mut layout = Self::new();

        // Pit floor (loading)
        layout.insert("PIT_LOAD_1", Position::new(-20.12200, -43.95200, 820.0));
        layout.insert("PIT_LOAD_2", Position::new(-20.12250, -43.95150, 820.0));

        // Exit ramp
        layout.insert("RAMP_BOT", Position::new(-20.12100, -43.95100, 840.0));
        layout.insert("RAMP_MID", Position::new(-20.12000, -43.95000, 860.0));
        layout.insert("RAMP_TOP", Position::new(-20.11900, -43.94900, 880.0));

        // Haul road
        layout.insert("ROAD_1", Position::new(-20.11800, -43.94800, 890.0));
        layout.insert("ROAD_2", Position::new(-20.11700, -43.94700, 895.0));

        // Dump area
        layout.insert("DUMP_APPROACH", Position::new(-20.11600, -43.94600, 900.0));
        layout.insert("DUMP_1", Position::new(-20.11550, -43.94550, 900.0));
        layout.insert("DUMP_2", Position::new(-20.11500, -43.94600, 900.0));

        // Safety patrol
        layout.insert("PATROL_1", Position::new(-20.11950, -43.94950, 870.0));
        layout.insert("PATROL_2", Position::new(-20.11750, -43.94750, 892.0));
        layout.insert("PATROL_3", Position::new(-20.11600, -43.94650, 898.0));
        layout.insert("PATROL_4", Position::new(-20.11850, -43.94850, 885.0));

        layout
    }

    pub fn insert(&mut self, name: impl Into<String>, position: Position) {
        self.waypoints.insert(name.into(), position);
    }

    pub fn get(&self, name: &str) -> Option<&Position> {
        self.waypoints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.waypoints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Ordered sequence of waypoint names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub waypoints: Vec<String>,
}

impl Route {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            waypoints: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Pit to dump, loaded
    pub fn haul() -> Self {
        Self::new([
            "PIT_LOAD_1",
            "RAMP_BOT",
            "RAMP_MID",
            "RAMP_TOP",
            "ROAD_1",
            "ROAD_2",
            "DUMP_APPROACH",
            "DUMP_1",
        ])
    }

    pub fn patrol() -> Self {
        Self::new(["PATROL_1", "PATROL_2", "PATROL_3", "PATROL_4"])
    }

    pub fn reversed(&self) -> Self {
        Self {
            waypoints: self.waypoints.iter().rev().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.waypoints.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pit_has_every_route_waypoint() {
        let layout = MineLayout::default_pit();
        assert_eq!(layout.len(), 14);
        for route in [Route::haul(), Route::patrol()] {
            for name in &route.waypoints {
                assert!(layout.contains(name), "missing {name}");
            }
        }
    }

    #[test]
    fn test_return_trip_is_reverse_of_haul() {
        let back = Route::haul().reversed();
        assert_eq!(back.get(0), Some("DUMP_1"));
        assert_eq!(back.get(1), Some("DUMP_APPROACH"));
        assert_eq!(back.get(7), Some("PIT_LOAD_1"));
        assert_eq!(back.get(8), None);
    }
}
