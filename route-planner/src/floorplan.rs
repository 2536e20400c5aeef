use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    #[default]
    Room,
    Stairs,
    Elevator,
}

impl RoomKind {
    /// Guess the kind of an extracted room from its name
    pub fn infer(name: &str) -> Self {
        let upper = name.to_uppercase();
        if upper.contains("STAIR") {
            RoomKind::Stairs
        } else if upper.contains("ELEV") || upper.contains("LIFT") {
            RoomKind::Elevator
        } else {
            RoomKind::Room
        }
    }
}

/// Axis-aligned room rectangle in floor pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub kind: RoomKind,
}

impl Room {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Inclusive of the edges
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Floor {
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Floor {
    /// Rooms whose name contains `query`, ignoring case. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Room> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.rooms.iter().collect();
        }

        self.rooms
            .iter()
            .filter(|room| room.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Topmost room under `point`; later rooms are drawn over earlier ones
    pub fn room_at(&self, point: &Point) -> Option<&Room> {
        self.rooms.iter().rev().find(|room| room.contains(point))
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub floors: Vec<Floor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingSummary {
    pub id: String,
    pub name: String,
    pub floor_names: Vec<String>,
}

impl Building {
    pub fn floor(&self, name: &str) -> Option<&Floor> {
        self.floors.iter().find(|floor| floor.name == name)
    }

    pub fn summary(&self) -> BuildingSummary {
        BuildingSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            floor_names: self.floors.iter().map(|floor| floor.name.clone()).collect(),
        }
    }
}

/// Parse a JSON array of buildings
pub fn load_buildings(json: &str) -> anyhow::Result<Vec<Building>> {
    let buildings: Vec<Building> =
        serde_json::from_str(json).context("Failed to parse buildings JSON")?;
    info!("Loaded {} buildings", buildings.len());
    Ok(buildings)
}

// Output format of the floor-plan extraction model

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFloorplan {
    #[serde(default)]
    pub building_name: Option<String>,
    #[serde(default)]
    pub floors: Vec<ExtractedFloor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFloor {
    pub floor_number: FloorNumber,
    #[serde(default)]
    pub rooms: Vec<ExtractedRoom>,
}

/// The model is allowed to answer with either `"2"` or `2`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FloorNumber {
    Number(f64),
    Text(String),
}

impl FloorNumber {
    pub fn label(&self) -> String {
        match self {
            // Beyond this an i64 cast would saturate
            FloorNumber::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FloorNumber::Number(n) => n.to_string(),
            FloorNumber::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRoom {
    pub room_id: String,
    pub room_name: String,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    fn is_usable(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Strip Markdown fences and any chatter around the outermost JSON object
pub fn clean_model_response(text: &str) -> String {
    let unfenced = text
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");
    let trimmed = unfenced.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(first), Some(last)) if first < last => trimmed[first..=last].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Parse the extraction model's answer
pub fn parse_extraction(text: &str) -> anyhow::Result<ExtractedFloorplan> {
    let cleaned = clean_model_response(text);
    serde_json::from_str(&cleaned).context("Extraction response is not valid floor-plan JSON")
}

impl ExtractedFloorplan {
    /// Convert to the navigable model, dropping rooms that cannot be placed
    pub fn into_building(self, id: &str) -> Building {
        let name = self
            .building_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Unnamed building".to_string());

        let floors = self
            .floors
            .into_iter()
            .map(|floor| {
                let floor_name = floor.floor_number.label();
                let rooms = floor
                    .rooms
                    .into_iter()
                    .filter_map(|room| match room.bounding_box {
                        Some(bbox) if bbox.is_usable() => Some(Room {
                            kind: RoomKind::infer(&room.room_name),
                            id: room.room_id,
                            name: room.room_name,
                            x: bbox.x,
                            y: bbox.y,
                            width: bbox.width,
                            height: bbox.height,
                        }),
                        _ => {
                            warn!(
                                "Skipping room {} on floor {}: no usable bounding box",
                                room.room_id, floor_name
                            );
                            None
                        }
                    })
                    .collect();

                Floor {
                    name: floor_name,
                    rooms,
                }
            })
            .collect();

        Building {
            id: id.to_string(),
            name,
            floors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, name: &str, x: f64, y: f64) -> Room {
        Room {
            id: id.to_string(),
            name: name.to_string(),
            x,
            y,
            width: 80.0,
            height: 60.0,
            kind: RoomKind::infer(name),
        }
    }

    fn sample_floor() -> Floor {
        Floor {
            name: "0".to_string(),
            rooms: vec![
                room("wireless-wave", "WIRELESS WAVE 1201", 50.0, 50.0),
                room("honour-roll", "HONOUR ROLL 1101", 150.0, 50.0),
                room("artwalk", "ARTWALK 1314", 150.0, 150.0),
                room("stairs-1", "STAIRS", 200.0, 300.0),
            ],
        }
    }

    #[test]
    fn test_room_center() {
        let r = room("a", "A", 50.0, 50.0);
        assert_eq!(r.center(), Point::new(90.0, 80.0));
    }

    #[test]
    fn test_room_kind_inference() {
        assert_eq!(RoomKind::infer("STAIRS"), RoomKind::Stairs);
        assert_eq!(RoomKind::infer("East stairwell"), RoomKind::Stairs);
        assert_eq!(RoomKind::infer("ELEV"), RoomKind::Elevator);
        assert_eq!(RoomKind::infer("Freight lift"), RoomKind::Elevator);
        assert_eq!(RoomKind::infer("SECURITY 1312"), RoomKind::Room);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let floor = sample_floor();

        let hits: Vec<_> = floor.search("roll").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec!["honour-roll"]);

        let hits: Vec<_> = floor.search("  13 ").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec!["artwalk"]);

        assert_eq!(floor.search("").len(), 4);
        assert_eq!(floor.search("   ").len(), 4);
        assert!(floor.search("cafeteria").is_empty());
    }

    #[test]
    fn test_room_hit_testing() {
        let floor = sample_floor();

        assert_eq!(floor.room_at(&Point::new(60.0, 60.0)).map(|r| r.id.as_str()), Some("wireless-wave"));
        // Edges count as inside
        assert_eq!(floor.room_at(&Point::new(230.0, 110.0)).map(|r| r.id.as_str()), Some("honour-roll"));
        assert!(floor.room_at(&Point::new(140.0, 130.0)).is_none());
    }

    #[test]
    fn test_building_lookup_and_summary() {
        let building = Building {
            id: "ams-nest".to_string(),
            name: "AMS Nest".to_string(),
            floors: vec![sample_floor(), Floor { name: "1".to_string(), rooms: vec![] }],
        };

        assert!(building.floor("0").is_some());
        assert!(building.floor("7").is_none());

        let summary = building.summary();
        assert_eq!(summary.floor_names, vec!["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_clean_model_response_strips_fences() {
        let response = "Here you go:\n```json\n{\"building_name\": \"AQ\", \"floors\": []}\n```\nThanks";

        assert_eq!(clean_model_response(response), "{\"building_name\": \"AQ\", \"floors\": []}");
    }

    #[test]
    fn test_clean_model_response_without_json() {
        assert_eq!(clean_model_response("  no json here "), "no json here");
    }

    #[test]
    fn test_parse_and_convert_extraction() {
        let response = r#"```json
{
  "building_name": "Academic Quadrangle",
  "floors": [
    {
      "floor_number": 3,
      "rooms": [
        {"room_id": "3005", "room_name": "AQ 3005", "bounding_box": {"x": 10, "y": 20, "width": 100, "height": 50}, "labels": ["lecture"]},
        {"room_id": "s1", "room_name": "Stairs North", "bounding_box": {"x": 200, "y": 20, "width": 30, "height": 30}},
        {"room_id": "ghost", "room_name": "Unknown"}
      ]
    },
    {"floor_number": "G", "rooms": []}
  ]
}
```"#;

        let extracted = parse_extraction(response).unwrap();
        let building = extracted.into_building("aq");

        assert_eq!(building.id, "aq");
        assert_eq!(building.name, "Academic Quadrangle");
        assert_eq!(building.summary().floor_names, vec!["3".to_string(), "G".to_string()]);

        let floor = building.floor("3").unwrap();
        assert_eq!(floor.rooms.len(), 2);
        assert_eq!(floor.rooms[0].center(), Point::new(60.0, 45.0));
        assert_eq!(floor.rooms[1].kind, RoomKind::Stairs);
    }

    #[test]
    fn test_floor_number_labels() {
        assert_eq!(FloorNumber::Number(3.0).label(), "3");
        assert_eq!(FloorNumber::Number(-1.0).label(), "-1");
        assert_eq!(FloorNumber::Number(1.5).label(), "1.5");
        assert_eq!(FloorNumber::Number(1e300).label(), 1e300_f64.to_string());
        assert_eq!(FloorNumber::Text(" G ".to_string()).label(), "G");
    }

    #[test]
    fn test_unusable_boxes_are_skipped() {
        let extracted = ExtractedFloorplan {
            building_name: None,
            floors: vec![ExtractedFloor {
                floor_number: FloorNumber::Number(1.5),
                rooms: vec![ExtractedRoom {
                    room_id: "bad".to_string(),
                    room_name: "Bad".to_string(),
                    bounding_box: Some(BoundingBox {
                        x: 0.0,
                        y: 0.0,
                        width: -5.0,
                        height: 10.0,
                    }),
                    labels: vec![],
                }],
            }],
        };

        let building = extracted.into_building("x");
        assert_eq!(building.name, "Unnamed building");
        assert_eq!(building.floors[0].name, "1.5");
        assert!(building.floors[0].rooms.is_empty());
    }

    #[test]
    fn test_parse_extraction_rejects_garbage() {
        assert!(parse_extraction("the model refused").is_err());
    }

    #[test]
    fn test_load_buildings() {
        let json = r#"[{"id": "b", "name": "B", "floors": [{"name": "0", "rooms": [
            {"id": "r", "name": "R", "x": 0, "y": 0, "width": 10, "height": 10}
        ]}]}]"#;

        let buildings = load_buildings(json).unwrap();
        assert_eq!(buildings[0].floors[0].rooms[0].kind, RoomKind::Room);
    }
}
