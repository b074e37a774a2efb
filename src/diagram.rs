use crate::error::AppraisalResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A tappable region of the vehicle diagram, one per body part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub label: String,
    pub x: f32, // Left edge (device-independent px)
    pub y: f32, // Top edge
    pub w: f32,
    pub h: f32,
}

impl Hotspot {
    fn new(id: &str, label: &str, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            x,
            y,
            w,
            h,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDiagram {
    #[serde(default)]
    pub name: String,
    pub hotspots: Vec<Hotspot>,
}

impl Default for VehicleDiagram {
    fn default() -> Self {
        Self::standard()
    }
}

impl VehicleDiagram {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppraisalResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Top-down sedan schematic on a 300 x 600 canvas, front at the top.
    pub fn standard() -> Self {
        let hotspots = vec![
            // Centre column, front to back
            Hotspot::new("front-bumper", "Front bumper", 60.0, 0.0, 180.0, 40.0),
            Hotspot::new("hood", "Hood", 70.0, 40.0, 160.0, 120.0),
            Hotspot::new("windshield", "Windshield", 70.0, 160.0, 160.0, 50.0),
            Hotspot::new("roof", "Roof", 70.0, 210.0, 160.0, 170.0),
            Hotspot::new("rear-glass", "Rear glass", 70.0, 380.0, 160.0, 50.0),
            Hotspot::new("trunk", "Trunk", 70.0, 430.0, 160.0, 120.0),
            Hotspot::new("rear-bumper", "Rear bumper", 60.0, 550.0, 180.0, 50.0),
            // Left side
            Hotspot::new("left-front-fender", "Left front fender", 0.0, 40.0, 70.0, 120.0),
            Hotspot::new("left-front-door", "Left front door", 0.0, 160.0, 70.0, 140.0),
            Hotspot::new("left-rear-door", "Left rear door", 0.0, 300.0, 70.0, 130.0),
            Hotspot::new("left-quarter-panel", "Left quarter panel", 0.0, 430.0, 70.0, 120.0),
            // Right side
            Hotspot::new("right-front-fender", "Right front fender", 230.0, 40.0, 70.0, 120.0),
            Hotspot::new("right-front-door", "Right front door", 230.0, 160.0, 70.0, 140.0),
            Hotspot::new("right-rear-door", "Right rear door", 230.0, 300.0, 70.0, 130.0),
            Hotspot::new("right-quarter-panel", "Right quarter panel", 230.0, 430.0, 70.0, 120.0),
        ];

        Self {
            name: "sedan".to_string(),
            hotspots,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Display label for a part id; unknown ids label themselves.
    pub fn label_for(&self, id: &str) -> String {
        self.get(id)
            .map(|h| h.label.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// First hotspot containing the point, in declaration order.
    pub fn hotspot_at(&self, x: f32, y: f32) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.contains(x, y))
    }
}
