use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Point-in-rectangle test. Edges count as inside so boxes that touch
    /// the image border stay clickable.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Image-relative click coordinates, kept for the review overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One interactive box on a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoxSpec {
    /// Clickable region, optionally part of an ordered click sequence.
    Hotspot {
        id: String,
        region: Region,
        #[serde(default)]
        order: Option<u32>,
    },
    /// Text-entry region with an expected answer.
    Input {
        id: String,
        region: Region,
        expected_text: String,
    },
}

impl BoxSpec {
    pub fn id(&self) -> &str {
        match self {
            BoxSpec::Hotspot { id, .. } | BoxSpec::Input { id, .. } => id,
        }
    }

    pub fn region(&self) -> &Region {
        match self {
            BoxSpec::Hotspot { region, .. } | BoxSpec::Input { region, .. } => region,
        }
    }

    pub fn is_hotspot(&self) -> bool {
        matches!(self, BoxSpec::Hotspot { .. })
    }
}

/// One screen of the quiz: an image reference plus its interactive boxes.
/// Built once by the manifest loader and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub image_ref: String,
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<BoxSpec>,
}

impl Frame {
    pub fn hotspot_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.is_hotspot()).count()
    }

    /// Hotspots that carry an explicit sequence position.
    pub fn ordered_hotspots(&self) -> impl Iterator<Item = (u32, &str)> {
        self.boxes.iter().filter_map(|b| match b {
            BoxSpec::Hotspot {
                id,
                order: Some(order),
                ..
            } => Some((*order, id.as_str())),
            _ => None,
        })
    }

    /// A frame is sequential when two or more hotspots carry an order;
    /// zero or one ordered hotspot means any hotspot click is correct.
    pub fn is_sequential(&self) -> bool {
        self.ordered_hotspots().count() >= 2
    }

    pub fn max_order(&self) -> Option<u32> {
        self.ordered_hotspots().map(|(order, _)| order).max()
    }

    /// The topmost box under the given point, if any. Boxes are tested in
    /// manifest order; overlaps resolve to the first match.
    pub fn box_at(&self, x: f64, y: f64) -> Option<&BoxSpec> {
        self.boxes.iter().find(|b| b.region().contains(x, y))
    }

    pub fn box_by_id(&self, id: &str) -> Option<&BoxSpec> {
        self.boxes.iter().find(|b| b.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(id: &str, x: f64, y: f64, order: Option<u32>) -> BoxSpec {
        BoxSpec::Hotspot {
            id: id.to_string(),
            region: Region::new(x, y, 10.0, 10.0),
            order,
        }
    }

    fn input(id: &str, x: f64, y: f64, expected: &str) -> BoxSpec {
        BoxSpec::Input {
            id: id.to_string(),
            region: Region::new(x, y, 10.0, 10.0),
            expected_text: expected.to_string(),
        }
    }

    fn frame(boxes: Vec<BoxSpec>) -> Frame {
        Frame {
            id: "f0".to_string(),
            image_ref: "shot.png".to_string(),
            width: 100,
            height: 100,
            boxes,
        }
    }

    #[test]
    fn region_contains_interior_and_edges() {
        let r = Region::new(10.0, 10.0, 20.0, 20.0);

        assert!(r.contains(15.0, 15.0));
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(30.0, 30.0));
        assert!(!r.contains(9.9, 15.0));
        assert!(!r.contains(15.0, 30.1));
    }

    #[test]
    fn box_at_picks_first_match() {
        let f = frame(vec![hotspot("a", 0.0, 0.0, None), hotspot("b", 5.0, 5.0, None)]);

        let hit = f.box_at(7.0, 7.0).unwrap();
        assert_eq!(hit.id(), "a");
        assert!(f.box_at(50.0, 50.0).is_none());
    }

    #[test]
    fn sequential_requires_two_ordered_hotspots() {
        let zero = frame(vec![hotspot("a", 0.0, 0.0, None)]);
        let one = frame(vec![hotspot("a", 0.0, 0.0, Some(1)), hotspot("b", 20.0, 20.0, None)]);
        let two = frame(vec![
            hotspot("a", 0.0, 0.0, Some(1)),
            hotspot("b", 20.0, 20.0, Some(2)),
        ]);

        assert!(!zero.is_sequential());
        assert!(!one.is_sequential());
        assert!(two.is_sequential());
        assert_eq!(two.max_order(), Some(2));
    }

    #[test]
    fn hotspot_count_ignores_inputs() {
        let f = frame(vec![hotspot("a", 0.0, 0.0, None), input("city", 20.0, 20.0, "Paris")]);

        assert_eq!(f.hotspot_count(), 1);
        assert!(f.box_by_id("city").is_some());
        assert!(f.box_by_id("missing").is_none());
    }

    #[test]
    fn box_spec_roundtrips_through_json() {
        let f = frame(vec![hotspot("a", 0.0, 0.0, Some(2)), input("city", 20.0, 20.0, "Paris")]);
        let json = serde_json::to_string(&f).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();

        assert_eq!(f, back);
    }
}
