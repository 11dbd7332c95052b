use std::collections::HashSet;
use std::path::Path;

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::frame::{BoxSpec, Frame, Region};

static ASSETS: Dir = include_dir!("assets");

/// Test identifier of the embedded demo bundle.
pub const DEMO_TEST_ID: &str = "demo";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest contains no frames")]
    Empty,

    #[error("frame `{frame}` has invalid dimensions {width}x{height}")]
    BadDimensions {
        frame: String,
        width: u32,
        height: u32,
    },

    #[error("frame `{frame}`: box `{id}` has an empty or out-of-bounds region")]
    BadRegion { frame: String, id: String },

    #[error("frame `{frame}`: duplicate box id `{id}`")]
    DuplicateBoxId { frame: String, id: String },

    #[error("frame `{frame}`: hotspot order {order} used more than once")]
    DuplicateOrder { frame: String, order: u32 },

    #[error("frame `{frame}`: hotspot orders must run 1..=n without gaps")]
    BrokenSequence { frame: String },

    #[error("frame `{frame}` references missing image `{image}`")]
    MissingImage { frame: String, image: String },
}

/// On-disk shape of one frame: image filename, pixel dimensions (annotated by
/// the image-loading collaborator), and two flat box lists.
#[derive(Debug, Deserialize)]
struct FrameDescriptor {
    #[serde(default)]
    id: Option<String>,
    image: String,
    width: u32,
    height: u32,
    #[serde(default)]
    hotspots: Vec<HotspotDescriptor>,
    #[serde(default)]
    inputs: Vec<InputDescriptor>,
}

#[derive(Debug, Deserialize)]
struct HotspotDescriptor {
    id: String,
    #[serde(flatten)]
    region: Region,
    #[serde(default)]
    order: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct InputDescriptor {
    id: String,
    #[serde(flatten)]
    region: Region,
    expected: String,
}

impl FrameDescriptor {
    fn into_frame(self, index: usize) -> Frame {
        let mut boxes: Vec<BoxSpec> = Vec::with_capacity(self.hotspots.len() + self.inputs.len());
        for h in self.hotspots {
            boxes.push(BoxSpec::Hotspot {
                id: h.id,
                region: h.region,
                order: h.order,
            });
        }
        for i in self.inputs {
            boxes.push(BoxSpec::Input {
                id: i.id,
                region: i.region,
                expected_text: i.expected,
            });
        }
        Frame {
            id: self.id.unwrap_or_else(|| format!("frame-{index}")),
            image_ref: self.image,
            width: self.width,
            height: self.height,
            boxes,
        }
    }
}

fn region_fits(region: &Region, width: u32, height: u32) -> bool {
    region.width > 0.0
        && region.height > 0.0
        && region.x >= 0.0
        && region.y >= 0.0
        && region.x + region.width <= f64::from(width)
        && region.y + region.height <= f64::from(height)
}

fn validate_frame(frame: &Frame) -> Result<(), LoadError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(LoadError::BadDimensions {
            frame: frame.id.clone(),
            width: frame.width,
            height: frame.height,
        });
    }

    if let Some(dup) = frame.boxes.iter().map(|b| b.id()).duplicates().next() {
        return Err(LoadError::DuplicateBoxId {
            frame: frame.id.clone(),
            id: dup.to_string(),
        });
    }

    for spec in &frame.boxes {
        if !region_fits(spec.region(), frame.width, frame.height) {
            return Err(LoadError::BadRegion {
                frame: frame.id.clone(),
                id: spec.id().to_string(),
            });
        }
    }

    let orders: Vec<u32> = frame.ordered_hotspots().map(|(order, _)| order).sorted().collect();
    if let Some(dup) = orders.iter().duplicates().next() {
        return Err(LoadError::DuplicateOrder {
            frame: frame.id.clone(),
            order: *dup,
        });
    }
    // A sequence with gaps could never be completed, so reject it at load time.
    if orders.len() >= 2 && orders.iter().enumerate().any(|(i, &o)| o != i as u32 + 1) {
        return Err(LoadError::BrokenSequence {
            frame: frame.id.clone(),
        });
    }

    Ok(())
}

/// Parse and validate a bundle manifest. `assets` is the file listing of the
/// unpacked archive (the external archive collaborator's output); pass `None`
/// when there is no archive to check image references against.
pub fn parse_manifest(
    json: &str,
    assets: Option<&HashSet<String>>,
) -> Result<Vec<Frame>, LoadError> {
    let descriptors: Vec<FrameDescriptor> = serde_json::from_str(json)?;
    if descriptors.is_empty() {
        return Err(LoadError::Empty);
    }

    let frames: Vec<Frame> = descriptors
        .into_iter()
        .enumerate()
        .map(|(index, d)| d.into_frame(index))
        .collect();

    for frame in &frames {
        validate_frame(frame)?;
        if let Some(listing) = assets {
            if !listing.contains(&frame.image_ref) {
                warn!(frame = %frame.id, image = %frame.image_ref, "image missing from bundle");
                return Err(LoadError::MissingImage {
                    frame: frame.id.clone(),
                    image: frame.image_ref.clone(),
                });
            }
        }
    }

    Ok(frames)
}

/// Load a manifest from a file on disk, validating against an optional asset
/// listing.
pub fn load_manifest_file(
    path: &Path,
    assets: Option<&HashSet<String>>,
) -> Result<Vec<Frame>, LoadError> {
    let json = std::fs::read_to_string(path)?;
    parse_manifest(&json, assets)
}

/// The demo bundle compiled into the binary, so the CLI and tests can run
/// without any external files.
pub fn demo_frames() -> Vec<Frame> {
    let file = ASSETS
        .get_file("demo.json")
        .expect("embedded demo manifest not found");
    let json = file
        .contents_utf8()
        .expect("embedded demo manifest is not UTF-8");
    parse_manifest(json, None).expect("embedded demo manifest is valid")
}
