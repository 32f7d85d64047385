//! World-space anchors projected to overlay pixel coordinates.

use glam::{Mat4, Vec2, Vec3};
use log::{debug, warn};

use crate::{camera::CameraTransform, window::Size};

/// Clip-space `w` below this is treated as a degenerate projection.
const MIN_CLIP_W: f32 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(u64);

impl AnchorId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A point of interest with a payload the projector passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor<M> {
    id: AnchorId,
    pub position: Vec3,
    pub metadata: M,
}

impl<M> Anchor<M> {
    pub fn id(&self) -> AnchorId {
        self.id
    }
}

/// Screen placement of one anchor for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub id: AnchorId,
    /// Pixel coordinates, origin at the top-left corner.
    pub pixel: Vec2,
    pub visible: bool,
}

/// Result of projecting a single point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub pixel: Vec2,
    pub visible: bool,
}

impl ScreenPoint {
    const HIDDEN: Self = Self {
        pixel: Vec2::ZERO,
        visible: false,
    };
}

/// Projects `world` through `view_projection` into pixel space.
///
/// Points whose post-divide depth is beyond 1 lie behind the camera or past
/// the far plane and are reported hidden. A degenerate transform (non-finite
/// matrix, `w` near zero) also yields a hidden point at the origin so no
/// non-finite coordinate ever reaches the overlay.
pub fn project_point(view_projection: &Mat4, world: Vec3, viewport: Size) -> ScreenPoint {
    let clip = *view_projection * world.extend(1.0);
    if !clip.is_finite() || clip.w.abs() < MIN_CLIP_W {
        return ScreenPoint::HIDDEN;
    }

    let ndc = clip.truncate() / clip.w;
    let pixel = Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.width as f32,
        (-ndc.y * 0.5 + 0.5) * viewport.height as f32,
    );
    if !pixel.is_finite() || !ndc.z.is_finite() {
        return ScreenPoint::HIDDEN;
    }

    ScreenPoint {
        pixel,
        visible: ndc.z <= 1.0,
    }
}

/// Owns the registered anchors and projects them every frame.
#[derive(Debug, Clone)]
pub struct AnchorProjector<M> {
    anchors: Vec<Anchor<M>>,
    next_id: u64,
}

impl<M> AnchorProjector<M> {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register(&mut self, position: Vec3, metadata: M) -> AnchorId {
        if !position.is_finite() {
            warn!("Registering anchor with non-finite position {:?}", position);
        }

        let id = AnchorId(self.next_id);
        self.next_id += 1;
        self.anchors.push(Anchor {
            id,
            position,
            metadata,
        });
        debug!("Registered anchor {:?} at {:?}", id, position);
        id
    }

    pub fn remove(&mut self, id: AnchorId) -> Option<Anchor<M>> {
        let index = self.anchors.iter().position(|anchor| anchor.id == id)?;
        // `remove` rather than `swap_remove` keeps registration order.
        Some(self.anchors.remove(index))
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor<M>> {
        self.anchors.iter().find(|anchor| anchor.id == id)
    }

    /// Moves an anchor. Returns `false` for unknown ids and non-finite
    /// positions, leaving the stored position untouched.
    pub fn set_position(&mut self, id: AnchorId, position: Vec3) -> bool {
        if !position.is_finite() {
            warn!("Rejecting non-finite position {:?} for anchor {:?}", position, id);
            return false;
        }
        match self.anchors.iter_mut().find(|anchor| anchor.id == id) {
            Some(anchor) => {
                anchor.position = position;
                true
            }
            None => false,
        }
    }

    /// Anchors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor<M>> {
        self.anchors.iter()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Projects every anchor, in registration order.
    pub fn project_all(&self, camera: &CameraTransform, viewport: Size) -> Vec<Projection> {
        self.anchors
            .iter()
            .map(|anchor| {
                let ScreenPoint { pixel, visible } =
                    project_point(&camera.view_projection, anchor.position, viewport);
                Projection {
                    id: anchor.id,
                    pixel,
                    visible,
                }
            })
            .collect()
    }
}

impl<M> Default for AnchorProjector<M> {
    fn default() -> Self {
        Self::new()
    }
}
