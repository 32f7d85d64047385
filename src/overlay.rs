//! Screen-space labels that follow projected anchors.

use std::collections::{btree_map::Entry, BTreeMap, HashMap};

use glam::Vec2;
use log::{debug, info};

use crate::{
    anchor::{Anchor, AnchorId, AnchorProjector, Projection},
    entity::HotspotInfo,
};

/// Receives one placement per anchor per frame.
pub trait Overlay<M> {
    fn place(&mut self, anchor: &Anchor<M>, projection: &Projection);

    /// Drops every element whose anchor fails `keep`.
    fn retain(&mut self, keep: &dyn Fn(AnchorId) -> bool);
}

/// Hands each projection to `overlay` together with its anchor, then drops
/// overlay elements for anchors that are no longer registered.
pub fn present<M, O>(overlay: &mut O, anchors: &AnchorProjector<M>, projections: &[Projection])
where
    O: Overlay<M> + ?Sized,
{
    let by_id: HashMap<AnchorId, &Anchor<M>> =
        anchors.iter().map(|anchor| (anchor.id(), anchor)).collect();

    for projection in projections {
        if let Some(anchor) = by_id.get(&projection.id) {
            overlay.place(anchor, projection);
        }
    }
    overlay.retain(&|id| by_id.contains_key(&id));
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: AnchorId,
    pub title: String,
    pub description: String,
    pub position: Vec2,
    pub visible: bool,
}

/// One label per hotspot, plus the label currently opened for reading.
#[derive(Debug, Clone, Default)]
pub struct LabelOverlay {
    labels: BTreeMap<AnchorId, Label>,
    focused: Option<AnchorId>,
}

impl LabelOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, id: AnchorId) -> Option<&Label> {
        self.labels.get(&id)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn focused(&self) -> Option<&Label> {
        self.focused.and_then(|id| self.labels.get(&id))
    }

    pub fn focus(&mut self, id: AnchorId) -> Option<&Label> {
        if !self.labels.contains_key(&id) {
            return None;
        }
        self.focused = Some(id);
        self.focused()
    }

    /// Moves focus to the next label in anchor order, wrapping around.
    pub fn focus_next(&mut self) -> Option<&Label> {
        let next = match self.focused {
            Some(current) => self
                .labels
                .range(current..)
                .map(|(id, _)| *id)
                .find(|id| *id != current)
                .or_else(|| self.labels.keys().next().copied()),
            None => self.labels.keys().next().copied(),
        };
        self.focused = next;
        self.focused()
    }

    pub fn close(&mut self) {
        self.focused = None;
    }
}

impl Overlay<HotspotInfo> for LabelOverlay {
    fn place(&mut self, anchor: &Anchor<HotspotInfo>, projection: &Projection) {
        let label = match self.labels.entry(anchor.id()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(
                    "Created {} label for {}",
                    if projection.visible { "visible" } else { "hidden" },
                    anchor.metadata.name
                );
                entry.insert(Label {
                    id: anchor.id(),
                    title: anchor.metadata.name.clone(),
                    description: anchor.metadata.description.clone(),
                    position: projection.pixel,
                    visible: projection.visible,
                });
                return;
            }
        };

        if label.visible != projection.visible {
            info!(
                "{} label {}",
                label.title,
                if projection.visible { "shown" } else { "hidden" }
            );
        }
        label.position = projection.pixel;
        label.visible = projection.visible;
    }

    fn retain(&mut self, keep: &dyn Fn(AnchorId) -> bool) {
        self.labels.retain(|id, label| {
            let kept = keep(*id);
            if !kept {
                debug!("Dropped label for {}", label.title);
            }
            kept
        });
        if self.focused.map_or(false, |id| !self.labels.contains_key(&id)) {
            self.focused = None;
        }
    }
}
