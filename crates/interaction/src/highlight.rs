use flows::{GeometryKind, LayerRole};
use foundation::{GraphicId, Rgba, ViewId};
use serde::Serialize;
use tracing::debug;

/// View highlight styling, chosen per geometry kind.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightOptions {
    pub color: Rgba,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    pub halo_opacity: f32,
}

impl HighlightOptions {
    pub fn for_kind(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Polygon => Self {
                color: Rgba::new(255, 255, 0, 1.0),
                fill_opacity: Some(0.2),
                halo_opacity: 0.8,
            },
            GeometryKind::Polyline => Self {
                color: Rgba::new(0, 255, 255, 1.0),
                fill_opacity: None,
                halo_opacity: 0.8,
            },
            GeometryKind::Point => Self {
                color: Rgba::new(255, 0, 255, 1.0),
                fill_opacity: None,
                halo_opacity: 0.8,
            },
        }
    }
}

/// What to highlight.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightTarget {
    Feature {
        layer: String,
        object_id: Option<i64>,
    },
    Graphic {
        role: LayerRole,
        id: GraphicId,
    },
}

/// A live highlight; removing it releases the view resources it holds.
pub trait HighlightHandle: Send {
    fn remove(self: Box<Self>);
}

/// Map engine highlight entry point.
pub trait Highlighter: Send + Sync {
    fn highlight(
        &self,
        view: ViewId,
        target: &HighlightTarget,
        options: &HighlightOptions,
    ) -> Box<dyn HighlightHandle>;
}

/// Owner of the single live highlight across all views.
#[derive(Default)]
pub struct HighlightSlot {
    live: Option<Box<dyn HighlightHandle>>,
}

impl std::fmt::Debug for HighlightSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightSlot")
            .field("live", &self.live.is_some())
            .finish()
    }
}

impl HighlightSlot {
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Removes the live highlight, if any. Returns `true` if one was removed.
    pub fn release(&mut self) -> bool {
        match self.live.take() {
            Some(handle) => {
                handle.remove();
                true
            }
            None => false,
        }
    }

    /// Releases the previous highlight, then acquires one for `target`.
    pub fn acquire(
        &mut self,
        highlighter: &dyn Highlighter,
        view: ViewId,
        target: &HighlightTarget,
        kind: GeometryKind,
    ) {
        self.release();
        let options = HighlightOptions::for_kind(kind);
        debug!(%view, ?target, "highlight");
        self.live = Some(highlighter.highlight(view, target, &options));
    }
}
