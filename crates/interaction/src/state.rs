use flows::{EncodedFlows, GraphicsLayer, LayerRole, MigrationRecord, encode};
use foundation::{GraphicId, ViewId, ZoneId};
use symbology::{ActiveLayerSelector, LayerTree};
use tracing::debug;

use crate::config::AppConfig;
use crate::highlight::HighlightSlot;
use crate::ui::{ActionBar, ThresholdSlider};

/// What the user last selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Region(ZoneId),
    Graphic { role: LayerRole, id: GraphicId },
}

/// Counts from the last redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawSummary {
    pub lines: usize,
    pub points: usize,
}

/// Everything one browsing session mutates. Handlers take it by `&mut`.
#[derive(Debug)]
pub struct AppState {
    /// Flow rows of the last selected region.
    pub records: Vec<MigrationRecord>,
    pub min_value: f64,
    pub highlight: HighlightSlot,
    pub selection: Selection,
    pub lines: GraphicsLayer,
    pub points: GraphicsLayer,
    pub action_bar: ActionBar,
    pub slider: ThresholdSlider,
    pub views: Vec<ViewId>,
    pub layers: LayerTree,
    pub selector: ActiveLayerSelector,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            records: Vec::new(),
            min_value: config.initial_threshold,
            highlight: HighlightSlot::default(),
            selection: Selection::Idle,
            lines: GraphicsLayer::new(LayerRole::Lines),
            points: GraphicsLayer::new(LayerRole::Points),
            action_bar: ActionBar::new(config.padding_collapsed, config.padding_expanded),
            slider: ThresholdSlider::new(
                config.slider_min,
                config.slider_max,
                config.initial_threshold,
            ),
            views: config.view_ids(),
            layers: LayerTree::default(),
            selector: ActiveLayerSelector::new(),
        }
    }

    pub fn with_layers(mut self, layers: LayerTree) -> Self {
        self.layers = layers;
        self.selector.on_visibility_change(&self.layers);
        self
    }

    pub fn has_view(&self, view: ViewId) -> bool {
        self.views.contains(&view)
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn layer(&self, role: LayerRole) -> &GraphicsLayer {
        match role {
            LayerRole::Lines => &self.lines,
            LayerRole::Points => &self.points,
        }
    }

    pub fn layer_mut(&mut self, role: LayerRole) -> &mut GraphicsLayer {
        match role {
            LayerRole::Lines => &mut self.lines,
            LayerRole::Points => &mut self.points,
        }
    }

    /// Replaces both overlays with graphics encoded from the loaded records.
    pub fn redraw(&mut self) -> RedrawSummary {
        let EncodedFlows { lines, points } = encode(&self.records, self.min_value);
        let summary = RedrawSummary {
            lines: lines.len(),
            points: points.len(),
        };
        self.lines.replace_all(lines);
        self.points.replace_all(points);
        self.drop_graphic_selection();
        debug!(
            threshold = self.min_value,
            lines = summary.lines,
            points = summary.points,
            "flows redrawn"
        );
        summary
    }

    /// Empties both overlays. Loaded records stay.
    pub fn clear_graphics(&mut self) {
        self.lines.remove_all();
        self.points.remove_all();
        self.drop_graphic_selection();
    }

    /// A selected graphic does not survive its layer being replaced.
    fn drop_graphic_selection(&mut self) {
        if let Selection::Graphic { .. } = self.selection {
            self.highlight.release();
            self.selection = Selection::Idle;
        }
    }
}
