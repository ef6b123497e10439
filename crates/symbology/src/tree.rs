//! Map layer tree: nested groups with feature layers at the leaves.

use serde::Serialize;

use crate::renderer::{FeatureEffect, Renderer};
use crate::thematic::is_thematic_layer;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Feature,
    Tile,
    Graphics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub title: String,
    pub kind: LayerKind,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<Renderer>,
    #[serde(rename = "featureEffect", skip_serializing_if = "Option::is_none")]
    pub feature_effect: Option<FeatureEffect>,
}

impl MapLayer {
    pub fn new(title: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            title: title.into(),
            kind,
            visible: true,
            renderer: None,
            feature_effect: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_feature_layer(&self) -> bool {
        self.kind == LayerKind::Feature
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayerNode {
    Group {
        title: String,
        children: Vec<LayerNode>,
    },
    Leaf(MapLayer),
}

impl LayerNode {
    pub fn group(title: impl Into<String>, children: Vec<LayerNode>) -> Self {
        LayerNode::Group {
            title: title.into(),
            children,
        }
    }

    pub fn leaf(layer: MapLayer) -> Self {
        LayerNode::Leaf(layer)
    }

    /// Depth-first search for the first leaf titled `title`.
    ///
    /// Group titles are not matched.
    pub fn find_by_title(&self, title: &str) -> Option<&MapLayer> {
        match self {
            LayerNode::Leaf(layer) => (layer.title == title).then_some(layer),
            LayerNode::Group { children, .. } => {
                children.iter().find_map(|c| c.find_by_title(title))
            }
        }
    }

    pub fn find_by_title_mut(&mut self, title: &str) -> Option<&mut MapLayer> {
        match self {
            LayerNode::Leaf(layer) => (layer.title == title).then_some(layer),
            LayerNode::Group { children, .. } => children
                .iter_mut()
                .find_map(|c| c.find_by_title_mut(title)),
        }
    }

    /// Visits every leaf in depth-first order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut dyn FnMut(&'a MapLayer)) {
        match self {
            LayerNode::Leaf(layer) => f(layer),
            LayerNode::Group { children, .. } => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
        }
    }
}

/// The root of the operational layer tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerTree {
    pub roots: Vec<LayerNode>,
}

impl LayerTree {
    pub fn new(roots: Vec<LayerNode>) -> Self {
        Self { roots }
    }

    pub fn find_by_title(&self, title: &str) -> Option<&MapLayer> {
        self.roots.iter().find_map(|n| n.find_by_title(title))
    }

    pub fn find_by_title_mut(&mut self, title: &str) -> Option<&mut MapLayer> {
        self.roots
            .iter_mut()
            .find_map(|n| n.find_by_title_mut(title))
    }

    /// Flattened feature layers, depth-first.
    pub fn feature_layers(&self) -> Vec<&MapLayer> {
        let mut out = Vec::new();
        for root in &self.roots {
            root.for_each_leaf(&mut |layer| {
                if layer.is_feature_layer() {
                    out.push(layer);
                }
            });
        }
        out
    }

    /// Thematic layers present in the tree, in tree order.
    pub fn thematic_layers(&self) -> Vec<&MapLayer> {
        self.feature_layers()
            .into_iter()
            .filter(|l| is_thematic_layer(&l.title))
            .collect()
    }

    /// The visible thematic layer, if any.
    ///
    /// Mutual exclusion is enforced by the layer list widget; if several are
    /// visible the first in tree order wins.
    pub fn active_layer(&self) -> Option<&MapLayer> {
        self.thematic_layers().into_iter().find(|l| l.visible)
    }

    pub fn active_title(&self) -> Option<String> {
        self.active_layer().map(|l| l.title.clone())
    }

    /// Returns `false` if no leaf carries `title`.
    pub fn set_visible(&mut self, title: &str, visible: bool) -> bool {
        match self.find_by_title_mut(title) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }
}
