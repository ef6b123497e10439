use foundation::GraphicId;

use crate::graphic::Graphic;

/// Which of the two flow overlays a graphics layer holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Lines,
    Points,
}

/// Owned collection of graphics for one overlay.
///
/// Redraws replace the whole collection; there is no incremental diffing.
#[derive(Debug, Clone)]
pub struct GraphicsLayer {
    role: LayerRole,
    entries: Vec<(GraphicId, Graphic)>,
    next_id: u64,
}

impl GraphicsLayer {
    pub fn new(role: LayerRole) -> Self {
        Self {
            role,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    /// Adds graphics and returns their ids in input order.
    pub fn add_many(&mut self, graphics: Vec<Graphic>) -> Vec<GraphicId> {
        let mut ids = Vec::with_capacity(graphics.len());
        for g in graphics {
            let id = GraphicId(self.next_id);
            self.next_id += 1;
            self.entries.push((id, g));
            ids.push(id);
        }
        ids
    }

    /// Clears the layer, then adds `graphics`.
    pub fn replace_all(&mut self, graphics: Vec<Graphic>) -> Vec<GraphicId> {
        self.remove_all();
        self.add_many(graphics)
    }

    pub fn get(&self, id: GraphicId) -> Option<&Graphic> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, g)| g)
    }

    pub fn get_mut(&mut self, id: GraphicId) -> Option<&mut Graphic> {
        self.entries
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, g)| g)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GraphicId, &Graphic)> + '_ {
        self.entries.iter().map(|(id, g)| (*id, g))
    }
}

#[cfg(test)]
mod tests {
    use super::{GraphicsLayer, LayerRole};
    use crate::graphic::{Geometry, Graphic, PopupTemplate};
    use crate::record::MigrationRecord;
    use crate::symbol::Symbol;
    use foundation::{LonLat, Rgba, ZoneId};

    fn graphic() -> Graphic {
        Graphic {
            geometry: Geometry::point(LonLat::new(0.0, 0.0)),
            symbol: Symbol::SimpleLine {
                color: Rgba::WHITE,
                width: 1.0,
            },
            attributes: MigrationRecord::new(ZoneId(1), ZoneId(1)),
            popup: PopupTemplate::new("", ""),
        }
    }

    #[test]
    fn replace_discards_old_graphics_and_never_reuses_ids() {
        let mut layer = GraphicsLayer::new(LayerRole::Points);
        let first = layer.add_many(vec![graphic(), graphic()]);
        assert_eq!(layer.len(), 2);

        let second = layer.replace_all(vec![graphic()]);
        assert_eq!(layer.len(), 1);
        assert!(layer.get(first[0]).is_none());
        assert!(layer.get(second[0]).is_some());
        assert!(!first.contains(&second[0]));

        layer.remove_all();
        assert!(layer.is_empty());
        assert_eq!(layer.role(), LayerRole::Points);
    }
}
