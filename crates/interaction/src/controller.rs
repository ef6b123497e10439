//! Click dispatch shared by the primary view and every inset view.
//!
//! Each handler takes the session state by `&mut`, so a click that is still
//! waiting on a query holds the state until it finishes and clicks are
//! processed one at a time.

use std::collections::HashMap;
use std::sync::Arc;

use flows::{CovariatePair, GeometryKind, LayerRole};
use foundation::{GraphicId, ViewId, ZoneId};
use query::{
    FeatureService, REGION_ID_FIELD, covariate_query, fetch_covariates, fetch_migration_records,
    lookup_region_id, zone_id_from_value,
};
use serde_json::{Map, Value};
use symbology::{AppliedRenderer, RendererGenerator};
use tracing::{debug, error, info, warn};

use crate::InteractionError;
use crate::covariates::enrichment_html;
use crate::highlight::{HighlightTarget, Highlighter};
use crate::hit::{HitTarget, object_id, pick_target};
use crate::panel::{InfoPanel, PanelContent};
use crate::state::{AppState, Selection};

/// Feature services the controller queries.
#[derive(Clone)]
pub struct Services {
    pub flows: Arc<dyn FeatureService>,
    pub covariates: Arc<dyn FeatureService>,
    /// Region polygon layers by title, for object-id lookups.
    regions: HashMap<String, Arc<dyn FeatureService>>,
}

impl Services {
    pub fn new(flows: Arc<dyn FeatureService>, covariates: Arc<dyn FeatureService>) -> Self {
        Self {
            flows,
            covariates,
            regions: HashMap::new(),
        }
    }

    pub fn with_region_layer(
        mut self,
        title: impl Into<String>,
        service: Arc<dyn FeatureService>,
    ) -> Self {
        self.regions.insert(title.into(), service);
        self
    }

    pub fn region_layer(&self, title: &str) -> Option<&Arc<dyn FeatureService>> {
        self.regions.get(title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOutcome {
    Loaded { zone: ZoneId, records: usize },
    MissingId,
    QueryFailed { zone: ZoneId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The click came from a view that is not registered.
    UnknownView,
    /// Nothing selectable was hit.
    Cleared,
    Region(RegionOutcome),
    /// A non-polygon feature layer feature.
    Feature { layer: String },
    Line { id: GraphicId, enriched: bool },
    Point { id: GraphicId },
}

pub struct Controller {
    services: Services,
    highlighter: Box<dyn Highlighter>,
    panel: Box<dyn InfoPanel>,
    renderers: Arc<dyn RendererGenerator>,
}

impl Controller {
    pub fn new(
        services: Services,
        highlighter: Box<dyn Highlighter>,
        panel: Box<dyn InfoPanel>,
        renderers: Arc<dyn RendererGenerator>,
    ) -> Self {
        Self {
            services,
            highlighter,
            panel,
            renderers,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Handles a click in `view`, given that view's hit-test results.
    pub async fn handle_click(
        &mut self,
        state: &mut AppState,
        view: ViewId,
        hits: &[HitTarget],
    ) -> ClickOutcome {
        if !state.has_view(view) {
            warn!(%view, "click from unregistered view");
            return ClickOutcome::UnknownView;
        }

        let picked = pick_target(hits, |role, id| state.layer(role).get(id).is_some());
        let Some(target) = picked.cloned() else {
            state.highlight.release();
            self.panel.close();
            state.selection = Selection::Idle;
            return ClickOutcome::Cleared;
        };

        match target {
            HitTarget::Feature {
                layer,
                geometry,
                attributes,
            } => {
                self.click_feature(state, view, layer, geometry, attributes)
                    .await
            }
            HitTarget::Graphic {
                role: LayerRole::Lines,
                id,
            } => self.click_line(state, view, id).await,
            HitTarget::Graphic {
                role: LayerRole::Points,
                id,
            } => self.click_point(state, view, id),
            HitTarget::Other => ClickOutcome::Cleared,
        }
    }

    async fn click_feature(
        &mut self,
        state: &mut AppState,
        view: ViewId,
        layer: String,
        geometry: GeometryKind,
        attributes: Map<String, Value>,
    ) -> ClickOutcome {
        let highlight = HighlightTarget::Feature {
            layer: layer.clone(),
            object_id: object_id(&attributes),
        };
        state
            .highlight
            .acquire(self.highlighter.as_ref(), view, &highlight, geometry);

        let outcome = if geometry == GeometryKind::Polygon {
            ClickOutcome::Region(self.select_region(state, &layer, &attributes).await)
        } else {
            state.selection = Selection::Idle;
            ClickOutcome::Feature {
                layer: layer.clone(),
            }
        };
        self.panel.show(PanelContent::Feature { layer, attributes });
        outcome
    }

    /// Loads the flows of the clicked region. Graphics are not redrawn here.
    async fn select_region(
        &self,
        state: &mut AppState,
        layer: &str,
        attributes: &Map<String, Value>,
    ) -> RegionOutcome {
        let zone = match self.resolve_region_id(layer, attributes).await {
            Ok(zone) => zone,
            Err(e) => {
                error!(?attributes, "cannot load flows: {e}");
                return RegionOutcome::MissingId;
            }
        };

        match fetch_migration_records(self.services.flows.as_ref(), zone).await {
            Ok(records) => {
                let count = records.len();
                state.records = records;
                state.selection = Selection::Region(zone);
                info!(%zone, records = count, "region selected");
                RegionOutcome::Loaded {
                    zone,
                    records: count,
                }
            }
            Err(e) => {
                error!(%zone, "flow query failed: {e}");
                RegionOutcome::QueryFailed { zone }
            }
        }
    }

    /// Zone id from the polygon's attributes, else by object-id lookup on
    /// the polygon's layer.
    async fn resolve_region_id(
        &self,
        layer: &str,
        attributes: &Map<String, Value>,
    ) -> Result<ZoneId, InteractionError> {
        if let Some(zone) = attributes.get(REGION_ID_FIELD).and_then(zone_id_from_value) {
            return Ok(zone);
        }
        let missing = || InteractionError::MissingRegionId {
            layer: layer.to_string(),
        };
        let oid = object_id(attributes).ok_or_else(missing)?;
        let service = self
            .services
            .region_layer(layer)
            .ok_or_else(|| InteractionError::NoRegionService(layer.to_string()))?;
        lookup_region_id(service.as_ref(), oid)
            .await?
            .ok_or_else(missing)
    }

    async fn click_line(&mut self, state: &mut AppState, view: ViewId, id: GraphicId) -> ClickOutcome {
        let target = HighlightTarget::Graphic {
            role: LayerRole::Lines,
            id,
        };
        state
            .highlight
            .acquire(self.highlighter.as_ref(), view, &target, GeometryKind::Polyline);
        state.selection = Selection::Graphic {
            role: LayerRole::Lines,
            id,
        };

        let Some((origin, destination)) = state
            .lines
            .get(id)
            .map(|g| (g.attributes.o_cz, g.attributes.d_cz))
        else {
            return ClickOutcome::Cleared;
        };
        debug!(
            o_cz = %origin,
            d_cz = %destination,
            where_clause = %covariate_query(origin, destination).filter.where_clause(),
            "line clicked"
        );

        let enriched =
            match fetch_covariates(self.services.covariates.as_ref(), origin, destination).await {
                Ok(rows) => {
                    let html = enrichment_html(&CovariatePair::join(&rows, origin, destination));
                    match state.lines.get_mut(id) {
                        Some(graphic) => {
                            graphic.popup.enrich(&html);
                            true
                        }
                        None => false,
                    }
                }
                Err(e) => {
                    error!(%origin, %destination, "covariate query failed: {e}");
                    false
                }
            };

        if let Some(graphic) = state.lines.get(id) {
            self.panel.show(PanelContent::Graphic(graphic.rendered_popup()));
        }
        ClickOutcome::Line { id, enriched }
    }

    fn click_point(&mut self, state: &mut AppState, view: ViewId, id: GraphicId) -> ClickOutcome {
        let target = HighlightTarget::Graphic {
            role: LayerRole::Points,
            id,
        };
        state
            .highlight
            .acquire(self.highlighter.as_ref(), view, &target, GeometryKind::Point);
        state.selection = Selection::Graphic {
            role: LayerRole::Points,
            id,
        };
        if let Some(graphic) = state.points.get(id) {
            self.panel.show(PanelContent::Graphic(graphic.rendered_popup()));
        }
        ClickOutcome::Point { id }
    }

    /// Layer list toggle. Rebuilds the field dropdown for the new active layer.
    pub fn on_layer_visibility(&self, state: &mut AppState, title: &str, visible: bool) -> bool {
        if !state.layers.set_visible(title, visible) {
            return false;
        }
        state.selector.on_visibility_change(&state.layers);
        true
    }

    /// Field dropdown change.
    pub async fn on_field_selected(
        &self,
        state: &mut AppState,
        view: ViewId,
        option: usize,
    ) -> Option<AppliedRenderer> {
        state
            .selector
            .on_option_selected(option, &mut state.layers, view, self.renderers.as_ref())
            .await
    }
}
