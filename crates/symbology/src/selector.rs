//! Field dropdown and the reactions to thematic layer visibility and option
//! selection.

use foundation::ViewId;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::generator::{ContinuousRendererParams, RendererGenerator};
use crate::renderer::{FeatureEffect, finish_renderer};
use crate::thematic::{ThematicOption, options_for};
use crate::tree::LayerTree;
use crate::SymbologyError;

pub const PLACEHOLDER_LABEL: &str = "Select a field to visualize";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    /// Index into the active layer's option table; `None` for the placeholder.
    pub value: Option<usize>,
    pub label: String,
    pub disabled: bool,
}

impl DropdownOption {
    fn placeholder() -> Self {
        Self {
            value: None,
            label: PLACEHOLDER_LABEL.to_string(),
            disabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDropdown {
    options: Vec<DropdownOption>,
    selected_index: usize,
}

impl Default for FieldDropdown {
    fn default() -> Self {
        Self {
            options: vec![DropdownOption::placeholder()],
            selected_index: 0,
        }
    }
}

impl FieldDropdown {
    /// Placeholder first, then one entry per option. The first real option is
    /// selected when there is one.
    pub fn rebuild(&mut self, options: &[ThematicOption]) {
        self.options.clear();
        self.options.push(DropdownOption::placeholder());
        self.options
            .extend(options.iter().enumerate().map(|(idx, opt)| DropdownOption {
                value: Some(idx),
                label: opt.label.to_string(),
                disabled: false,
            }));
        self.selected_index = if options.is_empty() { 0 } else { 1 };
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Option-table index of the selected entry.
    pub fn selected_value(&self) -> Option<usize> {
        self.options
            .get(self.selected_index)
            .and_then(|o| o.value)
    }

    /// Selects the entry whose value is `value`. Returns `false` if absent.
    pub fn select_value(&mut self, value: usize) -> bool {
        match self.options.iter().position(|o| o.value == Some(value)) {
            Some(pos) => {
                self.selected_index = pos;
                true
            }
            None => false,
        }
    }
}

/// What a successful option selection changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRenderer {
    pub layer_title: String,
    pub option: ThematicOption,
}

#[derive(Debug, Default)]
pub struct ActiveLayerSelector {
    dropdown: FieldDropdown,
    active_title: Option<String>,
    basemap: Option<String>,
}

impl ActiveLayerSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_basemap(mut self, basemap: impl Into<String>) -> Self {
        self.basemap = Some(basemap.into());
        self
    }

    pub fn dropdown(&self) -> &FieldDropdown {
        &self.dropdown
    }

    pub fn active_title(&self) -> Option<&str> {
        self.active_title.as_deref()
    }

    /// Options for the currently active layer.
    pub fn current_options(&self) -> &'static [ThematicOption] {
        self.active_title.as_deref().map(options_for).unwrap_or(&[])
    }

    /// Rebuilds the dropdown for whichever thematic layer is now visible.
    ///
    /// The auto-selected option does not regenerate the renderer; only an
    /// explicit selection does.
    pub fn on_visibility_change(&mut self, tree: &LayerTree) -> &FieldDropdown {
        self.active_title = tree.active_title();
        let options = self.current_options();
        self.dropdown.rebuild(options);
        debug!(
            active = ?self.active_title,
            options = options.len(),
            "field dropdown rebuilt"
        );
        &self.dropdown
    }

    /// Generates, post-processes and attaches a renderer for option `idx` of
    /// the active layer.
    pub async fn apply_option(
        &mut self,
        idx: usize,
        tree: &mut LayerTree,
        view: ViewId,
        generator: &dyn RendererGenerator,
    ) -> Result<AppliedRenderer, SymbologyError> {
        let layer_title = tree.active_title().ok_or(SymbologyError::NoActiveLayer)?;
        let option = *options_for(&layer_title)
            .get(idx)
            .ok_or_else(|| SymbologyError::UnknownOption {
                layer: layer_title.clone(),
                index: idx,
            })?;
        self.dropdown.select_value(idx);

        let params = ContinuousRendererParams::for_option(
            &layer_title,
            view,
            &option,
            self.basemap.as_deref(),
        )?;
        let renderer = finish_renderer(generator.create_continuous_renderer(&params).await?);

        // Visibility may have changed while the generator was running.
        let layer = tree
            .find_by_title_mut(&layer_title)
            .ok_or(SymbologyError::NoActiveLayer)?;
        layer.renderer = Some(renderer);
        layer.feature_effect = Some(FeatureEffect::emphasize_non_null(option.field()));
        info!(layer = %layer_title, field = option.field(), "thematic renderer applied");

        Ok(AppliedRenderer {
            layer_title,
            option,
        })
    }

    /// Dropdown change handler. Failures are logged and leave the layer's
    /// previous renderer in place.
    pub async fn on_option_selected(
        &mut self,
        idx: usize,
        tree: &mut LayerTree,
        view: ViewId,
        generator: &dyn RendererGenerator,
    ) -> Option<AppliedRenderer> {
        match self.apply_option(idx, tree, view, generator).await {
            Ok(applied) => Some(applied),
            Err(e @ (SymbologyError::NoActiveLayer | SymbologyError::UnknownOption { .. })) => {
                debug!("option selection ignored: {e}");
                None
            }
            Err(e) => {
                error!("failed to create thematic renderer: {e}");
                None
            }
        }
    }
}
