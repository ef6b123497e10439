//! Side panel action bar, threshold slider and draw/clear buttons.

use foundation::format_count;
use tracing::debug;

use crate::state::{AppState, RedrawSummary};

/// Action that opens the About dialog instead of a side panel.
pub const INFO_ACTION: &str = "info-action";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionClick {
    /// The About dialog was opened; panels are untouched.
    About,
    Opened(String),
    /// The clicked panel was already open and is now closed.
    Closed(String),
}

/// Action bar with at most one open side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBar {
    active: Option<String>,
    expanded: bool,
    about_open: bool,
    padding_collapsed: f64,
    padding_expanded: f64,
}

impl ActionBar {
    pub fn new(padding_collapsed: f64, padding_expanded: f64) -> Self {
        Self {
            active: None,
            expanded: false,
            about_open: false,
            padding_collapsed,
            padding_expanded,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_about_open(&self) -> bool {
        self.about_open
    }

    /// All panels close first; the clicked one reopens unless it was the open one.
    pub fn click(&mut self, action: &str) -> ActionClick {
        if action == INFO_ACTION {
            self.about_open = true;
            return ActionClick::About;
        }
        let previous = self.active.take();
        if previous.as_deref() == Some(action) {
            ActionClick::Closed(action.to_string())
        } else {
            self.active = Some(action.to_string());
            ActionClick::Opened(action.to_string())
        }
    }

    /// A panel's own close button was used.
    pub fn on_panel_close(&mut self) -> Option<String> {
        self.active.take()
    }

    pub fn close_about(&mut self) {
        self.about_open = false;
    }

    /// Flips expansion and returns the view's new left padding.
    pub fn toggle(&mut self) -> f64 {
        self.expanded = !self.expanded;
        self.padding_left()
    }

    pub fn padding_left(&self) -> f64 {
        if self.expanded {
            self.padding_expanded
        } else {
            self.padding_collapsed
        }
    }
}

/// Minimum-flow slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSlider {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl ThresholdSlider {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self { min, max, value }
    }

    /// Caption for the end stops; interior values get none.
    pub fn caption(&self, value: f64) -> Option<String> {
        if value == self.min {
            Some(format!("<{} people>", format_count(self.min as u64)))
        } else if value == self.max {
            Some(format!(">{} people", format_count(self.max as u64)))
        } else {
            None
        }
    }
}

/// Slider input: stores the threshold and redraws if records are loaded.
///
/// Non-finite input is ignored.
pub fn on_slider_input(state: &mut AppState, value: f64) -> Option<RedrawSummary> {
    if !value.is_finite() {
        debug!(value, "ignoring non-finite slider input");
        return None;
    }
    state.slider.value = value;
    state.min_value = value;
    state.has_records().then(|| state.redraw())
}

pub fn on_draw_clicked(state: &mut AppState) -> Option<RedrawSummary> {
    state.has_records().then(|| state.redraw())
}

pub fn on_clear_clicked(state: &mut AppState) {
    state.clear_graphics();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use flows::MigrationRecord;
    use foundation::ZoneId;

    #[test]
    fn action_click_toggles_single_panel() {
        let mut bar = ActionBar::new(49.0, 135.0);
        assert_eq!(bar.click("layers"), ActionClick::Opened("layers".into()));
        assert_eq!(bar.click("legend"), ActionClick::Opened("legend".into()));
        assert_eq!(bar.active(), Some("legend"));
        assert_eq!(bar.click("legend"), ActionClick::Closed("legend".into()));
        assert_eq!(bar.active(), None);
    }

    #[test]
    fn info_action_leaves_panels_alone() {
        let mut bar = ActionBar::new(49.0, 135.0);
        bar.click("layers");
        assert_eq!(bar.click(INFO_ACTION), ActionClick::About);
        assert_eq!(bar.active(), Some("layers"));
        assert!(bar.is_about_open());
        bar.close_about();
        assert!(!bar.is_about_open());
        assert_eq!(bar.on_panel_close(), Some("layers".into()));
        assert_eq!(bar.active(), None);
    }

    #[test]
    fn toggle_sets_padding() {
        let mut bar = ActionBar::new(49.0, 135.0);
        assert_eq!(bar.padding_left(), 49.0);
        assert_eq!(bar.toggle(), 135.0);
        assert!(bar.is_expanded());
        assert_eq!(bar.toggle(), 49.0);
    }

    #[test]
    fn slider_captions_only_at_end_stops() {
        let s = ThresholdSlider::new(100.0, 10_000.0, 500.0);
        assert_eq!(s.caption(100.0).as_deref(), Some("<100 people>"));
        assert_eq!(s.caption(10_000.0).as_deref(), Some(">10,000 people"));
        assert_eq!(s.caption(500.0), None);
    }

    #[test]
    fn slider_input_redraws_only_with_records() {
        let mut state = AppState::new(&AppConfig::default());
        assert_eq!(on_slider_input(&mut state, 200.0), None);
        assert_eq!(state.min_value, 200.0);

        state.records = vec![MigrationRecord {
            n: Some(600),
            o_x_coord: Some(-90.0),
            o_y_coord: Some(40.0),
            d_x_coord: Some(-80.0),
            d_y_coord: Some(35.0),
            ..MigrationRecord::new(ZoneId(1), ZoneId(2))
        }];
        assert_eq!(on_slider_input(&mut state, 700.0).map(|s| s.lines), Some(0));
        assert_eq!(on_slider_input(&mut state, 600.0).map(|s| s.lines), Some(1));
        assert_eq!(on_slider_input(&mut state, f64::NAN), None);
        assert_eq!(state.min_value, 600.0);

        on_clear_clicked(&mut state);
        assert!(state.lines.is_empty());
        assert_eq!(on_draw_clicked(&mut state).map(|s| s.lines), Some(1));
    }
}
