use flows::RenderedPopup;
use serde_json::{Map, Value};

/// What the feature info panel displays.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    /// A feature layer feature; the layer's own popup template applies.
    Feature {
        layer: String,
        attributes: Map<String, Value>,
    },
    /// A flow graphic with its expanded popup.
    Graphic(RenderedPopup),
}

/// Side panel showing the selected feature's popup.
pub trait InfoPanel: Send {
    fn show(&mut self, content: PanelContent);
    fn close(&mut self);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    pub struct PanelLog {
        pub shown: Vec<PanelContent>,
        pub open: bool,
        pub closes: usize,
    }

    #[derive(Clone, Default)]
    pub struct RecordingPanel {
        pub log: Arc<Mutex<PanelLog>>,
    }

    impl InfoPanel for RecordingPanel {
        fn show(&mut self, content: PanelContent) {
            let mut log = self.log.lock().unwrap();
            log.shown.push(content);
            log.open = true;
        }

        fn close(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.open = false;
            log.closes += 1;
        }
    }

    impl RecordingPanel {
        pub fn last(&self) -> Option<PanelContent> {
            self.log.lock().unwrap().shown.last().cloned()
        }

        pub fn is_open(&self) -> bool {
            self.log.lock().unwrap().open
        }
    }
}
