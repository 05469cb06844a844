//! Reveal engine configuration

use serde::{Deserialize, Serialize};

use crate::spec::TriggerTemplate;
use crate::table::selector_table;

/// Timing and behavior of the reveal engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Log stuck-hidden corrections at `warn`
    pub debug: bool,
    /// Delay between the document being ready and registration
    pub ready_delay_ms: f64,
    /// Delay between the load event and the fallback sweep
    pub sweep_delay_ms: f64,
    pub sweep_duration_ms: f32,
    /// Quiet period before a resize refreshes trigger geometry
    pub resize_debounce_ms: f64,
    /// Replaces the built-in selector table when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<TriggerTemplate>>,
    /// Appended to the table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_templates: Vec<TriggerTemplate>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            debug: false,
            ready_delay_ms: 100.0,
            sweep_delay_ms: 3000.0,
            sweep_duration_ms: 500.0,
            resize_debounce_ms: 250.0,
            templates: None,
            extra_templates: Vec::new(),
        }
    }
}

impl RevealConfig {
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The effective selector table
    pub fn table(&self) -> Vec<TriggerTemplate> {
        let mut table = self.templates.clone().unwrap_or_else(selector_table);
        table.extend(self.extra_templates.iter().cloned());
        table
    }
}
