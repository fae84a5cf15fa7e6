//! Floating-panel cleanup before capture
//!
//! The dashboard renders a floating tools panel pinned to the bottom of the
//! viewport. Hiding it is a geometry heuristic, not a contract with the page:
//! any element whose class mentions "fixed" and whose box sits in the bottom
//! band of the viewport gets `display: none`, unless it hugs the left edge
//! (that one is the sidebar, which the shot keeps).

use crate::error::{Error, Result};
use chromiumoxide::Page;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Selector for candidate floating elements
pub const FLOATING_SELECTOR: &str = "[class*=\"fixed\"]";

/// An element is "bottom-pinned" when its bottom edge is within this many
/// pixels of the viewport bottom.
pub const BOTTOM_BAND_PX: u32 = 200;

/// Elements whose left edge is within this many pixels of the viewport left
/// are treated as the sidebar and kept.
pub const SIDEBAR_GUARD_PX: u32 = 100;

/// One element hidden by the sweep
#[derive(Debug, Clone, Deserialize)]
pub struct HiddenPanel {
    /// Lower-cased tag name
    pub tag: String,
    /// Full class attribute value
    pub class: String,
    /// Bounding-rect bottom edge, CSS pixels
    pub bottom: f64,
    /// Bounding-rect left edge, CSS pixels
    pub left: f64,
}

/// Result of one declutter pass
#[derive(Debug, Clone, Deserialize)]
pub struct DeclutterSummary {
    /// How many elements matched the selector
    pub scanned: usize,
    /// The elements that were hidden
    pub hidden: Vec<HiddenPanel>,
}

impl DeclutterSummary {
    /// Number of elements hidden
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// The panel-hiding sweep
pub struct Declutter;

impl Declutter {
    /// Build the in-page sweep script from the shipped thresholds
    pub fn sweep_script() -> String {
        format!(
            r#"(() => {{
                const candidates = document.querySelectorAll('{selector}');
                const hidden = [];
                candidates.forEach(el => {{
                    const rect = el.getBoundingClientRect();
                    if (rect.bottom > window.innerHeight - {bottom_band} && rect.left > {sidebar_guard}) {{
                        el.style.display = 'none';
                        hidden.push({{
                            tag: el.tagName.toLowerCase(),
                            class: el.getAttribute('class') || '',
                            bottom: rect.bottom,
                            left: rect.left,
                        }});
                    }}
                }});
                return {{ scanned: candidates.length, hidden: hidden }};
            }})()"#,
            selector = FLOATING_SELECTOR,
            bottom_band = BOTTOM_BAND_PX,
            sidebar_guard = SIDEBAR_GUARD_PX,
        )
    }

    /// Hide bottom-pinned floating panels, keeping the flush-left sidebar
    #[instrument(skip(page))]
    pub async fn hide_bottom_panels(page: &Page) -> Result<DeclutterSummary> {
        let value = page
            .evaluate(Self::sweep_script())
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        let summary: DeclutterSummary = value
            .into_value()
            .map_err(|e| Error::cdp(format!("declutter result: {e}")))?;

        info!(
            "Declutter: scanned {} elements, hid {}",
            summary.scanned,
            summary.hidden_count()
        );
        for panel in &summary.hidden {
            debug!(
                "Hid <{} class=\"{}\"> (bottom={}, left={})",
                panel.tag, panel.class, panel.bottom, panel.left
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_script_embeds_selector() {
        let script = Declutter::sweep_script();
        assert!(script.contains(r#"[class*="fixed"]"#));
    }

    #[test]
    fn test_sweep_script_embeds_thresholds() {
        let script = Declutter::sweep_script();
        assert!(script.contains("window.innerHeight - 200"));
        assert!(script.contains("rect.left > 100"));
    }

    #[test]
    fn test_sweep_script_hides_with_display_none() {
        let script = Declutter::sweep_script();
        assert!(script.contains("el.style.display = 'none'"));
    }

    #[test]
    fn test_summary_deserializes() {
        let summary: DeclutterSummary = serde_json::from_value(serde_json::json!({
            "scanned": 3,
            "hidden": [
                { "tag": "div", "class": "fixed bottom-0", "bottom": 898.0, "left": 320.0 }
            ],
        }))
        .unwrap();
        assert_eq!(summary.scanned, 3);
        assert_eq!(summary.hidden_count(), 1);
        assert_eq!(summary.hidden[0].tag, "div");
    }

    #[test]
    fn test_summary_empty_sweep() {
        let summary: DeclutterSummary = serde_json::from_value(serde_json::json!({
            "scanned": 0,
            "hidden": [],
        }))
        .unwrap();
        assert_eq!(summary.hidden_count(), 0);
    }
}
