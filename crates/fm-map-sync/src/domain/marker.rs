//! Marker presentation derived from a unit snapshot
//!
//! Everything here is a pure function of a [`Unit`]. The reconciler compares
//! freshly derived values with what a live marker currently shows and only
//! pushes the parts that differ.

use fleet_types::{Coordinates, Unit, UnitId, UnitStatus};
use serde::{Deserialize, Serialize};

/// Fill colour for a status badge.
pub fn status_color(status: UnitStatus) -> &'static str {
    match status {
        UnitStatus::Available => "#10b981",
        UnitStatus::EnRoute => "#0ea5e9",
        UnitStatus::OnScene => "#f43f5e",
        UnitStatus::Unavailable => "#64748b",
    }
}

/// Visual state of a marker element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerAppearance {
    /// Short text drawn inside the badge
    pub badge: String,
    pub status: UnitStatus,
    pub color: String,
    /// Pointer cursor and click dispatch enabled
    pub clickable: bool,
}

impl MarkerAppearance {
    pub fn for_unit(unit: &Unit) -> Self {
        Self {
            badge: unit.id.badge().to_string(),
            status: unit.status,
            color: status_color(unit.status).to_string(),
            clickable: true,
        }
    }
}

/// Popup attached to a marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub lines: Vec<String>,
    pub offset_px: u16,
}

impl PopupContent {
    pub fn for_unit(unit: &Unit, offset_px: u16) -> Self {
        let mut lines = vec![format!("Status: {}", unit.status.label())];
        if let Some(destination) = &unit.destination {
            lines.push(format!("Destination: {}", destination));
        }
        if !unit.last_update.is_empty() {
            lines.push(format!("Updated {}", unit.last_update));
        }

        Self {
            title: unit.label.clone(),
            lines,
            offset_px,
        }
    }

    /// Render as an HTML fragment for web backends.
    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class=\"text-xs\">");
        html.push_str("<p class=\"font-semibold\">");
        html.push_str(&escape_html(&self.title));
        html.push_str("</p>");
        for line in &self.lines {
            html.push_str("<p>");
            html.push_str(&escape_html(line));
            html.push_str("</p>");
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything a backend needs to instantiate a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub unit_id: UnitId,
    pub coordinates: Coordinates,
    pub appearance: MarkerAppearance,
    pub popup: PopupContent,
}

impl MarkerSpec {
    /// `coordinates` must already be validated by the caller.
    pub fn for_unit(unit: &Unit, coordinates: Coordinates, popup_offset_px: u16) -> Self {
        Self {
            unit_id: unit.id.clone(),
            coordinates,
            appearance: MarkerAppearance::for_unit(unit),
            popup: PopupContent::for_unit(unit, popup_offset_px),
        }
    }
}
