//! Collection records and the icons shown for them.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub static DEFAULT_ICON: &str = "mdi:trash-can";

/// Labels as they appear in the feed, mapped to their icon.
///
/// Matching is exact, labels not listed here get [`DEFAULT_ICON`].
static ICONS: [(&str, &str); 7] = [
    ("Restmüll", "mdi:trash-can"),
    ("Grünabfall", "mdi:leaf"),
    ("Biomüll", "mdi:leaf"),
    ("Papiertonne", "mdi:package-variant"),
    ("Gelber Sack", "mdi:sack"),
    ("Bildschirm-/Kühlgeräte", "mdi:television-classic"),
    ("Schadstoffsammlung", "mdi:biohazard"),
];

/// Get the icon for a waste type label.
pub fn icon_for(label: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(known, _)| *known == label)
        .map_or(DEFAULT_ICON, |(_, icon)| icon)
}

/// A single scheduled pickup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub icon: String,
}

impl Collection {
    /// Build a record from a feed entry, keeping the label verbatim.
    pub fn new(date: NaiveDate, waste_type: String) -> Self {
        let icon = String::from(icon_for(&waste_type));
        Self {
            date,
            waste_type,
            icon,
        }
    }
}

impl From<(NaiveDate, String)> for Collection {
    fn from((date, waste_type): (NaiveDate, String)) -> Self {
        Collection::new(date, waste_type)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}  {}", self.date, self.waste_type, self.icon)
    }
}
