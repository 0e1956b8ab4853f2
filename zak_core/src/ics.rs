//! Conversion of iCalendar text into pairs of collection date and waste type label.

use std::io::{BufReader, Cursor};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ical::{parser::ical::component::IcalEvent, IcalParser};

/// Converts iCalendar feeds.
///
/// Every event with a `SUMMARY` and a `DTSTART` becomes exactly one entry.
#[derive(Debug, Clone, Default)]
pub struct Ics;

impl Ics {
    /// Parse iCalendar text, keeping the order of the events.
    pub fn convert(&self, ics: &str) -> Result<Vec<(NaiveDate, String)>> {
        let parser = IcalParser::new(BufReader::new(Cursor::new(ics)));
        let mut entries = vec![];
        for ical_calendar_result in parser {
            let ical_calendar = ical_calendar_result.context("invalid iCalendar data")?;
            for ical_event in ical_calendar.events {
                let summary_option = ical_event.get_ical_property_value("SUMMARY");
                let dt_start_option = ical_event.get_ical_property_value("DTSTART");
                let (Some(summary), Some(dt_start)) = (summary_option, dt_start_option) else {
                    continue;
                };
                // DATE and DATE-TIME values both start with the date
                let date =
                    parse_date(dt_start).with_context(|| format!("invalid DTSTART {dt_start:?}"))?;
                entries.push((date, summary.clone()));
            }
        }
        Ok(entries)
    }
}

trait GetIcalProperty {
    fn get_ical_property_value(&self, name: &str) -> Option<&String>;
}

impl GetIcalProperty for IcalEvent {
    fn get_ical_property_value(&self, name: &str) -> Option<&String> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .and_then(|property| property.value.as_ref())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        value.get(0..4)?.parse().ok()?,
        value.get(4..6)?.parse().ok()?,
        value.get(6..8)?.parse().ok()?,
    )
}
