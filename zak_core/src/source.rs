//! This source fetches the collection calendar of a locality and maps its dates to collection records.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::{collection::Collection, ics::Ics};

pub static TITLE: &str = "Abfall Zollernalbkreis";
pub static DESCRIPTION: &str = "Source for Abfallwirtschaft Zollernalbkreis waste collection.";
pub static URL: &str = "https://www.abfallkalender-zak.de";

/// Category codes the calendar endpoint accepts as `types[]`.
pub static WASTE_TYPES: [&str; 10] = [
    "restmuell",
    "gelbersack",
    "papiertonne",
    "biomuell",
    "gruenabfall",
    "schadstoffsammlung",
    "altpapiersammlung",
    "schrottsammlung",
    "weihnachtsbaeume",
    "elektrosammlung",
];

/// Which calendar to request.
///
/// The keys match the configuration keys of the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Selection {
    /// locality code, may list several districts like `2,3,4`
    pub city: String,
    /// street code, not every locality has one
    pub street: Option<String>,
    /// requested category codes
    pub types: Vec<String>,
}

/// A named sample configuration.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub selection: Selection,
}

/// Sample configurations known to work against the official server.
pub fn test_cases() -> Vec<TestCase> {
    let all_types = || -> Vec<String> { WASTE_TYPES.iter().map(|t| String::from(*t)).collect() };
    vec![
        TestCase {
            name: "Ebingen",
            selection: Selection {
                city: String::from("2,3,4"),
                street: Some(String::from("3")),
                types: all_types(),
            },
        },
        TestCase {
            name: "Erlaheim",
            selection: Selection {
                city: String::from("79"),
                street: Some(String::new()),
                types: all_types(),
            },
        },
    ]
}

/// Outcome of the best-effort fetch of next year's calendar.
#[derive(Debug)]
pub enum NextYear {
    /// Not December, nothing was requested.
    NotRequested,
    Collected(Vec<Collection>),
    /// The fetch failed, whatever the reason.
    Unavailable(anyhow::Error),
}

impl NextYear {
    pub fn into_collections(self) -> Vec<Collection> {
        match self {
            NextYear::Collected(collections) => collections,
            NextYear::NotRequested | NextYear::Unavailable(_) => vec![],
        }
    }
}

#[derive(Debug)]
pub struct Source {
    selection: Selection,
    ics: Ics,
    client: Client,
    base_url: String,
}

impl Source {
    pub fn new(city: impl Into<String>, types: Vec<String>, street: Option<String>) -> Self {
        Self::from_selection(Selection {
            city: city.into(),
            street,
            types,
        })
    }

    pub fn from_selection(selection: Selection) -> Self {
        Self {
            selection,
            ics: Ics::default(),
            client: Client::new(),
            base_url: String::from(URL),
        }
    }

    /// Request the calendar from another server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Get the collections of the current year, and of the next year in December.
    pub async fn fetch(&self) -> Result<Vec<Collection>> {
        self.fetch_at(chrono::Local::now().date_naive()).await
    }

    /// Like [`Source::fetch`], but as if today were `today`.
    ///
    /// Only the fetch for the year of `today` can fail. Next year's calendar is added when it
    /// could be fetched and silently left out otherwise.
    pub async fn fetch_at(&self, today: NaiveDate) -> Result<Vec<Collection>> {
        let mut collections = self.fetch_year(today.year()).await?;
        let next_year = if today.month() == 12 {
            self.fetch_next_year(today.year() + 1).await
        } else {
            NextYear::NotRequested
        };
        collections.extend(next_year.into_collections());
        Ok(collections)
    }

    /// Fetch the collections of `year`, turning any failure into [`NextYear::Unavailable`].
    pub async fn fetch_next_year(&self, year: i32) -> NextYear {
        match self.fetch_year(year).await {
            Ok(collections) => NextYear::Collected(collections),
            Err(err) => {
                debug!("Ignoring the calendar for {year}: {err:#}");
                NextYear::Unavailable(err)
            }
        }
    }

    /// Get the collections of a single year, in feed order.
    pub async fn fetch_year(&self, year: i32) -> Result<Vec<Collection>> {
        let ics = self
            .get_calendar_text(year)
            .await
            .with_context(|| format!("failed to download the calendar for {year}"))?;
        let dates = self
            .ics
            .convert(&ics)
            .with_context(|| format!("failed to parse the calendar for {year}"))?;
        debug!("Got {} collection dates for {year}", dates.len());
        Ok(dates.into_iter().map(Collection::from).collect())
    }

    /// Get the iCalendar text from the official server.
    async fn get_calendar_text(&self, year: i32) -> Result<String> {
        debug!("Requesting the calendar for {year} from {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query(year))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    fn query(&self, year: i32) -> Vec<(&'static str, String)> {
        let mut query = vec![("city", self.selection.city.clone())];
        if let Some(street) = &self.selection.street {
            query.push(("street", street.clone()));
        }
        query.push(("year", year.to_string()));
        query.extend(
            self.selection
                .types
                .iter()
                .map(|waste_type| ("types[]", waste_type.clone())),
        );
        query.push(("go_ics", String::from("Download")));
        query
    }
}
