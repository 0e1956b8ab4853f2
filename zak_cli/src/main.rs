use std::{fs::read_to_string, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use zak_core::{
    collection::Collection,
    source::{test_cases, Selection, Source, URL, WASTE_TYPES},
};

#[derive(Debug, Parser)]
#[command(about = zak_core::source::DESCRIPTION)]
pub struct Arguments {
    /// the locality code, e.g. `2,3,4`
    #[arg(long, conflicts_with_all = ["config", "test_case"])]
    pub city: Option<String>,
    /// the street code
    #[arg(long, requires = "city")]
    pub street: Option<String>,
    /// a waste type code to request, may be repeated; all types if omitted
    #[arg(long = "type", value_name = "TYPE", requires = "city")]
    pub types: Vec<String>,
    /// read the selection from a JSON file with the keys `city`, `street` and `types`
    #[arg(long, conflicts_with = "test_case")]
    pub config: Option<PathBuf>,
    /// use one of the sample selections
    #[arg(long)]
    pub test_case: Option<String>,
    /// fetch only this year
    #[arg(long)]
    pub year: Option<i32>,
    /// print the collections as JSON
    #[arg(long)]
    pub json: bool,
    /// the calendar server
    #[arg(long, default_value = URL)]
    pub base_url: String,
}

impl Arguments {
    fn selection(&self) -> Result<Selection> {
        if let Some(city) = &self.city {
            let types = if self.types.is_empty() {
                WASTE_TYPES.iter().map(|t| String::from(*t)).collect()
            } else {
                self.types.clone()
            };
            return Ok(Selection {
                city: city.clone(),
                street: self.street.clone(),
                types,
            });
        }
        if let Some(path) = &self.config {
            let config = read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return serde_json::from_str(&config)
                .with_context(|| format!("invalid selection in {}", path.display()));
        }
        if let Some(name) = &self.test_case {
            return test_cases()
                .into_iter()
                .find(|case| case.name == name.as_str())
                .map(|case| case.selection)
                .with_context(|| format!("unknown test case {name:?}"));
        }
        bail!("one of --city, --config or --test-case is required")
    }
}

fn print(collections: &[Collection], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(collections)?);
    } else {
        for collection in collections {
            println!("{collection}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Arguments::parse();
    let source = Source::from_selection(args.selection()?).with_base_url(&args.base_url);
    let collections = match args.year {
        Some(year) => source.fetch_year(year).await?,
        None => source.fetch().await?,
    };
    info!("Fetched {} collections", collections.len());
    print(&collections, args.json)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;
    use zak_core::source::WASTE_TYPES;

    use crate::Arguments;

    #[test]
    fn test_selection_from_arguments() {
        let args = Arguments::parse_from([
            "zak_cli", "--city", "2,3,4", "--street", "3", "--type", "restmuell", "--type",
            "biomuell",
        ]);
        let selection = args.selection().unwrap();
        assert_eq!(selection.city, "2,3,4");
        assert_eq!(selection.street.as_deref(), Some("3"));
        assert_eq!(selection.types, vec!["restmuell", "biomuell"]);
    }

    #[test]
    fn test_selection_defaults_to_all_types() {
        let args = Arguments::parse_from(["zak_cli", "--city", "79"]);
        let selection = args.selection().unwrap();
        assert_eq!(selection.street, None);
        assert_eq!(selection.types.len(), WASTE_TYPES.len());
    }

    #[test]
    fn test_selection_from_config() {
        let mut config = NamedTempFile::new().unwrap();
        write!(
            config,
            r#"{{"city": "2,3,4", "street": "3", "types": ["restmuell", "papiertonne"]}}"#
        )
        .unwrap();
        let path = config.path().to_str().unwrap();
        let selection = Arguments::parse_from(["zak_cli", "--config", path])
            .selection()
            .unwrap();
        assert_eq!(selection.city, "2,3,4");
        assert_eq!(selection.street.as_deref(), Some("3"));
        assert_eq!(selection.types, vec!["restmuell", "papiertonne"]);

        let mut broken = NamedTempFile::new().unwrap();
        write!(broken, r#"{{"street": "3"}}"#).unwrap();
        let path = broken.path().to_str().unwrap();
        assert!(Arguments::parse_from(["zak_cli", "--config", path])
            .selection()
            .is_err());

        let args = Arguments::parse_from(["zak_cli", "--config", "/nonexistent/selection.json"]);
        assert!(args.selection().is_err());
    }

    #[test]
    fn test_selection_from_test_case() {
        let args = Arguments::parse_from(["zak_cli", "--test-case", "Erlaheim"]);
        let selection = args.selection().unwrap();
        assert_eq!(selection.city, "79");
        assert_eq!(selection.street.as_deref(), Some(""));

        let args = Arguments::parse_from(["zak_cli", "--test-case", "Nowhere"]);
        assert!(args.selection().is_err());
    }

    #[test]
    fn test_selection_required() {
        let args = Arguments::parse_from(["zak_cli", "--json"]);
        assert!(args.json);
        assert!(args.selection().is_err());
    }

    #[test]
    fn test_conflicting_selections() {
        let result = Arguments::try_parse_from(["zak_cli", "--city", "79", "--test-case", "Ebingen"]);
        assert!(result.is_err());
    }
}
