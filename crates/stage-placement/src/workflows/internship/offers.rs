use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{EmployeurId, InternshipOffer, OfferId};
use super::memory::InMemoryOfferCatalog;

#[derive(Debug)]
pub enum OfferImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { offer_id: u64, value: String },
    DuplicateOffer(u64),
}

impl std::fmt::Display for OfferImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferImportError::Io(err) => write!(f, "failed to read offer catalog: {}", err),
            OfferImportError::Csv(err) => write!(f, "invalid offer catalog CSV data: {}", err),
            OfferImportError::InvalidDate { offer_id, value } => write!(
                f,
                "offer {} has an invalid start date '{}' (expected YYYY-MM-DD)",
                offer_id, value
            ),
            OfferImportError::DuplicateOffer(id) => {
                write!(f, "offer {} appears more than once in the catalog", id)
            }
        }
    }
}

impl std::error::Error for OfferImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OfferImportError::Io(err) => Some(err),
            OfferImportError::Csv(err) => Some(err),
            OfferImportError::InvalidDate { .. } | OfferImportError::DuplicateOffer(_) => None,
        }
    }
}

impl From<std::io::Error> for OfferImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for OfferImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads the employer offer catalog from a CSV export.
///
/// Expected header: `id,employeur_id,title,remuneration_cents,address,duration_weeks,start_date`.
pub struct OfferImporter;

impl OfferImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryOfferCatalog, OfferImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryOfferCatalog, OfferImportError> {
        Ok(InMemoryOfferCatalog::from_offers(parse_offers(reader)?))
    }
}

pub(crate) fn parse_offers<R: Read>(reader: R) -> Result<Vec<InternshipOffer>, OfferImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut seen = HashSet::new();
    let mut offers = Vec::new();

    for record in csv_reader.deserialize::<OfferRow>() {
        let row = record?;
        if !seen.insert(row.id) {
            return Err(OfferImportError::DuplicateOffer(row.id));
        }
        offers.push(row.into_offer()?);
    }

    Ok(offers)
}

#[derive(Debug, Deserialize)]
struct OfferRow {
    id: u64,
    employeur_id: u64,
    title: String,
    #[serde(default)]
    remuneration_cents: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    duration_weeks: u16,
    start_date: String,
}

impl OfferRow {
    fn into_offer(self) -> Result<InternshipOffer, OfferImportError> {
        let start_date = NaiveDate::parse_from_str(self.start_date.trim(), "%Y-%m-%d").map_err(
            |_| OfferImportError::InvalidDate {
                offer_id: self.id,
                value: self.start_date.clone(),
            },
        )?;

        Ok(InternshipOffer {
            id: OfferId(self.id),
            employeur_id: EmployeurId(self.employeur_id),
            title: self.title,
            remuneration_cents: self.remuneration_cents,
            address: self.address.unwrap_or_default(),
            duration_weeks: self.duration_weeks,
            start_date,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
