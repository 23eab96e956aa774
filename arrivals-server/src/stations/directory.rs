//! Deduplicated, alphabetised station list for the dropdown.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{Station, StationId};
use crate::mbta::{MbtaError, TransitApi};

/// The selectable stations, unique by name and sorted by name.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
}

impl StationDirectory {
    /// Fetch the station list from the API and build the directory.
    pub async fn fetch(api: &dyn TransitApi) -> Result<Self, MbtaError> {
        let stations = api.fetch_stations().await?;
        Ok(Self::from_stations(stations))
    }

    /// Build a directory from stations in API order.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self {
            stations: build_directory(stations),
        }
    }

    /// Stations in display order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.stations.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Drop stations whose name was already seen (first wins), then sort by name.
///
/// The API lists one stop per platform, so busy stations appear several
/// times under the same name.
pub fn build_directory(stations: Vec<Station>) -> Vec<Station> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Station> = stations
        .into_iter()
        .filter(|s| seen.insert(s.name.clone()))
        .collect();

    unique.sort_by(|a, b| compare_names(&a.name, &b.name));
    unique
}

/// Dictionary-style ordering: letters first, ignoring accents and case;
/// then unaccented before accented; then lowercase before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| s.chars().map(fold_accent).collect::<String>().to_lowercase();

    primary(a)
        .cmp(&primary(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
}

/// Base letter of a Latin-1 accented letter; other characters unchanged.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'À'..='Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è'..='ë' => 'e',
        'È'..='Ë' => 'E',
        'ì'..='ï' => 'i',
        'Ì'..='Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò'..='ö' | 'ø' => 'o',
        'Ò'..='Ö' | 'Ø' => 'O',
        'ù'..='ü' => 'u',
        'Ù'..='Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

/// Lowercase sorts before uppercase in byte order once the cases are swapped.
fn swap_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
