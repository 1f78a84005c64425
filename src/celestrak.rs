//! Retrieval of current element sets from CelesTrak
use log::{debug, info};
use reqwest::blocking::Client;
use thiserror::Error;

use crate::tle::Tle;

/// Three line element sets of every active object
pub const ACTIVE_URL: &str = "https://celestrak.org/NORAD/elements/gp.php?GROUP=active";

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("\"{0}\" not found in catalog")]
    NotFound(String),
    #[error("invalid element set: {0}")]
    Tle(#[from] crate::Error),
}

/// Locates the first object whose title line contains `name`
/// in a three line catalog, and parses its element set.
pub fn find_in_catalog(catalog: &str, name: &str) -> Result<Tle, Error> {
    let lines = catalog.lines().map(|l| l.trim_end()).collect::<Vec<_>>();

    let index = lines
        .iter()
        .position(|line| !line.starts_with("1 ") && !line.starts_with("2 ") && line.contains(name))
        .ok_or_else(|| Error::NotFound(name.to_string()))?;

    match (lines.get(index + 1), lines.get(index + 2)) {
        (Some(line1), Some(line2)) => {
            debug!("celestrak: \"{}\" found on line {}", lines[index], index);
            Ok(Tle::new(line1, line2)?.with_name(lines[index]))
        },
        _ => Err(Error::NotFound(name.to_string())),
    }
}

/// Downloads the active catalog and returns the element set of `name`.
/// Single blocking request, no retry.
pub fn fetch(name: &str) -> Result<Tle, Error> {
    let client = Client::builder().build()?;
    info!("celestrak: downloading {}", ACTIVE_URL);
    let catalog = client.get(ACTIVE_URL).send()?.error_for_status()?.text()?;
    find_in_catalog(&catalog, name)
}
