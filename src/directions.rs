use reqwest::Url;
use serde::Deserialize;

use crate::error::{LocatorError, Result};
use crate::pharmacies;
use crate::types::PointOfInterest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    /// Browser fallback, also used when no native maps app can open the link.
    Web,
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| LocatorError::InvalidArgument(format!("{}: {}", url, e)))
}

/// Deep link that opens turn-by-turn directions to `destination`.
pub fn directions_url(destination: &PointOfInterest, platform: Platform) -> Result<String> {
    let latitude = destination.coordinate.latitude();
    let longitude = destination.coordinate.longitude();
    let position = format!("{},{}", latitude, longitude);

    let url = match platform {
        Platform::Ios => {
            let mut url = parse("maps://app")?;
            url.query_pairs_mut()
                .append_pair("daddr", &position)
                .append_pair("q", &destination.name);
            url
        }
        Platform::Android => {
            let mut url = parse(&format!("geo:{}", position))?;
            url.query_pairs_mut()
                .append_pair("q", &format!("{}({})", position, destination.name));
            url
        }
        Platform::Web => {
            let mut url = parse("https://www.google.com/maps/dir/")?;
            url.query_pairs_mut()
                .append_pair("api", "1")
                .append_pair("destination", &position);
            url
        }
    };
    Ok(url.into())
}

/// Directions to a bundled pharmacy by id.
pub fn directions_for(pharmacy_id: &str, platform: Platform) -> Result<String> {
    directions_url(pharmacies::require(pharmacy_id)?, platform)
}
