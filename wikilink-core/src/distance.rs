//! Human-readable distances between a feature and its linked entity.
//!
//! Coordinates are WGS84 with `x = longitude`, `y = latitude`.

use geo::{Coord, Distance, Haversine, Point};

use crate::WikidataId;

/// Build a coordinate from an optional latitude/longitude pair.
///
/// Returns `None` unless both parts are present, finite and in range.
///
/// # Examples
/// ```
/// use wikilink_core::distance::location_from_lat_lon;
///
/// let location = location_from_lat_lon(Some(50.0), Some(20.0)).expect("valid pair");
/// assert_eq!((location.y, location.x), (50.0, 20.0));
/// assert!(location_from_lat_lon(None, Some(20.0)).is_none());
/// assert!(location_from_lat_lon(Some(91.0), Some(20.0)).is_none());
/// ```
#[must_use]
pub fn location_from_lat_lon(lat: Option<f64>, lon: Option<f64>) -> Option<Coord<f64>> {
    let (latitude, longitude) = (lat?, lon?);
    (latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude))
    .then_some(Coord {
        x: longitude,
        y: latitude,
    })
}

/// Great-circle distance between two coordinates, in metres.
#[must_use]
pub fn distance_in_metres(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// Render a distance as metres below one kilometre, kilometres above.
///
/// # Examples
/// ```
/// use wikilink_core::distance::format_distance;
///
/// assert_eq!(format_distance(420.4), "420 m");
/// assert_eq!(format_distance(12_345.0), "12.3 km");
/// assert_eq!(format_distance(2_500_000.0), "2500 km");
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion divides metres into kilometres"
)]
pub fn format_distance(metres: f64) -> String {
    if metres < 1_000.0 {
        format!("{metres:.0} m")
    } else if metres < 100_000.0 {
        format!("{:.1} km", metres / 1_000.0)
    } else {
        format!("{:.0} km", metres / 1_000.0)
    }
}

/// Describe how far `entity` lies from `feature`.
///
/// Always returns text. When either side has no location the text names
/// the side that is missing.
#[must_use]
pub fn describe_distance(
    feature: Option<Coord<f64>>,
    entity: Option<Coord<f64>>,
    wikidata_id: &WikidataId,
) -> String {
    match (feature, entity) {
        (Some(from), Some(to)) => format!(
            "wikidata entry {wikidata_id} is located {} from the OSM object",
            format_distance(distance_in_metres(from, to))
        ),
        (None, Some(_)) => format!(
            "the OSM object has no location, so its distance to wikidata entry {wikidata_id} is unknown"
        ),
        (Some(_), None) => format!(
            "wikidata entry {wikidata_id} has no location, so its distance to the OSM object is unknown"
        ),
        (None, None) => format!(
            "neither the OSM object nor wikidata entry {wikidata_id} has a location"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn id() -> WikidataId {
        WikidataId::parse("Q31487").expect("fixture identifier")
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "tolerance check on distances")]
    fn measures_krakow_to_warsaw() {
        let krakow = Coord { x: 19.94, y: 50.06 };
        let warsaw = Coord { x: 21.01, y: 52.23 };
        let metres = distance_in_metres(krakow, warsaw);
        assert!((metres - 252_000.0).abs() < 5_000.0, "got {metres}");
    }

    #[rstest]
    fn describes_known_distance(id: WikidataId) {
        let here = Coord { x: 20.0, y: 50.0 };
        let text = describe_distance(Some(here), Some(here), &id);
        assert_eq!(
            text,
            "wikidata entry Q31487 is located 0 m from the OSM object"
        );
    }

    #[rstest]
    #[case(None, Some(Coord { x: 1.0, y: 1.0 }), "the OSM object has no location")]
    #[case(Some(Coord { x: 1.0, y: 1.0 }), None, "Q31487 has no location")]
    #[case(None, None, "neither the OSM object nor")]
    fn names_missing_side(
        id: WikidataId,
        #[case] feature: Option<Coord<f64>>,
        #[case] entity: Option<Coord<f64>>,
        #[case] expected: &str,
    ) {
        let text = describe_distance(feature, entity, &id);
        assert!(text.contains(expected), "unexpected description {text:?}");
    }

    #[rstest]
    #[case(Some(f64::NAN), Some(0.0))]
    #[case(Some(0.0), Some(181.0))]
    #[case(None, None)]
    fn rejects_unusable_locations(#[case] lat: Option<f64>, #[case] lon: Option<f64>) {
        assert_eq!(location_from_lat_lon(lat, lon), None);
    }
}
