//! Static catalog for the Brazil → USA corridor.

use crate::flights::types::{FlightRecord, Source};

/// Major Brazilian airports queried for departures, in processing order.
pub const BRAZILIAN_AIRPORTS: &[Source] = &[
    Source::new("SBGR", "São Paulo/Guarulhos"),
    Source::new("SBBR", "Brasília"),
    Source::new("SBGL", "Rio de Janeiro/Galeão"),
    Source::new("SBRF", "Recife"),
    Source::new("SBSV", "Salvador"),
    Source::new("SBCT", "Curitiba"),
    Source::new("SBPA", "Porto Alegre"),
    Source::new("SBEG", "Manaus"),
];

/// Freighter type designators dropped unless cargo is requested.
/// Matched as substrings of `aircraft_type`.
pub const CARGO_AIRCRAFT_TYPES: &[&str] = &["B74F", "B77F", "MD11F", "A30F"];

/// Origin/destination relation a flight must satisfy to be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corridor {
    /// ICAO prefix of the origin airport (`SB` = Brazil).
    pub origin_prefix: &'static str,
    /// ICAO prefix of the destination airport (`K` = contiguous US).
    pub destination_prefix: &'static str,
    /// Tag written to `route_type` on matching flights.
    pub label: &'static str,
}

pub const BRAZIL_USA: Corridor = Corridor {
    origin_prefix: "SB",
    destination_prefix: "K",
    label: "Brasil-EUA",
};

impl Corridor {
    /// Both endpoint codes must be present and carry the corridor prefixes.
    pub fn matches(&self, flight: &FlightRecord) -> bool {
        match (flight.origin_icao(), flight.destination_icao()) {
            (Some(origin), Some(destination)) => {
                origin.starts_with(self.origin_prefix)
                    && destination.starts_with(self.destination_prefix)
            }
            _ => false,
        }
    }
}

/// True when `aircraft_type` contains any of the freighter designators.
pub fn is_cargo(flight: &FlightRecord) -> bool {
    flight
        .aircraft_type()
        .is_some_and(|ty| CARGO_AIRCRAFT_TYPES.iter().any(|cargo| ty.contains(cargo)))
}
