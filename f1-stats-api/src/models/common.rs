use crate::models::ergast;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    // older drivers have no three letter code
    pub code: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub name: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitLocation {
    pub lat: String,
    pub long: String,
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitDetails {
    pub circuit_id: String,
    pub circuit_name: String,
    pub location: CircuitLocation,
    pub url: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

impl From<ergast::Driver> for Driver {
    fn from(driver: ergast::Driver) -> Self {
        Self {
            code: driver.code,
            given_name: driver.given_name,
            family_name: driver.family_name,
            nationality: driver.nationality,
        }
    }
}

impl From<ergast::Constructor> for Constructor {
    fn from(constructor: ergast::Constructor) -> Self {
        Self {
            name: constructor.name,
            nationality: constructor.nationality,
        }
    }
}

impl From<ergast::Location> for CircuitLocation {
    fn from(location: ergast::Location) -> Self {
        Self {
            lat: location.lat,
            long: location.long,
            locality: location.locality,
            country: location.country,
        }
    }
}

impl From<ergast::Circuit> for CircuitDetails {
    fn from(circuit: ergast::Circuit) -> Self {
        Self {
            circuit_id: circuit.circuit_id,
            circuit_name: circuit.circuit_name,
            location: circuit.location.into(),
            url: circuit.url,
        }
    }
}
