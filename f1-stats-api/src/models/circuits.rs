//! Static circuit facts and track outlines, joined with last year's winners.

use crate::components::lap_time;
use crate::models::common::CircuitLocation;
use crate::models::race_winners::{RaceWinner, RaceWinners};
use crate::util::capitalize;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Street,
    Permanent,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRecord {
    pub time: String,
    pub driver: String,
    pub year: String,
    pub time_millis: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitCharacteristics {
    pub length: String,
    pub corners: u32,
    pub drs_zones: u32,
    pub lap_record: LapRecord,
    pub track_type: TrackType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLayout {
    pub width: u32,
    pub height: u32,
    pub view_box: String,
    pub path: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitVisualization {
    pub circuit_id: String,
    pub circuit_name: String,
    pub location: Option<CircuitLocation>,
    pub characteristics: CircuitCharacteristics,
    pub track_layout: Option<TrackLayout>,
    pub recent_winners: Option<Vec<RaceWinner>>,
}

struct CatalogEntry {
    id: &'static str,
    /// Name the upstream API uses, which is what winners are keyed by
    name: &'static str,
    characteristics: CircuitCharacteristics,
    layout: TrackLayout,
}

fn entry(
    id: &'static str,
    name: &'static str,
    (length, corners, drs_zones): (&str, u32, u32),
    (record_time, record_driver, record_year): (&str, &str, &str),
    track_type: TrackType,
    (width, height, path): (u32, u32, &str),
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        characteristics: CircuitCharacteristics {
            length: length.to_string(),
            corners,
            drs_zones,
            lap_record: LapRecord {
                time: record_time.to_string(),
                driver: record_driver.to_string(),
                year: record_year.to_string(),
                time_millis: lap_time::parse(record_time),
            },
            track_type,
        },
        layout: TrackLayout {
            width,
            height,
            view_box: format!("0 0 {} {}", width, height),
            path: path.to_string(),
        },
    }
}

lazy_static! {
    static ref CATALOG: Vec<CatalogEntry> = vec![
        entry(
            "monaco",
            "Circuit de Monaco",
            ("3.337 km", 18, 1),
            ("1:12.909", "Lewis Hamilton", "2019"),
            TrackType::Street,
            (400, 200, "M50,150 Q60,120 80,110 Q100,100 120,105 Q140,110 160,100 Q180,90 200,85 Q220,80 240,90 Q260,100 280,110 Q300,120 320,140 Q340,160 350,180 Q360,190 340,195 Q320,200 300,195 Q280,190 260,185 Q240,180 220,175 Q200,170 180,165 Q160,160 140,155 Q120,160 100,165 Q80,170 60,165 Q40,160 30,150 Q20,140 35,135 Q50,130 50,150"),
        ),
        entry(
            "silverstone",
            "Silverstone Circuit",
            ("5.891 km", 18, 2),
            ("1:24.303", "Max Verstappen", "2020"),
            TrackType::Permanent,
            (400, 300, "M50,250 Q80,220 120,210 Q160,200 200,205 Q240,210 280,220 Q320,230 350,250 Q380,270 370,290 Q360,310 330,315 Q300,320 270,315 Q240,310 210,305 Q180,300 150,295 Q120,290 90,285 Q60,280 40,270 Q20,260 25,240 Q30,220 50,250"),
        ),
        entry(
            "monza",
            "Autodromo Nazionale di Monza",
            ("5.793 km", 11, 3),
            ("1:18.887", "Rubens Barrichello", "2004"),
            TrackType::Permanent,
            (400, 250, "M50,200 L350,200 Q370,200 370,180 Q370,160 350,140 Q330,120 310,110 Q290,100 270,105 Q250,110 230,120 Q210,130 190,140 Q170,150 150,160 L130,170 Q110,180 90,190 Q70,200 50,200"),
        ),
        entry(
            "spa",
            "Circuit de Spa-Francorchamps",
            ("7.004 km", 19, 2),
            ("1:41.252", "Valtteri Bottas", "2018"),
            TrackType::Permanent,
            (400, 280, "M50,220 Q70,200 90,180 Q110,160 130,140 Q150,120 170,110 Q190,100 210,105 Q230,110 250,120 Q270,130 290,140 Q310,150 330,160 Q350,170 360,190 Q370,210 360,230 Q350,250 330,260 Q310,270 290,275 Q270,280 250,275 Q230,270 210,265 Q190,260 170,255 Q150,250 130,245 Q110,240 90,235 Q70,230 50,220"),
        ),
        entry(
            "bahrain",
            "Bahrain International Circuit",
            ("5.412 km", 15, 2),
            ("1:27.264", "Pedro de la Rosa", "2005"),
            TrackType::Permanent,
            (400, 220, "M50,180 Q80,160 120,150 Q160,140 200,145 Q240,150 280,160 Q320,170 350,180 Q370,190 365,200 Q360,210 340,215 Q320,220 300,215 Q280,210 260,205 Q240,200 220,195 Q200,190 180,185 Q160,180 140,175 Q120,170 100,165 Q80,160 60,165 Q40,170 35,175 Q30,180 40,185 Q50,190 50,180"),
        ),
        entry(
            "suzuka",
            "Suzuka International Racing Course",
            ("5.807 km", 18, 1),
            ("1:27.319", "Lewis Hamilton", "2019"),
            TrackType::Permanent,
            (400, 260, "M50,200 Q70,180 100,170 Q130,160 160,155 Q190,150 220,155 Q250,160 280,170 Q310,180 340,200 Q360,220 350,240 Q340,260 310,255 Q280,250 250,245 Q220,240 190,235 Q160,230 130,225 Q100,220 70,215 Q50,210 45,200 Q40,190 50,185 Q60,180 50,200"),
        ),
        entry(
            "interlagos",
            "Autódromo José Carlos Pace",
            ("4.309 km", 15, 2),
            ("1:07.281", "Valtteri Bottas", "2018"),
            TrackType::Permanent,
            (400, 200, "M50,150 Q80,130 120,125 Q160,120 200,125 Q240,130 280,140 Q320,150 350,160 Q370,170 365,185 Q360,200 330,195 Q300,190 270,185 Q240,180 210,175 Q180,170 150,165 Q120,160 90,155 Q60,150 40,145 Q30,140 35,135 Q40,130 50,150"),
        ),
        entry(
            "austin",
            "Circuit of The Americas",
            ("5.513 km", 20, 2),
            ("1:32.029", "Charles Leclerc", "2019"),
            TrackType::Permanent,
            (400, 240, "M50,190 Q70,170 100,160 Q130,150 160,155 Q190,160 220,170 Q250,180 280,190 Q310,200 340,210 Q360,220 355,235 Q350,250 320,245 Q290,240 260,235 Q230,230 200,225 Q170,220 140,215 Q110,210 80,205 Q50,200 40,190 Q30,180 40,175 Q50,170 50,190"),
        ),
    ];
}

fn recent_winners(entry: &CatalogEntry, winners: &RaceWinners) -> Option<Vec<RaceWinner>> {
    winners.get(entry.name).map(|v| vec![v.clone()])
}

/// Details of a single circuit, `None` when the id isn't in the catalog.
///
/// Only the upstream circuit list carries coordinates, so the location is a
/// placeholder derived from the id.
pub fn visualize(id: &str, winners: &RaceWinners) -> Option<CircuitVisualization> {
    let entry = CATALOG.iter().find(|v| v.id == id)?;

    Some(CircuitVisualization {
        circuit_id: entry.id.to_string(),
        circuit_name: entry.name.to_string(),
        location: Some(CircuitLocation {
            lat: "0".to_string(),
            long: "0".to_string(),
            locality: capitalize(entry.id),
            country: "Unknown".to_string(),
        }),
        characteristics: entry.characteristics.clone(),
        track_layout: Some(entry.layout.clone()),
        recent_winners: recent_winners(entry, winners),
    })
}

pub fn visualize_all(winners: &RaceWinners) -> Vec<CircuitVisualization> {
    CATALOG
        .iter()
        .map(|entry| CircuitVisualization {
            circuit_id: entry.id.to_string(),
            circuit_name: entry.name.to_string(),
            location: None,
            characteristics: entry.characteristics.clone(),
            track_layout: Some(entry.layout.clone()),
            recent_winners: recent_winners(entry, winners),
        })
        .collect()
}
