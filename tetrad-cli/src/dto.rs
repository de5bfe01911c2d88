use serde::{Deserialize, Serialize};
use tetrad::chord::ChordPoint;

#[derive(Deserialize, Serialize)]
pub struct ScanDto {
    pub chords: Vec<ChordDto>,
}

#[derive(Deserialize, Serialize)]
pub struct ChordDto {
    pub label: String,
    pub cents: [f64; 3],
    pub complexity: f64,
}

impl From<&ChordPoint> for ChordDto {
    fn from(point: &ChordPoint) -> Self {
        ChordDto {
            label: point.chord.to_string(),
            cents: point.cents,
            complexity: point.complexity,
        }
    }
}
