//! Wire types for the distance-matrix response. Only the fields the fee
//! calculation needs are modeled; everything else is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceMatrixResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MatrixElement {
    pub status: String,
    pub distance: Option<DistanceValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceValue {
    /// Meters.
    pub value: i64,
    /// Human-readable rendering, e.g. "25.3 km".
    pub text: String,
}
