//! Decoded world snapshots.
//!
//! A [`Snapshot`] holds the five renderable matrices of one `.world` file.
//! It is built once per input by the decoder and only read afterwards.

use prost::Message;

use crate::error::Result;
use crate::layer::Layer;
use crate::matrix::Matrix;
use crate::schema;

/// The renderable contents of one world record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// World name stored in the record, if any.
    pub name: Option<String>,
    /// Declared world width in cells.
    pub width: Option<i32>,
    /// Declared world height in cells.
    pub height: Option<i32>,
    /// Elevation.
    pub height_map: Matrix,
    /// Temperature.
    pub temperature: Matrix,
    /// Precipitation.
    pub precipitation: Matrix,
    /// River flow; 0 where there is no river.
    pub rivers: Matrix,
    /// Lake membership; 0 where there is no lake.
    pub lakes: Matrix,
}

impl Snapshot {
    /// Matrix backing the given output layer.
    pub fn matrix(&self, layer: Layer) -> &Matrix {
        match layer {
            Layer::Height => &self.height_map,
            Layer::Temperature => &self.temperature,
            Layer::Precipitation => &self.precipitation,
            Layer::Rivers => &self.rivers,
            Layer::Lakes => &self.lakes,
        }
    }

    /// Convert a decoded wire message, validating that every matrix is
    /// rectangular. Absent matrices become empty.
    pub(crate) fn from_proto(world: schema::World) -> Result<Self> {
        Ok(Self {
            name: world.name,
            width: world.width,
            height: world.height,
            height_map: matrix_from_proto("heightMapData", world.height_map_data)?,
            temperature: matrix_from_proto("temperatureData", world.temperature_data)?,
            precipitation: matrix_from_proto("precipitationData", world.precipitation_data)?,
            rivers: matrix_from_proto("rivermap", world.rivermap)?,
            lakes: matrix_from_proto("lakemap", world.lakemap)?,
        })
    }

    fn to_proto(&self) -> schema::World {
        schema::World {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            height_map_data: matrix_to_proto(&self.height_map),
            precipitation_data: matrix_to_proto(&self.precipitation),
            temperature_data: matrix_to_proto(&self.temperature),
            lakemap: matrix_to_proto(&self.lakes),
            rivermap: matrix_to_proto(&self.rivers),
        }
    }

    /// Serialize into the `.world` wire format.
    ///
    /// Only the fields this crate reads are written, so the output is a
    /// valid but minimal world record.
    pub fn encode_to_vec(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }
}

fn matrix_from_proto(name: &'static str, matrix: Option<schema::DoubleMatrix>) -> Result<Matrix> {
    match matrix {
        Some(m) => Matrix::from_rows(name, m.rows.iter().map(|row| row.cells.as_slice())),
        None => Ok(Matrix::empty()),
    }
}

fn matrix_to_proto(matrix: &Matrix) -> Option<schema::DoubleMatrix> {
    if matrix.is_empty() {
        return None;
    }
    Some(schema::DoubleMatrix {
        rows: matrix
            .rows()
            .map(|cells| schema::DoubleRow {
                cells: cells.to_vec(),
            })
            .collect(),
    })
}
