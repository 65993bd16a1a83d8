//! Protobuf messages for the subset of the `World` record that gets rendered.
//!
//! `.world` files hold a single proto2 `World` message. Only the fields below
//! are declared; prost skips every other field while decoding.
//!
//! | Tag | Field |
//! |-----|-------|
//! | 3 | `name` |
//! | 4 | `width` |
//! | 5 | `height` |
//! | 6 | `heightMapData` |
//! | 23 | `precipitationData` |
//! | 26 | `temperatureData` |
//! | 34 | `lakemap` |
//! | 35 | `rivermap` |

/// One row of a double matrix.
///
/// proto2 writes repeated scalars unpacked; both encodings decode.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DoubleRow {
    #[prost(double, repeated, packed = "false", tag = "1")]
    pub cells: Vec<f64>,
}

/// A matrix as a list of rows.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DoubleMatrix {
    #[prost(message, repeated, tag = "1")]
    pub rows: Vec<DoubleRow>,
}

/// The top-level world record.
#[derive(Clone, PartialEq, prost::Message)]
pub struct World {
    #[prost(string, optional, tag = "3")]
    pub name: Option<String>,
    #[prost(int32, optional, tag = "4")]
    pub width: Option<i32>,
    #[prost(int32, optional, tag = "5")]
    pub height: Option<i32>,
    #[prost(message, optional, tag = "6")]
    pub height_map_data: Option<DoubleMatrix>,
    #[prost(message, optional, tag = "23")]
    pub precipitation_data: Option<DoubleMatrix>,
    #[prost(message, optional, tag = "26")]
    pub temperature_data: Option<DoubleMatrix>,
    #[prost(message, optional, tag = "34")]
    pub lakemap: Option<DoubleMatrix>,
    #[prost(message, optional, tag = "35")]
    pub rivermap: Option<DoubleMatrix>,
}
