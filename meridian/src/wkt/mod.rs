//! Well-known text representation of coordinate systems (`GEOGCS[...]`, `PROJCS[...]`).

mod parser;
mod value;
mod writer;

pub use parser::{parse, parse_coordinate_system};
pub use value::WktValue;
pub use writer::ToWkt;
