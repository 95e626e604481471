pub mod color;
pub mod number;
pub mod parsers;
pub mod units;

pub use color::{ColorFormat, format_color, parse_color_value};
pub use number::format_number;
pub use parsers::ValueParseError;
pub use units::{Duration, Size, SizeUnit, TimeUnit};
