//! Closing-price data: loading, date parsing, and gap cleaning

mod dates;
mod table;
pub mod loader;

pub use dates::parse_date;
pub use table::{
    coerce_price, forward_backward_fill, CoercedColumn, CoercedTable, PriceColumn, PriceTable,
    RawPriceTable, DATE_COLUMN,
};
pub use loader::{load_default_prices, load_prices, load_prices_from_reader, DataError};
