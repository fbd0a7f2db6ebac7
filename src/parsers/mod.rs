pub mod table;


pub use table::{parse_page, parse_price, parse_symbol};
