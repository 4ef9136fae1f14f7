mod event;
mod row;
mod token;

pub use event::{Execution, HistoryElement};
pub use row::{HEADERS, Row, format_utc_date};
pub use token::TokenInfo;
