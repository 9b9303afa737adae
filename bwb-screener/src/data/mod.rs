pub mod loader;
pub mod types;

pub use loader::{
    available_slices, load_chain_csv, normalize_columns, quotes_from_frame, select_slice,
    LoaderError, REQUIRED_COLUMNS,
};
pub use types::{BwbCandidate, OptionQuote, OptionType, QuoteSlice};
