//! Utility functions and types

pub mod data_loader;

pub use data_loader::{
    parse_lease_years, records_from_dataframe, records_to_dataframe, save_csv, ColumnMapping, DataLoader,
};
