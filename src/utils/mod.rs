pub mod date_bin;
pub mod pagination;
