pub mod ports;
pub mod search_use_case;
