pub mod balance_point;
pub mod degree_days;
pub mod demand;
pub mod linear_fit;
pub mod timeseries;
pub mod units;
