pub mod canonical;
pub mod dataset;
pub mod reference;
