pub mod audit;
pub mod export;
pub mod grade;
