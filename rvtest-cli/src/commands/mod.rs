pub mod collapse;
pub mod summarize;
