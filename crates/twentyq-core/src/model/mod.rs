pub mod answer;
pub mod candidate;
pub mod catalog;
pub mod question;
