pub mod club_interaction;
pub mod db;
pub mod models;
pub mod pagination;
pub mod repos;
