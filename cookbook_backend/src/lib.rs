pub mod app_config;
pub mod db;
pub mod recipe_service;
