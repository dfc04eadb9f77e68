pub mod account_service;
pub mod chart_service;
pub mod db_helper;
pub mod errors;
pub mod excel_service;
