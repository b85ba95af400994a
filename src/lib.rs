//! dayalbum: index photo directories into albums and browse them by day.

pub mod browse;
pub mod config;
pub mod db;
pub mod error;
pub mod fsbrowse;
pub mod logging;
pub mod scanner;
pub mod tasks;
pub mod web;
