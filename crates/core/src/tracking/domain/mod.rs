pub mod tracker;
pub mod tracking_controller;
