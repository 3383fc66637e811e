pub mod assets;
pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod driver;
pub mod entities;
pub mod error;
pub mod formation;
pub mod input;
pub mod surface;
pub mod terminal;
