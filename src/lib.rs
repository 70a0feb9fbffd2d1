//! Browser sketch tool: click to place control points, fit a NURBS curve
//! through them with an external geometry kernel, export as a .3dm document.

pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod kernel;
pub mod logger;
pub mod model;
pub mod render;
pub mod state;
