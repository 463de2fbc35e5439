//! SVG renderer for anchor diagrams
//!
//! This module takes a laid out container and its diagram and produces an
//! SVG string with appropriate CSS classes for styling.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, render_svg_with_stylesheet};
