//! Anchor-based form layout
//!
//! A [`FormLayout`] owns an arena of anchors, a [`Container`] attaches
//! children to them through [`Constraints`] and the [`solver`] turns the
//! whole graph into integer positions on every layout pass.

pub mod anchor;
pub mod config;
pub mod constraints;
pub mod container;
pub mod error;
pub mod form;
pub mod solver;
pub mod types;

pub use anchor::{Anchor, AnchorGraph, AnchorId, Orientation};
pub use config::LayoutConfig;
pub use constraints::{Axis, Constraints, Slot};
pub use container::{Component, Container};
pub use error::LayoutError;
pub use form::FormLayout;
pub use solver::{split_evenly, Demand, Solution, Solver};
pub use types::*;
