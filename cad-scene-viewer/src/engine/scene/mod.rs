//! Scene graph composition for the loaded CAD models.
//!
//! Owns the named handles of the three model roots and the attach step
//! that adds a loaded model to the world.

/// Model root handles, spawn tracking and the attach helper.
pub mod models;
