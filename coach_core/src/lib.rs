//! Core engine for a cube trainer: replay a scramble/solution on a 3x3
//! simulator, interpret solve progress (cross, F2L, last layer) from a
//! rotation-independent state signature, canonicalize last-layer patterns
//! against a compiled case corpus, and suggest ranked continuations.
//!
//! The rich-text editor, 3D renderer, and persistence layers are external
//! collaborators; they feed this crate a move list or a scene snapshot and
//! consume [`progress::StepInfo`] and [`suggest::Suggestion`] values.
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines)]

pub mod canonical;
pub mod cube;
pub mod index;
pub mod model;
pub mod moves;
pub mod progress;
pub mod suggest;
pub mod tables;

pub use cube::{Color, CubeState, Simulator};
pub use model::{ArrayStateReader, CubeModel, SceneReader, Signature, StructuralError};
pub use progress::{StepInfo, StepTag};
pub use suggest::{Advisor, Suggestion};
