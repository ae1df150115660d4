//! Tutorial orchestration: step definitions, completion checks and the
//! session engine.

pub mod engine;
pub mod step_validator;
pub mod steps;

// === Session engine ===
// The single-writer session object every host drives
pub use engine::TutorialEngine;

// === Step definitions ===
// The two curricula and their rule types
pub use steps::{gui_steps, terminal_steps, GuiAction, StepConfig, ValidationRule};

// === Completion checks ===
// Repository-state evaluation of a step's rules
pub use step_validator::StepValidator;
