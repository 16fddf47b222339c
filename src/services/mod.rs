// Venba Core Services

pub mod text_processor;
pub mod config_store;
pub mod providers;
pub mod humanization;
pub mod detection_simulator;

pub use text_processor::*;
pub use config_store::*;
pub use providers::*;
pub use detection_simulator::{simulate_detection, simulate_detection_with, SIMULATED_DETECTORS};

pub use humanization::{
    apply_rules,
    build_prompt,
    Humanizer,
    Session,
    SessionOutcome,
    TextRewriter,
};
