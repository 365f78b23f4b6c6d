// Application layer - Use case interactors

pub mod inspect_interactor;
pub mod mux_interactor;

// Re-export interactors
pub use inspect_interactor::InspectInteractor;
pub use mux_interactor::{BatchReport, MuxInteractor};
