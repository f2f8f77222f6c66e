pub mod calculations;
pub mod crop_coefficient;
pub mod irrigation;
pub mod pipeline;
pub mod reference_et;
pub mod rules;
pub mod season;
pub mod validation;

pub use pipeline::{
    advise, advise_with_reference, compute_irrigation_advice, AdviceReport, AdviceRequest,
};
pub use reference_et::{reference_et, ReferenceEtEstimate};
pub use rules::NotesEngine;
pub use validation::validate_against_reference;
