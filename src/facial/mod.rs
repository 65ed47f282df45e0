//! Client for the face-recognition microservice.
//!
//! The service does the biometric matching and stores enrolment photos; this
//! crate only sends it images and the list of candidates.

pub mod client;
pub mod error;
pub mod types;

pub use client::{FaceRecognitionClient, ReconhecedorFacial};
pub use error::FacialError;
pub use types::{ColaboradorFacial, ReconhecimentoRequest, UploadFacialRequest};
