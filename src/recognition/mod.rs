//! Recognition service boundary.
//!
//! The service is consumed only through its input/output contract: one
//! image in, structured label fields or a transport failure out.

mod client;

pub use client::{
    HttpRecognitionClient, RecognitionClient, RecognitionConfig, RecognitionFields,
    TransportError, EXTRACTION_PROMPT,
};
