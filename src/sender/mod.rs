pub mod client;
pub mod serialization;

pub use client::{
    ClientConfig, ClientStats, ConnectionStats, HttpIngestClient, IngestClient, IngestError,
    IngestFailure, IngestStatus,
};
pub use serialization::{BatchSerializer, CONTENT_TYPE_JSON, SerializationError};
