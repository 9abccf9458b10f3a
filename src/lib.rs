#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod export_obj;
pub mod meta;
pub mod model;
pub mod pipeline;
pub mod png;
pub mod remap;
pub mod scene;
pub mod uv;

pub use core::{DVec3, FrameSpan, Space};
pub use error::{VatError, VatResult};
pub use meta::VatMetadata;
pub use model::SceneDoc;
pub use pipeline::{encode_vat, EncodeConfig, EncodeReport, FailurePolicy};
pub use scene::{SceneHost, SceneReader, SceneWriter, TimeCursor, UvApplyOutcome};
