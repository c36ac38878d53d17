//! Inventory AI Common Library
//!
//! Web(WASM)クライアントと共有される型とユーティリティ

pub mod demo;
pub mod error;
pub mod export;
pub mod parser;
pub mod report;
pub mod review;
pub mod session;
pub mod types;

pub use error::{Error, Result};
pub use parser::{extract_error_message, parse_analysis_response};
pub use report::{generate_final_report, Report, ReportClock, Signature, SignatureKind};
pub use review::{Condition, ObjectGroup, ReviewedObject};
pub use session::{FileMeta, SessionPatch, Stage, WorkflowSession};
pub use types::{AnalysisResult, BoundingBox, Prediction};
