//! Report assembly and rendering
//!
//! [`assemble`] joins snapshots, regression results and root-cause notes into
//! a [`Report`]; [`HtmlOutput`] and [`JsonOutput`] turn that into a document.

mod assembler;
mod html;
mod json;

pub use assembler::{
    assemble, assemble_regression, ClassReport, GroupReport, MethodRow, Report, ReportKind,
};
pub use html::HtmlOutput;
pub use json::JsonOutput;
