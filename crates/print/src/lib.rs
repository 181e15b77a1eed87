//! Ringside print renderer.
//!
//! Re-renders the layout model the displays play into print-ready markup:
//! one page per layout scene per dataset record, uniformly scaled onto a
//! fixed paper size with the bleed reserved as padding. Markup generation
//! is pure string assembly; turning it into bytes on paper is the document
//! packager's problem.

pub mod markup;
pub mod paper;
pub mod render;

pub use paper::{Orientation, PaperSize, PrintOptions};
pub use render::render_document;
