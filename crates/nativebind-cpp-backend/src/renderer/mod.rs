// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! C++ renderer - pure translation of signatures to source text.
//!
//! Every decision about types and marshaling is made by the translator;
//! the renderer only pattern matches the steps and emits C++.

mod code_writer;
mod function_renderer;
mod header_renderer;
mod unit_renderer;

pub use code_writer::{render_to_string, CodeWriter};
pub use function_renderer::{render_glue_function, render_prototype};
pub use header_renderer::render_header;
pub use unit_renderer::{render_unit, UnitParts};
