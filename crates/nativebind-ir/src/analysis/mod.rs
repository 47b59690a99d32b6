// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Passes over descriptors and translated signatures

mod declaration_collection;
mod overloads;
mod step_validation;

pub use declaration_collection::{collect_adapter_declarations, collect_includes, AdapterDeclaration};
pub use overloads::overloaded_methods;
pub use step_validation::validate_steps;
