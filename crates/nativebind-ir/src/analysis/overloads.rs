// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::data::descriptor::ClassDescriptor;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Names declared more than once in a class. Their glue symbols need the
/// long, signature-qualified form.
pub fn overloaded_methods(class: &ClassDescriptor) -> BTreeSet<&str> {
    class
        .methods
        .iter()
        .map(|m| m.name.as_str())
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect()
}
