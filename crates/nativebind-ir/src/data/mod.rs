// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

pub mod adapter;
pub mod binding;
pub mod descriptor;
pub mod signature;
pub mod types;
