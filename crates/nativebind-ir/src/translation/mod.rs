// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Descriptor to signature translation

pub mod naming;
mod signature_translator;

pub use naming::{glue_symbol, mangle};
pub use signature_translator::{select_adapter, SignatureTranslator};
