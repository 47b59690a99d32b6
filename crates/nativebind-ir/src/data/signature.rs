// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translated, adapter-aware method signatures

use crate::data::binding::{BoundAdapter, TypeBinding};
use crate::data::descriptor::Direction;
use crate::data::types::{ManagedType, NativeType};

/// One parameter of the extern-callable glue function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlueParam {
    pub name: String,
    pub ty: NativeType,
}

impl GlueParam {
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub index: usize,
    pub name: String,
    pub managed_type: ManagedType,
    pub direction: Direction,
    pub binding: TypeBinding,
    /// Glue parameters carrying this managed value
    pub glue_params: Vec<GlueParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnSpec {
    pub managed_type: ManagedType,
    pub binding: TypeBinding,
    /// Return type of the glue function
    pub glue_return: NativeType,
    /// Trailing out-parameters when the value is returned through an adapter
    pub glue_params: Vec<GlueParam>,
}

/// How the native call's result is captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResult {
    Direct { var: String, ty: NativeType },
    /// Constructed with the adapter's counterpart-reference constructor
    Adapter { var: String, adapter: String },
}

impl CallResult {
    pub fn var(&self) -> &str {
        match self {
            CallResult::Direct { var, .. } | CallResult::Adapter { var, .. } => var,
        }
    }
}

/// One step of a glue body. Steps always appear in the order:
/// construct, call, propagate, deallocate, return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalStep {
    Construct {
        var: String,
        adapter: String,
        args: Vec<String>,
    },
    Call {
        target: String,
        args: Vec<String>,
        result: Option<CallResult>,
    },
    Propagate {
        var: String,
        assign_args: Vec<String>,
        size_target: Option<String>,
    },
    Deallocate {
        var: String,
        adapter: String,
    },
    Return {
        value: Option<String>,
    },
}

impl MarshalStep {
    /// Position of this step kind in the fixed body order
    pub fn phase(&self) -> u8 {
        match self {
            MarshalStep::Construct { .. } => 0,
            MarshalStep::Call { .. } => 1,
            MarshalStep::Propagate { .. } => 2,
            MarshalStep::Deallocate { .. } => 3,
            MarshalStep::Return { .. } => 4,
        }
    }
}

/// Native function signature plus marshaling sequence for one exported
/// method. Built once by the translator, read once by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub class_name: String,
    pub method_name: String,
    /// Declaration order of the method within its class
    pub ordinal: usize,
    pub glue_name: String,
    pub parameters: Vec<ParameterSpec>,
    pub return_spec: ReturnSpec,
    pub steps: Vec<MarshalStep>,
}

impl MethodSignature {
    /// Glue parameters in declaration order, return out-parameters last
    pub fn glue_params(&self) -> impl Iterator<Item = &GlueParam> {
        self.parameters
            .iter()
            .flat_map(|p| p.glue_params.iter())
            .chain(self.return_spec.glue_params.iter())
    }

    pub fn glue_return(&self) -> &NativeType {
        &self.return_spec.glue_return
    }

    /// Every adapter bound in this signature, parameters first
    pub fn adapters(&self) -> impl Iterator<Item = &BoundAdapter> {
        self.parameters
            .iter()
            .filter_map(|p| p.binding.adapter.as_ref())
            .chain(self.return_spec.binding.adapter.as_ref())
    }

    /// No adapter scaffolding: a direct 1:1 native mapping
    pub fn is_pass_through(&self) -> bool {
        self.adapters().next().is_none()
    }

    pub fn construct_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    MarshalStep::Construct { .. }
                        | MarshalStep::Call {
                            result: Some(CallResult::Adapter { .. }),
                            ..
                        }
                )
            })
            .count()
    }

    pub fn deallocate_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, MarshalStep::Deallocate { .. }))
            .count()
    }
}
