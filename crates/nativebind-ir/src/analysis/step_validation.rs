// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural checks on a marshaling sequence before it is rendered

use crate::data::signature::{CallResult, MarshalStep, MethodSignature};
use crate::error::GenerationError;

/// Check that a signature's steps follow construct, call, propagate,
/// deallocate, return, and that every constructed adapter is released
/// exactly once, in reverse construction order.
pub fn validate_steps(signature: &MethodSignature) -> Result<(), GenerationError> {
    let fail = |reason: String| GenerationError::InconsistentSteps {
        method: format!("{}.{}", signature.class_name, signature.method_name),
        reason,
    };

    if let Some(pair) = signature
        .steps
        .windows(2)
        .find(|pair| pair[0].phase() > pair[1].phase())
    {
        return Err(fail(format!("{:?} appears after {:?}", pair[1], pair[0])));
    }

    let calls = signature
        .steps
        .iter()
        .filter(|s| matches!(s, MarshalStep::Call { .. }))
        .count();
    if calls != 1 {
        return Err(fail(format!("expected one native call, found {}", calls)));
    }
    if !matches!(signature.steps.last(), Some(MarshalStep::Return { .. })) {
        return Err(fail("sequence does not end with a return".to_string()));
    }

    let mut constructed = Vec::new();
    let mut released = Vec::new();
    for step in &signature.steps {
        match step {
            MarshalStep::Construct { var, .. }
            | MarshalStep::Call {
                result: Some(CallResult::Adapter { var, .. }),
                ..
            } => constructed.push(var.as_str()),
            MarshalStep::Propagate { var, .. } if !constructed.contains(&var.as_str()) => {
                return Err(fail(format!("`{}` is propagated but never constructed", var)));
            }
            MarshalStep::Deallocate { var, .. } => released.push(var.as_str()),
            _ => {}
        }
    }
    let expected: Vec<&str> = constructed.iter().rev().copied().collect();
    if released != expected {
        return Err(fail(format!(
            "deallocation order {:?} does not mirror construction order {:?}",
            released, constructed
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::binding::TypeMappingTable;
    use crate::data::descriptor::{ClassDescriptor, MethodDescriptor, ParameterDescriptor};
    use crate::data::types::ManagedType;
    use crate::translation::SignatureTranslator;

    fn concat_signature() -> MethodSignature {
        let class = ClassDescriptor::new("com.example.Text").method(
            MethodDescriptor::new("concat")
                .param(ParameterDescriptor::new(ManagedType::String))
                .param(ParameterDescriptor::new(ManagedType::String))
                .returns(ManagedType::String),
        );
        let table = TypeMappingTable::standard();
        SignatureTranslator::new(&table)
            .translate_class(&class)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_translated_steps_are_valid() {
        assert_eq!(validate_steps(&concat_signature()), Ok(()));
    }

    #[test]
    fn test_missing_deallocation_detected() {
        let mut signature = concat_signature();
        signature
            .steps
            .retain(|s| !matches!(s, MarshalStep::Deallocate { var, .. } if var == "a0"));
        assert!(matches!(
            validate_steps(&signature),
            Err(GenerationError::InconsistentSteps { .. })
        ));
    }

    #[test]
    fn test_out_of_order_steps_detected() {
        let mut signature = concat_signature();
        signature.steps.swap(0, 2);
        assert!(validate_steps(&signature).is_err());
    }
}
