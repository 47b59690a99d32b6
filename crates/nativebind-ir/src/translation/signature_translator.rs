// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translates method descriptors into adapter-aware method signatures.

use crate::analysis::overloaded_methods;
use crate::data::adapter::{AdapterDescriptor, BridgingMarker};
use crate::data::binding::{BoundAdapter, TypeBinding, TypeMappingTable};
use crate::data::descriptor::{ClassDescriptor, Direction, MethodDescriptor, ParameterDescriptor};
use crate::data::signature::{CallResult, GlueParam, MarshalStep, MethodSignature, ParameterSpec, ReturnSpec};
use crate::data::types::{ManagedType, NativeType};
use crate::error::ConfigurationError;
use crate::translation::naming::glue_symbol;
use log::debug;

const SIZE_TYPE: &str = "size_t";
const RETURN_VALUE: &str = "rv";
const RETURN_ADAPTER: &str = "ra";

/// Pick the adapter named by a site's markers. Repeating the same adapter is
/// fine; two different ones is a configuration error.
pub fn select_adapter(
    markers: &[BridgingMarker],
    method: &str,
    site: &str,
) -> Result<Option<AdapterDescriptor>, ConfigurationError> {
    let mut selected: Option<AdapterDescriptor> = None;
    for marker in markers {
        let descriptor = marker.resolve();
        match &selected {
            Some(first) if *first != descriptor => {
                return Err(ConfigurationError::AmbiguousAdapter {
                    method: method.to_string(),
                    site: site.to_string(),
                    first: first.to_string(),
                    second: descriptor.to_string(),
                });
            }
            Some(_) => {}
            None => selected = Some(descriptor),
        }
    }
    Ok(selected)
}

/// Collects the body steps per phase while parameters are translated
#[derive(Default)]
struct BodyBuilder {
    constructs: Vec<MarshalStep>,
    call_args: Vec<String>,
    propagates: Vec<MarshalStep>,
    constructed: Vec<(String, String)>,
}

impl BodyBuilder {
    fn construct(&mut self, var: &str, adapter: &BoundAdapter, args: Vec<String>) {
        self.constructs.push(MarshalStep::Construct {
            var: var.to_string(),
            adapter: adapter.instance.clone(),
            args,
        });
        self.constructed
            .push((var.to_string(), adapter.instance.clone()));
    }

    fn propagate(&mut self, var: &str, groups: &[(String, String)]) {
        self.propagates.push(MarshalStep::Propagate {
            var: var.to_string(),
            assign_args: groups
                .iter()
                .flat_map(|(ptr, size)| [ptr.clone(), format!("*{}", size)])
                .collect(),
            size_target: groups.first().map(|(_, size)| size.clone()),
        });
    }

    /// Deallocation runs in reverse construction order.
    fn finish(mut self, target: String, result: Option<CallResult>, value: Option<String>) -> Vec<MarshalStep> {
        let mut steps = std::mem::take(&mut self.constructs);
        steps.push(MarshalStep::Call {
            target,
            args: self.call_args,
            result,
        });
        steps.append(&mut self.propagates);
        steps.extend(
            self.constructed
                .into_iter()
                .rev()
                .map(|(var, adapter)| MarshalStep::Deallocate { var, adapter }),
        );
        steps.push(MarshalStep::Return { value });
        steps
    }
}

/// Glue pointer/size parameter names for each constructor argument group
fn groups(pointer: &str, size: &str, adapter: &BoundAdapter) -> Vec<(String, String)> {
    (0..adapter.descriptor.arg_count())
        .map(|g| (format!("{}_{}", pointer, g), format!("{}_{}", size, g)))
        .collect()
}

fn group_params(groups: &[(String, String)], element: &NativeType, size_by_pointer: bool) -> Vec<GlueParam> {
    let size = NativeType::new(SIZE_TYPE);
    let size = if size_by_pointer { size.pointer() } else { size };
    groups
        .iter()
        .flat_map(|(ptr, n)| {
            [
                GlueParam::new(ptr.clone(), element.pointer()),
                GlueParam::new(n.clone(), size.clone()),
            ]
        })
        .collect()
}

pub struct SignatureTranslator<'a> {
    table: &'a TypeMappingTable,
}

impl<'a> SignatureTranslator<'a> {
    pub fn new(table: &'a TypeMappingTable) -> Self {
        Self { table }
    }

    /// Translate every method of a class, in declaration order.
    pub fn translate_class(&self, class: &ClassDescriptor) -> Result<Vec<MethodSignature>, ConfigurationError> {
        let overloaded = overloaded_methods(class);
        class
            .methods
            .iter()
            .enumerate()
            .map(|(ordinal, method)| self.translate(class, method, ordinal, overloaded.contains(method.name.as_str())))
            .collect()
    }

    pub fn translate(
        &self,
        class: &ClassDescriptor,
        method: &MethodDescriptor,
        ordinal: usize,
        overloaded: bool,
    ) -> Result<MethodSignature, ConfigurationError> {
        let qualified = format!("{}.{}", class.name, method.name);
        let mut body = BodyBuilder::default();

        let parameters = method
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| self.translate_parameter(&qualified, index, param, &mut body))
            .collect::<Result<Vec<_>, _>>()?;

        let (return_spec, result, value) = self.translate_return(&qualified, method, &mut body)?;

        let overload_types: Vec<ManagedType> = method
            .parameters
            .iter()
            .map(|p| p.managed_type.clone())
            .collect();
        let glue_name = glue_symbol(&class.name, &method.name, overloaded.then_some(overload_types.as_slice()));

        let steps = body.finish(method.native_target().to_string(), result, value);
        let signature = MethodSignature {
            class_name: class.name.clone(),
            method_name: method.name.clone(),
            ordinal,
            glue_name,
            parameters,
            return_spec,
            steps,
        };
        debug!(
            "translated {} -> {} ({} adapters)",
            qualified,
            signature.glue_name,
            signature.construct_count()
        );
        Ok(signature)
    }

    fn translate_parameter(
        &self,
        method: &str,
        index: usize,
        param: &ParameterDescriptor,
        body: &mut BodyBuilder,
    ) -> Result<ParameterSpec, ConfigurationError> {
        let site = param.name.clone().unwrap_or_else(|| format!("arg{}", index));
        if param.managed_type.is_void() {
            return Err(ConfigurationError::VoidParameter {
                method: method.to_string(),
                site,
            });
        }

        let explicit = select_adapter(&param.markers, method, &site)?;
        let binding = self.table.resolve(&param.managed_type, explicit.as_ref(), method)?;

        let glue_params = match &binding.adapter {
            None => {
                let name = format!("arg{}", index);
                if param.direction.propagates() {
                    body.call_args.push(format!("*{}", name));
                    vec![GlueParam::new(name, binding.native_type.pointer())]
                } else {
                    body.call_args.push(name.clone());
                    vec![GlueParam::new(name, binding.native_type.clone())]
                }
            }
            Some(adapter) => {
                let var = format!("a{}", index);
                let groups = groups(&format!("p{}", index), &format!("n{}", index), adapter);
                let args = groups
                    .iter()
                    .flat_map(|(ptr, size)| match param.direction {
                        Direction::In => [ptr.clone(), size.clone()],
                        Direction::InOut => [ptr.clone(), format!("*{}", size)],
                        Direction::Out => ["nullptr".to_string(), "0".to_string()],
                    })
                    .collect();
                body.construct(&var, adapter, args);
                body.call_args
                    .push(format!("static_cast<{}&>({})", adapter.counterpart, var));
                if param.direction.propagates() {
                    body.propagate(&var, &groups);
                }
                group_params(&groups, &adapter.element, param.direction.propagates())
            }
        };

        Ok(ParameterSpec {
            index,
            name: site,
            managed_type: param.managed_type.clone(),
            direction: param.direction,
            binding,
            glue_params,
        })
    }

    /// Return values resolve like parameters with direction "out".
    fn translate_return(
        &self,
        method: &str,
        descriptor: &MethodDescriptor,
        body: &mut BodyBuilder,
    ) -> Result<(ReturnSpec, Option<CallResult>, Option<String>), ConfigurationError> {
        let managed_type = descriptor.return_type.clone();
        if managed_type.is_void() {
            let spec = ReturnSpec {
                binding: TypeBinding::direct(managed_type.clone(), NativeType::void()),
                managed_type,
                glue_return: NativeType::void(),
                glue_params: vec![],
            };
            return Ok((spec, None, None));
        }

        let explicit = select_adapter(&descriptor.return_markers, method, "return")?;
        let binding = self.table.resolve(&managed_type, explicit.as_ref(), method)?;

        match binding.adapter.clone() {
            None => {
                let result = CallResult::Direct {
                    var: RETURN_VALUE.to_string(),
                    ty: binding.native_type.clone(),
                };
                let spec = ReturnSpec {
                    managed_type,
                    glue_return: binding.native_type.clone(),
                    binding,
                    glue_params: vec![],
                };
                Ok((spec, Some(result), Some(RETURN_VALUE.to_string())))
            }
            Some(adapter) => {
                let groups = groups("rp", "rn", &adapter);
                // the result adapter is constructed by the call itself
                body.constructed
                    .push((RETURN_ADAPTER.to_string(), adapter.instance.clone()));
                body.propagate(RETURN_ADAPTER, &groups);
                let result = CallResult::Adapter {
                    var: RETURN_ADAPTER.to_string(),
                    adapter: adapter.instance.clone(),
                };
                let spec = ReturnSpec {
                    managed_type,
                    binding,
                    glue_return: NativeType::void(),
                    glue_params: group_params(&groups, &adapter.element, true),
                };
                Ok((spec, Some(result), None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::adapter::VECTOR_ADAPTER;
    use crate::data::types::Primitive;

    fn class_with(method: MethodDescriptor) -> ClassDescriptor {
        ClassDescriptor::new("com.example.Native").method(method)
    }

    #[test]
    fn test_pass_through_has_no_scaffolding() {
        let table = TypeMappingTable::standard();
        let method = MethodDescriptor::new("add")
            .param(ParameterDescriptor::new(ManagedType::Primitive(Primitive::Int)))
            .param(ParameterDescriptor::new(ManagedType::Primitive(Primitive::Int)))
            .returns(ManagedType::Primitive(Primitive::Int));
        let class = class_with(method);
        let sig = SignatureTranslator::new(&table)
            .translate(&class, &class.methods[0], 0, false)
            .unwrap();

        assert!(sig.is_pass_through());
        assert_eq!(sig.construct_count(), 0);
        assert_eq!(sig.deallocate_count(), 0);
        assert_eq!(sig.glue_return().as_str(), "int32_t");
        assert_eq!(sig.steps.len(), 2);
        assert!(matches!(&sig.steps[1], MarshalStep::Return { value: Some(v) } if v == "rv"));
    }

    #[test]
    fn test_string_in_parameter() {
        let table = TypeMappingTable::standard();
        let method = MethodDescriptor::new("length")
            .param(ParameterDescriptor::new(ManagedType::String).named("text"))
            .returns(ManagedType::Primitive(Primitive::Long));
        let class = class_with(method);
        let sig = SignatureTranslator::new(&table)
            .translate(&class, &class.methods[0], 0, false)
            .unwrap();

        let params: Vec<_> = sig.glue_params().map(|p| (p.name.as_str(), p.ty.as_str())).collect();
        assert_eq!(params, vec![("p0_0", "char*"), ("n0_0", "size_t")]);
        assert_eq!(
            sig.steps[0],
            MarshalStep::Construct {
                var: "a0".to_string(),
                adapter: "StringAdapter".to_string(),
                args: vec!["p0_0".to_string(), "n0_0".to_string()],
            }
        );
        assert!(matches!(&sig.steps[1], MarshalStep::Call { args, .. } if args == &vec!["static_cast<std::string&>(a0)".to_string()]));
        assert!(matches!(&sig.steps[2], MarshalStep::Deallocate { var, .. } if var == "a0"));
        assert_eq!(sig.construct_count(), sig.deallocate_count());
    }

    #[test]
    fn test_out_vector_with_two_groups_propagates() {
        let table = TypeMappingTable::standard();
        let pair = AdapterDescriptor::new(VECTOR_ADAPTER, 2).unwrap();
        let method = MethodDescriptor::new("split").param(
            ParameterDescriptor::new(ManagedType::Array(Primitive::Int))
                .with_direction(Direction::Out)
                .with_marker(BridgingMarker::Adapter(pair)),
        );
        let class = class_with(method);
        let sig = SignatureTranslator::new(&table)
            .translate(&class, &class.methods[0], 0, false)
            .unwrap();

        let types: Vec<_> = sig.glue_params().map(|p| p.ty.as_str().to_string()).collect();
        assert_eq!(types, vec!["int32_t*", "size_t*", "int32_t*", "size_t*"]);
        assert!(matches!(&sig.steps[0], MarshalStep::Construct { args, .. } if args == &vec!["nullptr", "0", "nullptr", "0"]));
        assert_eq!(
            sig.steps[2],
            MarshalStep::Propagate {
                var: "a0".to_string(),
                assign_args: vec!["p0_0".into(), "*n0_0".into(), "p0_1".into(), "*n0_1".into()],
                size_target: Some("n0_0".to_string()),
            }
        );
    }

    #[test]
    fn test_adapter_return_is_deallocated_first() {
        let table = TypeMappingTable::standard();
        let method = MethodDescriptor::new("join")
            .param(ParameterDescriptor::new(ManagedType::String))
            .param(ParameterDescriptor::new(ManagedType::String))
            .returns(ManagedType::String);
        let class = class_with(method);
        let sig = SignatureTranslator::new(&table)
            .translate(&class, &class.methods[0], 0, false)
            .unwrap();

        assert!(sig.glue_return().is_void());
        let deallocated: Vec<_> = sig
            .steps
            .iter()
            .filter_map(|s| match s {
                MarshalStep::Deallocate { var, .. } => Some(var.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(deallocated, vec!["ra", "a1", "a0"]);
        assert_eq!(sig.construct_count(), 3);
        assert_eq!(sig.deallocate_count(), 3);
    }

    #[test]
    fn test_out_primitive_is_dereferenced() {
        let table = TypeMappingTable::standard();
        let method = MethodDescriptor::new("read")
            .param(ParameterDescriptor::new(ManagedType::Primitive(Primitive::Double)).with_direction(Direction::InOut));
        let class = class_with(method);
        let sig = SignatureTranslator::new(&table)
            .translate(&class, &class.methods[0], 0, false)
            .unwrap();
        assert_eq!(sig.parameters[0].glue_params[0].ty.as_str(), "double*");
        assert!(matches!(&sig.steps[0], MarshalStep::Call { args, .. } if args == &vec!["*arg0".to_string()]));
    }

    #[test]
    fn test_conflicting_markers_are_fatal() {
        let table = TypeMappingTable::standard();
        let method = MethodDescriptor::new("bad").param(
            ParameterDescriptor::new(ManagedType::Array(Primitive::Byte))
                .named("data")
                .with_marker(BridgingMarker::StdVector)
                .with_marker(BridgingMarker::StdString),
        );
        let class = class_with(method);
        let err = SignatureTranslator::new(&table).translate_class(&class).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::AmbiguousAdapter {
                method: "com.example.Native.bad".to_string(),
                site: "data".to_string(),
                first: "VectorAdapter".to_string(),
                second: "StringAdapter".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_marker_is_not_ambiguous() {
        let markers = [BridgingMarker::StdString, BridgingMarker::StdString];
        let selected = select_adapter(&markers, "m", "s").unwrap().unwrap();
        assert_eq!(selected.name(), "StringAdapter");
    }

    #[test]
    fn test_void_parameter_rejected() {
        let table = TypeMappingTable::standard();
        let class = class_with(MethodDescriptor::new("f").param(ParameterDescriptor::new(ManagedType::Void)));
        assert!(matches!(
            SignatureTranslator::new(&table).translate_class(&class),
            Err(ConfigurationError::VoidParameter { .. })
        ));
    }
}
