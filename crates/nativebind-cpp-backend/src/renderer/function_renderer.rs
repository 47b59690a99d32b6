// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders one glue function from a translated method signature.

use super::code_writer::CodeWriter;
use crate::prelude::EXPORT_MACRO_NAME;
use nativebind_ir::{CallResult, GlueParam, MarshalStep, MethodSignature};

fn render_params(params: &[&GlueParam], w: &mut CodeWriter) {
    w.write("(");
    if params.is_empty() {
        w.write("void");
    }
    w.sep_with(", ", params, |w, p| write!(w, "{} {}", p.ty, p.name));
    w.write(")");
}

/// `<return> <symbol>(<params>)`, shared by definitions and header declarations.
pub fn render_prototype(signature: &MethodSignature, w: &mut CodeWriter) {
    write!(w, "{} {}", signature.glue_return(), signature.glue_name);
    let params: Vec<&GlueParam> = signature.glue_params().collect();
    render_params(&params, w);
}

fn call_expression(target: &str, args: &[String]) -> String {
    format!("{}({})", target, args.join(", "))
}

fn render_step(step: &MarshalStep, w: &mut CodeWriter) {
    match step {
        MarshalStep::Construct { var, adapter, args } => {
            w.line(&format!("{} {}({});", adapter, var, args.join(", ")));
        }
        MarshalStep::Call { target, args, result } => {
            let call = call_expression(target, args);
            match result {
                None => w.line(&format!("{};", call)),
                Some(CallResult::Direct { var, ty }) => w.line(&format!("{} {} = {};", ty, var, call)),
                Some(CallResult::Adapter { var, adapter }) => w.line(&format!("{} {}({});", adapter, var, call)),
            }
        }
        MarshalStep::Propagate {
            var,
            assign_args,
            size_target,
        } => {
            w.line(&format!("{}.assign({});", var, assign_args.join(", ")));
            if let Some(size) = size_target {
                w.line(&format!("*{} = {}.size;", size, var));
            }
        }
        MarshalStep::Deallocate { var, adapter } => {
            w.line(&format!("{}::deallocate({}.owner);", adapter, var));
        }
        MarshalStep::Return { value } => {
            if let Some(value) = value {
                w.line(&format!("return {};", value));
            }
        }
    }
}

/// Render the exported glue function definition.
pub fn render_glue_function(signature: &MethodSignature, w: &mut CodeWriter) {
    write!(w, "{} ", EXPORT_MACRO_NAME);
    render_prototype(signature, w);
    w.line(" {");
    w.indent();
    for step in &signature.steps {
        render_step(step, w);
    }
    w.dedent();
    w.line("}");
}
