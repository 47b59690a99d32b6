// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use nativebind_cpp_backend::{emit, generate_class, write_unit, GeneratorOptions};
use nativebind_ir::{
    AdapterConfig, BridgeError, BridgingMarker, ClassDescriptor, Direction, GenerationError, ManagedType,
    MethodDescriptor, ParameterDescriptor, Primitive, SignatureTranslator, TypeConfig, TypeMappingTable,
};

fn text_class() -> ClassDescriptor {
    ClassDescriptor::new("com.example.Text")
        .include("text.h")
        .method(
            MethodDescriptor::new("length")
                .param(ParameterDescriptor::new(ManagedType::String).named("value"))
                .returns(ManagedType::Primitive(Primitive::Long)),
        )
        .method(
            MethodDescriptor::new("upper")
                .param(ParameterDescriptor::new(ManagedType::String))
                .returns(ManagedType::String),
        )
        .method(
            MethodDescriptor::new("histogram")
                .param(
                    ParameterDescriptor::new(ManagedType::Array(Primitive::Int))
                        .with_direction(Direction::Out)
                        .with_marker(BridgingMarker::StdVector),
                )
                .param(ParameterDescriptor::new(ManagedType::String)),
        )
}

#[test]
fn string_parameter_round_trip_scenario() {
    let class = ClassDescriptor::new("com.example.Log")
        .include("log.h")
        .method(MethodDescriptor::new("write").param(ParameterDescriptor::new(ManagedType::String)));
    let table = TypeMappingTable::standard();
    let unit = generate_class(&class, &table, &GeneratorOptions::default()).unwrap();

    assert!(unit
        .source
        .contains("NATIVEBIND_EXPORT void Java_com_example_Log_write(char* p0_0, size_t n0_0) {"));
    let construct = unit.source.find("StringAdapter a0(p0_0, n0_0);").unwrap();
    let call = unit.source.find("write(static_cast<std::string&>(a0));").unwrap();
    let release = unit.source.find("StringAdapter::deallocate(a0.owner);").unwrap();
    assert!(construct < call && call < release);

    let again = generate_class(&class, &table, &GeneratorOptions::default()).unwrap();
    assert_eq!(unit.source, again.source);
}

#[test]
fn adapters_are_declared_once_per_unit() {
    let table = TypeMappingTable::standard();
    let unit = generate_class(&text_class(), &table, &GeneratorOptions::default()).unwrap();

    assert_eq!(unit.source.matches("class StringAdapter {").count(), 1);
    assert_eq!(unit.source.matches("template<class T> class VectorAdapter {").count(), 1);
    assert_eq!(unit.source.matches("#include <string>").count(), 1);
    assert_eq!(unit.source.matches("#include \"text.h\"").count(), 1);
    assert_eq!(unit.declarations.len(), 2);
}

#[test]
fn glue_functions_follow_declaration_order() {
    let table = TypeMappingTable::standard();
    let class = text_class();
    let mut signatures = SignatureTranslator::new(&table).translate_class(&class).unwrap();
    signatures.reverse();
    let unit = emit(&class, &signatures, &table, &GeneratorOptions::default()).unwrap();

    assert_eq!(
        unit.symbols,
        vec![
            "Java_com_example_Text_length",
            "Java_com_example_Text_upper",
            "Java_com_example_Text_histogram",
        ]
    );
    let positions: Vec<usize> = unit
        .symbols
        .iter()
        .map(|s| unit.source.find(&format!(" {}(", s)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|p| p[0] < p[1]));
}

#[test]
fn dangling_adapter_fails_fast() {
    let mut config = TypeConfig::default();
    config.adapters.insert(
        "HandleAdapter".to_string(),
        AdapterConfig {
            arg_count: 1,
            include: Some("handle_adapter.h".to_string()),
            counterpart: Some("Handle".to_string()),
            element: Some("uint8_t".to_string()),
            instance: None,
        },
    );
    config.types.insert(
        ManagedType::Object("com.example.Handle".to_string()),
        nativebind_ir::TypeBindingConfig::Adapter {
            adapter: "HandleAdapter".to_string(),
        },
    );
    let extended = TypeMappingTable::builder()
        .with_builtin_adapters()
        .apply(config)
        .unwrap()
        .build()
        .unwrap();
    let class = ClassDescriptor::new("com.example.Files").method(
        MethodDescriptor::new("close").param(ParameterDescriptor::new(ManagedType::Object("com.example.Handle".into()))),
    );
    let signatures = SignatureTranslator::new(&extended).translate_class(&class).unwrap();

    let err = emit(&class, &signatures, &TypeMappingTable::standard(), &GeneratorOptions::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<BridgeError>(),
        Some(&BridgeError::Generation(GenerationError::DanglingAdapter {
            method: "com.example.Files.close".to_string(),
            adapter: "HandleAdapter".to_string(),
        }))
    );

    let unit = emit(&class, &signatures, &extended, &GeneratorOptions::default()).unwrap();
    assert!(unit.source.contains("#include \"handle_adapter.h\""));
    assert!(unit.source.contains("HandleAdapter a0(p0_0, n0_0);"));
}

#[test]
fn class_without_methods_is_rejected() {
    let table = TypeMappingTable::standard();
    let err = generate_class(&ClassDescriptor::new("com.example.Empty"), &table, &GeneratorOptions::default())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BridgeError>(),
        Some(BridgeError::Generation(GenerationError::EmptyUnit(_)))
    ));
}

#[test]
fn writes_source_and_header() {
    let dir = tempfile::tempdir().unwrap();
    let options = GeneratorOptions {
        header: true,
        ..Default::default()
    };
    let table = TypeMappingTable::standard();
    let unit = generate_class(&text_class(), &table, &options).unwrap();
    let written = write_unit(&unit, dir.path(), &options).unwrap();

    assert_eq!(written.source, dir.path().join("jnicom_example_Text.cpp"));
    let header_path = written.header.unwrap();
    assert_eq!(header_path, dir.path().join("jnicom_example_Text.h"));

    let header = std::fs::read_to_string(header_path).unwrap();
    assert!(header.contains("#ifndef NATIVEBIND_COM_EXAMPLE_TEXT_H"));
    assert!(header.contains("int64_t Java_com_example_Text_length(char* p0_0, size_t n0_0);"));
    assert!(header.contains("void Java_com_example_Text_upper(char* p0_0, size_t n0_0, char* rp_0, size_t* rn_0);"));
    assert_eq!(std::fs::read_to_string(written.source).unwrap(), unit.source);
}
