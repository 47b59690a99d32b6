// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Assembles native toolchain command lines from platform properties.

use crate::options::KeyValue;
use crate::properties::{
    Properties, COMPILER, COMPILER_DEFAULT, COMPILER_OUTPUT, INCLUDE_PATH, INCLUDE_PATH_PREFIX, LINK, LINK_PATH,
    LINK_PATH_PREFIX, LINK_PATH_PREFIX2, LINK_PREFIX, LINK_SUFFIX, LIBRARY_PREFIX, LIBRARY_SUFFIX, PACKAGER, PLATFORM,
};
use anyhow::{anyhow, Result};
use nativebind_cpp_backend::CommandSpec;
use std::path::{Path, PathBuf};

/// Every word of the prefix is its own argument. A prefix ending in a space
/// keeps the value separate (`-o out`), otherwise the value is glued to the
/// last word (`-Iinclude`, `/link /OUT:out.dll`).
fn prefixed(prefix: &str, value: &str) -> Vec<String> {
    let mut args: Vec<String> = prefix.split_whitespace().map(str::to_string).collect();
    match args.pop() {
        Some(last) if !prefix.ends_with(char::is_whitespace) => args.push(format!("{}{}", last, value)),
        Some(last) => args.extend([last, value.to_string()]),
        None => args.push(value.to_string()),
    }
    args
}

fn environment(variables: &[KeyValue]) -> impl Iterator<Item = (String, String)> + '_ {
    variables.iter().map(|kv| (kv.key.clone(), kv.value.clone()))
}

/// File name of a shared library on this platform
pub fn library_file_name(properties: &Properties, name: &str) -> String {
    format!(
        "{}{}{}",
        properties.get_or(LIBRARY_PREFIX, ""),
        name,
        properties.get_or(LIBRARY_SUFFIX, "")
    )
}

/// Compile and link `sources` into one shared library.
///
/// Argument order: platform defaults, include paths, sources, user
/// compiler options, output, link paths, libraries.
pub fn compile_command(
    properties: &Properties,
    sources: &[PathBuf],
    output: &Path,
    compiler_options: &[String],
    environment_variables: &[KeyValue],
) -> Result<CommandSpec> {
    let compiler = properties
        .get(COMPILER)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| anyhow!("property {} is not set", COMPILER))?;

    let mut args: Vec<String> = properties
        .get_or(COMPILER_DEFAULT, "")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let include_prefix = properties.get_or(INCLUDE_PATH_PREFIX, "-I");
    for path in properties.list(INCLUDE_PATH) {
        args.extend(prefixed(include_prefix, &path));
    }

    args.extend(sources.iter().map(|s| s.to_string_lossy().to_string()));
    args.extend(compiler_options.iter().cloned());
    args.extend(prefixed(
        properties.get_or(COMPILER_OUTPUT, "-o "),
        &output.to_string_lossy(),
    ));

    let link_prefix = properties.get_or(LINK_PATH_PREFIX, "-L");
    let rpath_prefix = properties.get_or(LINK_PATH_PREFIX2, "");
    for path in properties.list(LINK_PATH) {
        args.extend(prefixed(link_prefix, &path));
        if !rpath_prefix.is_empty() {
            args.extend(prefixed(rpath_prefix, &path));
        }
    }

    let lib_prefix = properties.get_or(LINK_PREFIX, "-l");
    let lib_suffix = properties.get_or(LINK_SUFFIX, "");
    for library in properties.list(LINK) {
        args.push(format!("{}{}{}", lib_prefix, library, lib_suffix));
    }

    let mut command = CommandSpec::new(compiler)
        .args(args)
        .envs(environment(environment_variables));
    if let Some(dir) = output.parent() {
        command = command.current_dir(dir);
    }
    Ok(command)
}

/// Archive name for a packaging prefix: `<prefix>-<platform>.jar`
pub fn archive_name(properties: &Properties, prefix: &str) -> String {
    format!("{}-{}.jar", prefix, properties.get_or(PLATFORM, "unknown"))
}

/// Bundle `files` (relative to `output_dir`) into one archive.
pub fn package_command(
    properties: &Properties,
    output_dir: &Path,
    archive: &Path,
    files: &[PathBuf],
    environment_variables: &[KeyValue],
) -> CommandSpec {
    let entries = files.iter().flat_map(|file| {
        let relative = file.strip_prefix(output_dir).unwrap_or(file);
        [
            "-C".to_string(),
            output_dir.to_string_lossy().to_string(),
            relative.to_string_lossy().to_string(),
        ]
    });
    CommandSpec::new(properties.get_or(PACKAGER, "jar"))
        .arg("cf")
        .arg(archive.to_string_lossy())
        .args(entries)
        .envs(environment(environment_variables))
        .current_dir(output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed() {
        assert_eq!(prefixed("-I", "/inc"), vec!["-I/inc"]);
        assert_eq!(prefixed("-o ", "out.so"), vec!["-o", "out.so"]);
        assert_eq!(prefixed("", "x"), vec!["x"]);
        assert_eq!(prefixed("/link /OUT:", "a.dll"), vec!["/link", "/OUT:a.dll"]);
    }

    #[test]
    fn test_windows_link_section() {
        let mut properties = Properties::platform("windows-x86_64").unwrap();
        properties.merge_paths(LINK_PATH, &["C:\\lib".to_string()]);
        properties.set(LINK, "codec");

        let command = compile_command(
            &properties,
            &[PathBuf::from("C:\\out\\jnicom_example_Codec.cpp")],
            Path::new("C:\\out\\jniCodec.dll"),
            &["/DNDEBUG".to_string()],
            &[],
        )
        .unwrap();

        assert_eq!(command.program, "cl");
        let tail: Vec<&str> = command
            .args
            .iter()
            .map(String::as_str)
            .skip_while(|a| *a != "/DNDEBUG")
            .collect();
        assert_eq!(
            tail,
            vec![
                "/DNDEBUG",
                "/link",
                "/OUT:C:\\out\\jniCodec.dll",
                "/LIBPATH:C:\\lib",
                "codec.lib",
            ]
        );
    }

    #[test]
    fn test_linux_compile_command() {
        let mut properties = Properties::platform("linux-x86_64").unwrap();
        properties.merge_paths(INCLUDE_PATH, &["/opt/inc".to_string()]);
        properties.merge_paths(LINK_PATH, &["/opt/lib".to_string()]);
        properties.set(LINK, "codec:z");

        let command = compile_command(
            &properties,
            &[PathBuf::from("/out/jnicom_example_Codec.cpp")],
            Path::new("/out/libjniCodec.so"),
            &["-DNDEBUG".to_string()],
            &["CCACHE_DIR=/tmp/cc".parse().unwrap()],
        )
        .unwrap();

        assert_eq!(command.program, "g++");
        let tail: Vec<&str> = command
            .args
            .iter()
            .map(String::as_str)
            .skip_while(|a| *a != "-I/opt/inc")
            .collect();
        assert_eq!(
            tail,
            vec![
                "-I/opt/inc",
                "/out/jnicom_example_Codec.cpp",
                "-DNDEBUG",
                "-o",
                "/out/libjniCodec.so",
                "-L/opt/lib",
                "-Wl,-rpath,/opt/lib",
                "-lcodec",
                "-lz",
            ]
        );
        assert!(command.args.contains(&"-fPIC".to_string()));
        assert_eq!(command.env.get("CCACHE_DIR").map(String::as_str), Some("/tmp/cc"));
        assert_eq!(command.current_dir, Some(PathBuf::from("/out")));
    }

    #[test]
    fn test_missing_compiler() {
        let mut properties = Properties::platform("linux-x86_64").unwrap();
        properties.set(COMPILER, "");
        assert!(compile_command(&properties, &[], Path::new("/o/x.so"), &[], &[]).is_err());
    }

    #[test]
    fn test_package_command() {
        let properties = Properties::platform("linux-arm64").unwrap();
        let out = Path::new("/out");
        let archive = out.join(archive_name(&properties, "native"));
        let command = package_command(&properties, out, &archive, &[out.join("libjniA.so")], &[]);
        assert_eq!(command.program, "jar");
        assert_eq!(
            command.args,
            vec!["cf", "/out/native-linux-arm64.jar", "-C", "/out", "libjniA.so"]
        );
    }
}
