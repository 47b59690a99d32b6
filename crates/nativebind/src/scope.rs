// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Class and package selection

use std::fmt;
use std::str::FromStr;

/// Which classes a build processes.
///
/// `com.example.*` selects direct members of `com.example`,
/// `com.example.**` the package and all its sub-packages, and a bare name
/// exactly one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassScope {
    Class(String),
    Package(String),
    Recursive(String),
}

fn package_of(class_name: &str) -> &str {
    class_name.rsplit_once('.').map_or("", |(package, _)| package)
}

impl ClassScope {
    pub fn matches(&self, class_name: &str) -> bool {
        match self {
            ClassScope::Class(name) => name == class_name,
            ClassScope::Package(package) => package_of(class_name) == package,
            ClassScope::Recursive(package) => {
                let class_package = package_of(class_name);
                package.is_empty()
                    || class_package == package
                    || class_package
                        .strip_prefix(package.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            }
        }
    }

    /// Whether any of the scopes selects the class. No scopes selects everything.
    pub fn any_matches(scopes: &[ClassScope], class_name: &str) -> bool {
        scopes.is_empty() || scopes.iter().any(|s| s.matches(class_name))
    }
}

impl FromStr for ClassScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let scope = if let Some(package) = name.strip_suffix("**") {
            ClassScope::Recursive(package.trim_end_matches('.').to_string())
        } else if let Some(package) = name.strip_suffix('*') {
            ClassScope::Package(package.trim_end_matches('.').to_string())
        } else {
            ClassScope::Class(name.to_string())
        };
        Ok(scope)
    }
}

impl fmt::Display for ClassScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassScope::Class(name) => write!(f, "{}", name),
            ClassScope::Package(package) if package.is_empty() => write!(f, "*"),
            ClassScope::Package(package) => write!(f, "{}.*", package),
            ClassScope::Recursive(package) if package.is_empty() => write!(f, "**"),
            ClassScope::Recursive(package) => write!(f, "{}.**", package),
        }
    }
}
