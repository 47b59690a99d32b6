// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Search path and option list merging

/// Append `value` to a separator-joined path list. An empty list, or one
/// that already ends with the separator, is concatenated directly.
pub fn merge_path(existing: &str, value: &str, separator: &str) -> String {
    if existing.is_empty() || existing.ends_with(separator) {
        format!("{}{}", existing, value)
    } else {
        format!("{}{}{}", existing, separator, value)
    }
}

/// Merge each value into the list, one at a time, in order.
pub fn merge_paths<'a, I>(existing: &str, values: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .fold(existing.to_string(), |merged, value| merge_path(&merged, value, separator))
}

/// Plural option values followed by the singular one, if set.
pub fn merge_list(plural: &[String], singular: Option<&String>) -> Vec<String> {
    plural.iter().chain(singular).cloned().collect()
}

/// Split a separator-joined list, dropping empty entries.
pub fn split_paths<'a>(value: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    value
        .split(separator)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_with_separator() {
        assert_eq!(merge_path("/a:/b", "/c", ":"), "/a:/b:/c");
    }

    #[test]
    fn test_merge_into_empty_has_no_leading_separator() {
        assert_eq!(merge_path("", "/c", ":"), "/c");
    }

    #[test]
    fn test_merge_after_trailing_separator() {
        assert_eq!(merge_path("/a;", "/c", ";"), "/a;/c");
    }

    #[test]
    fn test_merge_many_in_order() {
        let values = vec!["/x".to_string(), "/y".to_string()];
        assert_eq!(merge_paths("/a", &values, ":"), "/a:/x:/y");
        assert_eq!(merge_paths("", &values, ":"), "/x:/y");
    }

    #[test]
    fn test_merge_list_appends_singular_last() {
        let plural = vec!["a".to_string(), "b".to_string()];
        assert_eq!(merge_list(&plural, Some(&"c".to_string())), vec!["a", "b", "c"]);
        assert_eq!(merge_list(&[], None), Vec::<String>::new());
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(split_paths("/a::/b: ", ":").collect::<Vec<_>>(), vec!["/a", "/b"]);
    }
}
