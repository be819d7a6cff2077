//! Parses `{{Outfitter|outfit=130|addon1|sex=f}}` style template blocks.

use std::collections::HashMap;

use super::descriptor::is_truthy_flag;

/// Key/value parameters of one template invocation. Bare flags map to `"true"`.
/// Unknown keys are kept; callers ignore what they do not need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams {
    values: HashMap<String, String>,
}

impl TemplateParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// A flag counts as set when the key is present and its value is empty or truthy.
    pub fn is_flag_set(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| value.is_empty() || is_truthy_flag(value))
    }

    /// Integer value of `key`; parse failures read as absent.
    pub fn int(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|value| value.trim().parse::<u32>().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.values
    }
}

/// Strip the `{{`/`}}` markers, drop the template name and split the rest on `|`.
pub fn parse_template_params(block: &str) -> TemplateParams {
    let mut body = block.trim();
    if let Some(rest) = body.strip_prefix("{{") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("}}") {
        body = rest;
    }

    let mut values = HashMap::new();
    for part in body.split('|').skip(1) {
        if let Some((key, value)) = part.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        } else {
            let flag = part.trim();
            if !flag.is_empty() {
                values.insert(flag.to_string(), "true".to_string());
            }
        }
    }
    TemplateParams { values }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_pairs_and_bare_flags() {
        let params = parse_template_params("{{Outfitter|outfit=130|addon1|sex=f}}");
        let expected: HashMap<String, String> = [("outfit", "130"), ("addon1", "true"), ("sex", "f")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(params.into_map(), expected);
    }

    #[test]
    fn splits_on_first_equals_and_trims() {
        let params = parse_template_params("  {{Outfitter | note = a=b | addon2 = }}  ");
        assert_eq!(params.get("note"), Some("a=b"));
        assert_eq!(params.get("addon2"), Some(""));
        assert!(params.is_flag_set("addon2"));
    }

    #[test]
    fn template_without_parameters_is_empty() {
        assert!(parse_template_params("{{Outfitter}}").is_empty());
        assert!(parse_template_params("").is_empty());
        assert!(parse_template_params("{{Outfitter||  |}}").is_empty());
    }

    #[test]
    fn flag_values() {
        let params = parse_template_params("{{Outfitter|female=yes|addon1=no|addon2=1}}");
        assert!(params.is_flag_set("female"));
        assert!(!params.is_flag_set("addon1"));
        assert!(params.is_flag_set("addon2"));
        assert!(!params.is_flag_set("missing"));
    }

    #[test]
    fn int_swallows_parse_failures() {
        let params = parse_template_params("{{Outfitter|outfit=266|other=x}}");
        assert_eq!(params.int("outfit"), Some(266));
        assert_eq!(params.int("other"), None);
        assert_eq!(params.int("missing"), None);
    }
}
