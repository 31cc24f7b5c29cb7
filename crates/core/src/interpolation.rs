use std::collections::HashMap;

use indexmap::IndexSet;
use leon::Template;

use crate::error::Result;

/// Find all tokens in all arguments of templates of command, in order of appearance.
pub fn get_tokens(templates: &[Template]) -> IndexSet<String> {
    let mut tokens = IndexSet::new();

    for template in templates {
        for key in template.keys() {
            let _ = tokens.insert((*key).to_string());
        }
    }

    tokens
}

pub fn get_templates<S: AsRef<str>>(command: &[S]) -> Result<Vec<Template<'_>>> {
    let mut templates: Vec<Template> = Vec::new();

    for argument in command {
        templates.push(Template::parse(argument.as_ref())?);
    }

    Ok(templates)
}

/// Renders every template into exactly one argument.
///
/// A value containing spaces stays a single argument; nothing is shell-split.
pub fn interpolate_command(
    context: &HashMap<String, String>,
    templates: &[Template],
) -> Result<Vec<String>> {
    let mut interpolated_arguments: Vec<String> = Vec::new();

    for template in templates {
        interpolated_arguments.push(template.render(context)?);
    }

    Ok(interpolated_arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_get_tokens_in_order() {
        let command = ["bam-load", "-o", "{output}", "{input}"];
        let templates = get_templates(&command).unwrap();
        let tokens = get_tokens(&templates);

        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
        assert_eq!(tokens, ["output", "input"]);
    }

    #[test]
    fn test_get_tokens_deduplicates() {
        let command = ["{file}", "{file}.bak"];
        let templates = get_templates(&command).unwrap();
        assert_eq!(get_tokens(&templates).len(), 1);
    }

    #[test]
    fn test_interpolate_keeps_spaces_in_one_argument() {
        let command = ["sra-validator", "{file}"];
        let templates = get_templates(&command).unwrap();
        let rendered =
            interpolate_command(&context(&[("file", "/data/my run.sra")]), &templates).unwrap();

        assert_eq!(rendered, ["sra-validator", "/data/my run.sra"]);
    }

    #[test]
    fn test_interpolate_missing_value() {
        let command = ["prefetch", "{accession}"];
        let templates = get_templates(&command).unwrap();
        let result = interpolate_command(&HashMap::new(), &templates);

        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_get_templates_parse_error() {
        let result = get_templates(&["{unterminated"]);
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
