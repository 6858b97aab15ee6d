use log::warn;
use regex::Regex;
use toml::Value;
use crate::config::Config;

/// Suggests a category from a transaction description, using the regex rules in the config's
/// `[categories]` table.
pub(crate) struct Categorizer {
    /// Kept in category name order, which is the order rules are tried in.
    rules: Vec<(String, Vec<Regex>)>,
}

impl Categorizer {
    pub(crate) fn new(config: &Config) -> Categorizer {
        let mut rules = vec![];
        for (category, value) in &config.categories {
            let patterns: Vec<&str> = match value {
                Value::Array(regex_array) => regex_array.iter().filter_map(Value::as_str).collect(),
                Value::String(regex) => vec![regex.as_str()],
                _ => {
                    warn!("Category '{category}' rules must be a string or a list of strings");
                    vec![]
                }
            };

            let mut regex_vec = vec![];
            for pattern in patterns {
                match Regex::new(&format!("(?i){pattern}")) {
                    Ok(regex) => regex_vec.push(regex),
                    Err(e) => warn!("Skipping rule '{pattern}' for category '{category}': {e}"),
                }
            }

            if !regex_vec.is_empty() {
                rules.push((category.clone(), regex_vec));
            }
        }

        Categorizer { rules }
    }

    /// First category with a rule matching `description`.
    pub(crate) fn categorize(&self, description: &str) -> Option<&str> {
        if description.is_empty() {
            return None;
        }

        self.rules.iter()
            .find(|(_, regex_vec)| regex_vec.iter().any(|r| r.is_match(description)))
            .map(|(category, _)| category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorizer(toml: &str) -> Categorizer {
        Categorizer::new(&toml::from_str::<Config>(toml).unwrap())
    }

    #[test]
    fn test_categorize() {
        let categorizer = categorizer(r#"
            [categories]
            groceries = ["woolworths", "^coles"]
            transport = "uber|train"
            dining = "uber eats"
        "#);

        assert_eq!(categorizer.categorize("WOOLWORTHS 1234 SYDNEY"), Some("groceries"));
        assert_eq!(categorizer.categorize("coles express"), Some("groceries"));
        assert_eq!(categorizer.categorize("express coles"), None);
        assert_eq!(categorizer.categorize("Train ticket"), Some("transport"));
        // Rules are tried in category name order
        assert_eq!(categorizer.categorize("Uber Eats order"), Some("dining"));
        assert_eq!(categorizer.categorize(""), None);
    }

    #[test]
    fn test_bad_rules_skipped() {
        let categorizer = categorizer(r#"
            [categories]
            broken = "("
            numbers = 42
            ok = "rent"
        "#);

        assert_eq!(categorizer.rules.len(), 1);
        assert_eq!(categorizer.categorize("March rent"), Some("ok"));
    }

    #[test]
    fn test_no_rules() {
        assert_eq!(Categorizer::new(&Config::empty()).categorize("anything"), None);
    }
}
