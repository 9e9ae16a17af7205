//! Built-in guidance content used when the backend cannot provide any.

use crate::backend::FaqCatalog;

pub const DEFAULT_GREETING: &str = "Hello! I can help you analyze your Excel/CSV files and answer questions about your data. What would you like to know?";

pub const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "What are all the column names in this dataset?",
    "How many records are present in the file?",
    "What is the total transportation cost across all consignments?",
];

pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The catalog shown when `faqs` cannot be fetched.
pub fn builtin_faq_catalog() -> FaqCatalog {
    FaqCatalog {
        basic: owned(&[
            "What are all the column names in this dataset?",
            "How many records are present in the file?",
            "How many columns does this dataset contain?",
            "What are the data types of each column?",
            "Which columns contain numerical data?",
            "What date range is covered in this dataset?",
            "Are there any missing or null values in this dataset?",
            "How many unique customers are represented?",
        ]),
        intermediate: owned(&[
            "What is the total transportation cost across all consignments?",
            "What is the total weight of all shipments?",
            "What is the average transportation cost per consignment?",
            "How many consignments use each transportation mode?",
            "What is the total transportation cost by transportation mode?",
        ]),
        advanced: owned(&[
            "Which transportation mode has the highest average transportation cost?",
            "Which source location dispatches the most consignments?",
            "Which customer has the highest number of consignments?",
            "Which source-destination route has the most consignments?",
        ]),
        operational: owned(&[
            "Which consignments have actual or potential delivery delays?",
            "Which shipments have low weight fill percentages (indicating inefficiency)?",
            "Which routes have consistently low utilization rates?",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn defaults_are_three_distinct() {
        let defaults = default_suggestions();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults.iter().collect::<HashSet<_>>().len(), 3);
    }

    #[test]
    fn builtin_catalog_is_populated() {
        let catalog = builtin_faq_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.all().count() >= 20);
    }
}
