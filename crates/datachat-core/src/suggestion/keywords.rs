//! Local keyword table consulted before any remote autocomplete call.

/// Keyword → canned questions. Order matters: the first keyword that the
/// query starts with wins.
pub static KEYWORD_TABLE: &[(&str, &[&str])] = &[
    (
        "what",
        &[
            "What are all the column names in this dataset?",
            "What is the total transportation cost across all consignments?",
            "What is the total weight of all shipments?",
            "What are the data types of each column?",
            "What date range is covered in this dataset?",
            "What are all unique source locations in the dataset?",
            "What are all unique products in the dataset?",
            "What is the average volume across all consignments?",
        ],
    ),
    (
        "how",
        &[
            "How many records are present in the file?",
            "How many columns does this dataset contain?",
            "How many unique orders are there in the dataset?",
            "How many unique customers are represented?",
            "How many consignments use each transportation mode?",
            "How does average weight per consignment vary by transportation mode?",
        ],
    ),
    (
        "which",
        &[
            "Which columns contain numerical data?",
            "Which columns have missing values?",
            "Which transportation mode has the highest average transportation cost?",
            "Which source location dispatches the most consignments?",
            "Which customer has the highest number of consignments?",
            "Which product appears most frequently in the dataset?",
        ],
    ),
    (
        "show",
        &[
            "Show me the first 5 rows of data",
            "Show the total transportation cost by transportation mode",
            "Show the distribution of consignments by source type",
        ],
    ),
    (
        "total",
        &[
            "What is the total transportation cost across all consignments?",
            "What is the total number of cases shipped across all consignments?",
            "What is the total weight of all shipments?",
            "What is the total consignment MRP value across all records?",
        ],
    ),
    (
        "average",
        &[
            "What is the average transportation cost per consignment?",
            "What is the average weight per consignment?",
            "What is the average number of cases per consignment?",
            "What is the average delivery time (days between dispatch and expected arrival)?",
        ],
    ),
    (
        "cost",
        &[
            "What is the total transportation cost across all consignments?",
            "What is the minimum and maximum transportation cost observed?",
            "What is the total transportation cost by transportation mode?",
            "Which source location has the highest total transportation cost?",
        ],
    ),
    (
        "weight",
        &[
            "What is the total weight of all shipments?",
            "What is the average weight per consignment?",
            "What is the minimum and maximum weight observed?",
            "What is the average SKU weight?",
        ],
    ),
    (
        "volume",
        &[
            "What is the average volume across all consignments?",
            "What is the total volume by transportation mode?",
            "What is the average volume fill percentage across all shipments?",
        ],
    ),
    (
        "column",
        &[
            "What are all the column names in this dataset?",
            "How many columns does this dataset contain?",
            "What are the data types of each column?",
            "Which columns have missing values?",
        ],
    ),
    (
        "missing",
        &[
            "Are there any missing or null values in this dataset?",
            "Which columns have missing values?",
            "How many missing values exist in each column?",
        ],
    ),
    (
        "customer",
        &[
            "How many unique customers are represented?",
            "What are all unique customers in the dataset?",
            "Which customer has the highest number of consignments?",
            "Which customer has the highest total transportation cost?",
        ],
    ),
    (
        "product",
        &[
            "What is the unique count of products in the dataset?",
            "What are all unique products in the dataset?",
            "Which product appears most frequently in the dataset?",
            "Which product has the highest average SKU weight?",
        ],
    ),
    (
        "source",
        &[
            "What are the unique source types available?",
            "What are all unique source locations in the dataset?",
            "How many consignments originate from each source location?",
            "Which source location dispatches the most consignments?",
        ],
    ),
    (
        "destination",
        &[
            "What are the unique destination types available?",
            "What are all unique destination locations in the dataset?",
            "How many consignments are delivered to each destination location?",
            "Which destination location receives the most consignments?",
        ],
    ),
    (
        "consignment",
        &[
            "What is the unique count of consignment numbers?",
            "How many consignments use each transportation mode?",
            "Which consignments have actual or potential delivery delays?",
        ],
    ),
];

/// Looks `normalized` (lower-cased, trimmed) up in [`KEYWORD_TABLE`].
///
/// If the query starts with a keyword, that keyword's questions are
/// filtered to those starting with the query or containing its last word.
/// Otherwise every word is compared against the keywords and the first exact
/// hit returns its whole list. Callers cap the result.
pub fn lookup(normalized: &str) -> Vec<String> {
    let words: Vec<&str> = normalized.split_whitespace().collect();
    let Some(last_word) = words.last().copied() else {
        return Vec::new();
    };

    if let Some((_, questions)) = KEYWORD_TABLE
        .iter()
        .find(|(keyword, _)| normalized.starts_with(keyword))
    {
        return questions
            .iter()
            .filter(|q| {
                let lower = q.to_lowercase();
                lower.starts_with(normalized) || lower.contains(last_word)
            })
            .map(|q| q.to_string())
            .collect();
    }

    words
        .iter()
        .find_map(|word| KEYWORD_TABLE.iter().find(|(keyword, _)| keyword == word))
        .map(|(_, questions)| questions.iter().map(|q| q.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_keyword_filters_by_last_word() {
        let hits = lookup("what is the total");
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|q| {
            let lower = q.to_lowercase();
            lower.starts_with("what is the total") || lower.contains("total")
        }));
        assert!(!hits.contains(&"What are all the column names in this dataset?".to_string()));
    }

    #[test]
    fn bare_keyword_returns_whole_list() {
        let hits = lookup("what");
        assert_eq!(hits[0], "What are all the column names in this dataset?");
        assert_eq!(hits.len(), 8);
    }

    #[test]
    fn embedded_keyword_returns_its_list() {
        let hits = lookup("tell me about weight");
        assert_eq!(hits[0], "What is the total weight of all shipments?");
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn embedded_keyword_needs_exact_word() {
        assert!(lookup("tell me about weights").is_empty());
    }

    #[test]
    fn prefix_with_no_match_is_empty() {
        assert!(lookup("whatever").is_empty());
    }

    #[test]
    fn empty_query_is_empty() {
        assert!(lookup("").is_empty());
    }
}
