use std::sync::Arc;

use crate::Company;

const DEFAULT_COMPANIES: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com, Inc."),
    ("META", "Meta Platforms, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("TSLA", "Tesla, Inc."),
];

/// Immutable table of supported companies, built once at startup.
#[derive(Debug, Clone)]
pub struct CompanyCatalog {
    companies: Arc<[Company]>,
}

impl CompanyCatalog {
    pub fn new(companies: Vec<Company>) -> Self {
        Self {
            companies: companies.into(),
        }
    }

    pub fn all(&self) -> &[Company] {
        &self.companies
    }
}

impl Default for CompanyCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_COMPANIES
                .iter()
                .map(|(symbol, name)| Company {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lists_tickers() {
        let catalog = CompanyCatalog::default();
        let symbols: Vec<&str> = catalog.all().iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA"]);
        assert_eq!(catalog.all()[0].name, "Apple Inc.");
    }

    #[test]
    fn test_catalog_clones_share_table() {
        let catalog = CompanyCatalog::default();
        let other = catalog.clone();
        assert_eq!(catalog.all().as_ptr(), other.all().as_ptr());
    }
}
