//! Display names for the symbols the bot is usually pointed at.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyInfo {
    pub name: &'static str,
    pub sector: &'static str,
}

const UNKNOWN: CompanyInfo = CompanyInfo {
    name: "Unknown",
    sector: "Unknown",
};

const COMPANIES: &[(&str, CompanyInfo)] = &[
    (
        "PFE",
        CompanyInfo {
            name: "Pfizer Inc.",
            sector: "Healthcare",
        },
    ),
    (
        "T",
        CompanyInfo {
            name: "AT&T Inc.",
            sector: "Telecommunications",
        },
    ),
    (
        "AAPL",
        CompanyInfo {
            name: "Apple Inc.",
            sector: "Technology",
        },
    ),
];

pub fn company_info(symbol: &str) -> CompanyInfo {
    COMPANIES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, info)| *info)
        .unwrap_or(UNKNOWN)
}
