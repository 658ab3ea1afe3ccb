//! Companies listed on B3.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};
use vantage_data::{DataError, Ticker};

/// Built-in universe: liquid B3 names as (ticker, company name).
const DEFAULT_LISTINGS: &[(&str, &str)] = &[
    // Energy and materials
    ("PETR3", "Petrobras ON"),
    ("PETR4", "Petrobras PN"),
    ("PRIO3", "PetroRio"),
    ("RECV3", "PetroReconcavo"),
    ("VALE3", "Vale"),
    ("GGBR4", "Gerdau"),
    ("CSNA3", "Siderurgica Nacional"),
    ("USIM5", "Usiminas"),
    ("SUZB3", "Suzano"),
    ("KLBN11", "Klabin"),
    ("BRKM5", "Braskem"),
    // Financials
    ("ITUB4", "Itau Unibanco"),
    ("BBDC4", "Bradesco"),
    ("BBAS3", "Banco do Brasil"),
    ("SANB11", "Santander Brasil"),
    ("BPAC11", "BTG Pactual"),
    ("B3SA3", "B3"),
    ("BBSE3", "BB Seguridade"),
    ("ITSA4", "Itausa"),
    // Utilities
    ("ELET3", "Eletrobras"),
    ("EGIE3", "Engie Brasil"),
    ("EQTL3", "Equatorial"),
    ("CMIG4", "Cemig"),
    ("TAEE11", "Taesa"),
    ("SBSP3", "Sabesp"),
    ("CPFE3", "CPFL Energia"),
    // Consumer
    ("ABEV3", "Ambev"),
    ("LREN3", "Lojas Renner"),
    ("MGLU3", "Magazine Luiza"),
    ("ASAI3", "Assai"),
    ("NTCO3", "Natura"),
    ("JBSS3", "JBS"),
    ("BRFS3", "BRF"),
    ("RADL3", "Raia Drogasil"),
    // Industrials and transport
    ("WEGE3", "WEG"),
    ("EMBR3", "Embraer"),
    ("RAIL3", "Rumo"),
    ("CCRO3", "CCR"),
    ("AZUL4", "Azul"),
    // Health, telecom and technology
    ("HAPV3", "Hapvida"),
    ("RDOR3", "Rede D'Or"),
    ("VIVT3", "Telefonica Brasil"),
    ("TIMS3", "TIM"),
    ("TOTS3", "Totvs"),
    // Real estate
    ("MULT3", "Multiplan"),
    ("CYRE3", "Cyrela"),
];

/// One selectable company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Trading code without the exchange suffix.
    pub ticker: Ticker,
    /// Company name.
    pub name: String,
}

impl Listing {
    /// Create a new listing.
    pub fn new(ticker: Ticker, name: impl Into<String>) -> Self {
        Self {
            ticker,
            name: name.into(),
        }
    }
}

/// Universe of B3 listings.
#[derive(Debug, Clone)]
pub struct B3Universe {
    listings: Vec<Listing>,
    by_ticker: HashMap<Ticker, usize>,
}

impl B3Universe {
    /// Create the universe from the built-in list of liquid B3 names.
    pub fn new() -> Self {
        Self::from_listings(Self::default_listings())
    }

    /// Build from listings, keeping the first entry for a repeated ticker.
    pub fn from_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let mut kept = Vec::new();
        let mut by_ticker = HashMap::new();
        for listing in listings {
            if by_ticker.contains_key(&listing.ticker) {
                continue;
            }
            by_ticker.insert(listing.ticker.clone(), kept.len());
            kept.push(listing);
        }

        Self {
            listings: kept,
            by_ticker,
        }
    }

    /// Load a listed-companies CSV.
    ///
    /// The file has a header row, the company name in the first column and
    /// the ticker in the second. Rows whose ticker does not parse are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let universe = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            listings = universe.listings.len(),
            "Loaded ticker universe"
        );
        Ok(universe)
    }

    /// Load a listed-companies CSV from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid CSV.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut listings = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let name = record.get(0).unwrap_or_default();
            let Some(raw) = record.get(1) else {
                warn!(row = ?record.position().map(|p| p.line()), "Row without a ticker column");
                continue;
            };
            match Ticker::parse(raw) {
                Ok(ticker) => listings.push(Listing::new(ticker, name)),
                Err(e) => warn!(ticker = raw, error = %e, "Skipping listing"),
            }
        }

        Ok(Self::from_listings(listings))
    }

    /// All listings in file order.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Listing for a ticker.
    pub fn get(&self, ticker: &Ticker) -> Option<&Listing> {
        self.by_ticker.get(ticker).map(|&i| &self.listings[i])
    }

    /// Company name for a ticker.
    pub fn name(&self, ticker: &Ticker) -> Option<&str> {
        self.get(ticker).map(|l| l.name.as_str())
    }

    /// Listings whose ticker or name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Listing> {
        let query = query.trim().to_lowercase();
        self.listings
            .iter()
            .filter(|l| {
                l.ticker.as_str().to_lowercase().contains(&query)
                    || l.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    fn default_listings() -> Vec<Listing> {
        let mut listings = Vec::with_capacity(DEFAULT_LISTINGS.len());
        for &(raw, name) in DEFAULT_LISTINGS {
            match Ticker::parse(raw) {
                Ok(ticker) => listings.push(Listing::new(ticker, name)),
                Err(e) => warn!(ticker = raw, error = %e, "Skipping built-in listing"),
            }
        }
        listings
    }
}

impl Default for B3Universe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Universe;
    use rstest::rstest;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    #[test]
    fn test_default_universe() {
        let universe = B3Universe::new();

        assert_eq!(universe.listings().len(), 46);
        assert_eq!(universe.listings().len(), DEFAULT_LISTINGS.len());
        assert_eq!(universe.name(&ticker("VALE3")), Some("Vale"));
        assert!(universe.get(&ticker("BRAX11")).is_none());
    }

    #[test]
    fn test_built_in_listings_are_valid() {
        for &(raw, _) in DEFAULT_LISTINGS {
            let parsed = Ticker::parse(raw).unwrap();
            assert_eq!(parsed.as_str(), raw);
            assert!(!parsed.is_benchmark());
        }
    }

    #[test]
    fn test_from_reader_uses_second_column() {
        let data = "\
Empresa,Ticker,Setor
Petrobras,PETR4,Energia
Vale,vale3 ,Mineracao
Invalida,??,Nada
Duplicada,PETR4,Energia
";
        let universe = B3Universe::from_reader(data.as_bytes()).unwrap();

        assert_eq!(universe.listings().len(), 2);
        assert_eq!(universe.listings()[1].ticker, ticker("VALE3"));
        assert_eq!(universe.name(&ticker("PETR4")), Some("Petrobras"));
    }

    #[test]
    fn test_from_reader_skips_short_rows() {
        let data = "Empresa,Ticker\nSemTicker\nWEG,WEGE3\n";
        let universe = B3Universe::from_reader(data.as_bytes()).unwrap();

        assert_eq!(universe.symbols(), vec![ticker("WEGE3")]);
    }

    #[rstest]
    #[case("petro", 4)]
    #[case("BANCO", 2)]
    #[case("brasil", 4)]
    #[case("  vale3 ", 1)]
    #[case("zzzz", 0)]
    fn test_search(#[case] query: &str, #[case] expected: usize) {
        let universe = B3Universe::new();
        assert_eq!(universe.search(query).len(), expected);
    }
}
