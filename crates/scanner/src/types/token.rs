/// Metadata of one registered asset, cached by the asset registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    /// Decimal places used to render the asset's integer balances.
    pub precision: u32,
}

impl TokenInfo {
    pub fn new(name: &str, symbol: &str, precision: u32) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            precision,
        }
    }
}
