//! Regional property transfer tax (ITP) rates.
//!
//! The rate found here becomes `tax_rate` on the investment inputs. Unknown
//! localities fall back to [`DEFAULT_TAX_RATE`] and are never an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

pub use crate::types::RegionTaxRate;
use crate::types::Rate;

/// Rate applied when a locality is not in the table.
pub const DEFAULT_TAX_RATE: Rate = dec!(0.08);

/// One row of the regional rate table.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRate {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub tax_rate: Rate,
}

const fn region(
    name: &'static str,
    aliases: &'static [&'static str],
    tax_rate: Decimal,
) -> RegionRate {
    RegionRate {
        name,
        aliases,
        tax_rate,
    }
}

/// General resale-housing rates per autonomous community.
static REGIONS: &[RegionRate] = &[
    region("Andalucía", &["Andalusia"], dec!(0.07)),
    region("Aragón", &[], dec!(0.08)),
    region("Asturias", &["Principado de Asturias"], dec!(0.08)),
    region("Baleares", &["Illes Balears", "Balearic Islands"], dec!(0.08)),
    region("Canarias", &["Canary Islands"], dec!(0.065)),
    region("Cantabria", &[], dec!(0.09)),
    region("Castilla-La Mancha", &[], dec!(0.09)),
    region("Castilla y León", &[], dec!(0.08)),
    region("Cataluña", &["Catalunya", "Catalonia"], dec!(0.10)),
    region("Ceuta", &[], dec!(0.06)),
    region("Comunidad de Madrid", &["Madrid"], dec!(0.06)),
    region("Comunidad Valenciana", &["Valencia", "Comunitat Valenciana"], dec!(0.10)),
    region("Extremadura", &[], dec!(0.08)),
    region("Galicia", &[], dec!(0.08)),
    region("La Rioja", &["Rioja"], dec!(0.07)),
    region("Melilla", &[], dec!(0.06)),
    region("Región de Murcia", &["Murcia"], dec!(0.08)),
    region("Navarra", &["Comunidad Foral de Navarra"], dec!(0.06)),
    region("País Vasco", &["Euskadi", "Basque Country"], dec!(0.04)),
];

/// The full rate table.
pub fn regions() -> &'static [RegionRate] {
    REGIONS
}

/// Look up a locality by name or alias. Matching ignores case, accents,
/// whitespace and punctuation.
pub fn lookup_region(name: &str) -> Option<&'static RegionRate> {
    let key = normalize(name);
    if key.is_empty() {
        return None;
    }
    REGIONS.iter().find(|r| {
        normalize(r.name) == key || r.aliases.iter().any(|alias| normalize(alias) == key)
    })
}

/// Tax rate for a locality, if it is in the table.
pub fn lookup_tax_rate(name: &str) -> Option<Rate> {
    lookup_region(name).map(|r| r.tax_rate)
}

/// Resolve a locality to a tax rate, falling back to [`DEFAULT_TAX_RATE`].
pub fn resolve_tax_rate(name: &str) -> RegionTaxRate {
    match lookup_region(name) {
        Some(r) => RegionTaxRate {
            region: r.name.to_string(),
            tax_rate: r.tax_rate,
            is_fallback: false,
        },
        None => {
            log::warn!("unknown region '{name}', using default tax rate {DEFAULT_TAX_RATE}");
            RegionTaxRate {
                region: name.trim().to_string(),
                tax_rate: DEFAULT_TAX_RATE,
                is_fallback: true,
            }
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .filter(|c| c.is_alphanumeric())
        .collect()
}
