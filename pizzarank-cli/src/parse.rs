/// Parsing offers from command-line flags, files and stdin.
///
/// Two text formats are accepted:
///   - a JSON array of `{"name", "quantity", "diameter", "price"}` objects
///   - one `name,quantity,diameter,price` line per offer
use pizzarank_core::EntryInput;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expected \"name,quantity,diameter,price\", got {0:?}")]
    FieldCount(String),
    #[error("quantity must be a positive whole number, got {0:?}")]
    Quantity(String),
    #[error("{field} must be a number, got {value:?}")]
    Number { field: &'static str, value: String },
    #[error("offers look like JSON but failed to parse: {0}")]
    Json(String),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<InputError>,
    },
}

/// Offer as written in a JSON offers file.
#[derive(Debug, Deserialize)]
struct JsonOffer {
    name: String,
    #[serde(alias = "amount")]
    quantity: u32,
    diameter: f64,
    #[serde(alias = "unit_price")]
    price: f64,
}

pub fn parse_quantity(value: &str) -> Result<u32, InputError> {
    value
        .trim()
        .parse()
        .map_err(|_| InputError::Quantity(value.trim().to_string()))
}

pub fn parse_number(field: &'static str, value: &str) -> Result<f64, InputError> {
    value.trim().parse().map_err(|_| InputError::Number {
        field,
        value: value.trim().to_string(),
    })
}

/// Parse `name,quantity,diameter,price`. Fields are taken from the right so
/// the name itself may contain commas.
pub fn parse_offer(spec: &str) -> Result<EntryInput, InputError> {
    let mut fields = spec.rsplitn(4, ',');
    let (Some(price), Some(diameter), Some(quantity), Some(name)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(InputError::FieldCount(spec.trim().to_string()));
    };

    Ok(EntryInput::new(
        name.trim(),
        parse_quantity(quantity)?,
        parse_number("diameter", diameter)?,
        parse_number("price", price)?,
    ))
}

/// Parse a whole file or stdin dump. Blank lines and `#` comments are skipped.
pub fn parse_offers_from_str(content: &str) -> Result<Vec<EntryInput>, InputError> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let offers: Vec<JsonOffer> =
            serde_json::from_str(trimmed).map_err(|e| InputError::Json(e.to_string()))?;
        return Ok(offers
            .into_iter()
            .map(|o| EntryInput::new(o.name, o.quantity, o.diameter, o.price))
            .collect());
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|(i, l)| {
            parse_offer(l).map_err(|e| InputError::Line {
                line: i + 1,
                source: Box::new(e),
            })
        })
        .collect()
}
