use super::error::LevelError;

/// Multiplier the feed's AGL/AMSL values are scaled by before dividing down
/// to hundreds. It is the feet-per-metre factor, applied as-is.
pub const FEET_PER_METRE: f64 = 3.280839895;

fn parse_level(raw: &str, digits: &str) -> Result<i64, LevelError> {
    digits.trim().parse::<i64>().map_err(|source| LevelError {
        value: raw.to_string(),
        source,
    })
}

/// Convert an encoded vertical limit (`1500AGL`, `2000AMSL`, `F330`) to a flight level.
///
/// Empty or unrecognised values give 0. A recognised suffix with a
/// non-numeric remainder is an error.
pub fn extract_level(level: Option<&str>) -> Result<i64, LevelError> {
    let raw = match level {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(0),
    };

    if raw.contains("AGL") || raw.contains("AMSL") {
        let value = parse_level(raw, &raw.replace("AGL", "").replace("AMSL", ""))?;
        Ok((value as f64 * FEET_PER_METRE / 100.0) as i64)
    } else if raw.contains('F') {
        parse_level(raw, &raw.replace('F', ""))
    } else {
        Ok(0)
    }
}

/// Remark describing the vertical reference of an encoded limit.
pub fn determine_remark(level: Option<&str>) -> &'static str {
    match level {
        Some(raw) if raw.contains("AGL") => "MAGL",
        Some(raw) if raw.contains("AMSL") => "MAMSL",
        Some(raw) if raw.contains('F') => "FL",
        _ => "",
    }
}

pub fn combine_remarks(from: &str, to: &str) -> String {
    if from == to {
        return from.to_string();
    }
    format!("{}, {}", from, to)
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}
