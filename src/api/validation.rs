use super::ApiError;

/// Longest city query accepted from a client
const MAX_QUERY_LEN: usize = 100;

pub fn validate_limit(limit: usize) -> Result<usize, ApiError> {
    const MAX_LIMIT: usize = 1000;
    const MIN_LIMIT: usize = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Trims a city query and rejects empty or oversized input.
pub fn validate_city_query<'a>(field: &str, query: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }

    if trimmed.chars().count() > MAX_QUERY_LEN {
        return Err(ApiError::validation(format!(
            "{field} must be {MAX_QUERY_LEN} characters or less"
        )));
    }

    Ok(trimmed)
}
