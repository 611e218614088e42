//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/rewards/{customer_id}', use [format_endpoint].

/// The route for the rewards summaries of all customers.
pub const REWARDS: &str = "/api/rewards";
/// The route for the rewards summary of a single customer.
pub const CUSTOMER_REWARDS: &str = "/api/rewards/{customer_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/rewards/{customer_id}', '{customer_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
