/// Fingerprint of a subscription query.
///
/// Lowercase hex MD5 of the raw query text. No normalization is applied: any
/// edit to a webhook's query, whitespace included, yields a new fingerprint so
/// payloads generated for the old query are never served for the new one.
pub fn get_subscription_query_hash(subscription_query: &str) -> String {
    format!("{:x}", md5::compute(subscription_query.as_bytes()))
}
