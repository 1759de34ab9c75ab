/// Folds a payload field name so `siglaUF`, `SiglaUF` and `sigla_uf` compare
/// equal. Accented letters are kept.
pub(crate) fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_key(value)
}
