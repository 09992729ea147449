//! Filter engine: dataset + criteria → matching records.

use crate::types::{
    SearchFilters,
    TranslationKey,
};

/// Returns the records matching every criterion in `filters`, in input order.
///
/// Criteria are combined with AND. With no criteria the whole dataset is returned.
/// The input is never modified.
#[must_use]
pub fn search(dataset: &[TranslationKey], filters: &SearchFilters) -> Vec<TranslationKey> {
    if filters.is_empty() {
        return dataset.to_vec();
    }

    let query = filters.query.as_deref().map(str::to_lowercase);
    dataset
        .iter()
        .filter(|item| matches_lowered(item, query.as_deref(), filters))
        .cloned()
        .collect()
}

/// Whether a single record satisfies `filters`.
#[must_use]
pub fn matches(item: &TranslationKey, filters: &SearchFilters) -> bool {
    let query = filters.query.as_deref().map(str::to_lowercase);
    matches_lowered(item, query.as_deref(), filters)
}

/// `query` must already be lower-cased.
fn matches_lowered(item: &TranslationKey, query: Option<&str>, filters: &SearchFilters) -> bool {
    if let Some(query) = query
        && !matches_query(item, query)
    {
        return false;
    }

    if let Some(category) = &filters.category
        && item.category != *category
    {
        return false;
    }

    if let Some(locale) = &filters.locale
        && !item.has_locale(locale)
    {
        return false;
    }

    true
}

fn matches_query(item: &TranslationKey, query: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(&item.key)
        || item.description.as_deref().is_some_and(contains)
        || contains(&item.category)
        || item.translations.values().any(|translation| contains(&translation.value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::{
        buttons_and_forms,
        ids,
        translation_key,
    };

    #[fixture]
    fn dataset() -> Vec<TranslationKey> {
        buttons_and_forms()
    }

    #[rstest]
    fn empty_filters_return_dataset_in_order(dataset: Vec<TranslationKey>) {
        let result = search(&dataset, &SearchFilters::default());

        assert_eq!(result, dataset);
    }

    #[rstest]
    fn present_but_empty_query_matches_everything(dataset: Vec<TranslationKey>) {
        let result = search(&dataset, &SearchFilters::with_query(""));

        assert_that!(ids(&result), elements_are![eq("test-1"), eq("test-2")]);
    }

    #[rstest]
    #[case::key("BUTTON", &["test-1"])]
    #[case::description("email", &["test-2"])]
    #[case::category("Forms", &["test-2"])]
    #[case::translation_value("guardar", &["test-1"])]
    #[case::shared_substring("e", &["test-1", "test-2"])]
    #[case::no_match("no-match", &[])]
    fn query_matches_any_text_field(
        dataset: Vec<TranslationKey>,
        #[case] query: &str,
        #[case] expected: &[&str],
    ) {
        let result = search(&dataset, &SearchFilters::with_query(query));

        assert_eq!(ids(&result), expected);
    }

    #[rstest]
    #[case::buttons("buttons", &["test-1"])]
    #[case::forms("forms", &["test-2"])]
    #[case::case_sensitive("Buttons", &[])]
    #[case::unknown("navigation", &[])]
    fn category_is_exact(
        dataset: Vec<TranslationKey>,
        #[case] category: &str,
        #[case] expected: &[&str],
    ) {
        let result = search(&dataset, &SearchFilters::with_category(category));

        assert_eq!(ids(&result), expected);
        assert_that!(result.iter().all(|item| item.category == category), eq(true));
    }

    #[rstest]
    #[case::present("es", &["test-1"])]
    #[case::absent("fr", &[])]
    fn locale_requires_translation(
        dataset: Vec<TranslationKey>,
        #[case] locale: &str,
        #[case] expected: &[&str],
    ) {
        let result = search(&dataset, &SearchFilters::with_locale(locale));

        assert_eq!(ids(&result), expected);
    }

    #[rstest]
    fn filters_are_conjunctive(dataset: Vec<TranslationKey>) {
        let filters = SearchFilters {
            query: Some("save".to_string()),
            category: Some("forms".to_string()),
            locale: None,
        };

        assert_that!(search(&dataset, &filters), is_empty());
    }

    #[rstest]
    fn query_and_locale_are_not_scoped_to_each_other() {
        // "Sauvegarder" lives under `fr`, the locale filter asks for `en`.
        let dataset = vec![translation_key(
            "1",
            "button.save",
            "buttons",
            None,
            &[("en", "Save"), ("fr", "Sauvegarder")],
        )];
        let filters = SearchFilters {
            query: Some("sauve".to_string()),
            category: None,
            locale: Some("en".to_string()),
        };

        assert_that!(ids(&search(&dataset, &filters)), elements_are![eq("1")]);
    }

    #[rstest]
    fn result_is_subset_of_unfiltered(dataset: Vec<TranslationKey>) {
        let all = search(&dataset, &SearchFilters::default());
        let buttons = search(&dataset, &SearchFilters::with_category("buttons"));

        assert_that!(buttons.iter().all(|item| all.contains(item)), eq(true));
    }

    #[rstest]
    fn input_is_untouched(dataset: Vec<TranslationKey>) {
        let before = dataset.clone();

        let _ = search(&dataset, &SearchFilters::with_query("save"));

        assert_eq!(dataset, before);
    }

    #[rstest]
    fn matches_agrees_with_search(dataset: Vec<TranslationKey>) {
        let filters = SearchFilters::with_query("SAVE");

        assert_that!(matches(&dataset[0], &filters), eq(true));
        assert_that!(matches(&dataset[1], &filters), eq(false));
    }
}
