use std::cmp::Ordering;
use std::num::NonZeroUsize;

use tracing::trace;

use crate::column::ColumnDescriptor;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

/// The user driven parameters of a table: search text, sort and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search: String,
    sort: Option<SortSpec>,
    page: usize,
    page_size: NonZeroUsize,
}

impl ViewState {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// New search text always starts over on page 1.
    pub fn search_changed(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
        trace!("Search changed to {:?}, page reset", self.search);
    }

    /// A new key sorts ascending, the current key flips its direction.
    pub fn sort_requested(&mut self, key: &str) {
        let direction = match &self.sort {
            Some(current) if current.key == key => current.direction.flipped(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec {
            key: key.to_string(),
            direction,
        });
        trace!("Sort requested: {key} {direction:?}");
    }

    /// Out of range pages are accepted here and clamped by [`derive`].
    pub fn page_requested(&mut self, page: usize) {
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.page_requested(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.page_requested(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.page_requested(1);
    }

    pub fn last_page(&mut self) {
        self.page_requested(usize::MAX);
    }

    /// Adopt the clamped page of a derived view.
    pub fn sync(&mut self, view: &DerivedView<'_>) {
        self.page = view.page;
    }
}

#[derive(Debug, Clone)]
pub struct DerivedRow<'a> {
    pub record: &'a Record,
    pub cells: Vec<String>,
}

/// The filtered, sorted and paginated slice of records for display.
#[derive(Debug, Clone)]
pub struct DerivedView<'a> {
    pub rows: Vec<DerivedRow<'a>>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    offset: usize,
}

impl<'a> DerivedView<'a> {
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().map(|r| r.record)
    }

    /// 1-based inclusive range of the visible rows, `(0, 0)` when nothing matches.
    pub fn showing(&self) -> (usize, usize) {
        if self.rows.is_empty() {
            (0, 0)
        } else {
            (self.offset + 1, self.offset + self.rows.len())
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filter, sort and paginate `records` for the given state.
pub fn derive<'a>(
    records: &'a [Record],
    columns: &[ColumnDescriptor],
    state: &ViewState,
) -> DerivedView<'a> {
    let needle = state.search.to_lowercase();
    let mut filtered: Vec<&Record> = records.iter().filter(|r| r.matches(&needle)).collect();

    if let Some(sort) = &state.sort {
        // slice::sort_by is stable, equal keys keep their input order
        filtered.sort_by(|a, b| {
            let ordering = compare_by_key(a, b, &sort.key);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    let total = filtered.len();
    let page_size = state.page_size.get();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = state.page.clamp(1, total_pages);
    let offset = (page - 1) * page_size;
    let end = offset.saturating_add(page_size).min(total);

    let rows = filtered
        .get(offset..end)
        .unwrap_or_default()
        .iter()
        .map(|&record| DerivedRow {
            record,
            cells: columns.iter().map(|c| c.cell(record)).collect(),
        })
        .collect();

    trace!(
        "Derived view: {} of {} records match {:?}, page {}/{}",
        total,
        records.len(),
        state.search,
        page,
        total_pages
    );

    DerivedView {
        rows,
        total,
        total_pages,
        page,
        offset,
    }
}

// Missing values sort as the minimum
fn compare_by_key(a: &Record, b: &Record, key: &str) -> Ordering {
    match (a.get(key), b.get(key)) {
        (Some(a), Some(b)) => a.compare(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::record::Value;

    fn people() -> Vec<Record> {
        vec![
            Record::new(1).with("name", "Tom"),
            Record::new(2).with("name", "Ann"),
            Record::new(3).with("name", "Bob"),
        ]
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![ColumnDescriptor::new("Name", "name")]
    }

    fn state(page_size: usize) -> ViewState {
        ViewState::new(NonZeroUsize::new(page_size).unwrap())
    }

    fn names<'a>(view: &DerivedView<'a>) -> Vec<String> {
        view.rows.iter().map(|r| r.cells[0].clone()).collect()
    }

    #[test]
    fn sorted_pages_of_two() {
        let records = people();
        let mut s = state(2);
        s.sort_requested("name");

        let view = derive(&records, &columns(), &s);
        assert_eq!(view.total_pages, 2);
        assert_eq!(names(&view), ["Ann", "Bob"]);

        s.page_requested(2);
        let view = derive(&records, &columns(), &s);
        assert_eq!(names(&view), ["Tom"]);
        assert_eq!(view.showing(), (3, 3));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = people();
        let mut s = state(2);
        s.search_changed("an");
        let view = derive(&records, &columns(), &s);
        assert_eq!(view.total, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(names(&view), ["Ann"]);
    }

    #[test]
    fn search_matches_identifier() {
        let records = people();
        let mut s = state(5);
        s.search_changed("3");
        let view = derive(&records, &columns(), &s);
        assert_eq!(names(&view), ["Bob"]);
    }

    #[test]
    fn no_sort_key_keeps_input_order() {
        let records = people();
        let view = derive(&records, &columns(), &state(10));
        assert_eq!(names(&view), ["Tom", "Ann", "Bob"]);
    }

    #[test]
    fn search_resets_page() {
        let mut s = state(1);
        s.page_requested(3);
        s.search_changed("o");
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let records = people();
        let mut s = state(2);

        s.page_requested(0);
        let view = derive(&records, &columns(), &s);
        assert_eq!(view.page, 1);
        assert_eq!(view.rows.len(), 2);

        s.page_requested(99);
        let view = derive(&records, &columns(), &s);
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.len(), 1);

        s.sync(&view);
        assert_eq!(s.page(), 2);
    }

    #[test]
    fn empty_input_yields_single_empty_page() {
        let view = derive(&[], &columns(), &state(5));
        assert_eq!(view.total, 0);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 1);
        assert!(view.rows.is_empty());
        assert_eq!(view.showing(), (0, 0));
        assert!(!view.has_next());
        assert!(!view.has_previous());
    }

    #[test]
    fn relative_navigation_stays_in_bounds() {
        let records = people();
        let mut s = state(1);
        s.previous_page();
        assert_eq!(derive(&records, &columns(), &s).page, 1);

        s.last_page();
        let view = derive(&records, &columns(), &s);
        assert_eq!(view.page, 3);
        s.sync(&view);

        s.next_page();
        assert_eq!(derive(&records, &columns(), &s).page, 3);
    }

    #[test]
    fn sort_toggle_and_reset_direction() {
        let mut s = state(5);
        s.sort_requested("name");
        assert_eq!(s.sort().map(|x| x.direction), Some(SortDirection::Ascending));
        s.sort_requested("name");
        assert_eq!(s.sort().map(|x| x.direction), Some(SortDirection::Descending));
        s.sort_requested("role");
        assert_eq!(
            s.sort(),
            Some(&SortSpec {
                key: "role".into(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn missing_values_sort_first() {
        let records = vec![
            Record::new(1).with("age", 30i64),
            Record::new(2),
            Record::new(3).with("age", 20i64),
        ];
        let mut s = state(5);
        s.sort_requested("age");
        let view = derive(&records, &columns(), &s);
        let ids: Vec<String> = view.records().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["2", "3", "1"]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let records = vec![
            Record::new(1).with("score", 10i64),
            Record::new(2).with("score", 9i64),
            Record::new(3).with("score", 100i64),
        ];
        let mut s = state(5);
        s.sort_requested("score");
        s.sort_requested("score");
        let view = derive(&records, &columns(), &s);
        let ids: Vec<String> = view.records().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn derive_leaves_source_untouched() {
        let records = people();
        let before = records.clone();
        let mut s = state(2);
        s.sort_requested("name");
        s.search_changed("o");
        let _ = derive(&records, &columns(), &s);
        assert_eq!(records, before);
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(("[a-cA-C]{0,3}", 0i64..4), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, group))| {
                    Record::new(i as i64)
                        .with("name", name)
                        .with("group", group)
                })
                .collect()
        })
    }

    fn all_pages<'a>(records: &'a [Record], s: &ViewState) -> Vec<&'a Record> {
        let mut s = s.clone();
        let total_pages = derive(records, &[], &s).total_pages;
        let mut out = Vec::new();
        for page in 1..=total_pages {
            s.page_requested(page);
            out.extend(derive(records, &[], &s).records());
        }
        out
    }

    proptest! {
        #[test]
        fn only_matching_records_appear(records in arb_records(), needle in "[a-c]{0,2}") {
            let mut s = state(3);
            s.search_changed(needle.clone());
            let shown = all_pages(&records, &s);
            for r in &shown {
                prop_assert!(r.matches(&needle));
            }
            let expected = records.iter().filter(|r| r.matches(&needle)).count();
            prop_assert_eq!(shown.len(), expected);
        }

        #[test]
        fn sort_is_stable(records in arb_records(), descending in any::<bool>()) {
            let mut s = state(1000);
            s.sort_requested("group");
            if descending {
                s.sort_requested("group");
            }
            let view = derive(&records, &[], &s);
            let sorted: Vec<&Record> = view.records().collect();
            for pair in sorted.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a.get("group") == b.get("group") {
                    // ids are input positions
                    prop_assert!(a.id.to_string().parse::<i64>().unwrap() < b.id.to_string().parse::<i64>().unwrap());
                }
            }
        }

        #[test]
        fn mixed_value_columns_sort_stably(
            values in prop::collection::vec((0i64..20, any::<bool>()), 0..200),
            descending in any::<bool>(),
        ) {
            let records: Vec<Record> = values
                .iter()
                .enumerate()
                .map(|(i, &(n, as_text))| {
                    let v = if as_text { Value::from(format!("{n}z")) } else { Value::from(n) };
                    Record::new(i as i64).with("v", v)
                })
                .collect();
            let mut s = state(1000);
            s.sort_requested("v");
            if descending {
                s.sort_requested("v");
            }
            let sorted: Vec<&Record> = derive(&records, &[], &s).records().collect();
            prop_assert_eq!(sorted.len(), records.len());
            for pair in sorted.windows(2) {
                let (a, b) = (pair[0].get("v").unwrap(), pair[1].get("v").unwrap());
                let ordering = a.compare(&b);
                if descending {
                    prop_assert_ne!(ordering, Ordering::Less);
                } else {
                    prop_assert_ne!(ordering, Ordering::Greater);
                }
                if ordering == Ordering::Equal {
                    prop_assert!(pair[0].id.to_string().parse::<i64>().unwrap() < pair[1].id.to_string().parse::<i64>().unwrap());
                }
            }
        }

        #[test]
        fn double_toggle_returns_to_ascending(records in arb_records()) {
            let mut once = state(1000);
            once.sort_requested("name");
            let mut thrice = once.clone();
            thrice.sort_requested("name");
            thrice.sort_requested("name");
            let a: Vec<&Record> = derive(&records, &[], &once).records().collect();
            let b: Vec<&Record> = derive(&records, &[], &thrice).records().collect();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn pages_reconstruct_the_sequence(records in arb_records(), size in 1usize..7) {
            let mut s = state(size);
            s.sort_requested("name");
            let whole: Vec<&Record> = {
                let mut all = s.clone();
                all.page_size = NonZeroUsize::new(usize::MAX).unwrap();
                derive(&records, &[], &all).records().collect()
            };
            let view = derive(&records, &[], &s);
            prop_assert_eq!(view.total_pages, records.len().div_ceil(size).max(1));
            prop_assert_eq!(all_pages(&records, &s), whole);
        }
    }
}
