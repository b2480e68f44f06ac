use serde::Serialize;

/// A named group of records with sub-totals computed from its own items only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket<K, T> {
    pub key: K,
    pub count: usize,
    pub overdue_count: usize,
    pub items: Vec<T>,
}

/// Groups `items` into one bucket per entry of `keys`, in `keys` order.
///
/// Every key yields a bucket, empty or not. Items whose key is not listed are
/// dropped. Items keep their relative input order within a bucket.
///
/// ```
/// use gigdash_core::derive::group_into_buckets;
///
/// let buckets = group_into_buckets(
///     ["todo", "done"],
///     vec![("a", "done"), ("b", "todo"), ("c", "done")],
///     |item| item.1,
///     |item| item.0 == "c",
/// );
///
/// assert_eq!(buckets[0].key, "todo");
/// assert_eq!(buckets[1].count, 2);
/// assert_eq!(buckets[1].overdue_count, 1);
/// ```
pub fn group_into_buckets<K, T, I>(
    keys: impl IntoIterator<Item = K>,
    items: I,
    key_of: impl Fn(&T) -> K,
    is_overdue: impl Fn(&T) -> bool,
) -> Vec<Bucket<K, T>>
where
    K: PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut buckets: Vec<Bucket<K, T>> = keys
        .into_iter()
        .map(|key| Bucket {
            key,
            count: 0,
            overdue_count: 0,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let key = key_of(&item);
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.key == key) {
            bucket.count += 1;
            if is_overdue(&item) {
                bucket.overdue_count += 1;
            }
            bucket.items.push(item);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        id: u32,
        column: &'static str,
        overdue: bool,
    }

    fn card(id: u32, column: &'static str, overdue: bool) -> Card {
        Card {
            id,
            column,
            overdue,
        }
    }

    #[test]
    fn test_buckets_follow_definition_order() {
        let buckets = group_into_buckets(
            ["todo", "in_progress", "done"],
            vec![card(1, "done", false), card(2, "todo", false)],
            |c| c.column,
            |c| c.overdue,
        );

        let keys: Vec<_> = buckets.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["todo", "in_progress", "done"]);
        assert_eq!(buckets[1].count, 0);
        assert!(buckets[1].items.is_empty());
    }

    #[test]
    fn test_subtotals_only_count_own_items() {
        let buckets = group_into_buckets(
            ["todo", "done"],
            vec![
                card(1, "todo", true),
                card(2, "todo", false),
                card(3, "done", true),
                card(4, "todo", true),
            ],
            |c| c.column,
            |c| c.overdue,
        );

        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].overdue_count, 2);
        assert_eq!(buckets[1].count, 1);
        assert_eq!(buckets[1].overdue_count, 1);

        let ids: Vec<_> = buckets[0].items.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let buckets = group_into_buckets(
            ["todo"],
            vec![card(1, "archived", false)],
            |c| c.column,
            |c| c.overdue,
        );

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 0);
    }
}
