//! Cutoff filtering and grouping by source.

use std::collections::HashMap;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::feed::NewsItem;

/// Items from one source that passed the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsGroup {
    /// Source name shared by every item in the group.
    pub source_name: String,
    /// Items in their original relative order.
    pub items: Vec<NewsItem>,
}

/// Ordered mapping from source name to its items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedNews {
    groups: Vec<NewsGroup>,
}

impl GroupedNews {
    /// Groups in first-occurrence order.
    pub fn groups(&self) -> &[NewsGroup] {
        &self.groups
    }

    /// Whether no item survived the filter.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    /// Items of the named source, if any.
    pub fn get(&self, source_name: &str) -> Option<&[NewsItem]> {
        self.groups
            .iter()
            .find(|g| g.source_name == source_name)
            .map(|g| g.items.as_slice())
    }
}

/// Keep items published at or after `cutoff` and group them by source.
///
/// Groups appear in the order their first surviving item appears. Items are
/// never re-sorted by date.
pub fn filter_and_group(items: Vec<NewsItem>, cutoff: DateTime<Tz>) -> GroupedNews {
    let mut groups: Vec<NewsGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items.into_iter().filter(|item| item.published_at >= cutoff) {
        match index.get(&item.source_name) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index.insert(item.source_name.clone(), groups.len());
                groups.push(NewsGroup {
                    source_name: item.source_name.clone(),
                    items: vec![item],
                });
            }
        }
    }

    GroupedNews { groups }
}
